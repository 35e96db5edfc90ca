//! Advisor-side thesis endpoints and the schedule form.

use chrono::{Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike};
use tracing::{debug, info};

use crate::api::{ApiClient, Endpoint, StatusMessages};
use crate::error::{Error, Result};
use crate::model::{ReviewThesisRequest, ScheduleThesisRequest, Thesis};
use crate::validation;

use super::EMPTY_RESPONSE;

/// Defense date and time as picked on the schedule form, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    /// Defense day.
    pub date: NaiveDate,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
}

impl ScheduleSlot {
    /// Create a slot.
    #[must_use]
    pub fn new(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self { date, hour, minute }
    }

    /// Parse `YYYY-MM-DD` and `HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either part does not parse.
    pub fn parse(date: &str, time: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| Error::validation("Format tanggal harus YYYY-MM-DD"))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| Error::validation("Format jam harus HH:MM"))?;
        Ok(Self::new(date, time.hour(), time.minute()))
    }

    /// Check the slot against `today`. Today itself is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a past date or an impossible time.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.date < today {
            return Err(Error::validation("Tanggal harus di masa depan"));
        }
        if self.time().is_none() {
            return Err(Error::validation("Jam tidak valid"));
        }
        Ok(())
    }

    fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// The slot as ISO-8601 with the local UTC offset, e.g.
    /// `2025-12-20T10:00:00+07:00`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an impossible time, or a local time
    /// skipped by a clock change.
    pub fn iso_string(&self) -> Result<String> {
        let time = self
            .time()
            .ok_or_else(|| Error::validation("Jam tidak valid"))?;
        let local = Local
            .from_local_datetime(&self.date.and_time(time))
            .earliest()
            .ok_or_else(|| Error::validation("Jam tidak valid"))?;
        Ok(local.to_rfc3339_opts(SecondsFormat::Secs, false))
    }
}

/// `api/dosen` operations for the signed-in advisor.
#[derive(Debug, Clone)]
pub struct AdvisorRepository {
    api: ApiClient,
}

impl AdvisorRepository {
    /// Create a repository over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Theses waiting for review.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error or a connection error.
    pub async fn pending_theses(&self) -> Result<Vec<Thesis>> {
        self.list(&Endpoint::PendingTheses).await
    }

    /// Every thesis the advisor can see.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error or a connection error.
    pub async fn all_theses(&self) -> Result<Vec<Thesis>> {
        self.list(&Endpoint::AllTheses).await
    }

    async fn list(&self, endpoint: &Endpoint) -> Result<Vec<Thesis>> {
        let theses = self
            .api
            .send(endpoint)
            .await?
            .ensure_success(&StatusMessages::ADVISOR)?
            .json_list::<Thesis>()?;
        debug!("{} returned {} theses", endpoint, theses.len());
        Ok(theses)
    }

    /// One thesis by id.
    ///
    /// # Errors
    ///
    /// Returns "Data TA tidak ditemukan" for an empty body, otherwise as
    /// [`Self::pending_theses`].
    pub async fn thesis_detail(&self, id: &str) -> Result<Thesis> {
        self.api
            .send(&Endpoint::ThesisDetail(id.to_string()))
            .await?
            .ensure_success(&StatusMessages::ADVISOR)?
            .json::<Thesis>()?
            .ok_or_else(|| Error::empty_response("Data TA tidak ditemukan"))
    }

    /// Request a status change. `decision` must be exactly `APPROVED`,
    /// `REJECTED` or `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server for any
    /// other decision; 404 reads "TA tidak ditemukan".
    pub async fn review_thesis(&self, id: &str, decision: &str) -> Result<Thesis> {
        let decision = validation::review_decision(decision)?;
        let thesis = self
            .api
            .send_json(
                &Endpoint::ReviewThesis(id.to_string()),
                &ReviewThesisRequest { decision },
            )
            .await?
            .ensure_success(&StatusMessages::ADVISOR_REVIEW)?
            .json::<Thesis>()?
            .ok_or_else(|| Error::empty_response(EMPTY_RESPONSE))?;
        info!("Thesis {} reviewed: {}", thesis.id, thesis.status);
        Ok(thesis)
    }

    /// Set the defense date. `date` is sent as given; the server checks it.
    ///
    /// # Errors
    ///
    /// 400 reads "Tanggal tidak valid atau sudah lewat", 404 "TA tidak
    /// ditemukan".
    pub async fn schedule_thesis(&self, id: &str, date: &str) -> Result<Thesis> {
        let thesis = self
            .api
            .send_json(
                &Endpoint::ScheduleThesis(id.to_string()),
                &ScheduleThesisRequest {
                    date: date.to_string(),
                },
            )
            .await?
            .ensure_success(&StatusMessages::ADVISOR_SCHEDULE)?
            .json::<Thesis>()?
            .ok_or_else(|| Error::empty_response(EMPTY_RESPONSE))?;
        info!("Thesis {} scheduled at {}", thesis.id, date);
        Ok(thesis)
    }

    /// Validate a form slot against `today`, then schedule it.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server for a past
    /// date or impossible time; otherwise as [`Self::schedule_thesis`].
    pub async fn schedule_slot(
        &self,
        id: &str,
        slot: &ScheduleSlot,
        today: NaiveDate,
    ) -> Result<Thesis> {
        slot.validate(today)?;
        let date = slot.iso_string()?;
        self.schedule_thesis(id, &date).await
    }
}
