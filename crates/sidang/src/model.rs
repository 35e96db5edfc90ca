//! Records exchanged with the scheduling backend.
//!
//! The server owns every record here. The client reads them, and submits
//! the small request bodies at the bottom of this module.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Who is using the client; decides which endpoints are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Student submitting a thesis.
    Mahasiswa,
    /// Advisor reviewing and scheduling theses.
    Dosen,
}

impl Role {
    /// Wire and storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mahasiswa => "MAHASISWA",
            Self::Dosen => "DOSEN",
        }
    }

    /// Human label used in headers.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mahasiswa => "Mahasiswa",
            Self::Dosen => "Dosen",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAHASISWA" => Ok(Self::Mahasiswa),
            "DOSEN" => Ok(Self::Dosen),
            _ => Err(Error::validation(format!("Role tidak dikenal: {s}"))),
        }
    }
}

/// Review state of a thesis. Transitions are decided by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThesisStatus {
    /// Submitted, waiting for review.
    Pending,
    /// Accepted by the advisor; may be scheduled.
    Approved,
    /// Turned down by the advisor.
    Rejected,
}

impl ThesisStatus {
    /// All statuses, in review order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ThesisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThesisStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::validation("Decision harus APPROVED, REJECTED, atau PENDING"))
    }
}

/// An account as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server identifier.
    pub id: String,
    /// Sign-in e-mail.
    pub email: String,
    /// Display name, unset until the profile is filled in.
    #[serde(default)]
    pub name: Option<String>,
    /// Account role.
    pub role: Role,
    /// Study program.
    #[serde(default)]
    pub prodi: Option<String>,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name to greet the user with, falling back to the e-mail.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// A thesis submission and its review/scheduling state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thesis {
    /// Server identifier.
    pub id: String,
    /// Thesis title.
    pub title: String,
    /// Link to the submitted document.
    pub doc_url: String,
    /// Review state.
    pub status: ThesisStatus,
    /// Defense date, once scheduled.
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Owning student.
    pub student_id: String,
    /// Owning student, when the endpoint includes it.
    #[serde(default)]
    pub student: Option<User>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl Thesis {
    /// Calendar day of the defense, if the thesis is approved and scheduled.
    #[must_use]
    pub fn defense_date(&self) -> Option<NaiveDate> {
        if self.status != ThesisStatus::Approved {
            return None;
        }
        self.scheduled_at.map(|at| at.date_naive())
    }

    /// Whether the defense falls on `date`.
    #[must_use]
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.defense_date() == Some(date)
    }

    /// Student name if included, otherwise the short student id.
    #[must_use]
    pub fn student_label(&self) -> String {
        match &self.student {
            Some(student) => student.display_name().to_string(),
            None => self.student_id.chars().take(8).collect(),
        }
    }
}

/// Body of `POST api/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProfileRequest {
    /// Display name.
    pub name: String,
    /// Study program.
    pub prodi: String,
}

/// Body of `POST api/thesis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThesisRequest {
    /// Thesis title.
    pub title: String,
    /// Link to the document.
    pub doc_url: String,
}

/// Body of `PUT api/dosen/review/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewThesisRequest {
    /// Requested status.
    pub decision: ThesisStatus,
}

/// Body of `PUT api/dosen/schedule/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleThesisRequest {
    /// ISO-8601 date-time with offset.
    pub date: String,
}
