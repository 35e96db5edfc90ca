//! Catalogue of backend endpoints.

use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};

/// One backend operation: verb plus path relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET health`
    Health,
    /// `GET api/profile/me`
    MyProfile,
    /// `POST api/profile`
    UpdateProfile,
    /// `GET api/thesis/me/all`
    MyTheses,
    /// `POST api/thesis`
    CreateThesis,
    /// `GET api/dosen/pending`
    PendingTheses,
    /// `GET api/dosen/all`
    AllTheses,
    /// `GET api/dosen/thesis/{id}`
    ThesisDetail(String),
    /// `PUT api/dosen/review/{id}`
    ReviewThesis(String),
    /// `PUT api/dosen/schedule/{id}`
    ScheduleThesis(String),
}

impl Endpoint {
    /// HTTP verb.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Health
            | Self::MyProfile
            | Self::MyTheses
            | Self::PendingTheses
            | Self::AllTheses
            | Self::ThesisDetail(_) => Method::GET,
            Self::UpdateProfile | Self::CreateThesis => Method::POST,
            Self::ReviewThesis(_) | Self::ScheduleThesis(_) => Method::PUT,
        }
    }

    /// Fixed path segments, without the record id.
    fn segments(&self) -> &'static [&'static str] {
        match self {
            Self::Health => &["health"],
            Self::MyProfile => &["api", "profile", "me"],
            Self::UpdateProfile => &["api", "profile"],
            Self::MyTheses => &["api", "thesis", "me", "all"],
            Self::CreateThesis => &["api", "thesis"],
            Self::PendingTheses => &["api", "dosen", "pending"],
            Self::AllTheses => &["api", "dosen", "all"],
            Self::ThesisDetail(_) => &["api", "dosen", "thesis"],
            Self::ReviewThesis(_) => &["api", "dosen", "review"],
            Self::ScheduleThesis(_) => &["api", "dosen", "schedule"],
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            Self::ThesisDetail(id) | Self::ReviewThesis(id) | Self::ScheduleThesis(id) => {
                Some(id)
            }
            _ => None,
        }
    }

    /// Absolute URL under `base`. The record id becomes one percent-encoded
    /// path segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if `base` cannot carry a path.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::internal(format!("base URL cannot be a base: {base}")))?;
            path.pop_if_empty();
            path.extend(self.segments());
            if let Some(id) = self.id() {
                path.push(id);
            }
        }
        Ok(url)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.segments().join("/"))?;
        if let Some(id) = self.id() {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://simpensi-api.afif.dev/").unwrap()
    }

    #[test]
    fn test_paths_match_backend_routes() {
        let cases = [
            (Endpoint::Health, "health"),
            (Endpoint::MyProfile, "api/profile/me"),
            (Endpoint::UpdateProfile, "api/profile"),
            (Endpoint::MyTheses, "api/thesis/me/all"),
            (Endpoint::CreateThesis, "api/thesis"),
            (Endpoint::PendingTheses, "api/dosen/pending"),
            (Endpoint::AllTheses, "api/dosen/all"),
            (Endpoint::ThesisDetail("t1".into()), "api/dosen/thesis/t1"),
            (Endpoint::ReviewThesis("t1".into()), "api/dosen/review/t1"),
            (Endpoint::ScheduleThesis("t1".into()), "api/dosen/schedule/t1"),
        ];
        for (endpoint, path) in cases {
            assert_eq!(
                endpoint.url(&base()).unwrap().as_str(),
                format!("https://simpensi-api.afif.dev/{path}")
            );
        }
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::Health.method(), Method::GET);
        assert_eq!(Endpoint::UpdateProfile.method(), Method::POST);
        assert_eq!(Endpoint::CreateThesis.method(), Method::POST);
        assert_eq!(Endpoint::ReviewThesis("x".into()).method(), Method::PUT);
        assert_eq!(Endpoint::ScheduleThesis("x".into()).method(), Method::PUT);
        assert_eq!(Endpoint::ThesisDetail("x".into()).method(), Method::GET);
    }

    #[test]
    fn test_id_is_a_single_encoded_segment() {
        let url = Endpoint::ThesisDetail("../admin?x=1".into())
            .url(&base())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://simpensi-api.afif.dev/api/dosen/thesis/..%2Fadmin%3Fx=1"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let base = Url::parse("http://127.0.0.1:3000/v1/").unwrap();
        let url = Endpoint::MyTheses.url(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/v1/api/thesis/me/all");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Endpoint::ReviewThesis("t9".into()).to_string(),
            "PUT api/dosen/review/t9"
        );
        assert_eq!(Endpoint::Health.to_string(), "GET health");
    }
}
