//! Status-code to user-message tables.
//!
//! Each repository operation picks one table. Codes without an entry fall
//! back to `Error {code}`, optionally followed by the reason phrase.

use reqwest::StatusCode;

/// Shown for 401 everywhere.
pub const SESSION_EXPIRED: &str = "Sesi login telah berakhir";

/// Shown for 500 everywhere.
pub const SERVER_ERROR: &str = "Server sedang bermasalah";

/// Messages for the non-success statuses one operation can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessages {
    /// 400, if the operation defines one.
    pub bad_request: Option<&'static str>,
    /// 403.
    pub forbidden: &'static str,
    /// 404, if the operation defines one.
    pub not_found: Option<&'static str>,
    /// Whether the fallback includes the reason phrase.
    pub with_reason: bool,
}

impl StatusMessages {
    /// Calls with no operation-specific wording (health check).
    pub const GENERIC: Self = Self {
        bad_request: None,
        forbidden: "Anda tidak memiliki akses",
        not_found: None,
        with_reason: true,
    };

    /// `GET api/profile/me`
    pub const PROFILE_READ: Self = Self {
        bad_request: None,
        forbidden: "Anda tidak memiliki akses",
        not_found: Some("Profil tidak ditemukan"),
        with_reason: true,
    };

    /// `POST api/profile`
    pub const PROFILE_UPDATE: Self = Self {
        bad_request: Some("Data tidak valid"),
        forbidden: "Anda tidak memiliki akses",
        not_found: None,
        with_reason: true,
    };

    /// `GET api/thesis/me/all`
    pub const THESIS_LIST: Self = Self {
        bad_request: None,
        forbidden: "Anda tidak memiliki akses",
        not_found: Some("Data tidak ditemukan"),
        with_reason: true,
    };

    /// `POST api/thesis`
    pub const THESIS_CREATE: Self = Self {
        bad_request: Some("Data tidak valid"),
        forbidden: "Hanya mahasiswa yang dapat mengajukan TA",
        not_found: None,
        with_reason: true,
    };

    /// Advisor reads.
    pub const ADVISOR: Self = Self {
        bad_request: None,
        forbidden: "Anda tidak memiliki akses (hanya dosen)",
        not_found: Some("Data tidak ditemukan"),
        with_reason: false,
    };

    /// `PUT api/dosen/review/{id}`
    pub const ADVISOR_REVIEW: Self = Self {
        not_found: Some("TA tidak ditemukan"),
        ..Self::ADVISOR
    };

    /// `PUT api/dosen/schedule/{id}`
    pub const ADVISOR_SCHEDULE: Self = Self {
        bad_request: Some("Tanggal tidak valid atau sudah lewat"),
        not_found: Some("TA tidak ditemukan"),
        ..Self::ADVISOR
    };

    /// User-facing text for a non-success `status`.
    #[must_use]
    pub fn message_for(&self, status: StatusCode) -> String {
        let fixed = match status.as_u16() {
            400 => self.bad_request,
            401 => Some(SESSION_EXPIRED),
            403 => Some(self.forbidden),
            404 => self.not_found,
            500 => Some(SERVER_ERROR),
            _ => None,
        };
        if let Some(message) = fixed {
            return message.to_string();
        }

        let code = status.as_u16();
        match (self.with_reason, status.canonical_reason()) {
            (true, Some(reason)) => format!("Error {code}: {reason}"),
            _ => format!("Error {code}"),
        }
    }
}
