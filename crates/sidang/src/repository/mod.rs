//! Repositories over the backend endpoints.
//!
//! Each method validates its input, performs one request through the shared
//! [`ApiClient`](crate::api::ApiClient), and returns either the decoded
//! record or an [`Error`](crate::Error) whose
//! [`user_message`](crate::Error::user_message) is ready to show. Nothing is
//! retried.

pub mod advisor;
pub mod profile;
pub mod thesis;

pub use advisor::{AdvisorRepository, ScheduleSlot};
pub use profile::ProfileRepository;
pub use thesis::ThesisRepository;

/// Shown when a 2xx response carries no record.
pub(crate) const EMPTY_RESPONSE: &str = "Response kosong dari server";
