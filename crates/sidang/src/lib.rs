//! `sidang` - Client for a thesis-defense scheduling backend
//!
//! Students (`MAHASISWA`) submit a thesis and follow its review; advisors
//! (`DOSEN`) review submissions and schedule defenses. This library holds
//! the persisted session, the authenticated REST client, the repositories
//! with their client-side validation, and the presentation helpers used by
//! the `sidang` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repository;
pub mod session;
pub mod validation;
pub mod view;

pub use api::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Role, Thesis, ThesisStatus, User};
pub use session::{Route, Session, SessionStore};
