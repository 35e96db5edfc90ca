//! Profile endpoints, shared by both roles.

use tracing::debug;

use crate::api::{ApiClient, Endpoint, StatusMessages};
use crate::error::{Error, Result};
use crate::model::User;
use crate::validation;

use super::EMPTY_RESPONSE;

/// `api/profile` operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    api: ApiClient,
}

impl ProfileRepository {
    /// Create a repository over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error, "Data profil kosong" for an empty
    /// body, or a connection error.
    pub async fn my_profile(&self) -> Result<User> {
        let user = self
            .api
            .send(&Endpoint::MyProfile)
            .await?
            .ensure_success(&StatusMessages::PROFILE_READ)?
            .json::<User>()?
            .ok_or_else(|| Error::empty_response("Data profil kosong"))?;
        debug!("Loaded profile {}", user.id);
        Ok(user)
    }

    /// Update name and study program. Values are trimmed before checking
    /// and sending.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server when either
    /// value is out of bounds; otherwise as [`Self::my_profile`].
    pub async fn update_profile(&self, name: &str, prodi: &str) -> Result<User> {
        let request = validation::profile_update(name, prodi)?;
        self.api
            .send_json(&Endpoint::UpdateProfile, &request)
            .await?
            .ensure_success(&StatusMessages::PROFILE_UPDATE)?
            .json::<User>()?
            .ok_or_else(|| Error::empty_response(EMPTY_RESPONSE))
    }
}
