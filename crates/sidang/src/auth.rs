//! Sign-in with a Google ID token.
//!
//! The browser/device flow happens outside this crate; what arrives here is
//! the ID token it produced. The backend verifies the token on every call,
//! so the client only reads the payload (unverified) to learn the e-mail,
//! derives the role from it, and stores the session.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::model::Role;
use crate::session::{Session, SessionStore};

/// Claims read from the ID token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (Google account id).
    pub sub: String,
    /// Account e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Audience (OAuth client id).
    #[serde(default)]
    pub aud: Option<String>,
}

/// Decode the payload segment of a JWT without checking its signature.
///
/// # Errors
///
/// Returns [`Error::InvalidIdToken`] if the token is not three dot-separated
/// segments or the payload is not base64url JSON.
pub fn decode_claims(id_token: &str) -> Result<IdTokenClaims> {
    let mut parts = id_token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::InvalidIdToken("expected three segments".to_string()));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::InvalidIdToken(format!("payload is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::InvalidIdToken(format!("payload is not a claims object: {e}")))
}

/// Role for an account, from its e-mail: any configured marker
/// (case-insensitive) means advisor.
#[must_use]
pub fn role_for_email(email: &str, dosen_markers: &[String]) -> Role {
    let email = email.to_lowercase();
    if dosen_markers
        .iter()
        .any(|marker| email.contains(&marker.to_lowercase()))
    {
        Role::Dosen
    } else {
        Role::Mahasiswa
    }
}

/// Outcome of a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    /// The stored session.
    pub session: Session,
    /// Claims read from the token.
    pub claims: IdTokenClaims,
}

/// Store a session for `id_token`.
///
/// `role_override` wins over the e-mail rule. A token issued for another
/// OAuth client is accepted, but logged.
///
/// # Errors
///
/// Returns [`Error::InvalidIdToken`] for an undecodable token, or a storage
/// error if the session cannot be saved.
pub fn sign_in(
    store: &mut SessionStore,
    auth: &AuthConfig,
    id_token: &str,
    role_override: Option<Role>,
) -> Result<SignIn> {
    let id_token = id_token.trim();
    let claims = decode_claims(id_token)?;

    if let Some(aud) = &claims.aud {
        if aud != &auth.google_client_id {
            debug!("ID token audience {} differs from configured client", aud);
        }
    }

    let role = match (role_override, claims.email.as_deref()) {
        (Some(role), _) => role,
        (None, Some(email)) => role_for_email(email, &auth.dosen_email_markers),
        (None, None) => Role::Mahasiswa,
    };

    store.save(id_token, role)?;
    info!(
        "Signed in as {} ({})",
        claims.email.as_deref().unwrap_or(&claims.sub),
        role
    );

    Ok(SignIn {
        session: Session {
            token: id_token.to_string(),
            role,
        },
        claims,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    /// An unsigned JWT-shaped token carrying `claims`.
    pub fn id_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_support::id_token;
    use super::*;
    use crate::session::Route;

    fn markers() -> Vec<String> {
        vec!["dosen".to_string()]
    }

    #[test]
    fn test_decode_claims() {
        let token = id_token(&json!({
            "sub": "1234",
            "email": "budi@mail.ugm.ac.id",
            "name": "Budi",
            "aud": "client"
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "1234");
        assert_eq!(claims.email.as_deref(), Some("budi@mail.ugm.ac.id"));
        assert_eq!(claims.name.as_deref(), Some("Budi"));
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        for bad in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c"] {
            assert!(
                matches!(decode_claims(bad), Err(Error::InvalidIdToken(_))),
                "accepted {bad:?}"
            );
        }
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(decode_claims(&not_json).is_err());
    }

    #[test]
    fn test_role_for_email() {
        assert_eq!(role_for_email("pak.dosen@ugm.ac.id", &markers()), Role::Dosen);
        assert_eq!(role_for_email("Ibu.DOSEN@ugm.ac.id", &markers()), Role::Dosen);
        assert_eq!(role_for_email("budi@mail.ugm.ac.id", &markers()), Role::Mahasiswa);
        assert_eq!(role_for_email("anyone@x.id", &[]), Role::Mahasiswa);
    }

    #[test]
    fn test_sign_in_stores_session() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let auth = AuthConfig::default();
        let token = id_token(&json!({"sub": "9", "email": "dosen.afif@ugm.ac.id"}));

        let signed = sign_in(&mut store, &auth, &token, None).unwrap();

        assert_eq!(signed.session.role, Role::Dosen);
        assert_eq!(store.token().unwrap().as_deref(), Some(token.as_str()));
        assert_eq!(Route::initial(&store).unwrap(), Route::Dosen);
    }

    #[test]
    fn test_sign_in_role_override() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let token = id_token(&json!({"sub": "9", "email": "dosen@ugm.ac.id"}));

        let signed =
            sign_in(&mut store, &AuthConfig::default(), &token, Some(Role::Mahasiswa)).unwrap();

        assert_eq!(signed.session.role, Role::Mahasiswa);
        assert_eq!(Route::initial(&store).unwrap(), Route::Mahasiswa);
    }

    #[test]
    fn test_sign_in_rejects_garbage_without_touching_store() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("old", Role::Dosen).unwrap();

        assert!(sign_in(&mut store, &AuthConfig::default(), "garbage", None).is_err());
        assert_eq!(store.token().unwrap().as_deref(), Some("old"));
    }
}
