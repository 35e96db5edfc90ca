//! Student-side thesis endpoints.

use tracing::{debug, info};

use crate::api::{ApiClient, Endpoint, StatusMessages};
use crate::error::{Error, Result};
use crate::model::Thesis;
use crate::validation;

use super::EMPTY_RESPONSE;

/// `api/thesis` operations for the signed-in student.
#[derive(Debug, Clone)]
pub struct ThesisRepository {
    api: ApiClient,
}

impl ThesisRepository {
    /// Create a repository over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every thesis the student has submitted. An empty body is an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error or a connection error.
    pub async fn my_theses(&self) -> Result<Vec<Thesis>> {
        let theses = self
            .api
            .send(&Endpoint::MyTheses)
            .await?
            .ensure_success(&StatusMessages::THESIS_LIST)?
            .json_list::<Thesis>()?;
        debug!("Fetched {} theses", theses.len());
        Ok(theses)
    }

    /// Submit a new thesis.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting the server, for a
    /// title outside 10-200 characters or a non-http(s) document link.
    pub async fn create_thesis(&self, title: &str, doc_url: &str) -> Result<Thesis> {
        let request = validation::thesis_submission(title, doc_url)?;
        let thesis = self
            .api
            .send_json(&Endpoint::CreateThesis, &request)
            .await?
            .ensure_success(&StatusMessages::THESIS_CREATE)?
            .json::<Thesis>()?
            .ok_or_else(|| Error::empty_response(EMPTY_RESPONSE))?;
        info!("Submitted thesis {}", thesis.id);
        Ok(thesis)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::api::test_support::{client, shared_session, spawn_backend};
    use crate::model::{Role, ThesisStatus};

    fn thesis_json(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "docUrl": "https://drive.google.com/file/d/abc",
            "status": "PENDING",
            "studentId": "stu-1",
            "createdAt": "2025-11-01T02:00:00.000Z",
            "updatedAt": "2025-11-01T02:00:00.000Z"
        })
    }

    /// Stub for `api/thesis` that counts create calls and echoes the body.
    fn counting_router(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/api/thesis",
            axum::routing::post(move |Json(body): Json<Value>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let title = body["title"].as_str().unwrap_or_default().to_string();
                    (StatusCode::CREATED, Json(thesis_json("new", &title)))
                }
            }),
        )
    }

    async fn repo(router: Router) -> ThesisRepository {
        let base = spawn_backend(router).await;
        ThesisRepository::new(client(&base, shared_session(Some(("tok", Role::Mahasiswa)))))
    }

    #[tokio::test]
    async fn test_my_theses() {
        let router = Router::new().route(
            "/api/thesis/me/all",
            get(|| async {
                Json(json!([
                    thesis_json("t1", "Sistem Informasi Sidang"),
                    thesis_json("t2", "Analisis Data Kelulusan")
                ]))
            }),
        );
        let theses = repo(router).await.my_theses().await.unwrap();

        assert_eq!(theses.len(), 2);
        assert_eq!(theses[0].status, ThesisStatus::Pending);
    }

    #[tokio::test]
    async fn test_my_theses_empty_body_is_empty_list() {
        let router = Router::new().route("/api/thesis/me/all", get(|| async { "" }));
        assert!(repo(router).await.my_theses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_my_theses_status_messages() {
        for (status, expected) in [
            (StatusCode::FORBIDDEN, "Anda tidak memiliki akses"),
            (StatusCode::NOT_FOUND, "Data tidak ditemukan"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Server sedang bermasalah"),
            (StatusCode::SERVICE_UNAVAILABLE, "Error 503: Service Unavailable"),
        ] {
            let router = Router::new().route("/api/thesis/me/all", get(move || async move { status }));
            let err = repo(router).await.my_theses().await.unwrap_err();
            assert_eq!(err.user_message(), expected);
        }
    }

    #[tokio::test]
    async fn test_create_thesis() {
        let hits = Arc::new(AtomicUsize::new(0));
        let repo = repo(counting_router(hits.clone())).await;

        let thesis = repo
            .create_thesis("Sistem Penjadwalan Sidang", "https://drive.google.com/x")
            .await
            .unwrap();

        assert_eq!(thesis.title, "Sistem Penjadwalan Sidang");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_title_out_of_bounds_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let repo = repo(counting_router(hits.clone())).await;

        for title in ["Terlalu", "123456789", &"x".repeat(201)] {
            let err = repo
                .create_thesis(title, "https://drive.google.com/x")
                .await
                .unwrap_err();
            assert_eq!(err.user_message(), "Judul TA harus 10-200 karakter");
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_doc_url_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let repo = repo(counting_router(hits.clone())).await;

        for url in ["drive.google.com/x", "ftp://files/x", "https://", "http:/x"] {
            let err = repo
                .create_thesis("Sistem Penjadwalan Sidang", url)
                .await
                .unwrap_err();
            assert_eq!(err.user_message(), "URL dokumen tidak valid", "{url}");
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_thesis_forbidden_for_advisor() {
        let router = Router::new().route(
            "/api/thesis",
            axum::routing::post(|| async { StatusCode::FORBIDDEN }),
        );
        let err = repo(router)
            .await
            .create_thesis("Sistem Penjadwalan Sidang", "https://x.y/z")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message(), "Hanya mahasiswa yang dapat mengajukan TA");
    }

    #[tokio::test]
    async fn test_create_thesis_empty_body() {
        let router = Router::new().route(
            "/api/thesis",
            axum::routing::post(|| async { StatusCode::CREATED }),
        );
        let err = repo(router)
            .await
            .create_thesis("Sistem Penjadwalan Sidang", "https://x.y/z")
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Response kosong dari server");
    }
}
