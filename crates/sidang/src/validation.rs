//! Client-side input checks.
//!
//! Everything here runs before a request is built. A failure becomes
//! [`Error::Validation`] carrying the message shown to the user, and no
//! request is sent.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{CreateThesisRequest, ThesisStatus, UpdateProfileRequest};

/// Allowed length of a profile name or study program, in characters.
pub const PROFILE_FIELD_LEN: RangeInclusive<usize> = 2..=100;

/// Allowed length of a thesis title, in characters.
pub const TITLE_LEN: RangeInclusive<usize> = 10..=200;

fn doc_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\Ahttps?://.+\z").expect("static pattern compiles"))
}

fn char_len_within(value: &str, range: &RangeInclusive<usize>) -> bool {
    range.contains(&value.chars().count())
}

/// Check a profile update. Both fields are trimmed, and the trimmed values
/// are what gets sent.
///
/// # Errors
///
/// Returns [`Error::Validation`] when either field is out of bounds.
pub fn profile_update(name: &str, prodi: &str) -> Result<UpdateProfileRequest> {
    let name = name.trim();
    let prodi = prodi.trim();

    if !char_len_within(name, &PROFILE_FIELD_LEN) {
        return Err(Error::validation("Nama harus 2-100 karakter"));
    }
    if !char_len_within(prodi, &PROFILE_FIELD_LEN) {
        return Err(Error::validation("Program studi harus 2-100 karakter"));
    }

    Ok(UpdateProfileRequest {
        name: name.to_string(),
        prodi: prodi.to_string(),
    })
}

/// Check a thesis submission. The title is checked as typed (not trimmed).
///
/// # Errors
///
/// Returns [`Error::Validation`] for a title outside 10-200 characters or a
/// document link that is not an http(s) URL.
pub fn thesis_submission(title: &str, doc_url: &str) -> Result<CreateThesisRequest> {
    if !char_len_within(title, &TITLE_LEN) {
        return Err(Error::validation("Judul TA harus 10-200 karakter"));
    }
    if !doc_url_pattern().is_match(doc_url) {
        return Err(Error::validation("URL dokumen tidak valid"));
    }

    Ok(CreateThesisRequest {
        title: title.to_string(),
        doc_url: doc_url.to_string(),
    })
}

/// Parse a review decision as entered by the advisor.
///
/// # Errors
///
/// Returns [`Error::Validation`] unless the input is exactly `APPROVED`,
/// `REJECTED` or `PENDING`.
pub fn review_decision(decision: &str) -> Result<ThesisStatus> {
    decision.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(thesis_submission("123456789", "https://a.b").is_err());
        assert!(thesis_submission("1234567890", "https://a.b").is_ok());
        assert!(thesis_submission(&"x".repeat(200), "https://a.b").is_ok());

        let err = thesis_submission(&"x".repeat(201), "https://a.b").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Judul TA harus 10-200 karakter");
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let title = "é".repeat(10);
        assert!(thesis_submission(&title, "https://a.b").is_ok());
    }

    #[test]
    fn test_doc_url_shape() {
        let title = "Sistem Informasi Sidang";
        assert!(thesis_submission(title, "http://x").is_ok());
        assert!(thesis_submission(title, "https://drive.google.com/file").is_ok());

        for bad in [
            "",
            "https://",
            "ftp://host/file",
            "drive.google.com/file",
            " https://x",
            "https://drive.google.com/x\nnot a url at all",
            "https://drive.google.com/x\n",
        ] {
            let err = thesis_submission(title, bad).unwrap_err();
            assert_eq!(err.user_message(), "URL dokumen tidak valid", "input: {bad:?}");
        }
    }

    #[test]
    fn test_title_checked_before_url() {
        let err = thesis_submission("short", "not-a-url").unwrap_err();
        assert_eq!(err.user_message(), "Judul TA harus 10-200 karakter");
    }

    #[test]
    fn test_profile_update_trims() {
        let request = profile_update("  Budi Santoso ", " TRPL  ").unwrap();
        assert_eq!(request.name, "Budi Santoso");
        assert_eq!(request.prodi, "TRPL");
    }

    #[test]
    fn test_profile_update_bounds() {
        let err = profile_update(" B ", "TRPL").unwrap_err();
        assert_eq!(err.user_message(), "Nama harus 2-100 karakter");

        let err = profile_update("Budi", &"p".repeat(101)).unwrap_err();
        assert_eq!(err.user_message(), "Program studi harus 2-100 karakter");

        assert!(profile_update(&"n".repeat(100), "ab").is_ok());
    }

    #[test]
    fn test_review_decision() {
        assert_eq!(review_decision("PENDING").unwrap(), ThesisStatus::Pending);
        assert_eq!(review_decision("REJECTED").unwrap(), ThesisStatus::Rejected);
        assert!(review_decision("MAYBE").unwrap_err().is_validation());
    }
}
