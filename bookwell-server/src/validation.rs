//! Request validation run before any core service is called.

use bookwell_core::domain::{BookingPayload, Caller, DistanceFeed, JobFilter, UserId};
use serde::Deserialize;

use crate::infra::errors::AppError;

const MAX_STATUS_LEN: usize = 32;
const MAX_SESSION_TIME_LEN: usize = 32;
const MAX_COMMENT_LEN: usize = 2000;
const MAX_TELEMETRY_LEN: usize = 64;

#[derive(Debug, Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn check(&mut self, ok: bool, message: impl FnOnce() -> String) {
        if !ok {
            self.0.push(message());
        }
    }

    fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.check(value.chars().count() <= max, || {
                format!("{field} must be at most {max} characters")
            });
        }
    }

    fn count(&mut self, field: &str, value: Option<&str>) -> Option<u32> {
        let value = present(value)?;
        let parsed = value.parse().ok();
        self.check(parsed.is_some(), || format!("{field} must be a non-negative integer"));
        parsed
    }

    fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::unprocessable(self.0.join("; ")))
        }
    }
}

pub fn validate_booking(payload: &BookingPayload) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();

    errors.check(payload.user_id.get() > 0, || "user_id must be a positive integer".into());
    if let Some(translator) = payload.translator_id {
        errors.check(translator.get() > 0, || {
            "translator_id must be a positive integer".into()
        });
    }
    if let Some(language) = payload.from_language_id {
        errors.check(language > 0, || "from_language_id must be a positive integer".into());
    }
    if let Some(duration) = payload.duration {
        errors.check(duration > 0, || "duration must be a positive number of minutes".into());
    }
    if let Some(status) = payload.status.as_deref() {
        errors.check(!status.trim().is_empty(), || "status must not be blank".into());
    }
    errors.max_len("status", payload.status.as_deref(), MAX_STATUS_LEN);
    errors.max_len("admin_comments", payload.admin_comments.as_deref(), MAX_COMMENT_LEN);
    errors.max_len("session_time", payload.session_time.as_deref(), MAX_SESSION_TIME_LEN);

    errors.finish()
}

pub fn validate_feed(feed: &DistanceFeed) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();

    errors.check(feed.jobid > 0, || "jobid must be a positive integer".into());
    errors.max_len("distance", feed.distance.as_deref(), MAX_TELEMETRY_LEN);
    errors.max_len("time", feed.time.as_deref(), MAX_TELEMETRY_LEN);
    errors.max_len("admincomment", feed.admincomment.as_deref(), MAX_COMMENT_LEN);
    errors.max_len("session", feed.session.as_deref(), MAX_SESSION_TIME_LEN);

    errors.finish()
}

/// Listing query as sent. Values stay text so blank parameters read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Build the core filter. A malformed target only matters to callers whose
/// listing depends on it; administrative callers list everything anyway.
pub fn parse_listing(params: &ListingParams, caller: &Caller) -> Result<JobFilter, AppError> {
    let mut errors = FieldErrors::default();

    let user_id = match present(params.user_id.as_deref()).map(str::parse::<i64>) {
        None => None,
        Some(Ok(id)) => Some(UserId(id)),
        Some(Err(_)) if caller.role.is_administrative() => None,
        Some(Err(_)) => {
            errors.check(false, || "user_id must be an integer".into());
            None
        }
    };
    let page = errors.count("page", params.page.as_deref());
    let per_page = errors.count("per_page", params.per_page.as_deref());
    errors.finish()?;

    Ok(JobFilter {
        user_id,
        status: present(params.status.as_deref()).map(str::to_string),
        page,
        per_page,
    })
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
