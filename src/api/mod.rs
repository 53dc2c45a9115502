//! HTTP contract shared by the feedback form and the admin dashboard.

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;

use crate::models::{Submission, SubmissionRequest, SubmitResponse};

pub use client::HttpFeedbackApi;
pub use error::ApiError;

pub const SUBMIT_PATH: &str = "/api/submit";
pub const LIST_PATH: &str = "/api/admin/list";

/// Backend operations the two views depend on.
pub trait FeedbackApi: Send + Sync + 'static {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> impl Future<Output = Result<SubmitResponse, ApiError>> + Send;

    /// Non-array bodies resolve to an empty list, not an error.
    fn list_submissions(&self) -> impl Future<Output = Result<Vec<Submission>, ApiError>> + Send;
}
