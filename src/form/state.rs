use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::models::{
    SubmissionRequest, SubmitResponse, SubmitStatus, MAX_RATING, MAX_REVIEW_CHARS,
};

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Please try again.";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please select a star rating!")]
    RatingRequired,

    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("Please write a review before submitting.")]
    ReviewRequired,

    #[error("review is {0} characters; the limit is 2000")]
    ReviewTooLong(usize),

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("{}", CONNECTION_ERROR_MESSAGE)]
    Connection(#[source] ApiError),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    /// 0 means no star selected.
    pub rating: u8,
    pub review_text: String,
    pub phase: FormPhase,
    pub acknowledgment: Option<String>,
    pub submit_status: Option<SubmitStatus>,
    pub error_message: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_rating(&mut self, rating: u8) -> Result<(), FormError> {
        if rating > MAX_RATING {
            return Err(FormError::RatingOutOfRange(rating));
        }
        self.rating = rating;
        Ok(())
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn validate(&self) -> Result<SubmissionRequest, FormError> {
        if self.rating == 0 {
            return Err(FormError::RatingRequired);
        }
        if self.review_text.trim().is_empty() {
            return Err(FormError::ReviewRequired);
        }
        let chars = self.review_text.chars().count();
        if chars > MAX_REVIEW_CHARS {
            return Err(FormError::ReviewTooLong(chars));
        }

        Ok(SubmissionRequest {
            rating: self.rating,
            review_text: self.review_text.clone(),
        })
    }

    /// Validates and enters `Submitting`. On error the state is untouched.
    pub fn begin_submit(&mut self) -> Result<SubmissionRequest, FormError> {
        if !self.is_submit_enabled() {
            return Err(FormError::AlreadySubmitting);
        }
        let request = self.validate()?;

        self.phase = FormPhase::Submitting;
        self.acknowledgment = None;
        self.submit_status = None;
        self.error_message = None;
        Ok(request)
    }

    pub fn finish_success(&mut self, response: SubmitResponse) {
        *self = Self {
            phase: FormPhase::Succeeded,
            acknowledgment: Some(response.ai_user_response),
            submit_status: Some(response.status),
            ..Self::default()
        };
    }

    /// Keeps rating and review so the user can retry.
    pub fn finish_failure(&mut self) {
        self.phase = FormPhase::Failed;
        self.error_message = Some(CONNECTION_ERROR_MESSAGE.to_string());
    }
}
