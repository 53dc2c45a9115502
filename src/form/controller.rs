use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use crate::api::FeedbackApi;
use crate::models::SubmitStatus;

use super::{FormError, FormState};

/// Feedback form: rating + review in, backend acknowledgment out.
pub struct FeedbackForm<A: FeedbackApi> {
    state: Arc<Mutex<FormState>>,
    api: Arc<A>,
}

impl<A: FeedbackApi> Clone for FeedbackForm<A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
        }
    }
}

impl<A: FeedbackApi> FeedbackForm<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::new())),
            api,
        }
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.lock().await.clone()
    }

    pub async fn select_rating(&self, rating: u8) -> Result<(), FormError> {
        self.state.lock().await.select_rating(rating)
    }

    pub async fn set_review(&self, text: impl Into<String>) {
        self.state.lock().await.review_text = text.into();
    }

    /// Sends the form once. Validation failures never reach the network.
    /// Returns the backend's acknowledgment on success.
    pub async fn submit(&self) -> Result<String, FormError> {
        let request = self.state.lock().await.begin_submit()?;
        let rating = request.rating;

        let result = self.api.submit(request).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                if response.status == SubmitStatus::PartialSuccess {
                    warn!("feedback stored without AI analysis (partial_success)");
                }
                info!(
                    "feedback submitted (rating {rating}, status {})",
                    response.status.as_str()
                );
                let acknowledgment = response.ai_user_response.clone();
                state.finish_success(response);
                Ok(acknowledgment)
            }
            Err(err) => {
                warn!("feedback submission failed: {err}");
                state.finish_failure();
                Err(FormError::Connection(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{server_error, MockApi};
    use crate::form::FormPhase;
    use crate::models::{SubmissionRequest, SubmitResponse};

    fn form() -> (FeedbackForm<MockApi>, Arc<MockApi>) {
        let api = Arc::new(MockApi::new());
        (FeedbackForm::new(api.clone()), api)
    }

    #[tokio::test]
    async fn each_rating_sends_exactly_one_post() {
        for rating in 1..=5u8 {
            let (form, api) = form();
            form.select_rating(rating).await.unwrap();
            form.set_review("The staff were lovely").await;

            form.submit().await.unwrap();

            assert_eq!(
                api.submitted(),
                vec![SubmissionRequest {
                    rating,
                    review_text: "The staff were lovely".into(),
                }]
            );
        }
    }

    #[tokio::test]
    async fn unselected_rating_makes_no_request() {
        let (form, api) = form();
        form.set_review("forgot the stars").await;

        let err = form.submit().await.unwrap_err();

        assert!(matches!(err, FormError::RatingRequired));
        assert!(api.submitted().is_empty());
        assert_eq!(form.snapshot().await.review_text, "forgot the stars");
    }

    #[tokio::test]
    async fn success_shows_acknowledgment_and_resets() {
        let (form, api) = form();
        api.push_submit(Ok(SubmitResponse {
            status: SubmitStatus::Success,
            ai_user_response: "We're glad you enjoyed it!".into(),
        }));
        form.select_rating(5).await.unwrap();
        form.set_review("Best pizza in town").await;

        let ack = form.submit().await.unwrap();

        assert_eq!(ack, "We're glad you enjoyed it!");
        let state = form.snapshot().await;
        assert_eq!(state.phase, FormPhase::Succeeded);
        assert_eq!(state.rating, 0);
        assert!(state.review_text.is_empty());
        assert_eq!(state.acknowledgment.as_deref(), Some(ack.as_str()));
    }

    #[tokio::test]
    async fn failure_preserves_input_for_retry() {
        let (form, api) = form();
        api.push_submit(Err(server_error()));
        form.select_rating(2).await.unwrap();
        form.set_review("Cold fries").await;

        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, FormError::Connection(_)));
        assert_eq!(err.to_string(), "Connection error. Please try again.");

        let state = form.snapshot().await;
        assert_eq!(state.phase, FormPhase::Failed);
        assert_eq!(state.rating, 2);
        assert_eq!(state.review_text, "Cold fries");

        // Retry goes through with the same input.
        let ack = form.submit().await.unwrap();
        assert_eq!(ack, "Thank you for your feedback!");
        assert_eq!(api.submitted().len(), 2);
    }

    #[tokio::test]
    async fn partial_success_is_recorded() {
        let (form, api) = form();
        api.push_submit(Ok(SubmitResponse {
            status: SubmitStatus::PartialSuccess,
            ai_user_response: "Thank you for your feedback!".into(),
        }));
        form.select_rating(3).await.unwrap();
        form.set_review("fine").await;

        form.submit().await.unwrap();

        assert_eq!(
            form.snapshot().await.submit_status,
            Some(SubmitStatus::PartialSuccess)
        );
    }

    #[tokio::test]
    async fn concurrent_submit_is_rejected_while_in_flight() {
        let (form, api) = form();
        api.push_submit_after(
            std::time::Duration::from_millis(50),
            Ok(SubmitResponse {
                status: SubmitStatus::Success,
                ai_user_response: "Thanks!".into(),
            }),
        );
        form.select_rating(4).await.unwrap();
        form.set_review("quick").await;

        let (first, second) = tokio::join!(form.submit(), form.submit());

        assert!(first.is_ok());
        assert!(matches!(second, Err(FormError::AlreadySubmitting)));
        assert_eq!(api.submitted().len(), 1);
    }
}
