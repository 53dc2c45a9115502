//! Scripted in-memory backend for controller tests.

use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use reqwest::StatusCode;

use crate::models::{Submission, SubmissionRequest, SubmitResponse};

use super::{ApiError, FeedbackApi};

type Scripted<T> = (Duration, Result<T, ApiError>);

#[derive(Default)]
pub struct MockApi {
    submits: Mutex<VecDeque<Scripted<SubmitResponse>>>,
    lists: Mutex<VecDeque<Scripted<Vec<Submission>>>>,
    submitted: Mutex<Vec<SubmissionRequest>>,
    list_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, result: Result<SubmitResponse, ApiError>) {
        self.push_submit_after(Duration::ZERO, result);
    }

    pub fn push_submit_after(&self, delay: Duration, result: Result<SubmitResponse, ApiError>) {
        self.submits.lock().unwrap().push_back((delay, result));
    }

    pub fn push_list(&self, result: Result<Vec<Submission>, ApiError>) {
        self.push_list_after(Duration::ZERO, result);
    }

    pub fn push_list_after(&self, delay: Duration, result: Result<Vec<Submission>, ApiError>) {
        self.lists.lock().unwrap().push_back((delay, result));
    }

    pub fn submitted(&self) -> Vec<SubmissionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".into(),
    }
}

pub fn submission(id: i64, rating: u8) -> Submission {
    Submission {
        id,
        rating,
        review_text: format!("review {id}"),
        ai_summary: Some(format!("summary {id}")),
        ai_actions: Some(vec![format!("action {id}")]),
        ai_user_response: None,
        created_at: None,
    }
}

impl FeedbackApi for MockApi {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> impl Future<Output = Result<SubmitResponse, ApiError>> + Send {
        self.submitted.lock().unwrap().push(request);
        let (delay, result) = self.submits.lock().unwrap().pop_front().unwrap_or_else(|| {
            (
                Duration::ZERO,
                Ok(SubmitResponse {
                    status: Default::default(),
                    ai_user_response: "Thank you for your feedback!".into(),
                }),
            )
        });
        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }

    fn list_submissions(&self) -> impl Future<Output = Result<Vec<Submission>, ApiError>> + Send {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self
            .lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }
}
