use std::{future::Future, time::Duration};

use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{
    decode_submission_list, ServiceInfo, Submission, SubmissionRequest, SubmitResponse,
};

use super::{ApiError, FeedbackApi, LIST_PATH, SUBMIT_PATH};

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// reqwest-backed client for the feedback backend.
#[derive(Clone)]
pub struct HttpFeedbackApi {
    client: Client,
    base_url: String,
}

impl HttpFeedbackApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /` health probe.
    pub async fn ping(&self) -> Result<ServiceInfo, ApiError> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        read_json(response).await
    }
}

impl FeedbackApi for HttpFeedbackApi {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> impl Future<Output = Result<SubmitResponse, ApiError>> + Send {
        let url = self.endpoint(SUBMIT_PATH);
        let client = self.client.clone();
        async move {
            debug!("POST {url} rating={}", request.rating);
            let response = client.post(&url).json(&request).send().await?;
            read_json(response).await
        }
    }

    fn list_submissions(&self) -> impl Future<Output = Result<Vec<Submission>, ApiError>> + Send {
        let url = self.endpoint(LIST_PATH);
        let client = self.client.clone();
        async move {
            debug!("GET {url}");
            let response = client.get(&url).send().await?;
            let body: Value = read_json(response).await?;
            Ok(decode_submission_list(body))
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("{url} responded with {status}");
        return Err(ApiError::Status { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}
