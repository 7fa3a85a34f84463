use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use thiserror::Error;

use crate::{ErrorResponse, UploadResult};

/// Why a single file in a batch did not produce an [`UploadResult`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadFailure {
    #[error("Upload rejected with status {status}: {}", .body.error)]
    Rejected { status: u16, body: ErrorResponse },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read file: {0}")]
    Read(String),
}

impl UploadFailure {
    /// Build a rejection from an error status and its body, tolerating non-JSON bodies.
    pub fn rejected(status: u16, body: &str) -> Self {
        let body = serde_json::from_str::<ErrorResponse>(body).unwrap_or_else(|_| ErrorResponse {
            error: if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            },
            details: None,
        });
        UploadFailure::Rejected { status, body }
    }
}

/// Interpret the status and body of a `POST /api/upload` response.
pub fn decode_upload_response(status: u16, body: &str) -> Result<UploadResult, UploadFailure> {
    if !(200..300).contains(&status) {
        return Err(UploadFailure::rejected(status, body));
    }

    serde_json::from_str(body).map_err(|e| UploadFailure::InvalidResponse(e.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// Position of the file in the original selection.
    pub index: usize,
    pub filename: String,
    pub result: Result<UploadResult, UploadFailure>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run one upload per item concurrently and return the outcomes in selection order.
///
/// Every upload runs to completion regardless of its siblings failing.
/// `on_settled` is called once per item in completion order, which is
/// useful for progress reporting.
pub async fn upload_all<T, F, Fut, S>(
    items: Vec<(String, T)>,
    upload: F,
    mut on_settled: S,
) -> Vec<UploadOutcome>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<UploadResult, UploadFailure>>,
    S: FnMut(&UploadOutcome),
{
    let mut pending: FuturesUnordered<_> = items
        .into_iter()
        .enumerate()
        .map(|(index, (filename, payload))| {
            let request = upload(payload);
            async move {
                UploadOutcome {
                    index,
                    filename,
                    result: request.await,
                }
            }
        })
        .collect();

    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(outcome) = pending.next().await {
        on_settled(&outcome);
        outcomes.push(outcome);
    }

    outcomes.sort_by_key(|outcome| outcome.index);
    outcomes
}
