//! Client side of the merger backend's HTTP API.
//!
//! Three JSON endpoints are wrapped: `POST /api/upload`, `POST /api/merge`
//! and `GET /api/status/{task_id}`. The merged file itself is fetched from
//! the `download_url` returned by the merge call.

pub mod client;
pub mod poll;
pub mod types;

pub use client::ApiClient;
pub use poll::StatusPoller;
pub use types::{
    ApiEnvelope, MergeOptions, MergeResponse, STATUS_COMPLETED, STATUS_ERROR, STATUS_FAILED,
    STATUS_SUCCESS, StatusResponse, UploadResponse, UploadedFile,
};
