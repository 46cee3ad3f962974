//! # Asset Gateway
//!
//! HTTP gateway that streams multipart file uploads into container-
//! addressed object storage.
//!
//! This crate provides:
//! - **Multipart parsing**: incremental boundary/part reader over the
//!   raw body stream, bounded memory regardless of file size
//! - **Upload pipeline**: classify parts, derive object names, stream
//!   file bodies into the store
//! - **Retrieval**: stream stored assets back by name
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │              (browsers, curl, SDKs)                 │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ multipart/form-data
//! ┌─────────────────────────▼───────────────────────────┐
//! │                   Asset Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │  BoundaryExtractor │ PartReader │ UploadPipeline    │
//! ├─────────────────────────────────────────────────────┤
//! │                   asset-store                       │
//! │         (filesystem or in-memory backend)           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Parts are read and stored strictly sequentially within a request;
//! concurrent requests share only the object store. A file part's body
//! flows from the socket into the store through a bounded buffer and is
//! never materialized in full.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod routes;
pub mod server;
pub mod state;
pub mod upload;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
