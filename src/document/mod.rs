//! # Document Submission
//!
//! The collaborator the limiter exists for: a blocking client that POSTs
//! documents to the upstream "create document" endpoint.
//!
//! ```text
//!     document/
//!     ├── mod.rs          (You are here)
//!     ├── client.rs       (HTTP submission through a GatedInvoker)
//!     ├── config.rs       (Endpoint, timeout and rate settings)
//!     └── model.rs        (Document / Product value types)
//! ```

mod client;
mod config;
mod model;

pub use client::{DocumentClient, SubmitResponse, SIGNATURE_HEADER};
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS};
pub use model::{Description, Document, DocumentBuilder, Product};
