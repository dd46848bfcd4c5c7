//! Adapters connecting the core collaborator traits to real services.
//!
//! This crate provides:
//! - `HttpDocumentFetcher` - receipt download over HTTP(S)
//! - `PdfExtractor` - embedded PDF text via `pdf-extract`
//! - `VisionOcrClient` - Google Vision `TEXT_DETECTION`
//! - `FcmPushSender` - Firebase Cloud Messaging HTTP v1

pub mod fcm;
pub mod fetch;
pub mod http;
pub mod pdf;
pub mod vision;

pub use fcm::{FcmPushSender, message_body};
pub use fetch::HttpDocumentFetcher;
pub use http::{HttpClientError, build_http_client};
pub use pdf::PdfExtractor;
pub use vision::{VisionOcrClient, parse_annotate_response};

#[cfg(test)]
mod test_server;
