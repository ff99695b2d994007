pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::DiagnosisClient;
pub use error::DiagnosisError;
pub use types::{DealersPayload, DiagnosisResponse, TimelineEntry};
