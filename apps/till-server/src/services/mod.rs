//! Service implementations.

pub mod receipt;

pub use receipt::{ArtifactPayload, GeneratedReceipt, ReceiptService, ServiceError};
