//! Adapters for the two external conversion services.
//!
//! Ingestion needs two hops: the scanned PDF goes to a PDF-to-text service,
//! and the extracted text goes to a text-to-JSON service that returns the
//! structured invoice. Both are opaque, unreliable collaborators; failures are
//! reported as-is and never retried.

mod client;

pub use client::HttpConversionClient;

use async_trait::async_trait;
use common::model::invoice::Invoice;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Which conversion hop produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    PdfToText,
    TextToInvoice,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStage::PdfToText => write!(f, "pdf-to-text"),
            ConversionStage::TextToInvoice => write!(f, "text-to-invoice"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to read '{path}' for conversion: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: ConversionStage,
        #[source]
        source: reqwest::Error,
    },
    #[error("{stage} service answered with status {status}")]
    BadStatus { stage: ConversionStage, status: u16 },
    #[error("{stage} service returned an undecodable body: {source}")]
    Decode {
        stage: ConversionStage,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait Converter: Send + Sync {
    /// Extracts plain text from the PDF stored at `path`.
    async fn pdf_to_text(&self, path: &Path) -> Result<String, ConversionError>;

    /// Turns extracted text into a structured invoice.
    async fn text_to_invoice(&self, text: &str) -> Result<Invoice, ConversionError>;
}
