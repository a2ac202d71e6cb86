use crate::model::invoice::{Invoice, InvoiceDocument};
use serde::{Deserialize, Serialize};

/// A persisted, identifier-keyed invoice.
///
/// The `id` is always derived from the invoice contents by the backend and is
/// never supplied by a client. It doubles as the file stem of the stored PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "invoiceTypeJson")]
    pub document: InvoiceDocument,
}

impl Record {
    pub fn new(id: impl Into<String>, invoice: Invoice) -> Self {
        Self {
            id: id.into(),
            document: InvoiceDocument { invoice },
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.document.invoice
    }
}
