//! Read-only projections over the record store.

use crate::error::AppError;
use crate::ingestion::pdf_path;
use crate::store::RecordStore;
use common::model::record::Record;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a PDF lookup. Both variants carry a path to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfLookup {
    /// The stored PDF of the requested record.
    Exact(PathBuf),
    /// No stored PDF matched; the configured default document.
    Fallback(PathBuf),
}

impl PdfLookup {
    pub fn path(&self) -> &Path {
        match self {
            PdfLookup::Exact(path) | PdfLookup::Fallback(path) => path,
        }
    }
}

#[derive(Clone)]
pub struct QueryService {
    store: Arc<RecordStore>,
    files_dir: PathBuf,
    default_pdf: PathBuf,
}

impl QueryService {
    pub fn new(
        store: Arc<RecordStore>,
        files_dir: impl Into<PathBuf>,
        default_pdf: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            files_dir: files_dir.into(),
            default_pdf: default_pdf.into(),
        }
    }

    pub fn default_pdf(&self) -> &Path {
        &self.default_pdf
    }

    /// Record ids in insertion order.
    pub async fn list_ids(&self) -> Vec<String> {
        self.store.ids().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Record, AppError> {
        self.store
            .find(id)
            .await
            .ok_or_else(|| AppError::RecordNotFound(id.to_string()))
    }

    /// DTO projection of a record. Currently the full record.
    pub async fn get_dto_by_id(&self, id: &str) -> Result<Record, AppError> {
        self.get_by_id(id).await
    }

    /// Stored PDF for `id`, falling back to the default document.
    ///
    /// Ids that do not map to a file directly inside the files directory
    /// always fall back.
    pub async fn get_pdf_by_id(&self, id: &str) -> PdfLookup {
        if self.store.find(id).await.is_some() {
            if let Ok(path) = pdf_path(&self.files_dir, id) {
                if path.is_file() {
                    return PdfLookup::Exact(path);
                }
            }
        }
        PdfLookup::Fallback(self.default_pdf.clone())
    }
}
