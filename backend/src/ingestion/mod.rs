//! Ingestion pipeline: uploaded PDF in, persisted [`Record`] out.
//!
//! Each upload walks the stages of [`IngestStage`] strictly in order:
//!
//! 1.  **Stored**: the raw bytes are written verbatim to a working file in the
//!     files directory, named `<uuid>_<original name>`.
//! 2.  **TextExtracted**: the PDF-to-text service converts the working file.
//! 3.  **InvoiceParsed**: the text-to-JSON service structures the text.
//! 4.  **Identified**: the canonical id is derived (see [`identifier`]).
//! 5.  **Renamed**: the working file is moved to `<id>.pdf`. This step is
//!     best-effort; a failure is logged and ingestion continues.
//! 6.  **Appended**: the record is appended to the [`RecordStore`].
//!
//! Any other failure aborts the remaining stages. The working file of an
//! aborted ingestion is left in place.

pub mod identifier;

use crate::conversion::{ConversionError, Converter};
use crate::store::{RecordStore, StoreError};
use common::model::record::Record;
use log::{error, info, warn};
use md5::Context;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use identifier::identifier;

const FALLBACK_FILE_NAME: &str = "upload.pdf";

/// Raw upload as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Stored,
    TextExtracted,
    InvoiceParsed,
    Identified,
    Renamed,
    Appended,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestStage::Received => "received",
            IngestStage::Stored => "stored",
            IngestStage::TextExtracted => "text-extracted",
            IngestStage::InvoiceParsed => "invoice-parsed",
            IngestStage::Identified => "identified",
            IngestStage::Renamed => "renamed",
            IngestStage::Appended => "appended",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("upload carries no `file` field")]
    MissingFile,
    #[error("malformed multipart upload: {0}")]
    Multipart(String),
    #[error("failed to store upload at '{path}': {source}")]
    StoreRaw {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("failed to persist record '{id}': {source}")]
    Persist {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub record: Record,
    /// Location of the renamed PDF, or `None` when the rename failed.
    pub pdf_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct IngestionPipeline {
    files_dir: PathBuf,
    converter: Arc<dyn Converter>,
    store: Arc<RecordStore>,
}

impl IngestionPipeline {
    pub fn new(
        files_dir: impl Into<PathBuf>,
        converter: Arc<dyn Converter>,
        store: Arc<RecordStore>,
    ) -> Self {
        Self {
            files_dir: files_dir.into(),
            converter,
            store,
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Runs one upload through every stage.
    ///
    /// Returns only after the record has been persisted.
    pub async fn ingest(&self, upload: UploadedDocument) -> Result<Ingested, IngestError> {
        let mut stage = IngestStage::Received;
        let result = self.run(upload, &mut stage).await;
        if let Err(e) = &result {
            error!("Ingestion aborted after stage '{}': {}", stage, e);
        }
        result
    }

    async fn run(
        &self,
        upload: UploadedDocument,
        stage: &mut IngestStage,
    ) -> Result<Ingested, IngestError> {
        let working = self.store_raw(&upload)?;
        *stage = IngestStage::Stored;

        let text = self.converter.pdf_to_text(&working).await?;
        *stage = IngestStage::TextExtracted;
        info!("Extracted {} characters from {}", text.len(), working.display());

        let invoice = self.converter.text_to_invoice(&text).await?;
        *stage = IngestStage::InvoiceParsed;

        let id = identifier(&invoice);
        *stage = IngestStage::Identified;
        info!("Upload '{}' identified as '{}'", upload.file_name, id);

        let pdf_path = match self.promote(&working, &id) {
            Ok(path) => {
                *stage = IngestStage::Renamed;
                Some(path)
            }
            Err(e) => {
                warn!(
                    "Could not rename {} to the canonical name for '{}': {}",
                    working.display(),
                    id,
                    e
                );
                None
            }
        };

        let record = Record::new(id, invoice);
        self.store
            .append(record.clone())
            .await
            .map_err(|source| IngestError::Persist {
                id: record.id.clone(),
                source,
            })?;
        *stage = IngestStage::Appended;
        info!("Added form '{}'", record.id);

        Ok(Ingested { record, pdf_path })
    }

    /// Writes the upload to its working file.
    fn store_raw(&self, upload: &UploadedDocument) -> Result<PathBuf, IngestError> {
        let path = self.files_dir.join(working_name(&upload.file_name));
        fs::write(&path, &upload.bytes).map_err(|source| IngestError::StoreRaw {
            path: path.clone(),
            source,
        })?;

        let mut digest = Context::new();
        digest.consume(&upload.bytes);
        info!(
            "Stored upload '{}' as {} ({} bytes, md5 {:x})",
            upload.file_name,
            path.display(),
            upload.bytes.len(),
            digest.finalize()
        );
        Ok(path)
    }

    /// Moves the working file to `<id>.pdf`.
    fn promote(&self, working: &Path, id: &str) -> io::Result<PathBuf> {
        let target = pdf_path(&self.files_dir, id)?;
        fs::rename(working, &target)?;
        Ok(target)
    }
}

/// Canonical location of the PDF for `id`: `<files_dir>/<id>.pdf`.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `<id>.pdf` is not a plain
/// file name, so the result always stays directly inside `files_dir`.
pub fn pdf_path(files_dir: &Path, id: &str) -> io::Result<PathBuf> {
    let name = format!("{id}.pdf");
    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name.as_str() => {
            Ok(files_dir.join(part))
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{name}' is not a file name inside {}", files_dir.display()),
        )),
    }
}

/// `<uuid>_<basename>`; only the last path component of the client's name is
/// kept.
fn working_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    format!("{}_{}", Uuid::new_v4(), base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionStage;
    use async_trait::async_trait;
    use common::model::invoice::{Invoice, PairData};
    use futures_util::future::join_all;

    /// Reads the stored file as `IC|invoiceNum` text.
    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        async fn pdf_to_text(&self, path: &Path) -> Result<String, ConversionError> {
            fs::read_to_string(path).map_err(|source| ConversionError::ReadInput {
                path: path.display().to_string(),
                source,
            })
        }

        async fn text_to_invoice(&self, text: &str) -> Result<Invoice, ConversionError> {
            let (ic, num) = text.split_once('|').unwrap_or(("", text));
            Ok(Invoice {
                invoice_num: num.to_string(),
                pair_data: PairData {
                    ic: ic.to_string(),
                    dic: String::new(),
                },
                ..Invoice::default()
            })
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl Converter for FailingConverter {
        async fn pdf_to_text(&self, _path: &Path) -> Result<String, ConversionError> {
            Err(ConversionError::BadStatus {
                stage: ConversionStage::PdfToText,
                status: 500,
            })
        }

        async fn text_to_invoice(&self, _text: &str) -> Result<Invoice, ConversionError> {
            unreachable!("pdf_to_text always fails")
        }
    }

    fn pipeline(
        dir: &Path,
        converter: Arc<dyn Converter>,
    ) -> (IngestionPipeline, Arc<RecordStore>) {
        let files = dir.join("files");
        fs::create_dir_all(&files).unwrap();
        let store = Arc::new(RecordStore::open(dir.join("forms.json")).unwrap());
        (IngestionPipeline::new(files, converter, Arc::clone(&store)), store)
    }

    fn upload(name: &str, body: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: name.to_string(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[actix_web::test]
    async fn successful_ingestion_names_record_and_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(EchoConverter));
        let before = store.ids().await;

        let ingested = pipeline.ingest(upload("scan.pdf", "123|42")).await.unwrap();

        assert_eq!(ingested.record.id, "12342");
        let pdf = ingested.pdf_path.unwrap();
        assert_eq!(pdf, pipeline.files_dir().join("12342.pdf"));
        assert_eq!(fs::read_to_string(pdf).unwrap(), "123|42");
        let after = store.ids().await;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.iter().filter(|id| *id == "12342").count(), 1);
    }

    #[actix_web::test]
    async fn conversion_failure_aborts_and_keeps_working_file() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(FailingConverter));

        let err = pipeline.ingest(upload("scan.pdf", "123|42")).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::Conversion(ConversionError::BadStatus { status: 500, .. })
        ));
        assert!(store.is_empty().await);
        let leftovers: Vec<_> = fs::read_dir(pipeline.files_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers.len(), 1);
        assert!(leftovers[0].ends_with("_scan.pdf"));
    }

    #[actix_web::test]
    async fn failed_rename_still_appends_record() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(EchoConverter));

        // The id contains a directory separator.
        let ingested = pipeline
            .ingest(upload("scan.pdf", "nowhere/|7"))
            .await
            .unwrap();

        assert_eq!(ingested.record.id, "nowhere/7");
        assert!(ingested.pdf_path.is_none());
        assert_eq!(store.ids().await, vec!["nowhere/7"]);
    }

    #[actix_web::test]
    async fn absolute_id_stays_inside_files_dir() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(EchoConverter));
        let ic = format!("{}/", outside.path().display());

        let ingested = pipeline
            .ingest(upload("scan.pdf", &format!("{ic}|1")))
            .await
            .unwrap();

        assert_eq!(ingested.record.id, format!("{ic}1"));
        assert!(ingested.pdf_path.is_none());
        assert_eq!(fs::read_dir(outside.path()).unwrap().count(), 0);
        assert_eq!(store.ids().await, vec![format!("{ic}1")]);
        // The working file is left where it was stored.
        let leftovers: Vec<_> = fs::read_dir(pipeline.files_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers.len(), 1);
        assert!(leftovers[0].ends_with("_scan.pdf"));
    }

    #[actix_web::test]
    async fn persistence_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        fs::create_dir_all(&files).unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        let store = Arc::new(RecordStore::open(data_dir.join("forms.json")).unwrap());
        let pipeline = IngestionPipeline::new(&files, Arc::new(EchoConverter), Arc::clone(&store));
        fs::remove_dir_all(&data_dir).unwrap();

        let err = pipeline.ingest(upload("scan.pdf", "1|2")).await.unwrap_err();

        assert!(matches!(err, IngestError::Persist { ref id, .. } if id == "12"));
        assert!(store.is_empty().await);
    }

    #[actix_web::test]
    async fn duplicate_uploads_produce_duplicate_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(EchoConverter));

        pipeline.ingest(upload("a.pdf", "9|1")).await.unwrap();
        pipeline.ingest(upload("b.pdf", "9|1")).await.unwrap();

        assert_eq!(store.ids().await, vec!["91", "91"]);
    }

    #[actix_web::test]
    async fn concurrent_ingestions_each_produce_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, store) = pipeline(dir.path(), Arc::new(EchoConverter));

        let uploads = (0..16).map(|i| pipeline.ingest(upload("same-name.pdf", &format!("CZ|{i}"))));
        for result in join_all(uploads).await {
            result.unwrap();
        }

        let mut ids = store.ids().await;
        ids.sort();
        let mut expected: Vec<String> = (0..16).map(|i| format!("CZ{i}")).collect();
        expected.sort();
        assert_eq!(ids, expected);

        let on_disk: Vec<Record> =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 16);
    }

    #[test]
    fn pdf_path_accepts_only_plain_file_names() {
        let files = Path::new("/srv/files");
        assert_eq!(pdf_path(files, "12342").unwrap(), files.join("12342.pdf"));
        for id in ["/tmp/evil", "../up", "a/b", "./x", "..", ""] {
            let err = pdf_path(files, id).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "id {id:?}");
        }
    }

    #[test]
    fn working_name_keeps_only_the_base_name() {
        let name = working_name("../../etc/passwd");
        assert!(name.ends_with("_passwd"));
        assert!(!name.contains('/'));
        assert!(working_name("").ends_with("_upload.pdf"));
        assert!(working_name("..").ends_with("_upload.pdf"));
    }
}
