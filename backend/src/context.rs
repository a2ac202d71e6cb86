//! Application context shared by every handler.
//!
//! Built once at startup and registered as `web::Data<AppContext>`; it owns
//! the record store and everything that reads from or writes to it.

use crate::auth::TokenAuthority;
use crate::config::AppConfig;
use crate::conversion::{Converter, HttpConversionClient};
use crate::ingestion::IngestionPipeline;
use crate::query::QueryService;
use crate::store::{RecordStore, StoreError};
use std::fs;
use std::sync::Arc;

pub struct AppContext {
    pub store: Arc<RecordStore>,
    pub pipeline: IngestionPipeline,
    pub query: QueryService,
    pub tokens: TokenAuthority,
}

impl AppContext {
    /// Context wired to the HTTP conversion services named in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let converter = Arc::new(HttpConversionClient::from_config(&config.microservices));
        Self::with_converter(config, converter)
    }

    /// Opens the store and creates the files directory. Fails if the record
    /// file cannot be read or is corrupt.
    pub fn with_converter(
        config: &AppConfig,
        converter: Arc<dyn Converter>,
    ) -> Result<Self, StoreError> {
        let storage = &config.storage;
        fs::create_dir_all(&storage.files_dir)?;
        let store = Arc::new(RecordStore::open(&storage.data_file)?);
        Ok(Self {
            pipeline: IngestionPipeline::new(&storage.files_dir, converter, Arc::clone(&store)),
            query: QueryService::new(Arc::clone(&store), &storage.files_dir, &storage.default_pdf),
            tokens: TokenAuthority::new(config.auth.secret.as_bytes()),
            store,
        })
    }
}
