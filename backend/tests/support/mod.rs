//! Helpers shared by the integration tests.

#![allow(dead_code)]

use invoice_backend::config::{AppConfig, StorageConfig};
use std::path::Path;

pub const SECRET: &str = "key";
pub const DEFAULT_PDF: &[u8] = b"%PDF-1.4 default report";
const BOUNDARY: &str = "----invoice-test-boundary";

/// Config rooted in `dir`, with a default document in place.
pub fn config_in(dir: &Path) -> AppConfig {
    let default_pdf = dir.join("report.pdf");
    std::fs::write(&default_pdf, DEFAULT_PDF).unwrap();
    let mut config = AppConfig::default();
    config.storage = StorageConfig {
        data_file: dir.join("forms.json"),
        files_dir: dir.join("files"),
        default_pdf,
    };
    config.auth.secret = SECRET.to_string();
    config
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Builds a multipart body with a single file field. Returns the content type
/// header value and the body.
pub fn multipart(field: &str, file_name: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
