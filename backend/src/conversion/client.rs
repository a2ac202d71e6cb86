use crate::config::MicroservicesConfig;
use crate::conversion::{ConversionError, ConversionStage, Converter};
use async_trait::async_trait;
use common::model::invoice::{Invoice, InvoiceDocument};
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::Path;

/// [`Converter`] backed by the HTTP conversion services.
#[derive(Clone)]
pub struct HttpConversionClient {
    client: Client,
    pdf_to_txt_url: String,
    txt_to_json_url: String,
}

impl HttpConversionClient {
    pub fn new(pdf_to_txt_url: impl Into<String>, txt_to_json_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            pdf_to_txt_url: pdf_to_txt_url.into(),
            txt_to_json_url: txt_to_json_url.into(),
        }
    }

    pub fn from_config(config: &MicroservicesConfig) -> Self {
        Self::new(config.pdf_to_txt_url(), config.txt_to_json_url())
    }
}

/// Decodes a text-to-JSON response body. The service either wraps the
/// invoice in an `invoice` envelope or returns it bare.
fn decode_invoice(body: &[u8]) -> Result<Invoice, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let wrapped = value
        .as_object()
        .is_some_and(|object| object.contains_key("invoice"));
    if wrapped {
        serde_json::from_value::<InvoiceDocument>(value).map(|document| document.invoice)
    } else {
        serde_json::from_value::<Invoice>(value)
    }
}

#[async_trait]
impl Converter for HttpConversionClient {
    async fn pdf_to_text(&self, path: &Path) -> Result<String, ConversionError> {
        let stage = ConversionStage::PdfToText;
        let bytes = std::fs::read(path).map_err(|source| ConversionError::ReadInput {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        debug!("POST {} ({})", self.pdf_to_txt_url, stage);
        let response = self
            .client
            .post(&self.pdf_to_txt_url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ConversionError::Transport { stage, source })?;
        if response.status() != StatusCode::OK {
            return Err(ConversionError::BadStatus {
                stage,
                status: response.status().as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|source| ConversionError::Transport { stage, source })
    }

    async fn text_to_invoice(&self, text: &str) -> Result<Invoice, ConversionError> {
        let stage = ConversionStage::TextToInvoice;
        debug!("POST {} ({})", self.txt_to_json_url, stage);
        let response = self
            .client
            .post(&self.txt_to_json_url)
            .header(reqwest::header::CONTENT_TYPE, "application/text")
            .body(text.to_owned())
            .send()
            .await
            .map_err(|source| ConversionError::Transport { stage, source })?;
        if response.status() != StatusCode::OK {
            return Err(ConversionError::BadStatus {
                stage,
                status: response.status().as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| ConversionError::Transport { stage, source })?;
        decode_invoice(&body).map_err(|source| ConversionError::Decode { stage, source })
    }
}
