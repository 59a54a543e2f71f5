use axum::{extract::rejection::JsonRejection, extract::State, Json};
use base64::{
    alphabet,
    engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
    Engine as _,
};
use serde::{Deserialize, Serialize};

use crate::api::{error::AppError, state::AppState};
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Base64 encoded bytes.
    pub content: String,
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub document_link_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub document_link_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Base64 encoded bytes.
    pub content: String,
    pub filename: Option<String>,
}

/// Standard alphabet, padding required, non-zero trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decodes uploaded content the way MIME-style decoders do: bytes outside
/// the base64 alphabet (line breaks, spaces, stray symbols) are skipped and
/// anything after the padding is ignored. Missing padding is still an error.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, DomainError> {
    LENIENT
        .decode(base64_symbols(encoded))
        .map_err(|e| DomainError::invalid_input(format!("Invalid base64 content: {e}")))
}

fn base64_symbols(encoded: &str) -> Vec<u8> {
    let mut symbols = Vec::with_capacity(encoded.len());
    let mut padding = false;
    for b in encoded.bytes() {
        match b {
            b'=' => {
                padding = true;
                symbols.push(b);
            }
            _ if padding => break,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => symbols.push(b),
            _ => {}
        }
    }
    symbols
}

pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub async fn upload_document(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(request) = payload?;
    let content = decode_content(&request.content)?;

    let id = state
        .document_service
        .upload(content, request.filename)
        .await?;

    tokio::time::sleep(state.config.server.response_delay).await;

    Ok(Json(UploadResponse {
        document_link_id: id.into_inner(),
    }))
}

pub async fn fetch_document(
    State(state): State<AppState>,
    payload: Result<Json<FetchRequest>, JsonRejection>,
) -> Result<Json<FetchResponse>, AppError> {
    let Json(request) = payload?;
    let doc = state
        .document_service
        .fetch(&request.document_link_id)
        .await?;

    tokio::time::sleep(state.config.server.response_delay).await;

    Ok(Json(FetchResponse {
        content: encode_content(&doc.content),
        filename: doc.filename,
    }))
}
