//! Downloadable and printable renditions of financial statements.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use console_core::error::AppError;
use serde::Serialize;

use crate::models::StatementKind;

pub mod pdf;

/// `balance-sheet-MAIN.json`; characters unsafe in file names become `_`.
pub fn export_file_name(kind: StatementKind, ledger: &str, extension: &str) -> String {
    let ledger: String = ledger
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}.{}", kind.slug(), ledger, extension)
}

/// Pretty-printed JSON served as a file download.
pub fn json_attachment<T: Serialize>(file_name: &str, value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    Ok(attachment(file_name, "application/json", body))
}

/// A rendered PDF served as a file download.
pub fn pdf_attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    attachment(file_name, "application/pdf", bytes)
}

fn attachment(file_name: &str, content_type: &'static str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}
