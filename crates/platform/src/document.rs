use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::atomic_io::write_text_atomic;

#[derive(Debug, Error)]
pub enum DocumentIoError {
    #[error("failed to read document {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode document {path} as json")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write document {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Raw state of an on-disk JSON document. Parsing is left to the caller so
/// each document type can decide whether an unparseable file is fatal.
#[derive(Debug, Clone)]
pub enum DocumentText {
    Missing,
    Present(String),
}

pub fn read_document_text(path: &Path) -> Result<DocumentText, DocumentIoError> {
    if !path.exists() {
        return Ok(DocumentText::Missing);
    }

    let raw = fs::read_to_string(path).map_err(|source| DocumentIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DocumentText::Present(raw))
}

pub fn write_document_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), DocumentIoError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| DocumentIoError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_text_atomic(path, &text).map_err(|source| DocumentIoError::Write {
        path: path.to_path_buf(),
        source,
    })
}
