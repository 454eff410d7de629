//! Scan event domain model.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Identifier read from an RFID card or barcode.
///
/// Always non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Build a token from raw reader output.
    ///
    /// Surrounding whitespace (including the trailing newline a keyboard-wedge
    /// reader sends) is stripped. Blank input is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A captured still image, base64 encoded (standard alphabet, padded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapturedImage(String);

impl CapturedImage {
    /// Wrap already encoded base64 text.
    pub fn from_base64(encoded: String) -> Self {
        Self(encoded)
    }

    /// The base64 text.
    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Length of the encoded text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the encoded payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One presented credential, optionally with a face photo.
///
/// Lives for a single loop iteration. The send time is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// The scanned token.
    pub token_id: TokenId,
    /// Face photo, absent when capture failed.
    pub face_image: Option<CapturedImage>,
}

impl ScanEvent {
    /// Create a scan event.
    pub fn new(token_id: TokenId, face_image: Option<CapturedImage>) -> Self {
        Self {
            token_id,
            face_image,
        }
    }

    /// Whether a photo is attached.
    pub fn has_image(&self) -> bool {
        self.face_image.is_some()
    }
}
