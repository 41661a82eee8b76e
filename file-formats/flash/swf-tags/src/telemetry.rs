//! The EnableTelemetry record
//!
//! Payload layout:
//!
//! | Offset | Size | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 2    | Reserved, always zero                  |
//! | 2      | 32   | SHA-256 of the password (optional)     |

use crate::tag::{RecordHeader, TagCode};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size of the reserved field at the start of the payload
pub const RESERVED_SIZE: usize = 2;

/// Size of the password digest
pub const DIGEST_SIZE: usize = 32;

/// An EnableTelemetry record, optionally password protected
#[derive(Clone, PartialEq, Eq)]
pub struct TelemetryRecord {
    digest: Option<[u8; DIGEST_SIZE]>,
}

impl TelemetryRecord {
    /// Record without a password
    pub fn open() -> Self {
        Self { digest: None }
    }

    /// Record protected by `password`; only its SHA-256 digest is stored
    pub fn with_password(password: &str) -> Self {
        Self {
            digest: Some(Sha256::digest(password.as_bytes()).into()),
        }
    }

    /// Record protected by `password` if one is given
    pub fn new(password: Option<&str>) -> Self {
        password.map_or_else(Self::open, Self::with_password)
    }

    /// The stored password digest
    pub fn digest(&self) -> Option<&[u8; DIGEST_SIZE]> {
        self.digest.as_ref()
    }

    /// Whether viewing advanced telemetry requires a password
    pub fn is_protected(&self) -> bool {
        self.digest.is_some()
    }

    /// Record payload: reserved field plus the digest if present
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = vec![0u8; RESERVED_SIZE];
        if let Some(digest) = &self.digest {
            payload.extend_from_slice(digest);
        }
        payload
    }

    /// Serialize header and payload
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload = self.payload();
        let header = RecordHeader::new(TagCode::EnableTelemetry, payload.len() as u32);

        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&payload);
        bytes
    }
}

impl fmt::Debug for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryRecord")
            .field("protected", &self.is_protected())
            .finish()
    }
}

/// Serialize an EnableTelemetry record for `password`
pub fn build(password: Option<&str>) -> Vec<u8> {
    TelemetryRecord::new(password).to_bytes()
}
