//! Tag-stream codec for Adobe Flash SWF files.
//!
//! This crate reads the SWF envelope and tag stream, and writes the stream
//! back with an `EnableTelemetry` record inserted so that the file opts in to
//! advanced telemetry. Records that are not involved in the insertion are
//! copied byte-for-byte, and the header length field is recomputed for the
//! patched output.
//!
//! # Examples
//!
//! ```no_run
//! use swf_tags::patch::{PatchOptions, patch_file};
//!
//! let report = patch_file("game.swf", "game.swf", Some("secret"), &PatchOptions::default())?;
//! println!("inserted at offset {:?}", report.inserted_at);
//! # Ok::<(), swf_tags::Error>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod compression;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod inspect;
pub mod patch;
pub mod policy;
pub mod reader;
pub mod tag;
pub mod telemetry;
pub mod writer;

pub use envelope::{Container, Header, Signature};
pub use error::{Error, Result};
pub use frame::FrameLayout;
pub use inspect::{ContainerSummary, Readiness, inspect};
pub use patch::{PatchOptions, PatchReport, patch_bytes, patch_file};
pub use policy::{InsertionPolicy, MissingAnchor, PolicyState};
pub use reader::TagReader;
pub use tag::{LengthForm, Record, RecordHeader, TagCode};
pub use telemetry::TelemetryRecord;
