//! Where the EnableTelemetry record goes
//!
//! The record is placed directly after `FileAttributes`, or after the
//! `Metadata` record that follows it, so that the FileAttributes/Metadata
//! pair is never split. Files that already carry the record or that are
//! signed are rejected. Every other record is copied byte-for-byte.

use crate::reader::TagReader;
use crate::tag::{Record, TagCode};
use crate::{Error, Result};
use std::io::Write;

/// Progress of the insertion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyState {
    /// Looking for the FileAttributes anchor
    Scanning,
    /// The new record has been written
    Inserted,
    /// The End record has been written
    Done,
}

/// What to do when the stream has no FileAttributes record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAnchor {
    /// Fail with [`Error::AnchorNotFound`]
    #[default]
    Reject,
    /// Emit the stream unchanged, without the new record
    PassThrough,
}

/// Summary of a completed insertion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceOutcome {
    /// Offset of the new record within the emitted stream, if it was written
    pub inserted_at: Option<u64>,
    /// Number of input records read, End included
    pub records: usize,
    /// Bytes found after the End record and not emitted
    pub dropped_trailing: usize,
}

impl SpliceOutcome {
    /// Whether the new record made it into the output
    pub fn inserted(&self) -> bool {
        self.inserted_at.is_some()
    }
}

/// Drives a tag stream through the insertion rules
#[derive(Debug)]
pub struct InsertionPolicy<'r> {
    record: &'r [u8],
    missing_anchor: MissingAnchor,
    state: PolicyState,
    emitted: u64,
    inserted_at: Option<u64>,
    records: usize,
}

impl<'r> InsertionPolicy<'r> {
    /// Policy inserting the already serialized `record`
    pub fn new(record: &'r [u8]) -> Self {
        Self {
            record,
            missing_anchor: MissingAnchor::default(),
            state: PolicyState::Scanning,
            emitted: 0,
            inserted_at: None,
            records: 0,
        }
    }

    /// Set the behaviour for streams without an anchor
    pub fn with_missing_anchor(mut self, missing_anchor: MissingAnchor) -> Self {
        self.missing_anchor = missing_anchor;
        self
    }

    /// Current state
    pub fn state(&self) -> PolicyState {
        self.state
    }

    /// Copy the stream from `reader` into `sink`, inserting the record
    ///
    /// Nothing written to `sink` is meaningful if this returns an error; the
    /// caller is expected to stage output and discard it on failure.
    pub fn splice<W: Write>(
        &mut self,
        reader: &mut TagReader<'_>,
        sink: &mut W,
    ) -> Result<SpliceOutcome> {
        while self.state != PolicyState::Done {
            let record = self.next_record(reader)?;

            match (self.state, record.code()) {
                (_, TagCode::End) => {
                    self.emit(sink, record.raw)?;
                    self.state = PolicyState::Done;
                }
                (PolicyState::Scanning, TagCode::FileAttributes) => {
                    self.emit(sink, record.raw)?;

                    let next = self.next_record(reader)?;
                    if next.code() == TagCode::Metadata {
                        self.emit(sink, next.raw)?;
                        self.insert(sink)?;
                    } else {
                        self.insert(sink)?;
                        self.emit(sink, next.raw)?;
                    }

                    self.state = if next.code() == TagCode::End {
                        PolicyState::Done
                    } else {
                        PolicyState::Inserted
                    };
                }
                _ => self.emit(sink, record.raw)?,
            }
        }

        let dropped_trailing = reader.remainder().len();
        if dropped_trailing > 0 {
            log::warn!("Dropping {dropped_trailing} bytes after the End tag");
        }

        if self.inserted_at.is_none() {
            match self.missing_anchor {
                MissingAnchor::Reject => return Err(Error::AnchorNotFound),
                MissingAnchor::PassThrough => {
                    log::warn!("No FileAttributes tag found; stream left without EnableTelemetry")
                }
            }
        }

        Ok(SpliceOutcome {
            inserted_at: self.inserted_at,
            records: self.records,
            dropped_trailing,
        })
    }

    /// Read the next record and apply the rejection rules to it
    fn next_record<'a>(&mut self, reader: &mut TagReader<'a>) -> Result<Record<'a>> {
        let record = match reader.next() {
            Some(record) => record?,
            None => return Err(Error::truncated(reader.offset(), 2, 0)),
        };
        self.records += 1;

        match record.code() {
            TagCode::EnableTelemetry => Err(Error::AlreadyPatched),
            TagCode::SignedSwf => Err(Error::UnsupportedSigned),
            _ => Ok(record),
        }
    }

    fn emit<W: Write>(&mut self, sink: &mut W, bytes: &[u8]) -> Result<()> {
        sink.write_all(bytes)?;
        self.emitted += bytes.len() as u64;
        Ok(())
    }

    fn insert<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        log::info!(
            "Inserting EnableTelemetry ({} bytes) at stream offset {}",
            self.record.len(),
            self.emitted
        );
        self.inserted_at = Some(self.emitted);
        self.emit(sink, self.record)
    }
}
