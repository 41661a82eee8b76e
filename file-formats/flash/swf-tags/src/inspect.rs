//! Read-only summary of a container's tag stream

use crate::Result;
use crate::envelope::{self, HEADER_SIZE, Signature};
use crate::frame::FrameLayout;
use crate::reader::TagReader;
use crate::tag::{LengthForm, TagCode};
use crate::telemetry::RESERVED_SIZE;

/// One record of the tag stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    /// Position in the stream
    pub index: usize,
    /// Offset of the record header in the uncompressed file
    pub offset: u64,
    /// Record type
    pub code: TagCode,
    /// Payload length
    pub length: u32,
    /// Header encoding
    pub form: LengthForm,
}

/// Whether a container can be patched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// FileAttributes present, no EnableTelemetry, not signed
    Ready,
    /// EnableTelemetry already present
    AlreadyPatched {
        /// Whether the existing record carries a password digest
        protected: bool,
    },
    /// The stream is signed
    Signed,
    /// No FileAttributes record to insert after
    NoAnchor,
}

/// Summary of a decoded container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Envelope signature
    pub signature: Signature,
    /// SWF version byte
    pub version: u8,
    /// Length declared in the header
    pub declared_length: u32,
    /// Uncompressed file size (header plus body)
    pub actual_length: u64,
    /// Frame header size under the layout used
    pub frame_header_size: usize,
    /// All records, End included
    pub records: Vec<RecordSummary>,
    /// Bytes following the End record
    pub trailing_bytes: usize,
    /// Patch readiness
    pub readiness: Readiness,
}

/// Decode `input` and summarize its records
pub fn inspect(input: &[u8], layout: FrameLayout) -> Result<ContainerSummary> {
    let container = envelope::decode(input)?;
    let frame_header_size = layout.header_size(&container.body)?;

    let mut records = Vec::new();
    let mut telemetry = None;
    let mut signed = false;
    let mut anchor = false;

    let mut reader = TagReader::at(&container.body, frame_header_size);
    for (index, record) in reader.by_ref().enumerate() {
        let record = record?;
        match record.code() {
            TagCode::EnableTelemetry if telemetry.is_none() => {
                telemetry = Some(record.payload.len() > RESERVED_SIZE);
            }
            TagCode::SignedSwf => signed = true,
            TagCode::FileAttributes => anchor = true,
            _ => {}
        }

        records.push(RecordSummary {
            index,
            offset: (HEADER_SIZE + record.offset) as u64,
            code: record.code(),
            length: record.header.length,
            form: record.header.form,
        });
    }

    let readiness = match (telemetry, signed, anchor) {
        (Some(protected), _, _) => Readiness::AlreadyPatched { protected },
        (None, true, _) => Readiness::Signed,
        (None, false, false) => Readiness::NoAnchor,
        (None, false, true) => Readiness::Ready,
    };

    Ok(ContainerSummary {
        signature: container.signature,
        version: container.version,
        declared_length: container.declared_length,
        actual_length: (HEADER_SIZE + container.body.len()) as u64,
        frame_header_size,
        records,
        trailing_bytes: reader.remainder().len(),
        readiness,
    })
}
