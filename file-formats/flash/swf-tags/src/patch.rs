//! End-to-end patching of SWF buffers and files

use crate::envelope::{self, Container, HEADER_SIZE, Signature};
use crate::frame::FrameLayout;
use crate::policy::{InsertionPolicy, MissingAnchor};
use crate::reader::TagReader;
use crate::telemetry::TelemetryRecord;
use crate::writer::ContainerWriter;
use crate::{Error, Result};
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Options controlling how a container is patched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchOptions {
    /// Layout of the frame header preceding the tag stream
    pub frame_layout: FrameLayout,
    /// Behaviour when no FileAttributes record exists
    pub missing_anchor: MissingAnchor,
}

impl PatchOptions {
    /// Set the frame header layout
    pub fn with_frame_layout(mut self, frame_layout: FrameLayout) -> Self {
        self.frame_layout = frame_layout;
        self
    }

    /// Set the missing anchor behaviour
    pub fn with_missing_anchor(mut self, missing_anchor: MissingAnchor) -> Self {
        self.missing_anchor = missing_anchor;
        self
    }
}

/// Result of a successful patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Envelope of the input file
    pub source: Signature,
    /// SWF version byte, carried over unchanged
    pub version: u8,
    /// Size of the written container, equal to its length field
    pub output_length: u32,
    /// Whether the new record carries a password digest
    pub protected: bool,
    /// Absolute offset of the new record in the output, if inserted
    pub inserted_at: Option<u64>,
    /// Records read from the input, End included
    pub records: usize,
    /// Bytes after the End record that were not carried over
    pub dropped_trailing: usize,
}

impl PatchReport {
    /// Whether the EnableTelemetry record was written
    pub fn inserted(&self) -> bool {
        self.inserted_at.is_some()
    }
}

/// Write `container` to `output` with `record` spliced into its tag stream
pub fn patch_container<W: Write + Seek>(
    container: &Container,
    record: &TelemetryRecord,
    options: &PatchOptions,
    output: &mut W,
) -> Result<PatchReport> {
    let frame_size = options.frame_layout.header_size(&container.body)?;
    log::debug!(
        "Frame header: {frame_size} bytes ({})",
        options.frame_layout
    );

    let record_bytes = record.to_bytes();
    let mut policy =
        InsertionPolicy::new(&record_bytes).with_missing_anchor(options.missing_anchor);
    let mut reader = TagReader::at(&container.body, frame_size);

    let mut writer = ContainerWriter::begin(output, container.version)?;
    writer.write_all(&container.body[..frame_size])?;
    let outcome = policy.splice(&mut reader, &mut writer)?;
    let output_length = writer.finish()?;

    Ok(PatchReport {
        source: container.signature,
        version: container.version,
        output_length,
        protected: record.is_protected(),
        inserted_at: outcome
            .inserted_at
            .map(|offset| (HEADER_SIZE + frame_size) as u64 + offset),
        records: outcome.records,
        dropped_trailing: outcome.dropped_trailing,
    })
}

/// Patch an in-memory SWF file
///
/// The output is staged in memory and returned only if the whole pass
/// succeeds.
///
/// # Examples
///
/// ```
/// use swf_tags::patch::{PatchOptions, patch_bytes};
///
/// let mut swf = b"FWS\x0A\x00\x00\x00\x00".to_vec();
/// swf.extend([0x78, 0x00, 0x05, 0x5F, 0x00]); // frame header
/// swf.extend([0x44, 0x11, 0x08, 0x00, 0x00, 0x00]); // FileAttributes
/// swf.extend([0x00, 0x00]); // End
///
/// let (output, report) = patch_bytes(&swf, None, &PatchOptions::default()).unwrap();
/// assert!(report.inserted());
/// assert_eq!(output.len(), swf.len() + 4);
/// assert_eq!(report.output_length as usize, output.len());
/// ```
pub fn patch_bytes(
    input: &[u8],
    password: Option<&str>,
    options: &PatchOptions,
) -> Result<(Vec<u8>, PatchReport)> {
    let container = envelope::decode(input)?;
    let record = TelemetryRecord::new(password);

    let mut staging = Cursor::new(Vec::with_capacity(HEADER_SIZE + container.body.len() + 64));
    let report = patch_container(&container, &record, options, &mut staging)?;
    Ok((staging.into_inner(), report))
}

/// Patch the SWF file at `input`, writing the result to `output`
///
/// `input` and `output` may be the same path. The result is written to a
/// temporary file next to `output` and renamed over it once complete, so a
/// failed run leaves `output` untouched.
pub fn patch_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    password: Option<&str>,
    options: &PatchOptions,
) -> Result<PatchReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let data = fs::read(input)?;
    log::debug!("Read {} bytes from {}", data.len(), input.display());

    let (patched, report) = patch_bytes(&data, password, options)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(&patched)?;
    temp_file.flush()?;

    // Keep the permissions of the file being replaced
    if let Ok(metadata) = fs::metadata(output) {
        temp_file.as_file().set_permissions(metadata.permissions())?;
    }

    temp_file.persist(output).map_err(|e| Error::Io(e.error))?;
    log::debug!("Wrote {} bytes to {}", patched.len(), output.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    const FRAME: [u8; 5] = [0x78, 0x00, 0x05, 0x5F, 0x00];

    fn swf(tags: &[u8]) -> Vec<u8> {
        let mut data = b"FWS\x0A".to_vec();
        data.extend(&((HEADER_SIZE + FRAME.len() + tags.len()) as u32).to_le_bytes());
        data.extend(FRAME);
        data.extend(tags);
        data
    }

    #[test]
    fn test_patch_bytes_report() {
        let input = swf(&[0x44, 0x11, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let (output, report) = patch_bytes(&input, Some("pw"), &PatchOptions::default()).unwrap();

        assert_eq!(report.source, Signature::Uncompressed);
        assert_eq!(report.version, 10);
        assert!(report.protected);
        assert_eq!(report.records, 2);
        assert_eq!(report.inserted_at, Some(8 + 5 + 6));
        assert_eq!(output.len(), input.len() + 2 + 34);
        assert_eq!(
            LittleEndian::read_u32(&output[4..8]) as usize,
            output.len()
        );
        assert_eq!(&output[19..21], &[0x62, 0x17]);
    }

    #[test]
    fn test_frame_header_too_large() {
        let input = b"FWS\x0A\x0B\x00\x00\x00\x00\x00\x00".to_vec();
        let result = patch_bytes(&input, None, &PatchOptions::default());
        assert!(matches!(result, Err(Error::InvalidFrameHeader(_))));
    }

    #[test]
    fn test_stage_rect_layout() {
        // nbits = 15 -> 9 byte RECT + rate + count
        let mut frame = vec![15 << 3];
        frame.resize(13, 0);
        let mut input = b"FWS\x0A\x00\x00\x00\x00".to_vec();
        input.extend(&frame);
        input.extend([0x44, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let options = PatchOptions::default().with_frame_layout(FrameLayout::StageRect);
        let (output, report) = patch_bytes(&input, None, &options).unwrap();

        assert_eq!(report.inserted_at, Some(8 + 13 + 6));
        assert_eq!(&output[8..21], &frame[..]);
    }
}
