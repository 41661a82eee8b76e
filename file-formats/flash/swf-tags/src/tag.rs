//! Tag codes and the packed record header
//!
//! Each record in the tag stream starts with a 16-bit little-endian field.
//! The upper 10 bits hold the tag code and the lower 6 bits the payload
//! length. A length of `0x3F` is an escape: the real length follows as a
//! 32-bit little-endian value.
//!
//! ```text
//! short form:  [code:10 | len:6]                  len < 0x3F
//! long form:   [code:10 | 0x3F ] [len:u32]
//! ```

use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use std::io::Write;

/// Short length value that signals a following 32-bit length
pub const LONG_LENGTH_ESCAPE: u16 = 0x3F;

/// Largest tag code that fits in the 10-bit code field
pub const MAX_TAG_CODE: u16 = 0x3FF;

/// Size of a short-form record header
pub const SHORT_HEADER_SIZE: usize = 2;

/// Size of a long-form record header
pub const LONG_HEADER_SIZE: usize = 6;

/// Record types the patcher cares about
///
/// Everything else is carried through untouched as [`TagCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCode {
    /// Terminates the tag stream (0)
    End,
    /// Displays the current frame (1)
    ShowFrame,
    /// Marks the file as protected from import into authoring tools (24)
    Protect,
    /// Capability flags of the file; must be the first tag (69)
    FileAttributes,
    /// XMP metadata, kept adjacent to FileAttributes (77)
    Metadata,
    /// Digital signature over the tag stream (92)
    SignedSwf,
    /// Opts the file in to advanced telemetry (93)
    EnableTelemetry,
    /// Any other tag code
    Other(u16),
}

impl TagCode {
    /// Map a raw 10-bit code to a tag type
    pub fn from_raw(code: u16) -> Self {
        match code {
            0 => TagCode::End,
            1 => TagCode::ShowFrame,
            24 => TagCode::Protect,
            69 => TagCode::FileAttributes,
            77 => TagCode::Metadata,
            92 => TagCode::SignedSwf,
            93 => TagCode::EnableTelemetry,
            other => TagCode::Other(other),
        }
    }

    /// The raw tag code
    pub fn raw(&self) -> u16 {
        match self {
            TagCode::End => 0,
            TagCode::ShowFrame => 1,
            TagCode::Protect => 24,
            TagCode::FileAttributes => 69,
            TagCode::Metadata => 77,
            TagCode::SignedSwf => 92,
            TagCode::EnableTelemetry => 93,
            TagCode::Other(code) => *code,
        }
    }

    /// Display name of the tag
    pub fn name(&self) -> &'static str {
        match self {
            TagCode::End => "End",
            TagCode::ShowFrame => "ShowFrame",
            TagCode::Protect => "Protect",
            TagCode::FileAttributes => "FileAttributes",
            TagCode::Metadata => "Metadata",
            TagCode::SignedSwf => "SignedSwf",
            TagCode::EnableTelemetry => "EnableTelemetry",
            TagCode::Other(_) => "Unknown",
        }
    }
}

impl From<u16> for TagCode {
    fn from(code: u16) -> Self {
        Self::from_raw(code)
    }
}

impl fmt::Display for TagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCode::Other(code) => write!(f, "Tag({code})"),
            known => write!(f, "{}({})", known.name(), known.raw()),
        }
    }
}

/// Encoding used for a record's length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthForm {
    /// Length packed in the low 6 bits of the header
    Short,
    /// Escape value followed by a 32-bit length
    Long,
}

/// A decoded record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Record type
    pub code: TagCode,
    /// Payload length in bytes
    pub length: u32,
    /// How the length is encoded
    pub form: LengthForm,
}

impl RecordHeader {
    /// Header using the shortest encoding for `length`
    pub fn new(code: TagCode, length: u32) -> Self {
        let form = if length < u32::from(LONG_LENGTH_ESCAPE) {
            LengthForm::Short
        } else {
            LengthForm::Long
        };
        Self { code, length, form }
    }

    /// Header with an explicit encoding
    ///
    /// Lengths of `0x3F` and above cannot be packed, so they always use the
    /// long form regardless of `form`.
    pub fn with_form(code: TagCode, length: u32, form: LengthForm) -> Self {
        let mut header = Self::new(code, length);
        if form == LengthForm::Long {
            header.form = LengthForm::Long;
        }
        header
    }

    /// Encoding actually written for this header
    ///
    /// A length that does not fit in 6 bits is always written in the long
    /// form, whatever `form` says.
    pub fn encoding(&self) -> LengthForm {
        if self.length >= u32::from(LONG_LENGTH_ESCAPE) {
            LengthForm::Long
        } else {
            self.form
        }
    }

    /// Number of header bytes this record uses
    pub fn encoded_size(&self) -> usize {
        match self.encoding() {
            LengthForm::Short => SHORT_HEADER_SIZE,
            LengthForm::Long => LONG_HEADER_SIZE,
        }
    }

    /// Header plus payload size
    pub fn record_size(&self) -> u64 {
        self.encoded_size() as u64 + u64::from(self.length)
    }

    /// Parse a header starting at `offset` in `data`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let available = data.len().saturating_sub(offset);
        if available < SHORT_HEADER_SIZE {
            return Err(Error::truncated(
                offset,
                SHORT_HEADER_SIZE as u64,
                available,
            ));
        }

        let field = LittleEndian::read_u16(&data[offset..]);
        let code = TagCode::from_raw(field >> 6);
        let short_length = field & LONG_LENGTH_ESCAPE;

        if short_length != LONG_LENGTH_ESCAPE {
            return Ok(Self {
                code,
                length: u32::from(short_length),
                form: LengthForm::Short,
            });
        }

        if available < LONG_HEADER_SIZE {
            return Err(Error::truncated(offset, LONG_HEADER_SIZE as u64, available));
        }

        Ok(Self {
            code,
            length: LittleEndian::read_u32(&data[offset + SHORT_HEADER_SIZE..]),
            form: LengthForm::Long,
        })
    }

    /// Serialize the header
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Serialize the header into a new buffer
    ///
    /// Codes above [`MAX_TAG_CODE`] lose their upper bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let code = (self.code.raw() & MAX_TAG_CODE) << 6;
        let mut bytes = vec![0u8; self.encoded_size()];
        match self.encoding() {
            LengthForm::Short => {
                LittleEndian::write_u16(&mut bytes, code | self.length as u16);
            }
            LengthForm::Long => {
                LittleEndian::write_u16(&mut bytes, code | LONG_LENGTH_ESCAPE);
                LittleEndian::write_u32(&mut bytes[SHORT_HEADER_SIZE..], self.length);
            }
        }
        bytes
    }
}

/// A record borrowed from a tag stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Decoded header
    pub header: RecordHeader,
    /// Offset of the header within the scanned buffer
    pub offset: usize,
    /// Payload bytes
    pub payload: &'a [u8],
    /// The exact bytes consumed for this record, header included
    pub raw: &'a [u8],
}

impl Record<'_> {
    /// Record type
    pub fn code(&self) -> TagCode {
        self.header.code
    }

    /// Re-serialize the record from its decoded parts
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header.to_bytes();
        bytes.extend_from_slice(self.payload);
        bytes
    }
}
