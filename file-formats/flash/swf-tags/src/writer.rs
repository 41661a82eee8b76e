//! Container writer with a deferred length patch
//!
//! The SWF length field sits in the header but covers the whole file, and the
//! size of the patched file is only known once the tag stream has been
//! emitted. The writer reserves the field with a zero placeholder, remembers
//! its offset, and overwrites it after the last byte is written.

use crate::envelope::Signature;
use crate::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Seek, SeekFrom, Write};

/// A reserved 32-bit little-endian field that is filled in later
#[derive(Debug)]
#[must_use = "a reserved length field must be applied"]
pub struct LengthPatch {
    offset: u64,
}

impl LengthPatch {
    /// Write a zero placeholder at the current position
    pub fn reserve<W: Write + Seek>(writer: &mut W) -> Result<Self> {
        let offset = writer.stream_position()?;
        writer.write_u32::<LittleEndian>(0)?;
        Ok(Self { offset })
    }

    /// Offset of the placeholder in the output
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Overwrite the placeholder with `value`, then return to the end position
    pub fn apply<W: Write + Seek>(self, writer: &mut W, value: u32) -> Result<()> {
        let end = writer.stream_position()?;
        writer.seek(SeekFrom::Start(self.offset))?;
        writer.write_u32::<LittleEndian>(value)?;
        writer.seek(SeekFrom::Start(end))?;
        Ok(())
    }
}

/// Streams an uncompressed SWF container into a seekable sink
pub struct ContainerWriter<'a, W: Write + Seek> {
    inner: &'a mut W,
    start: u64,
    length: LengthPatch,
}

impl<'a, W: Write + Seek> ContainerWriter<'a, W> {
    /// Write the `FWS` signature, `version` and a length placeholder
    pub fn begin(inner: &'a mut W, version: u8) -> Result<Self> {
        let start = inner.stream_position()?;
        inner.write_all(Signature::Uncompressed.as_bytes())?;
        inner.write_u8(version)?;
        let length = LengthPatch::reserve(&mut *inner)?;

        Ok(Self {
            inner,
            start,
            length,
        })
    }

    /// Append raw bytes to the container
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Bytes written so far, header included
    pub fn written(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()? - self.start)
    }

    /// Patch the length field with the total byte count and flush
    pub fn finish(mut self) -> Result<u32> {
        let total = self.written()?;
        let total = u32::try_from(total).map_err(|_| Error::LengthOverflow(total))?;

        self.length.apply(&mut *self.inner, total)?;
        self.inner.flush()?;

        log::debug!("Wrote {total} byte container");
        Ok(total)
    }
}

impl<W: Write + Seek> Write for ContainerWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
