//! Frame header between the envelope and the tag stream
//!
//! The body of an SWF starts with the stage size (a bit-packed RECT), the
//! frame rate and the frame count. The patcher never interprets these
//! fields; it only needs to know how many bytes to copy before the first tag.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of bytes copied verbatim by [`FrameLayout::Fixed`] by default
pub const DEFAULT_FRAME_HEADER_SIZE: usize = 5;

/// Bytes following the stage RECT: frame rate (u16) and frame count (u16)
const FRAME_RATE_AND_COUNT_SIZE: usize = 4;

/// How the size of the frame header is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// A fixed number of bytes
    Fixed(usize),
    /// Sized from the stage RECT bit width, plus frame rate and frame count
    StageRect,
}

impl Default for FrameLayout {
    fn default() -> Self {
        FrameLayout::Fixed(DEFAULT_FRAME_HEADER_SIZE)
    }
}

impl FrameLayout {
    /// Size in bytes of the frame header at the start of `body`
    pub fn header_size(&self, body: &[u8]) -> Result<usize> {
        let size = match *self {
            FrameLayout::Fixed(size) => size,
            FrameLayout::StageRect => {
                let first = *body
                    .first()
                    .ok_or_else(|| Error::invalid_frame_header("body is empty"))?;
                // 5-bit field width followed by four signed fields of that width
                let bits = 5 + 4 * usize::from(first >> 3);
                bits.div_ceil(8) + FRAME_RATE_AND_COUNT_SIZE
            }
        };

        if size > body.len() {
            return Err(Error::invalid_frame_header(format!(
                "needs {size} bytes, body has {}",
                body.len()
            )));
        }

        Ok(size)
    }

    /// Split `body` into the frame header and the tag stream
    pub fn split<'a>(&self, body: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
        let size = self.header_size(body)?;
        Ok(body.split_at(size))
    }
}

impl fmt::Display for FrameLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameLayout::Fixed(size) => write!(f, "fixed:{size}"),
            FrameLayout::StageRect => f.write_str("stage-rect"),
        }
    }
}

impl FromStr for FrameLayout {
    type Err = Error;

    /// Accepts `fixed`, `fixed:<bytes>` or `stage-rect`
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(FrameLayout::default()),
            "stage-rect" | "rect" => Ok(FrameLayout::StageRect),
            other => other
                .strip_prefix("fixed:")
                .and_then(|n| n.parse().ok())
                .map(FrameLayout::Fixed)
                .ok_or_else(|| Error::invalid_frame_header(format!("unknown layout: {s}"))),
        }
    }
}
