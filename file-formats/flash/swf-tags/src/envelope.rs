//! SWF envelope (outer header) decoding and encoding
//!
//! Every SWF file starts with an 8-byte header:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 3    | Signature (`FWS`, `CWS` or `ZWS`)       |
//! | 3      | 1    | Version                                 |
//! | 4      | 4    | Total uncompressed length, little-endian |
//!
//! For `CWS` files everything after the header is a zlib stream.

use crate::compression;
use crate::writer::ContainerWriter;
use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use std::io::{Seek, Write};

/// Size of the envelope header in bytes
pub const HEADER_SIZE: usize = 8;

/// Envelope signature, selecting the body transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `FWS` - body stored as-is
    Uncompressed,
    /// `CWS` - body is zlib compressed
    Compressed,
    /// `ZWS` - body is LZMA compressed (not supported)
    Lzma,
}

impl Signature {
    /// Match the three signature bytes against the known envelopes
    pub fn from_bytes(bytes: &[u8; 3]) -> Option<Self> {
        match bytes {
            b"FWS" => Some(Signature::Uncompressed),
            b"CWS" => Some(Signature::Compressed),
            b"ZWS" => Some(Signature::Lzma),
            _ => None,
        }
    }

    /// The on-disk signature bytes
    pub fn as_bytes(&self) -> &'static [u8; 3] {
        match self {
            Signature::Uncompressed => b"FWS",
            Signature::Compressed => b"CWS",
            Signature::Lzma => b"ZWS",
        }
    }

    /// Human readable description of the body transform
    pub fn description(&self) -> &'static str {
        match self {
            Signature::Uncompressed => "uncompressed",
            Signature::Compressed => "zlib compressed",
            Signature::Lzma => "LZMA compressed",
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

/// The fixed 8-byte header at the start of every SWF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Envelope signature
    pub signature: Signature,
    /// SWF version byte
    pub version: u8,
    /// Total length as declared by the file (header included)
    pub declared_length: u32,
}

impl Header {
    /// Parse the envelope header from the start of `input`
    pub fn parse(input: &[u8]) -> Result<Self> {
        if input.len() < HEADER_SIZE {
            return Err(Error::truncated(0, HEADER_SIZE as u64, input.len()));
        }

        let found = [input[0], input[1], input[2]];
        let signature = Signature::from_bytes(&found).ok_or(Error::MalformedContainer { found })?;

        Ok(Self {
            signature,
            version: input[3],
            declared_length: LittleEndian::read_u32(&input[4..HEADER_SIZE]),
        })
    }
}

/// A decoded SWF container with its body held uncompressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Signature of the envelope the container was read from
    pub signature: Signature,
    /// SWF version byte
    pub version: u8,
    /// Length declared by the source file; informational only
    pub declared_length: u32,
    /// Uncompressed body: frame header followed by the tag stream
    pub body: Vec<u8>,
}

/// Decode an SWF file, inflating the body if needed
///
/// `ZWS` input yields [`Error::UnsupportedEnvelope`]; any other unknown
/// signature yields [`Error::MalformedContainer`].
pub fn decode(input: &[u8]) -> Result<Container> {
    let header = Header::parse(input)?;
    let payload = &input[HEADER_SIZE..];

    let body = match header.signature {
        Signature::Uncompressed => {
            log::debug!("No compression detected (FWS)");
            if header.declared_length as usize != input.len() {
                log::warn!(
                    "Declared length {} does not match file size {}",
                    header.declared_length,
                    input.len()
                );
            }
            payload.to_vec()
        }
        Signature::Compressed => {
            log::debug!(
                "Detected zlib compression (CWS), inflating {} bytes",
                payload.len()
            );
            let expected = (header.declared_length as usize).saturating_sub(HEADER_SIZE);
            compression::inflate(payload, expected)?
        }
        Signature::Lzma => return Err(Error::UnsupportedEnvelope),
    };

    Ok(Container {
        signature: header.signature,
        version: header.version,
        declared_length: header.declared_length,
        body,
    })
}

/// Encode a container as an uncompressed `FWS` file
///
/// The body is always written uncompressed, so the signature is always `FWS`
/// regardless of the envelope the container was read from. Returns the total
/// number of bytes written, which is also the value stored in the length field.
pub fn encode<W: Write + Seek>(container: &Container, output: &mut W) -> Result<u32> {
    let mut writer = ContainerWriter::begin(output, container.version)?;
    writer.write_all(&container.body)?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Cursor;

    fn fws(version: u8, body: &[u8]) -> Vec<u8> {
        let mut data = b"FWS".to_vec();
        data.push(version);
        data.extend(&((HEADER_SIZE + body.len()) as u32).to_le_bytes());
        data.extend(body);
        data
    }

    #[test]
    fn test_parse_header() {
        let data = fws(10, &[1, 2, 3]);
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.signature, Signature::Uncompressed);
        assert_eq!(header.version, 10);
        assert_eq!(header.declared_length, 11);
    }

    #[test]
    fn test_short_header() {
        let result = Header::parse(b"FWS\x0A");
        assert!(matches!(
            result,
            Err(Error::TruncatedStream {
                needed: 8,
                available: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_signature() {
        let result = decode(b"GIF89a\x00\x00\x00\x00");
        assert!(matches!(
            result,
            Err(Error::MalformedContainer { found }) if &found == b"GIF"
        ));
    }

    #[test]
    fn test_lzma_rejected() {
        let result = decode(b"ZWS\x0D\x20\x00\x00\x00\x01\x02\x03");
        assert!(matches!(result, Err(Error::UnsupportedEnvelope)));
    }

    #[test]
    fn test_decode_uncompressed() {
        let data = fws(9, b"body bytes");
        let container = decode(&data).unwrap();
        assert_eq!(container.signature, Signature::Uncompressed);
        assert_eq!(container.version, 9);
        assert_eq!(container.body, b"body bytes");
    }

    #[test]
    fn test_decode_compressed() {
        let body = b"compressed body bytes".repeat(8);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body).unwrap();

        let mut data = b"CWS".to_vec();
        data.push(11);
        data.extend(&((HEADER_SIZE + body.len()) as u32).to_le_bytes());
        data.extend(encoder.finish().unwrap());

        let container = decode(&data).unwrap();
        assert_eq!(container.signature, Signature::Compressed);
        assert_eq!(container.body, body);
    }

    #[test]
    fn test_encode_patches_length() {
        let container = Container {
            signature: Signature::Compressed,
            version: 11,
            declared_length: 0,
            body: vec![0xAA; 17],
        };

        let mut output = Cursor::new(Vec::new());
        let written = encode(&container, &mut output).unwrap();
        let bytes = output.into_inner();

        assert_eq!(written as usize, bytes.len());
        assert_eq!(&bytes[..3], b"FWS");
        assert_eq!(bytes[3], 11);
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]) as usize, bytes.len());
        assert_eq!(&bytes[8..], &container.body[..]);
    }
}
