//! Body decompression for `CWS` containers

use crate::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// Inflate a compressed SWF body
///
/// `CWS` bodies are zlib streams. Some tools emit raw deflate without the zlib
/// wrapper, so a body that does not start with a zlib CMF byte is fed to a raw
/// deflate decoder instead.
///
/// `expected_size` is the uncompressed body size derived from the envelope's
/// declared length. It is used only as a capacity hint.
pub(crate) fn inflate(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let has_zlib_header = data.len() >= 2
        && data[0] & 0x0F == 0x08
        && data[0] >> 4 <= 7
        && (u16::from(data[0]) << 8 | u16::from(data[1])) % 31 == 0;

    // Declared lengths are untrusted, so cap the pre-allocation
    let mut inflated = Vec::with_capacity(expected_size.min(64 * 1024 * 1024));

    let result = if has_zlib_header {
        ZlibDecoder::new(data).read_to_end(&mut inflated)
    } else {
        log::trace!(
            "Body lacks a zlib header (starts with {:02X?}), attempting raw deflate",
            &data[..2.min(data.len())]
        );
        DeflateDecoder::new(data).read_to_end(&mut inflated)
    };

    match result {
        Ok(_) => {
            if inflated.len() != expected_size {
                log::debug!(
                    "Inflated size mismatch: header declares {}, got {}",
                    expected_size,
                    inflated.len()
                );
            }
            Ok(inflated)
        }
        Err(e) => {
            log::debug!("Inflate failed: {e}");
            log::trace!(
                "First 16 bytes of body: {:02X?}",
                &data[..16.min(data.len())]
            );
            Err(Error::decompression(format!("zlib: {e}")))
        }
    }
}
