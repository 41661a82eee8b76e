//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a byte offset as hexadecimal
pub fn format_offset(offset: u64) -> String {
    format!("0x{offset:08X}")
}
