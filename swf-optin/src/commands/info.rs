//! SWF inspection command implementation

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::PathBuf;
use swf_tags::{FrameLayout, Readiness, inspect};

use crate::utils::{format_bytes, record_table};

/// Print the envelope fields and tag listing of an SWF file
pub fn execute(file: PathBuf, frame_layout: FrameLayout) -> Result<()> {
    let data =
        fs::read(&file).with_context(|| format!("Failed to read SWF file: {}", file.display()))?;
    let summary = inspect(&data, frame_layout)
        .with_context(|| format!("Failed to inspect SWF file: {}", file.display()))?;

    println!("SWF File Information");
    println!("====================");
    println!();
    println!("File: {}", file.display());
    println!(
        "Signature: {} ({})",
        summary.signature,
        summary.signature.description()
    );
    println!("Version: {}", summary.version);
    println!(
        "Declared length: {} ({} bytes)",
        format_bytes(u64::from(summary.declared_length)),
        summary.declared_length
    );
    if u64::from(summary.declared_length) != summary.actual_length {
        println!(
            "Actual length: {} ({} bytes)",
            format_bytes(summary.actual_length),
            summary.actual_length
        );
    }
    println!(
        "Frame header: {} bytes ({})",
        summary.frame_header_size, frame_layout
    );
    println!("Records: {}", summary.records.len());
    if summary.trailing_bytes > 0 {
        println!("Bytes after End: {}", summary.trailing_bytes);
    }

    println!();
    record_table(&summary.records).printstd();
    println!();

    match summary.readiness {
        Readiness::Ready => println!("{} Ready for opt-in", style("✓").green().bold()),
        Readiness::AlreadyPatched { protected: true } => println!(
            "{} Already opted in (password protected)",
            style("•").cyan()
        ),
        Readiness::AlreadyPatched { protected: false } => {
            println!("{} Already opted in (no password)", style("•").cyan())
        }
        Readiness::Signed => println!(
            "{} Signed SWF files are not supported",
            style("✗").red().bold()
        ),
        Readiness::NoAnchor => println!(
            "{} No FileAttributes tag, nothing to insert after",
            style("!").yellow().bold()
        ),
    }

    Ok(())
}
