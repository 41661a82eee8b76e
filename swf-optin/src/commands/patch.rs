//! Telemetry opt-in command implementation

use anyhow::{Context, Result};
use clap::CommandFactory;
use console::style;
use std::fs;
use std::path::Path;
use swf_tags::{MissingAnchor, PatchOptions, PatchReport, Signature, patch_bytes, patch_file};

use crate::cli::{Cli, PatchArgs};
use crate::utils::{format_bytes, format_offset};

/// Execute the default command: add the EnableTelemetry tag to a file
pub fn execute(args: PatchArgs, quiet: bool) -> Result<()> {
    let Some(file) = args.file else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if !file.is_file() {
        println!("File not found: {}", file.display());
        return Ok(());
    }

    let missing_anchor = if args.allow_missing_anchor {
        MissingAnchor::PassThrough
    } else {
        MissingAnchor::Reject
    };
    let options = PatchOptions::default()
        .with_frame_layout(args.frame_layout)
        .with_missing_anchor(missing_anchor);
    let password = args.password.as_deref().filter(|p| !p.is_empty());
    let output = args.output.as_deref().unwrap_or(&file);

    let result = if args.dry_run {
        dry_run(&file, password, &options)
    } else {
        patch_file(&file, output, password, &options)
    };

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_clean_abort() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to patch SWF file: {}", file.display()));
        }
    };

    if !quiet {
        print_report(&report, output, args.dry_run);
    }

    Ok(())
}

fn dry_run(
    file: &Path,
    password: Option<&str>,
    options: &PatchOptions,
) -> swf_tags::Result<PatchReport> {
    let data = fs::read(file)?;
    let (_, report) = patch_bytes(&data, password, options)?;
    Ok(report)
}

fn print_report(report: &PatchReport, output: &Path, dry_run: bool) {
    if !report.inserted() {
        let outcome = if dry_run {
            "nothing written"
        } else {
            "file written without the opt-in flag"
        };
        println!(
            "{} No FileAttributes tag found, {outcome}.",
            style("!").yellow().bold()
        );
        return;
    }

    if report.protected {
        println!(
            "{} Added opt-in flag with password protection.",
            style("✓").green().bold()
        );
    } else {
        println!(
            "{} Added opt-in flag with no password.",
            style("✓").green().bold()
        );
    }

    if let Some(offset) = report.inserted_at {
        log::info!("EnableTelemetry written at {}", format_offset(offset));
    }

    if report.source == Signature::Compressed {
        println!("  Note: the file was compressed and has been written uncompressed.");
    }
    if report.dropped_trailing > 0 {
        println!(
            "  Note: {} after the End tag were not carried over.",
            format_bytes(report.dropped_trailing as u64)
        );
    }

    if dry_run {
        println!("  Dry run: {} not written.", output.display());
    } else {
        println!(
            "  Wrote {} to {}",
            format_bytes(u64::from(report.output_length)),
            output.display()
        );
    }
}
