//! Root CLI structure for swf-optin

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use swf_tags::FrameLayout;

#[derive(Parser)]
#[command(name = "swf-optin")]
#[command(about = "Opt SWF files in to advanced telemetry", long_about = None)]
#[command(
    after_help = "If PASSWORD is provided, then a password will be required to view advanced telemetry."
)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Patch arguments, used when no subcommand is given
    #[command(flatten)]
    pub patch: PatchArgs,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Path to the SWF file
    pub file: Option<PathBuf>,

    /// Password required to view advanced telemetry
    pub password: Option<String>,

    /// Write the patched file here instead of overwriting FILE
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Frame header layout: "fixed", "fixed:<bytes>" or "stage-rect"
    #[arg(long, value_name = "LAYOUT", default_value = "fixed")]
    pub frame_layout: FrameLayout,

    /// Write the file unchanged when it has no FileAttributes tag
    #[arg(long)]
    pub allow_missing_anchor: bool,

    /// Run the full patch but do not write anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the envelope and tag stream of an SWF file
    Info {
        /// Path to the SWF file
        file: PathBuf,

        /// Frame header layout: "fixed", "fixed:<bytes>" or "stage-rect"
        #[arg(long, value_name = "LAYOUT", default_value = "fixed")]
        frame_layout: FrameLayout,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
