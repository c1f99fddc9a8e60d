use clap::Parser;
use std::path::PathBuf;

/// Keyframe sequencer demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sequence document to open (JSON). Created on save if missing.
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Sequencer style file (JSON)
    #[arg(short = 's', long = "style", value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// End frame for a new document
    #[arg(long = "end", value_name = "N")]
    pub end_frame: Option<u32>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}
