use clap::{Args, Subcommand};
use std::path::PathBuf;

use binex_frame::FrameConfig;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame payloads and write the wire bytes.
    Encode(EncodeArgs),
    /// Read a framed stream and print each frame.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, config: FrameConfig, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, config),
        Command::Decode(args) => decode::run(args, config, format),
        Command::Version(args) => version::run(args, &config),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload. Repeat to emit one frame per value.
    #[arg(long, conflicts_with = "file")]
    pub data: Vec<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Write wire bytes here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Framed input to read. Default: stdin.
    pub path: Option<PathBuf>,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Fail on the first corrupt frame instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
