mod cmd;
mod exit;
mod logging;
mod output;

use binex_frame::{
    FrameConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_ESCAPE_SYMBOL, DEFAULT_START_SYMBOL,
};
use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "binex", version, about = "Byte-stuffed serial framing CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Start-of-frame symbol (decimal or 0x-prefixed hex).
    #[arg(long, value_name = "BYTE", value_parser = parse_byte, global = true,
          default_value_t = DEFAULT_START_SYMBOL, env = "BINEX_START_SYMBOL")]
    start_symbol: u8,

    /// Escape symbol (decimal or 0x-prefixed hex).
    #[arg(long, value_name = "BYTE", value_parser = parse_byte, global = true,
          default_value_t = DEFAULT_ESCAPE_SYMBOL, env = "BINEX_ESCAPE_SYMBOL")]
    escape_symbol: u8,

    /// Largest payload accepted, in bytes.
    #[arg(long, value_name = "BYTES", global = true, default_value_t = DEFAULT_BUFFER_CAPACITY,
          env = "BINEX_CAPACITY")]
    capacity: usize,

    /// Frames carry no CRC16 trailer.
    #[arg(long, global = true)]
    no_checksum: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn frame_config(&self) -> FrameConfig {
        FrameConfig::default()
            .with_symbols(self.start_symbol, self.escape_symbol)
            .with_buffer_capacity(self.capacity)
            .with_checksum(!self.no_checksum)
    }
}

fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("expected a byte value (0-255 or 0x00-0xff), got {input:?}"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let config = cli.frame_config();
    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, config, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
