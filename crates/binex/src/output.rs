use std::io::{IsTerminal, Write};

use binex_frame::{Frame, FrameConfig};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

const HEX_PREVIEW_BYTES: usize = 32;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    index: usize,
    payload_size: usize,
    wire_size: Option<usize>,
    payload: String,
    payload_hex: String,
}

impl FrameOutput {
    fn new(frame: &Frame, index: usize, config: &FrameConfig) -> Self {
        Self {
            index,
            payload_size: frame.payload.len(),
            wire_size: frame.wire_size(config),
            payload: payload_preview(frame.payload.as_ref()),
            payload_hex: hex(frame.payload.as_ref()),
        }
    }
}

pub fn print_frame(frame: &Frame, index: usize, config: &FrameConfig, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput::new(frame, index, config);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let out = FrameOutput::new(frame, index, config);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "SIZE", "WIRE", "PAYLOAD", "HEX"])
                .add_row(vec![
                    out.index.to_string(),
                    out.payload_size.to_string(),
                    size_or_dash(out.wire_size),
                    out.payload,
                    truncate_hex(&out.payload_hex),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} size={} wire={} payload={}",
                index,
                frame.payload.len(),
                size_or_dash(frame.wire_size(config)),
                payload_preview(frame.payload.as_ref())
            );
        }
        OutputFormat::Raw => {
            print_raw(frame.payload.as_ref());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn size_or_dash(size: Option<usize>) -> String {
    size.map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

fn hex(payload: &[u8]) -> String {
    payload
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_hex(hex: &str) -> String {
    // three characters per byte, minus the final separator
    let limit = HEX_PREVIEW_BYTES * 3 - 1;
    if hex.len() <= limit {
        hex.to_string()
    } else {
        format!("{}…", &hex[..limit])
    }
}
