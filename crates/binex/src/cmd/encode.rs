use std::fs::{self, File};
use std::io::{self, Read, Write};

use binex_frame::{FrameConfig, FrameWriter};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};

pub fn run(args: EncodeArgs, config: FrameConfig) -> CliResult<i32> {
    let payloads = resolve_payloads(&args)?;

    let output: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = FrameWriter::with_config(output, config)
        .map_err(|err| frame_error("invalid framing options", err))?;

    for payload in &payloads {
        writer
            .send(payload)
            .map_err(|err| frame_error("encode failed", err))?;
        debug!(len = payload.len(), "frame written");
    }

    Ok(SUCCESS)
}

fn resolve_payloads(args: &EncodeArgs) -> CliResult<Vec<Vec<u8>>> {
    if !args.data.is_empty() {
        return Ok(args.data.iter().map(|d| d.as_bytes().to_vec()).collect());
    }
    if let Some(path) = &args.file {
        let payload = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return Ok(vec![payload]);
    }

    let mut payload = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(vec![payload])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_data_value_is_one_payload() {
        let args = EncodeArgs {
            data: vec!["a".into(), "bc".into()],
            file: None,
            out: None,
        };
        assert_eq!(
            resolve_payloads(&args).unwrap(),
            vec![b"a".to_vec(), b"bc".to_vec()]
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let args = EncodeArgs {
            data: Vec::new(),
            file: Some("/nonexistent/binex/payload.bin".into()),
            out: None,
        };
        let err = resolve_payloads(&args).unwrap_err();
        assert!(err.message.contains("failed reading"));
    }
}
