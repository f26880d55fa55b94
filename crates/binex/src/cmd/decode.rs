use std::fs::File;
use std::io::{self, Read};

use binex_frame::{Frame, FrameConfig, FrameError, FrameReader};
use tracing::{info, warn};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, config: FrameConfig, format: OutputFormat) -> CliResult<i32> {
    let input: Box<dyn Read> = match &args.path {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let mut reader = FrameReader::with_config(input, config.clone())
        .map_err(|err| frame_error("invalid framing options", err))?;

    let printed = decode_stream(&mut reader, &args, |frame, index| {
        print_frame(frame, index, &config, format)
    })?;

    info!(
        frames = printed,
        corrupt = reader.corrupt_frames(),
        "decode finished"
    );
    Ok(SUCCESS)
}

fn decode_stream<R, F>(
    reader: &mut FrameReader<R>,
    args: &DecodeArgs,
    mut emit: F,
) -> CliResult<usize>
where
    R: Read,
    F: FnMut(&Frame, usize),
{
    let mut printed = 0usize;
    while args.count.map_or(true, |count| printed < count) {
        match reader.read_frame() {
            Ok(frame) => {
                emit(&frame, printed);
                printed = printed.saturating_add(1);
            }
            Err(FrameError::Corrupt(cause)) if !args.strict => {
                warn!(%cause, "skipping corrupt frame");
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }
    Ok(printed)
}
