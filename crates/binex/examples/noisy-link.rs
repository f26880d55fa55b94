//! Frames a few packets, scrambles the link with noise and a bit error,
//! then reads back whatever survives.
//!
//! Run with:
//!   cargo run --example noisy-link

use std::io::Cursor;

use binex::frame::{FrameError, FrameReader, FrameWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = FrameWriter::new(Vec::new());
    let mut link = Vec::new();

    let payloads: [&[u8]; 3] = [b"temp=21.5", &[0xF5, 0xF4, 0x00], b"temp=21.7"];

    for (idx, payload) in payloads.into_iter().enumerate() {
        writer.send(payload)?;
        let mut wire = std::mem::take(writer.get_mut());
        if idx == 1 {
            // one flipped bit in the payload
            wire[4] ^= 0x08;
        }
        // line noise between frames: a bad escape and an escaped start
        link.extend_from_slice(&[0x00, 0xF4, 0x13, 0xF4, 0xF5, 0x02]);
        link.extend_from_slice(&wire);
    }

    let mut reader = FrameReader::new(Cursor::new(link));
    loop {
        match reader.read_frame() {
            Ok(frame) => println!("frame: {:02x?}", frame.payload.as_ref()),
            Err(FrameError::Corrupt(cause)) => eprintln!("dropped: {cause}"),
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(err.into()),
        }
    }
    eprintln!("corrupt frames: {}", reader.corrupt_frames());

    Ok(())
}
