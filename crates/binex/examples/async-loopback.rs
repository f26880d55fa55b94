//! Sends frames through an in-memory duplex pipe with `BinexCodec`.
//!
//! Run with:
//!   cargo run --example async-loopback --features async

use binex::frame::{BinexCodec, Frame};
use futures_util::{SinkExt, StreamExt};
use tokio_util::codec::{FramedRead, FramedWrite};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (client, server) = tokio::io::duplex(256);

    let writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(client, BinexCodec::default());
        for n in 0u8..4 {
            sink.send(Frame::new(vec![0xF5, n, 0xF4])).await?;
        }
        Ok::<_, binex::frame::FrameError>(())
    });

    let mut stream = FramedRead::new(server, BinexCodec::default());
    while let Some(frame) = stream.next().await {
        let frame = frame?;
        println!("received {:02x?}", frame.payload.as_ref());
    }

    writer.await??;
    Ok(())
}
