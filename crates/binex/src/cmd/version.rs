use binex_frame::FrameConfig;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs, config: &FrameConfig) -> CliResult<i32> {
    if !args.extended {
        println!("binex {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: binex");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("BINEX_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!(
        "framing: start=0x{:02x} escape=0x{:02x} capacity={} checksum={}",
        config.start_symbol,
        config.escape_symbol,
        config.buffer_capacity,
        if config.checksum { "crc16-ibm-3740" } else { "off" }
    );

    Ok(SUCCESS)
}
