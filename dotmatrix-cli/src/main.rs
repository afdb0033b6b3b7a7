use clap::Parser;
use dotmatrix_core::{Emulator, RunConfig};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

/// Headless Game Boy emulator runner.
#[derive(Parser)]
struct Cli {
    /// Path to the ROM image; a zero-filled 32KB image is used when omitted
    rom_path: Option<PathBuf>,
    /// Run uncapped instead of pacing frames to ~59.73 Hz
    #[arg(long = "fast", default_value_t = false)]
    fast: bool,
    /// Trace every executed instruction
    #[arg(long = "debug-cpu", default_value_t = false)]
    debug_cpu: bool,
    /// Trace timer overflow/reload events
    #[arg(long = "debug-timer", default_value_t = false)]
    debug_timer: bool,
    /// Tint window and sprite pixels in the frame buffer
    #[arg(long = "debug-lcd", default_value_t = false)]
    debug_lcd: bool,
    /// Forward serial port output to stdout
    #[arg(long = "serial-stdout", default_value_t = false)]
    serial_stdout: bool,
    /// Exit after running this many frames instead of running until interrupted
    #[arg(short = 'n', long = "frames")]
    frames: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Cli::parse();

    let run_config = RunConfig {
        rom_path: args.rom_path,
        fast: args.fast,
        debug_cpu: args.debug_cpu,
        debug_timer: args.debug_timer,
        debug_lcd: args.debug_lcd,
    };

    let serial_sink: Option<Box<dyn Write + Send>> = if args.serial_stdout {
        Some(Box::new(io::stdout()))
    } else {
        None
    };

    let mut emulator = Emulator::new(run_config, serial_sink)?;

    match args.frames {
        Some(frames) => {
            emulator.run_frames(frames)?;
            log::info!("Finished running {frames} frames");
        }
        None => {
            emulator.run()?;
        }
    }

    Ok(())
}
