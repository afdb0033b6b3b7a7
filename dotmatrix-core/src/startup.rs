use crate::apu::ApuState;
use crate::audio::AudioSampleQueue;
use crate::config::RunConfig;
use crate::cpu::CpuRegisters;
use crate::memory::{AddressSpace, Cartridge, CartridgeLoadError};
use crate::ppu::PpuState;
use crate::serial::SerialPort;
use crate::timer::TimerState;
use std::io::Write;
use std::{fs, io};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("error reading ROM file at {file_path}: {source}")]
    FileRead {
        file_path: String,
        #[source]
        source: io::Error,
    },
    #[error("error loading cartridge: {source}")]
    Cartridge {
        #[from]
        source: CartridgeLoadError,
    },
}

pub(crate) struct EmulationState {
    pub(crate) address_space: AddressSpace,
    pub(crate) cpu_registers: CpuRegisters,
}

/// Construct all device state from the given configuration. Configuration errors
/// (missing/unreadable ROM, bad header) are fatal here; the emulator is never constructed
/// in a half-initialized state.
pub(crate) fn init_emulation_state(
    config: &RunConfig,
    serial_sink: Option<Box<dyn Write + Send>>,
    sample_queue: AudioSampleQueue,
) -> Result<EmulationState, StartupError> {
    let cartridge = match &config.rom_path {
        Some(rom_path) => {
            log::info!("Loading cartridge from '{}'", rom_path.display());
            let rom = fs::read(rom_path).map_err(|err| StartupError::FileRead {
                file_path: rom_path.display().to_string(),
                source: err,
            })?;
            Cartridge::new(rom)?
        }
        None => {
            log::info!("No ROM file given, using a zero-filled 32KB image");
            Cartridge::none()
        }
    };

    let address_space = AddressSpace::new(
        cartridge,
        SerialPort::new(serial_sink),
        TimerState::new(config.debug_timer),
        PpuState::new(config.debug_lcd),
        ApuState::new(sample_queue),
    );
    let cpu_registers = CpuRegisters::new();

    Ok(EmulationState {
        address_space,
        cpu_registers,
    })
}
