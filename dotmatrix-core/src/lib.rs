//! Game Boy (DMG) emulator core: a cycle-accurate SM83 CPU, memory/MMIO fabric with
//! cartridge mapping, LCD pixel pipeline, divider/timer unit, input matrix, and audio
//! unit, driven in lockstep by a master machine-cycle clock.
//!
//! The host owns the display, audio output, and input devices; it talks to the core
//! through an [`EmulatorHandle`]: button events in via a bounded lossy queue, frames out
//! via a published frame buffer, and audio samples out via a bounded lossy sample queue.

mod apu;
mod audio;
mod config;
mod cpu;
mod eventloop;
mod input;
mod memory;
mod ppu;
mod serial;
mod startup;
mod timer;

use crate::eventloop::SharedControls;
use crate::startup::EmulationState;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};

pub use apu::OUTPUT_FREQUENCY;
pub use audio::AudioSampleQueue;
pub use config::RunConfig;
pub use cpu::ParseError;
pub use eventloop::RunError;
pub use input::{Button, ButtonEvent};
pub use memory::CartridgeLoadError;
pub use ppu::{frame_to_rgba, pixel_rgba, FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use startup::StartupError;

const BUTTON_QUEUE_CAPACITY: usize = 64;

pub struct Emulator {
    emulation_state: EmulationState,
    config: RunConfig,
    shared: SharedControls,
    button_events: Receiver<ButtonEvent>,
    button_sender: SyncSender<ButtonEvent>,
    sample_queue: AudioSampleQueue,
}

impl Emulator {
    /// Construct the emulator from the given configuration.
    ///
    /// Bytes written to the serial port by the emulated program are forwarded to
    /// `serial_sink` if one is given.
    pub fn new(
        config: RunConfig,
        serial_sink: Option<Box<dyn Write + Send>>,
    ) -> Result<Self, StartupError> {
        let sample_queue = AudioSampleQueue::new();
        let emulation_state =
            startup::init_emulation_state(&config, serial_sink, sample_queue.clone())?;
        let shared = SharedControls::new(&config);
        let (button_sender, button_events) = mpsc::sync_channel(BUTTON_QUEUE_CAPACITY);

        Ok(Self {
            emulation_state,
            config,
            shared,
            button_events,
            button_sender,
            sample_queue,
        })
    }

    /// A cloneable host-side handle for input, output, and speed/shutdown controls.
    pub fn handle(&self) -> EmulatorHandle {
        EmulatorHandle {
            button_sender: self.button_sender.clone(),
            frame: self.shared.frame.clone(),
            frame_duration_nanos: self.shared.frame_duration_nanos.clone(),
            quit_signal: self.shared.quit_signal.clone(),
            sample_queue: self.sample_queue.clone(),
        }
    }

    /// Run the frame loop until [`EmulatorHandle::shutdown`] is called. Blocks the
    /// calling thread; hosts typically run this on a dedicated thread.
    pub fn run(mut self) -> Result<(), RunError> {
        eventloop::run(
            &mut self.emulation_state,
            &self.config,
            &self.shared,
            &self.button_events,
        )
    }

    /// Run a fixed number of frames with no pacing. Used for headless runs.
    pub fn run_frames(&mut self, frames: u64) -> Result<(), RunError> {
        eventloop::run_frames(
            &mut self.emulation_state,
            &self.config,
            &self.shared,
            &self.button_events,
            frames,
        )
    }

    /// Copy of the most recently completed frame.
    pub fn latest_frame(&self) -> FrameBuffer {
        *self.shared.frame.lock().unwrap()
    }
}

/// Host-side handle to a running emulator.
#[derive(Clone)]
pub struct EmulatorHandle {
    button_sender: SyncSender<ButtonEvent>,
    frame: Arc<Mutex<FrameBuffer>>,
    frame_duration_nanos: Arc<AtomicU64>,
    quit_signal: Arc<AtomicBool>,
    sample_queue: AudioSampleQueue,
}

impl EmulatorHandle {
    /// Queue a button event for the core. The queue is bounded and lossy: events are
    /// dropped (and logged) when the core is not consuming them fast enough.
    pub fn send_button(&self, event: ButtonEvent) {
        match self.button_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::warn!("input event queue full, dropping {event:?}");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Halve the frame duration, making the emulator run faster.
    pub fn faster(&self) {
        let current = self.frame_duration_nanos.load(Ordering::Relaxed);
        self.frame_duration_nanos
            .store(current / 2, Ordering::Relaxed);
    }

    /// Double the frame duration, making the emulator run slower.
    pub fn slower(&self) {
        let current = self.frame_duration_nanos.load(Ordering::Relaxed);
        self.frame_duration_nanos
            .store(current.saturating_mul(2), Ordering::Relaxed);
    }

    /// Signal the frame loop to exit at the next frame boundary. In-flight instructions
    /// are never torn.
    pub fn shutdown(&self) {
        self.quit_signal.store(true, Ordering::Relaxed);
    }

    /// Copy of the most recently completed frame.
    pub fn latest_frame(&self) -> FrameBuffer {
        *self.frame.lock().unwrap()
    }

    /// The most recently completed frame, encoded as RGBA8 bytes ready for display or
    /// screenshot encoding.
    pub fn latest_frame_rgba(&self) -> Vec<u8> {
        frame_to_rgba(&self.latest_frame())
    }

    /// The 44.1 kHz stereo sample queue fed by the audio unit.
    pub fn samples(&self) -> &AudioSampleQueue {
        &self.sample_queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::address;

    fn new_emulator(config: RunConfig) -> Emulator {
        Emulator::new(config, None).expect("emulator construction should succeed")
    }

    #[test]
    fn zero_rom_boots_to_white_frames() {
        let mut emulator = new_emulator(RunConfig::default());

        emulator.run_frames(10).unwrap();

        let frame = emulator.latest_frame();
        assert!(frame
            .iter()
            .all(|scanline| scanline.iter().all(|&pixel| pixel == 0)));
    }

    #[test]
    fn vblank_interrupt_raised_every_frame() {
        let mut emulator = new_emulator(RunConfig::default());

        for _ in 0..5 {
            emulator
                .emulation_state
                .address_space
                .write_address_u8(address::IF_REGISTER, 0x00);

            emulator.run_frames(1).unwrap();

            assert_ne!(
                0,
                emulator.emulation_state.address_space.get_interrupt_flags() & 0x01
            );
        }
    }

    #[test]
    fn frame_loop_advances_17556_machine_cycles() {
        let mut emulator = new_emulator(RunConfig::default());

        // DIV increments every 64 machine cycles; 17,556 cycles per frame means the
        // internal counter advances by 70,224 clock cycles per frame
        emulator.run_frames(1).unwrap();
        let div_after_one_frame = emulator
            .emulation_state
            .address_space
            .read_address_u8(address::DIV_REGISTER);
        assert_eq!((70_224_u32 % 65_536 >> 8) as u8, div_after_one_frame);
    }

    #[test]
    fn shutdown_stops_the_loop() {
        let emulator = new_emulator(RunConfig::default());
        let handle = emulator.handle();

        handle.shutdown();

        // With the quit signal already raised, run() returns immediately
        emulator.run().unwrap();
    }

    #[test]
    fn faster_and_slower_adjust_frame_duration() {
        let emulator = new_emulator(RunConfig::default());
        let handle = emulator.handle();

        let base = emulator
            .shared
            .frame_duration_nanos
            .load(Ordering::Relaxed);

        handle.faster();
        assert_eq!(
            base / 2,
            emulator.shared.frame_duration_nanos.load(Ordering::Relaxed)
        );

        handle.slower();
        handle.slower();
        assert_eq!(
            base * 2,
            emulator.shared.frame_duration_nanos.load(Ordering::Relaxed)
        );
    }

    #[test]
    fn button_events_reach_the_joypad() {
        let mut emulator = new_emulator(RunConfig::default());
        let handle = emulator.handle();

        // Select the button nibble, then press Start
        emulator
            .emulation_state
            .address_space
            .write_address_u8(address::JOYP_REGISTER, 0x10);
        handle.send_button(ButtonEvent::pressed(Button::Start));

        emulator.run_frames(1).unwrap();

        assert_eq!(
            0x00,
            emulator
                .emulation_state
                .address_space
                .read_address_u8(address::JOYP_REGISTER)
                & 0x08
        );
    }
}
