use crate::cpu::{self, CpuMode, ParseError};
use crate::input::ButtonEvent;
use crate::ppu::FrameBuffer;
use crate::startup::EmulationState;
use crate::RunConfig;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// One frame is 17,556 machine cycles (70,224 clock cycles of the 4.194304 MHz master
/// clock), giving ~59.7275 frames per second.
pub(crate) const MACHINE_CYCLES_PER_FRAME: u64 = 17_556;

/// Nominal duration of one frame in nanoseconds.
pub(crate) const FRAME_DURATION_NANOS: u64 = 16_742_706;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("error parsing CPU instruction: {source}")]
    InstructionParse {
        #[from]
        source: ParseError,
    },
}

/// State shared between the frame loop and host-side handles.
pub(crate) struct SharedControls {
    // The most recently completed frame; locked only to copy in/out
    pub(crate) frame: Arc<Mutex<FrameBuffer>>,
    pub(crate) frame_duration_nanos: Arc<AtomicU64>,
    pub(crate) quit_signal: Arc<AtomicBool>,
}

impl SharedControls {
    pub(crate) fn new(config: &RunConfig) -> Self {
        let frame_duration_nanos = if config.fast { 0 } else { FRAME_DURATION_NANOS };
        Self {
            frame: Arc::new(Mutex::new([[0; 160]; 144])),
            frame_duration_nanos: Arc::new(AtomicU64::new(frame_duration_nanos)),
            quit_signal: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Advance the whole machine by one frame: 17,556 machine cycles, each ticking the
/// devices in the fixed order CPU, OAM DMA, LCD, timer, audio. Interrupts raised by a
/// device during cycle k are observed by the CPU when it next checks interrupts at the
/// start of cycle k+1.
pub(crate) fn run_frame(
    emulation_state: &mut EmulationState,
    config: &RunConfig,
) -> Result<(), RunError> {
    let EmulationState {
        address_space,
        cpu_registers,
    } = emulation_state;

    for _ in 0..MACHINE_CYCLES_PER_FRAME {
        cpu::tick_m_cycle(cpu_registers, address_space, config.debug_cpu)?;
        address_space.tick_oam_dma();
        address_space.tick_ppu();
        address_space.tick_timer();
        address_space.tick_apu();
    }

    Ok(())
}

fn apply_button_events(emulation_state: &mut EmulationState, button_events: &Receiver<ButtonEvent>) {
    while let Ok(event) = button_events.try_recv() {
        // A button press wakes the CPU out of STOP mode
        if event.pressed && emulation_state.cpu_registers.mode == CpuMode::Stopped {
            emulation_state.cpu_registers.mode = CpuMode::Running;
        }
        emulation_state.address_space.apply_button_event(event);
    }
}

fn publish_frame(emulation_state: &EmulationState, shared: &SharedControls) {
    let mut frame = shared.frame.lock().unwrap();
    *frame = *emulation_state.address_space.ppu().frame_buffer();
}

/// Run the emulator until the quit signal is raised. Button events are drained and the
/// cancellation flag checked once per frame; pacing uses an accumulated deadline so that
/// scheduling jitter does not drift the frame rate.
pub(crate) fn run(
    emulation_state: &mut EmulationState,
    config: &RunConfig,
    shared: &SharedControls,
    button_events: &Receiver<ButtonEvent>,
) -> Result<(), RunError> {
    log::info!("Running with config:\n{config}");

    let mut next_deadline = Instant::now();
    loop {
        if shared.quit_signal.load(Ordering::Relaxed) {
            log::info!("Quit signal received, exiting frame loop");
            return Ok(());
        }

        apply_button_events(emulation_state, button_events);

        run_frame(emulation_state, config)?;
        publish_frame(emulation_state, shared);

        let frame_duration =
            Duration::from_nanos(shared.frame_duration_nanos.load(Ordering::Relaxed));
        next_deadline += frame_duration;

        let now = Instant::now();
        if next_deadline > now {
            thread::sleep(next_deadline - now);
        } else if frame_duration.is_zero() {
            // Uncapped: don't let the deadline fall ever further behind
            next_deadline = now;
        }
    }
}

/// Run the emulator for a fixed number of frames with no pacing, publishing each frame.
/// Used for headless and test runs.
pub(crate) fn run_frames(
    emulation_state: &mut EmulationState,
    config: &RunConfig,
    shared: &SharedControls,
    button_events: &Receiver<ButtonEvent>,
    frames: u64,
) -> Result<(), RunError> {
    for _ in 0..frames {
        if shared.quit_signal.load(Ordering::Relaxed) {
            return Ok(());
        }

        apply_button_events(emulation_state, button_events);
        run_frame(emulation_state, config)?;
        publish_frame(emulation_state, shared);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apu::ApuState;
    use crate::audio::AudioSampleQueue;
    use crate::cpu::{CpuRegisters, InterruptType};
    use crate::memory::{AddressSpace, Cartridge};
    use crate::ppu::PpuState;
    use crate::serial::SerialPort;
    use crate::timer::TimerState;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn new_state_with_serial(program: &[u8]) -> (EmulationState, SharedSink) {
        let mut rom = vec![0; 0x8000];
        rom[0x0100..0x0100 + program.len()].copy_from_slice(program);

        let sink = SharedSink(Arc::new(Mutex::new(Vec::new())));
        let address_space = AddressSpace::new(
            Cartridge::new(rom).expect("test ROM should be valid"),
            SerialPort::new(Some(Box::new(sink.clone()))),
            TimerState::new(false),
            PpuState::new(false),
            ApuState::new(AudioSampleQueue::new()),
        );

        (
            EmulationState {
                address_space,
                cpu_registers: CpuRegisters::new(),
            },
            sink,
        )
    }

    #[test]
    fn serial_transfer_reaches_the_sink() {
        // LD A, 0x42; LDH (SB), A; LD A, 0x81; LDH (SC), A; JR -2
        let (mut emulation_state, sink) =
            new_state_with_serial(&[0x3E, 0x42, 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02, 0x18, 0xFE]);

        run_frame(&mut emulation_state, &RunConfig::default()).unwrap();

        assert_eq!(vec![0x42], *sink.0.lock().unwrap());
        assert_ne!(
            0,
            emulation_state.address_space.get_interrupt_flags()
                & InterruptType::Serial.bit_mask()
        );
    }
}

