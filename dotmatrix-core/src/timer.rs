use crate::cpu::InterruptType;

/// The divider/timer unit.
///
/// The whole unit is driven by a free-running 16-bit counter that advances by 4 every
/// machine cycle. DIV exposes the counter's high byte, and TIMA increments whenever the
/// TAC-selected counter bit falls from 1 to 0 while the timer is enabled. Register writes
/// that flip the selected bit produce the same falling edges that real hardware does.
pub(crate) struct TimerState {
    internal_counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    // When TIMA overflows there is a 1 machine cycle delay during which TIMA reads 0x00;
    // the TMA reload and interrupt request happen at the start of the next cycle.
    reload_scheduled: bool,
    trace: bool,
}

impl TimerState {
    pub(crate) fn new(trace: bool) -> Self {
        Self {
            internal_counter: 0,
            tima: 0x00,
            tma: 0x00,
            tac: 0x00,
            reload_scheduled: false,
            trace,
        }
    }

    /// The timer input signal: the TAC-selected bit of the internal counter ANDed with the
    /// TAC enable bit. TIMA increments on every falling edge of this signal.
    fn input_signal(&self) -> bool {
        if self.tac & 0x04 == 0 {
            return false;
        }

        let bit = match self.tac & 0x03 {
            0x00 => 9,
            0x01 => 3,
            0x02 => 5,
            0x03 => 7,
            _ => unreachable!("2-bit value"),
        };
        self.internal_counter & (1 << bit) != 0
    }

    fn increment_tima(&mut self) {
        let (new_tima, overflowed) = self.tima.overflowing_add(1);
        self.tima = new_tima;
        if overflowed {
            self.reload_scheduled = true;
        }
    }

    /// Advance the timer by one machine cycle (4 clock cycles), requesting the timer
    /// interrupt through the shared interrupt-flag byte on a TIMA reload.
    pub(crate) fn tick_m_cycle(&mut self, interrupt_flags: &mut u8) {
        if self.reload_scheduled {
            self.tima = self.tma;
            self.reload_scheduled = false;
            *interrupt_flags |= InterruptType::Timer.bit_mask();

            if self.trace {
                log::trace!("TIMA reloaded from TMA ({:02X}), timer interrupt set", self.tma);
            }
        }

        for _ in 0..4 {
            let old_signal = self.input_signal();
            self.internal_counter = self.internal_counter.wrapping_add(1);
            if old_signal && !self.input_signal() {
                self.increment_tima();
            }
        }
    }

    pub(crate) fn read_div(&self) -> u8 {
        (self.internal_counter >> 8) as u8
    }

    pub(crate) fn read_tima(&self) -> u8 {
        self.tima
    }

    pub(crate) fn read_tma(&self) -> u8 {
        self.tma
    }

    pub(crate) fn read_tac(&self) -> u8 {
        self.tac | 0xF8
    }

    /// Any write to DIV zeroes the internal counter. Zeroing the counter while the timer
    /// input signal is high produces a falling edge, incrementing TIMA.
    pub(crate) fn write_div(&mut self) {
        let old_signal = self.input_signal();
        self.internal_counter = 0;
        if old_signal {
            self.increment_tima();
        }
    }

    /// Used by STOP, which resets the divider without the falling-edge side effect.
    pub(crate) fn reset_counter(&mut self) {
        self.internal_counter = 0;
    }

    pub(crate) fn write_tima(&mut self, value: u8) {
        // A TIMA write during the overflow delay cancels the pending reload
        self.reload_scheduled = false;
        self.tima = value;
    }

    pub(crate) fn write_tma(&mut self, value: u8) {
        self.tma = value;
    }

    pub(crate) fn write_tac(&mut self, value: u8) {
        let old_signal = self.input_signal();
        self.tac = value & 0x07;
        if old_signal && !self.input_signal() {
            self.increment_tima();
        }
    }
}
