use std::io::Write;

/// The serial port, reduced to what the link cable is actually used for here: a write-only
/// byte sink.
///
/// Writing 0x81 to SC (transfer start + internal clock) emits the current SB value to the
/// sink and completes immediately; SC bit 7 is cleared and the serial interrupt requested.
/// Transfers driven by an external clock never complete because nothing is attached to the
/// other end of the cable.
pub(crate) struct SerialPort {
    sb: u8,
    sc: u8,
    sink: Option<Box<dyn Write + Send>>,
}

impl SerialPort {
    pub(crate) fn new(sink: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            sb: 0x00,
            sc: 0x7E,
            sink,
        }
    }

    pub(crate) fn read_sb(&self) -> u8 {
        self.sb
    }

    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }

    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    /// Write to the SC register. Returns true if a transfer completed and the serial
    /// interrupt should be requested.
    pub(crate) fn write_sc(&mut self, value: u8) -> bool {
        self.sc = value;

        if value & 0x81 != 0x81 {
            return false;
        }

        log::trace!("serial transfer of {:02X}", self.sb);

        if let Some(sink) = &mut self.sink {
            if let Err(err) = sink.write_all(&[self.sb]) {
                log::warn!("error writing to serial sink: {err}");
            }
        }

        self.sc &= 0x7F;
        true
    }
}
