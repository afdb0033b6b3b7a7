//! MMIO dispatch: reads and writes in 0xFF00-0xFF7F are routed to the device that owns
//! the register. Unmapped registers read 0xFF and ignore writes.

use crate::cpu::InterruptType;
use crate::memory::{address, AddressSpace};

impl AddressSpace {
    pub(crate) fn read_io_register(&self, register_address: u16) -> u8 {
        match register_address {
            address::JOYP_REGISTER => self.joypad.read_joyp(),
            address::SB_REGISTER => self.serial.read_sb(),
            address::SC_REGISTER => self.serial.read_sc(),
            address::DIV_REGISTER => self.timer.read_div(),
            address::TIMA_REGISTER => self.timer.read_tima(),
            address::TMA_REGISTER => self.timer.read_tma(),
            address::TAC_REGISTER => self.timer.read_tac(),
            // The upper 3 bits of IF are unused and read as 1
            address::IF_REGISTER => self.interrupt_flags | 0xE0,
            address::AUDIO_START..=address::AUDIO_END => self.apu.read_register(register_address),
            address::DMA_REGISTER => self.dma_register,
            address::LCDC_REGISTER..=address::WX_REGISTER => {
                self.ppu.read_register(register_address)
            }
            _ => 0xFF,
        }
    }

    pub(crate) fn write_io_register(&mut self, register_address: u16, value: u8) {
        match register_address {
            address::JOYP_REGISTER => {
                if self.joypad.write_joyp(value) {
                    self.interrupt_flags |= InterruptType::Joypad.bit_mask();
                }
            }
            address::SB_REGISTER => {
                self.serial.write_sb(value);
            }
            address::SC_REGISTER => {
                if self.serial.write_sc(value) {
                    self.interrupt_flags |= InterruptType::Serial.bit_mask();
                }
            }
            address::DIV_REGISTER => {
                self.timer.write_div();
            }
            address::TIMA_REGISTER => {
                self.timer.write_tima(value);
            }
            address::TMA_REGISTER => {
                self.timer.write_tma(value);
            }
            address::TAC_REGISTER => {
                self.timer.write_tac(value);
            }
            address::IF_REGISTER => {
                self.interrupt_flags = value & 0x1F;
            }
            address::AUDIO_START..=address::AUDIO_END => {
                self.apu.write_register(register_address, value);
            }
            address::DMA_REGISTER => {
                self.start_oam_dma(value);
            }
            address::LCDC_REGISTER..=address::WX_REGISTER => {
                self.ppu.write_register(register_address, value);
            }
            _ => {}
        }
    }
}
