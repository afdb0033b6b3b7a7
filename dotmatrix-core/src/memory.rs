pub mod address;
mod ioregisters;
mod mapper;

use crate::apu::ApuState;
use crate::input::{ButtonEvent, Joypad};
use crate::memory::mapper::Mapper;
use crate::ppu::{PpuMode, PpuState};
use crate::serial::SerialPort;
use crate::timer::TimerState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartridgeLoadError {
    #[error("ROM image should be at least 32768 bytes, was {rom_len} bytes")]
    RomTooShort { rom_len: usize },
    #[error("invalid or unsupported mapper byte in cartridge header: {mapper_byte:02X}")]
    InvalidMapper { mapper_byte: u8 },
    #[error("invalid RAM size code in cartridge header, expected 0 or 2-5: {ram_size_code}")]
    InvalidRamSize { ram_size_code: u8 },
}

pub struct Cartridge {
    rom: Vec<u8>,
    mapper: Mapper,
    ram: Vec<u8>,
}

impl Cartridge {
    /// Create a new Cartridge from the given ROM image.
    ///
    /// # `CartridgeLoadError`
    ///
    /// This function will return an error in the following scenarios:
    /// * The ROM is smaller than 32KB
    /// * The mapper byte in the cartridge header is invalid (or not implemented)
    /// * The RAM size byte in the cartridge header is invalid
    pub fn new(rom: Vec<u8>) -> Result<Self, CartridgeLoadError> {
        log::info!("Initializing cartridge using {} bytes of data", rom.len());

        if rom.len() < 0x8000 {
            return Err(CartridgeLoadError::RomTooShort { rom_len: rom.len() });
        }

        let mapper_byte = rom[usize::from(address::MAPPER)];
        let Some((mapper_type, mapper_features)) = mapper::parse_byte(mapper_byte) else {
            return Err(CartridgeLoadError::InvalidMapper { mapper_byte });
        };

        log::info!("Detected mapper type {mapper_type:?} (byte: {mapper_byte:02X})");
        log::info!("Mapper features: {mapper_features}");

        let ram = if mapper_features.has_ram {
            let ram_size_code = rom[usize::from(address::RAM_SIZE)];
            let ram_size: usize = match ram_size_code {
                0x00 => 0,
                0x02 => 8192,
                0x03 => 32768,
                0x04 => 131072,
                0x05 => 65536,
                _ => return Err(CartridgeLoadError::InvalidRamSize { ram_size_code }),
            };
            vec![0; ram_size]
        } else {
            Vec::new()
        };

        log::info!("Cartridge has {} bytes of external RAM", ram.len());

        let mapper = Mapper::new(mapper_type, rom.len() as u32, ram.len() as u32);

        Ok(Self { rom, mapper, ram })
    }

    /// A cartridge backed by a zero-filled 32KB flat ROM, used when no ROM file is given.
    pub fn none() -> Self {
        Self {
            rom: vec![0; 0x8000],
            mapper: Mapper::new(mapper::MapperType::None, 0x8000, 0),
            ram: Vec::new(),
        }
    }

    /// Read a value from the given ROM address (0x0000-0x7FFF) through the mapper's
    /// current banking state.
    fn read_rom_address(&self, address: u16) -> u8 {
        let mapped_address = self.mapper.map_rom_address(address);
        self.rom.get(mapped_address as usize).copied().unwrap_or(0xFF)
    }

    // ROM writes set mapper registers rather than modifying the ROM
    fn write_rom_address(&mut self, address: u16, value: u8) {
        self.mapper.write_rom_address(address, value);
    }

    /// Read a value from the given external RAM address. Returns 0xFF if RAM is disabled
    /// or not present.
    fn read_ram_address(&self, address: u16) -> u8 {
        match self.mapper.map_ram_address(address) {
            Some(mapped_address) => self.ram.get(mapped_address as usize).copied().unwrap_or(0xFF),
            None => 0xFF,
        }
    }

    /// Write a value to the given external RAM address. Writes while RAM is disabled are
    /// dropped.
    fn write_ram_address(&mut self, address: u16, value: u8) {
        if let Some(mapped_address) = self.mapper.map_ram_address(address) {
            if let Some(ram_value) = self.ram.get_mut(mapped_address as usize) {
                *ram_value = value;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OamDmaTransfer {
    source_base: u16,
    bytes_copied: u8,
}

const OAM_DMA_LEN: u8 = 160;

pub struct AddressSpace {
    cartridge: Cartridge,
    vram: [u8; 8192],
    working_ram: [u8; 8192],
    oam: [u8; 160],
    hram: [u8; 127],
    interrupt_flags: u8,
    ie_register: u8,
    timer: TimerState,
    serial: SerialPort,
    joypad: Joypad,
    ppu: PpuState,
    apu: ApuState,
    oam_dma: Option<OamDmaTransfer>,
    dma_register: u8,
}

impl AddressSpace {
    pub(crate) fn new(
        cartridge: Cartridge,
        serial: SerialPort,
        timer: TimerState,
        ppu: PpuState,
        apu: ApuState,
    ) -> Self {
        Self {
            cartridge,
            vram: [0; 8192],
            working_ram: [0; 8192],
            oam: [0; 160],
            hram: [0; 127],
            interrupt_flags: 0x00,
            ie_register: 0x00,
            timer,
            serial,
            joypad: Joypad::new(),
            ppu,
            apu,
            oam_dma: None,
            dma_register: 0x00,
        }
    }

    fn is_cpu_access_allowed(&self, address: u16) -> bool {
        // Non-HRAM access not allowed while an OAM DMA transfer is active
        if self.oam_dma.is_some() && !(address::HRAM_START..=address::HRAM_END).contains(&address)
        {
            return false;
        }

        if self.ppu.enabled() {
            // OAM access not allowed while the PPU is scanning OAM or rendering a scanline
            if matches!(
                self.ppu.mode(),
                PpuMode::ScanningOAM | PpuMode::RenderingScanline
            ) && (address::OAM_START..=address::OAM_END).contains(&address)
            {
                return false;
            }

            // VRAM access not allowed while the PPU is rendering a scanline
            if self.ppu.mode() == PpuMode::RenderingScanline
                && (address::VRAM_START..=address::VRAM_END).contains(&address)
            {
                return false;
            }
        }

        true
    }

    /// Read the value at the given address from the perspective of the CPU. Returns 0xFF
    /// if the CPU cannot currently access the address because of PPU or DMA state.
    pub fn read_address_u8(&self, address: u16) -> u8 {
        if !self.is_cpu_access_allowed(address) {
            return 0xFF;
        }

        self.read_address_u8_no_access_check(address)
    }

    fn read_address_u8_no_access_check(&self, address: u16) -> u8 {
        match address {
            address @ address::ROM_START..=address::ROM_END => {
                self.cartridge.read_rom_address(address)
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[usize::from(address - address::VRAM_START)]
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.read_ram_address(address)
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[usize::from(address - address::WORKING_RAM_START)]
            }
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram[usize::from(address - address::ECHO_RAM_START)]
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[usize::from(address - address::OAM_START)]
            }
            address::UNUSABLE_START..=address::UNUSABLE_END => 0xFF,
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.read_io_register(address)
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[usize::from(address - address::HRAM_START)]
            }
            address::IE_REGISTER => self.ie_register,
        }
    }

    /// Read the value at the given address and the following address as a little-endian
    /// 16-bit value.
    pub fn read_address_u16(&self, address: u16) -> u16 {
        let lsb = self.read_address_u8(address);
        let msb = self.read_address_u8(address.wrapping_add(1));
        u16::from_le_bytes([lsb, msb])
    }

    /// Assign a value to the given address from the perspective of the CPU. The write is
    /// dropped if the CPU cannot currently access the address.
    pub fn write_address_u8(&mut self, address: u16, value: u8) {
        if !self.is_cpu_access_allowed(address) {
            return;
        }

        self.write_address_u8_no_access_check(address, value);
    }

    fn write_address_u8_no_access_check(&mut self, address: u16, value: u8) {
        match address {
            address @ address::ROM_START..=address::ROM_END => {
                self.cartridge.write_rom_address(address, value);
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[usize::from(address - address::VRAM_START)] = value;
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.write_ram_address(address, value);
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[usize::from(address - address::WORKING_RAM_START)] = value;
            }
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram[usize::from(address - address::ECHO_RAM_START)] = value;
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[usize::from(address - address::OAM_START)] = value;
            }
            address::UNUSABLE_START..=address::UNUSABLE_END => {}
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.write_io_register(address, value);
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[usize::from(address - address::HRAM_START)] = value;
            }
            address::IE_REGISTER => {
                self.ie_register = value;
            }
        }
    }

    /// Assign a 16-bit value to the given address and the following address, little-endian.
    pub fn write_address_u16(&mut self, address: u16, value: u16) {
        let [lsb, msb] = value.to_le_bytes();
        self.write_address_u8(address, lsb);
        self.write_address_u8(address.wrapping_add(1), msb);
    }

    /// Advance an in-flight OAM DMA transfer by one byte. Each transfer copies 160 bytes
    /// over 160 machine cycles.
    pub(crate) fn tick_oam_dma(&mut self) {
        let Some(transfer) = self.oam_dma else {
            return;
        };

        let byte = self.read_address_u8_no_access_check(
            transfer.source_base + u16::from(transfer.bytes_copied),
        );
        self.oam[usize::from(transfer.bytes_copied)] = byte;

        self.oam_dma = (transfer.bytes_copied + 1 < OAM_DMA_LEN).then_some(OamDmaTransfer {
            source_base: transfer.source_base,
            bytes_copied: transfer.bytes_copied + 1,
        });
    }

    /// Advance the LCD by one machine cycle.
    pub(crate) fn tick_ppu(&mut self) {
        let Self {
            ppu,
            vram,
            oam,
            interrupt_flags,
            ..
        } = self;
        ppu.tick_m_cycle(vram, oam, interrupt_flags);
    }

    /// Advance the divider/timer unit by one machine cycle.
    pub(crate) fn tick_timer(&mut self) {
        let Self {
            timer,
            interrupt_flags,
            ..
        } = self;
        timer.tick_m_cycle(interrupt_flags);
    }

    /// Advance the audio unit by one machine cycle.
    pub(crate) fn tick_apu(&mut self) {
        self.apu.tick_m_cycle();
    }

    /// Apply a host button event to the joypad matrix, requesting the joypad interrupt on
    /// a selected key press.
    pub(crate) fn apply_button_event(&mut self, event: ButtonEvent) {
        if self.joypad.apply_event(event) {
            self.interrupt_flags |= crate::cpu::InterruptType::Joypad.bit_mask();
        }
    }

    pub(crate) fn ppu(&self) -> &PpuState {
        &self.ppu
    }

    /// Retrieve the current value of the IE register (interrupts enabled).
    pub(crate) fn get_ie_register(&self) -> u8 {
        self.ie_register
    }

    /// Retrieve the raw interrupt flags (the low 5 bits of the IF register).
    pub(crate) fn get_interrupt_flags(&self) -> u8 {
        self.interrupt_flags
    }

    pub(crate) fn clear_interrupt_flag(&mut self, interrupt_type: crate::cpu::InterruptType) {
        self.interrupt_flags &= !interrupt_type.bit_mask();
    }

    // STOP resets the divider
    pub(crate) fn reset_divider(&mut self) {
        self.timer.reset_counter();
    }

    #[cfg(test)]
    pub(crate) fn new_test(rom: Vec<u8>) -> Self {
        use crate::audio::AudioSampleQueue;

        let cartridge = Cartridge::new(rom).expect("test ROM should be valid");
        Self::new(
            cartridge,
            SerialPort::new(None),
            TimerState::new(false),
            PpuState::new(false),
            ApuState::new(AudioSampleQueue::new()),
        )
    }

    fn start_oam_dma(&mut self, value: u8) {
        self.dma_register = value;
        self.oam_dma = Some(OamDmaTransfer {
            source_base: u16::from(value) << 8,
            bytes_copied: 0,
        });
    }
}
