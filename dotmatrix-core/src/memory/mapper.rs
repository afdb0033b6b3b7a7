use std::fmt::Formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapperType {
    None,
    Mbc1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MapperFeatures {
    pub(crate) has_ram: bool,
    pub(crate) has_battery: bool,
}

impl std::fmt::Display for MapperFeatures {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RAM={}, Battery={}", self.has_ram, self.has_battery)
    }
}

/// Determine the mapper type and feature set from the cartridge header's mapper byte (0x0147).
///
/// Returns None for mapper bytes that are invalid or not supported.
pub(crate) fn parse_byte(mapper_byte: u8) -> Option<(MapperType, MapperFeatures)> {
    let (mapper_type, has_ram, has_battery) = match mapper_byte {
        0x00 => (MapperType::None, false, false),
        0x01 => (MapperType::Mbc1, false, false),
        0x02 => (MapperType::Mbc1, true, false),
        0x03 => (MapperType::Mbc1, true, true),
        _ => return None,
    };

    Some((
        mapper_type,
        MapperFeatures {
            has_ram,
            has_battery,
        },
    ))
}

#[derive(Debug, Clone)]
pub(crate) enum Mapper {
    None,
    Mbc1 {
        rom_bank_bit_mask: u8,
        ram_bank_bit_mask: u8,
        ram_enable: u8,
        rom_bank_number: u8,
        ram_bank_number: u8,
        banking_mode_select: u8,
    },
}

impl Mapper {
    pub(crate) fn new(mapper_type: MapperType, rom_size: u32, ram_size: u32) -> Self {
        // ROM banks are 16KB, RAM banks are 8KB
        let rom_bank_bit_mask = if rom_size >= 1 << 14 {
            ((rom_size >> 14) - 1) as u8
        } else {
            0
        };
        let ram_bank_bit_mask = if ram_size >= 1 << 13 {
            ((ram_size >> 13) - 1) as u8
        } else {
            0
        };

        log::debug!("setting ROM bank bit mask to {rom_bank_bit_mask:02X} for size {rom_size}");
        log::debug!("setting RAM bank bit mask to {ram_bank_bit_mask:02X} for size {ram_size}");

        match mapper_type {
            MapperType::None => Self::None,
            MapperType::Mbc1 => Self::Mbc1 {
                rom_bank_bit_mask,
                ram_bank_bit_mask,
                ram_enable: 0x00,
                rom_bank_number: 0x00,
                ram_bank_number: 0x00,
                banking_mode_select: 0x00,
            },
        }
    }

    pub(crate) fn map_rom_address(&self, address: u16) -> u32 {
        match *self {
            Self::None => u32::from(address),
            Self::Mbc1 {
                rom_bank_bit_mask,
                rom_bank_number,
                ram_bank_number,
                banking_mode_select,
                ..
            } => {
                // Bank 0 can never be mapped into the switchable slot
                let rom_bank_number = if rom_bank_number == 0x00 {
                    0x01
                } else {
                    rom_bank_number
                };

                match address {
                    address @ 0x0000..=0x3FFF => {
                        if banking_mode_select == 0x00 {
                            u32::from(address)
                        } else {
                            let bank_number = (ram_bank_number << 5) & rom_bank_bit_mask;
                            u32::from(address) + (u32::from(bank_number) << 14)
                        }
                    }
                    address @ 0x4000..=0x7FFF => {
                        let bank_number =
                            (rom_bank_number | (ram_bank_number << 5)) & rom_bank_bit_mask;
                        u32::from(address - 0x4000) + (u32::from(bank_number) << 14)
                    }
                    _ => u32::from(address),
                }
            }
        }
    }

    // ROM writes don't modify the ROM, they set cartridge-internal registers
    pub(crate) fn write_rom_address(&mut self, address: u16, value: u8) {
        match self {
            Self::None => {}
            Self::Mbc1 {
                ram_enable,
                rom_bank_number,
                ram_bank_number,
                banking_mode_select,
                ..
            } => match address {
                _address @ 0x0000..=0x1FFF => {
                    log::trace!("ram_enable changed to {value:02X}");
                    *ram_enable = value;
                }
                _address @ 0x2000..=0x3FFF => {
                    log::trace!("rom_bank_number changed to {value:02X}");
                    *rom_bank_number = value & 0x1F;
                }
                _address @ 0x4000..=0x5FFF => {
                    log::trace!("ram_bank_number changed to {value:02X}");
                    *ram_bank_number = value & 0x03;
                }
                _address @ 0x6000..=0x7FFF => {
                    log::trace!("banking_mode_select changed to {value:02X}");
                    *banking_mode_select = value & 0x01;
                }
                _ => {}
            },
        }
    }

    /// Map an external RAM address (0xA000-0xBFFF) to a relative address into the full RAM
    /// array. Returns None if RAM is not currently enabled.
    pub(crate) fn map_ram_address(&self, address: u16) -> Option<u32> {
        let relative_address = address - 0xA000;

        match *self {
            Self::None => Some(u32::from(relative_address)),
            Self::Mbc1 {
                ram_bank_bit_mask,
                ram_enable,
                ram_bank_number,
                banking_mode_select,
                ..
            } => {
                if ram_enable & 0x0F != 0x0A {
                    return None;
                }

                if banking_mode_select == 0x00 {
                    Some(u32::from(relative_address))
                } else {
                    let bank_number = ram_bank_number & ram_bank_bit_mask;
                    Some(u32::from(relative_address) + (u32::from(bank_number) << 13))
                }
            }
        }
    }
}
