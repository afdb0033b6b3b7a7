pub(crate) mod instructions;
mod registers;


use crate::memory::AddressSpace;

pub use instructions::ParseError;
pub use registers::{CpuMode, CpuRegisters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    VBlank,
    LcdStatus,
    Timer,
    Serial,
    Joypad,
}

impl InterruptType {
    /// The five interrupt sources in priority order, highest priority (lowest vector)
    /// first.
    pub const PRIORITY_ORDER: [Self; 5] = [
        Self::VBlank,
        Self::LcdStatus,
        Self::Timer,
        Self::Serial,
        Self::Joypad,
    ];

    pub fn handler_address(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStatus => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Joypad => 0x0060,
        }
    }

    /// This interrupt's bit in the IF and IE registers.
    pub fn bit_mask(self) -> u8 {
        match self {
            Self::VBlank => 0x01,
            Self::LcdStatus => 0x02,
            Self::Timer => 0x04,
            Self::Serial => 0x08,
            Self::Joypad => 0x10,
        }
    }
}

// Interrupt dispatch takes 5 machine cycles: 2 idle, 2 pushing the PC, 1 loading the
// handler address
const ISR_MACHINE_CYCLES: u8 = 5;

fn pending_interrupts(address_space: &AddressSpace) -> u8 {
    address_space.get_interrupt_flags() & address_space.get_ie_register() & 0x1F
}

fn interrupt_triggered(cpu_registers: &CpuRegisters, address_space: &AddressSpace) -> bool {
    cpu_registers.ime && !cpu_registers.interrupt_delay && pending_interrupts(address_space) != 0
}

/// Service the highest-priority pending interrupt: clear IME and the chosen IF bit, push
/// the PC, and jump to the fixed handler address.
fn execute_interrupt_service_routine(
    cpu_registers: &mut CpuRegisters,
    address_space: &mut AddressSpace,
) {
    let pending = pending_interrupts(address_space);
    let interrupt_type = InterruptType::PRIORITY_ORDER
        .into_iter()
        .find(|interrupt_type| pending & interrupt_type.bit_mask() != 0)
        .expect("ISR should only execute when an interrupt is pending");

    log::trace!(
        "servicing {interrupt_type:?} interrupt, PC={:04X}",
        cpu_registers.pc
    );

    address_space.clear_interrupt_flag(interrupt_type);
    cpu_registers.ime = false;

    cpu_registers.sp = cpu_registers.sp.wrapping_sub(2);
    address_space.write_address_u16(cpu_registers.sp, cpu_registers.pc);
    cpu_registers.pc = interrupt_type.handler_address();
}

/// Advance the CPU by exactly one machine cycle.
///
/// An instruction whose nominal duration is k machine cycles completes over k calls: the
/// instruction's effects are applied on the first call and the remaining k-1 calls idle.
/// Between instructions, pending interrupts are serviced when IME is set.
pub(crate) fn tick_m_cycle(
    cpu_registers: &mut CpuRegisters,
    address_space: &mut AddressSpace,
    trace: bool,
) -> Result<(), ParseError> {
    if cpu_registers.busy_machine_cycles > 0 {
        cpu_registers.busy_machine_cycles -= 1;
        return Ok(());
    }

    match cpu_registers.mode {
        CpuMode::Stopped => {
            // Woken externally by a button press
            return Ok(());
        }
        CpuMode::Halted => {
            if pending_interrupts(address_space) == 0 {
                return Ok(());
            }
            cpu_registers.mode = CpuMode::Running;
        }
        CpuMode::Running => {}
    }

    if interrupt_triggered(cpu_registers, address_space) {
        execute_interrupt_service_routine(cpu_registers, address_space);
        cpu_registers.busy_machine_cycles = ISR_MACHINE_CYCLES - 1;
        return Ok(());
    }

    let (instruction, pc) = instructions::parse_next_instruction(
        address_space,
        cpu_registers.pc,
        cpu_registers.halt_bug_triggered,
    )?;
    cpu_registers.halt_bug_triggered = false;
    cpu_registers.pc = pc;

    // Conditional control flow cycle counts depend on flags, so count before executing
    let cycles_required = instruction.cycles_required(cpu_registers);

    if trace {
        log::trace!("executing {instruction:02X?}, will take {cycles_required} cycles");
        log::trace!("CPU registers before execution: {cpu_registers:02X?}");
        log::trace!(
            "IE={:02X}, IF={:02X}",
            address_space.get_ie_register(),
            address_space.get_interrupt_flags()
        );
    }

    instruction.execute(address_space, cpu_registers);

    cpu_registers.busy_machine_cycles = (cycles_required / 4 - 1) as u8;

    Ok(())
}
