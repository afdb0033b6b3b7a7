use super::{hash_map, run_test, ExpectedState};
use crate::cpu::instructions::Instruction;
use crate::cpu::CpuRegisters;
use crate::memory::AddressSpace;

#[test]
fn unconditional_jump() {
    // LD A, 0x01; JP 0x0158 over LD A, 0xFF
    run_test(
        "3E01C358013EFF00",
        &ExpectedState {
            a: Some(0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn conditional_jump() {
    // OR A (Z clear); JP NZ, 0x0157 over LD A, 0xFF
    run_test(
        "B7C257013EFF00",
        &ExpectedState {
            a: Some(0x01),
            ..ExpectedState::empty()
        },
    );

    // OR A (Z clear); JP Z not taken; LD A, 0x42
    run_test(
        "B7CA99993E42",
        &ExpectedState {
            a: Some(0x42),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn relative_jump() {
    // JR +2 over LD A, 0xFF
    run_test(
        "18023EFF",
        &ExpectedState {
            a: Some(0x01),
            ..ExpectedState::empty()
        },
    );

    // SCF; JR C, +2 over LD A, 0xFF
    run_test(
        "3738023EFF",
        &ExpectedState {
            a: Some(0x01),
            ..ExpectedState::empty()
        },
    );

    // OR A; JR C not taken; LD A, 0x42
    run_test(
        "B738023E42",
        &ExpectedState {
            a: Some(0x42),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn call_and_return() {
    // CALL 0x0156; (on return) JP 0x0159; subroutine: LD A, 0x42; RET
    run_test(
        "CD5601C359013E42C9",
        &ExpectedState {
            a: Some(0x42),
            sp: Some(0xFFFE),
            memory: hash_map!(0xFFFC: 0x53, 0xFFFD: 0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn conditional_call_not_taken() {
    // OR A (C clear); CALL C not taken; LD A, 0x42
    run_test(
        "B7DC99993E42",
        &ExpectedState {
            a: Some(0x42),
            sp: Some(0xFFFE),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn jump_hl() {
    // LD HL, 0x0156; JP HL over LD A, 0xFF
    run_test(
        "215601E93EFF",
        &ExpectedState {
            a: Some(0x01),
            h: Some(0x01),
            l: Some(0x56),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn restart_call() {
    let mut address_space = AddressSpace::new_test(vec![0; 0x8000]);
    let mut cpu_registers = CpuRegisters::new();
    cpu_registers.pc = 0x1234;

    Instruction::RestartCall(0x18).execute(&mut address_space, &mut cpu_registers);

    assert_eq!(0x0018, cpu_registers.pc);
    assert_eq!(0xFFFC, cpu_registers.sp);
    assert_eq!(0x34, address_space.read_address_u8(0xFFFC));
    assert_eq!(0x12, address_space.read_address_u8(0xFFFD));
}

#[test]
fn return_from_interrupt_handler_sets_ime() {
    let mut address_space = AddressSpace::new_test(vec![0; 0x8000]);
    let mut cpu_registers = CpuRegisters::new();
    cpu_registers.sp = 0xFFFC;
    address_space.write_address_u8(0xFFFC, 0x34);
    address_space.write_address_u8(0xFFFD, 0x12);

    Instruction::ReturnFromInterruptHandler.execute(&mut address_space, &mut cpu_registers);

    assert_eq!(0x1234, cpu_registers.pc);
    assert_eq!(0xFFFE, cpu_registers.sp);
    assert!(cpu_registers.ime);
}
