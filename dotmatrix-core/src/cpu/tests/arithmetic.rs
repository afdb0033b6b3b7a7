use super::{hash_map, run_test, set_in_state, ExpectedState, ALL_REGISTERS};
use crate::cpu::registers::CpuRegister;

#[test]
fn add_immediate() {
    // LD A, 0x05; ADD 0x0A
    run_test(
        "3E05C60A",
        &ExpectedState {
            a: Some(0x0F),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x0F; ADD 0x01 sets the half-carry flag
    run_test(
        "3E0FC601",
        &ExpectedState {
            a: Some(0x10),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0xFF; ADD 0x01 wraps to zero with carry and half-carry
    run_test(
        "3EFFC601",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_register() {
    for (register, code) in ALL_REGISTERS {
        if register == CpuRegister::A {
            continue;
        }

        // LD r, 0x2F; LD A, 0x11; ADD r
        let program = format!("{:02X}2F3E11{:02X}", 0x06 | (code << 3), 0x80 | code);

        let mut expected_state = ExpectedState {
            a: Some(0x40),
            f: Some(0x20),
            ..ExpectedState::empty()
        };
        set_in_state(&mut expected_state, register, 0x2F);

        run_test(&program, &expected_state);
    }

    // LD A, 0x2F; ADD A
    run_test(
        "3E2F87",
        &ExpectedState {
            a: Some(0x5E),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_indirect_hl() {
    // LD HL, 0xC123; LD (HL), 0x40; LD A, 0x12; ADD (HL)
    run_test(
        "2123C136403E1286",
        &ExpectedState {
            a: Some(0x52),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_with_carry() {
    // SCF; LD A, 0x05; ADC 0x03
    run_test(
        "373E05CE03",
        &ExpectedState {
            a: Some(0x09),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // OR A (clears carry); LD A, 0x05; ADC 0x03
    run_test(
        "B73E05CE03",
        &ExpectedState {
            a: Some(0x08),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // SCF; LD A, 0xFF; ADC 0x00 wraps through the carry input
    run_test(
        "373EFFCE00",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn subtract() {
    // LD A, 0x3E; SUB 0x3E
    run_test(
        "3E3ED63E",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x10; SUB 0x20 borrows out of bit 7
    run_test(
        "3E10D620",
        &ExpectedState {
            a: Some(0xF0),
            f: Some(0x50),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x10; SUB 0x01 borrows from bit 4
    run_test(
        "3E10D601",
        &ExpectedState {
            a: Some(0x0F),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn subtract_with_carry() {
    // SCF; LD A, 0x10; SBC 0x05
    run_test(
        "373E10DE05",
        &ExpectedState {
            a: Some(0x0A),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn compare() {
    // LD A, 0x42; CP 0x42 leaves A unchanged
    run_test(
        "3E42FE42",
        &ExpectedState {
            a: Some(0x42),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x10; CP 0x20
    run_test(
        "3E10FE20",
        &ExpectedState {
            a: Some(0x10),
            f: Some(0x50),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn increment_decrement() {
    // OR A; LD A, 0x0F; INC A
    run_test(
        "B73E0F3C",
        &ExpectedState {
            a: Some(0x10),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD A, 0x01; DEC A
    run_test(
        "B73E013D",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xC0),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD A, 0x10; DEC A borrows from bit 4
    run_test(
        "B73E103D",
        &ExpectedState {
            a: Some(0x0F),
            f: Some(0x60),
            ..ExpectedState::empty()
        },
    );

    // INC (HL): LD HL, 0xC080; LD (HL), 0xFF; OR A; INC (HL) wraps without carry
    run_test(
        "2180C036FFB734",
        &ExpectedState {
            f: Some(0xA0),
            memory: hash_map!(0xC080: 0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn bitwise_ops() {
    // LD A, 0x5A; AND 0x0F always sets the half-carry flag
    run_test(
        "3E5AE60F",
        &ExpectedState {
            a: Some(0x0A),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x5A; OR 0x0F
    run_test(
        "3E5AF60F",
        &ExpectedState {
            a: Some(0x5F),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x5A; XOR 0x5A
    run_test(
        "3E5AEE5A",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn complement_accumulator() {
    // LD A, 0x35; CPL; N and H forced on, Z and C untouched (boot flags have Z and C set)
    run_test(
        "3E352F",
        &ExpectedState {
            a: Some(0xCA),
            f: Some(0xF0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn carry_flag_ops() {
    // OR A; SCF
    run_test(
        "B737",
        &ExpectedState {
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // OR A; SCF; CCF
    run_test(
        "B7373F",
        &ExpectedState {
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn decimal_adjust_after_addition() {
    // LD A, 0x45; ADD 0x38; DAA => BCD 45 + 38 = 83
    run_test(
        "3E45C63827",
        &ExpectedState {
            a: Some(0x83),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x99; ADD 0x99; DAA => BCD 99 + 99 = 198, carry out
    run_test(
        "3E99C69927",
        &ExpectedState {
            a: Some(0x98),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn decimal_adjust_after_subtraction() {
    // LD A, 0x42; SUB 0x15; DAA => BCD 42 - 15 = 27
    run_test(
        "3E42D61527",
        &ExpectedState {
            a: Some(0x27),
            f: Some(0x40),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_hl_register_pair() {
    // LD HL, 0x012F; LD BC, 0x2601; ADD HL, BC; Z is untouched (set at boot)
    run_test(
        "212F0101012609",
        &ExpectedState {
            h: Some(0x27),
            l: Some(0x30),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    // LD HL, 0x8A23; ADD HL, HL carries out of bits 11 and 15
    run_test(
        "21238A29",
        &ExpectedState {
            h: Some(0x14),
            l: Some(0x46),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn increment_decrement_register_pair() {
    // LD BC, 0xFFFF; INC BC wraps and leaves flags untouched
    run_test(
        "01FFFF03",
        &ExpectedState {
            b: Some(0x00),
            c: Some(0x00),
            f: Some(0xB0),
            ..ExpectedState::empty()
        },
    );

    // LD DE, 0x0000; DEC DE
    run_test(
        "1100001B",
        &ExpectedState {
            d: Some(0xFF),
            e: Some(0xFF),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn add_sp_immediate() {
    // LD SP, 0xCFFF; ADD SP, 0x05
    run_test(
        "31FFCFE805",
        &ExpectedState {
            sp: Some(0xD004),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );

    // LD SP, 0xD000; ADD SP, -1
    run_test(
        "3100D0E8FF",
        &ExpectedState {
            sp: Some(0xCFFF),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_hl_stack_pointer_offset() {
    // LD SP, 0xC008; LDHL SP, -1
    run_test(
        "3108C0F8FF",
        &ExpectedState {
            h: Some(0xC0),
            l: Some(0x07),
            sp: Some(0xC008),
            f: Some(0x30),
            ..ExpectedState::empty()
        },
    );
}
