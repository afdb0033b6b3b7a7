use super::{hash_map, run_test, set_in_state, ExpectedState, ALL_REGISTERS};

#[test]
fn load_register_immediate() {
    for (register, code) in ALL_REGISTERS {
        // LD r, 0x42
        let program = format!("{:02X}42", 0x06 | (code << 3));

        let mut expected_state = ExpectedState::empty();
        set_in_state(&mut expected_state, register, 0x42);

        run_test(&program, &expected_state);
    }
}

#[test]
fn load_register_register() {
    // LD B, 0x42; LD C, B
    run_test(
        "064248",
        &ExpectedState {
            b: Some(0x42),
            c: Some(0x42),
            ..ExpectedState::empty()
        },
    );

    // LD L, 0x99; LD A, L
    run_test(
        "2E997D",
        &ExpectedState {
            a: Some(0x99),
            l: Some(0x99),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_hl() {
    // LD HL, 0xC200; LD (HL), 0x5A; LD A, (HL)
    run_test(
        "2100C2365A7E",
        &ExpectedState {
            a: Some(0x5A),
            memory: hash_map!(0xC200: 0x5A),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_hl_increment_decrement() {
    // LD HL, 0xC000; LD A, 0x11; LD (HL+), A
    run_test(
        "2100C03E1122",
        &ExpectedState {
            h: Some(0xC0),
            l: Some(0x01),
            memory: hash_map!(0xC000: 0x11),
            ..ExpectedState::empty()
        },
    );

    // LD HL, 0xC000; LD A, 0x11; LD (HL-), A
    run_test(
        "2100C03E1132",
        &ExpectedState {
            h: Some(0xBF),
            l: Some(0xFF),
            memory: hash_map!(0xC000: 0x11),
            ..ExpectedState::empty()
        },
    );

    // LD HL, 0xC300; LD (HL), 0x77; LD HL, 0xC300; LD A, (HL+)
    run_test(
        "2100C336772100C32A",
        &ExpectedState {
            a: Some(0x77),
            h: Some(0xC3),
            l: Some(0x01),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_bc_de() {
    // LD BC, 0xC010; LD A, 0x12; LD (BC), A; LD DE, 0xC011; LD A, 0x34; LD (DE), A
    run_test(
        "0110C03E12021111C03E3412",
        &ExpectedState {
            memory: hash_map!(0xC010: 0x12, 0xC011: 0x34),
            ..ExpectedState::empty()
        },
    );

    // LD BC, 0xC020; LD A, 0x9D; LD (BC), A; LD A, 0x00; LD A, (BC)
    run_test(
        "0120C03E9D023E000A",
        &ExpectedState {
            a: Some(0x9D),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_high_page() {
    // LD A, 0x77; LDH (0x85), A; LD A, 0x00; LDH A, (0x85)
    run_test(
        "3E77E0853E00F085",
        &ExpectedState {
            a: Some(0x77),
            memory: hash_map!(0xFF85: 0x77),
            ..ExpectedState::empty()
        },
    );

    // LD C, 0x86; LD A, 0x66; LD (C), A
    run_test(
        "0E863E66E2",
        &ExpectedState {
            memory: hash_map!(0xFF86: 0x66),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_direct() {
    // LD A, 0x99; LD (0xC345), A; LD A, 0x00; LD A, (0xC345)
    run_test(
        "3E99EA45C33E00FA45C3",
        &ExpectedState {
            a: Some(0x99),
            memory: hash_map!(0xC345: 0x99),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn push_and_pop() {
    // LD BC, 0x1234; PUSH BC; POP DE
    run_test(
        "013412C5D1",
        &ExpectedState {
            d: Some(0x12),
            e: Some(0x34),
            sp: Some(0xFFFE),
            memory: hash_map!(0xFFFC: 0x34, 0xFFFD: 0x12),
            ..ExpectedState::empty()
        },
    );

    // LD BC, 0x12FF; PUSH BC; POP AF drops the low nibble of F
    run_test(
        "01FF12C5F1",
        &ExpectedState {
            a: Some(0x12),
            f: Some(0xF0),
            sp: Some(0xFFFE),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_direct_stack_pointer() {
    // LD SP, 0xCDEF; LD (0xC400), SP
    run_test(
        "31EFCD0800C4",
        &ExpectedState {
            sp: Some(0xCDEF),
            memory: hash_map!(0xC400: 0xEF, 0xC401: 0xCD),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_stack_pointer_hl() {
    // LD HL, 0xC123; LD SP, HL
    run_test(
        "2123C1F9",
        &ExpectedState {
            sp: Some(0xC123),
            h: Some(0xC1),
            l: Some(0x23),
            ..ExpectedState::empty()
        },
    );
}
