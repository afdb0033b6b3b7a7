use super::{hash_map, run_test, ExpectedState};

#[test]
fn rotate_accumulator() {
    // LD A, 0x85; RLCA always clears Z
    run_test(
        "3E8507",
        &ExpectedState {
            a: Some(0x0B),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD A, 0x80; RLA rotates through a clear carry
    run_test(
        "B73E8017",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x01; RRCA
    run_test(
        "3E010F",
        &ExpectedState {
            a: Some(0x80),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD A, 0x01; RRA
    run_test(
        "B73E011F",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn rotate_register() {
    // LD B, 0x85; RLC B
    run_test(
        "0685CB00",
        &ExpectedState {
            b: Some(0x0B),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // LD B, 0x00; RLC B sets Z, unlike RLCA
    run_test(
        "0600CB00",
        &ExpectedState {
            b: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    // SCF; LD B, 0x00; RL B shifts the carry in
    run_test(
        "370600CB10",
        &ExpectedState {
            b: Some(0x01),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // LD C, 0x01; RRC C
    run_test(
        "0E01CB09",
        &ExpectedState {
            c: Some(0x80),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD C, 0x02; RR C
    run_test(
        "B70E02CB19",
        &ExpectedState {
            c: Some(0x01),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn shifts() {
    // LD D, 0xC0; SLA D
    run_test(
        "16C0CB22",
        &ExpectedState {
            d: Some(0x80),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // LD E, 0x81; SRA E preserves the sign bit
    run_test(
        "1E81CB2B",
        &ExpectedState {
            e: Some(0xC0),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    // LD H, 0x81; SRL H shifts zero in
    run_test(
        "2681CB3C",
        &ExpectedState {
            h: Some(0x40),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn swap() {
    // LD L, 0xAB; SWAP L
    run_test(
        "2EABCB35",
        &ExpectedState {
            l: Some(0xBA),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    // LD L, 0x00; SWAP L
    run_test(
        "2E00CB35",
        &ExpectedState {
            l: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn test_bit() {
    // OR A; LD A, 0x08; BIT 3, A
    run_test(
        "B73E08CB5F",
        &ExpectedState {
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    // OR A; LD A, 0x08; BIT 0, A
    run_test(
        "B73E08CB47",
        &ExpectedState {
            f: Some(0xA0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn set_and_reset_bit() {
    // LD A, 0xFF; RES 3, A
    run_test(
        "3EFFCB9F",
        &ExpectedState {
            a: Some(0xF7),
            ..ExpectedState::empty()
        },
    );

    // LD A, 0x00; SET 7, A
    run_test(
        "3E00CBFF",
        &ExpectedState {
            a: Some(0x80),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn indirect_hl_operand() {
    // LD HL, 0xC100; LD (HL), 0x85; RLC (HL)
    run_test(
        "2100C13685CB06",
        &ExpectedState {
            f: Some(0x10),
            memory: hash_map!(0xC100: 0x0B),
            ..ExpectedState::empty()
        },
    );

    // LD HL, 0xC101; LD (HL), 0x01; SET 6, (HL)
    run_test(
        "2101C13601CBF6",
        &ExpectedState {
            memory: hash_map!(0xC101: 0x41),
            ..ExpectedState::empty()
        },
    );
}
