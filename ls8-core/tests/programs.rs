use ls8_core::{Cpu, Op, State, VmError};
use proptest::prelude::*;

const HLT: u8 = Op::HLT as u8;
const LDI: u8 = Op::LDI as u8;
const PRN: u8 = Op::PRN as u8;
const PUSH: u8 = Op::PUSH as u8;
const POP: u8 = Op::POP as u8;
const ADD: u8 = Op::ADD as u8;
const SUB: u8 = Op::SUB as u8;
const MUL: u8 = Op::MUL as u8;

fn run(program: &[u8]) -> Result<(Cpu, String), VmError> {
    let mut mach = Cpu::new();
    let mut out = Vec::new();
    mach.run_with(program, &mut out)?;
    Ok((mach, String::from_utf8(out).unwrap()))
}

#[test]
fn test_mult_program() {
    let (mach, out) = run(&[LDI, 0, 8, LDI, 1, 9, MUL, 0, 1, PRN, 0, HLT]).unwrap();
    assert_eq!(out, "72\n");
    assert_eq!(mach.state(), State::Halted);
}

#[test]
fn test_stack_program() {
    let (mach, out) = run(&[LDI, 0, 5, PUSH, 0, LDI, 0, 0, POP, 0, PRN, 0, HLT]).unwrap();
    assert_eq!(out, "5\n");
    assert_eq!(mach.sp(), 0xF4);
}

#[test]
fn test_print_order() {
    let (_, out) = run(&[
        LDI, 0, 1, LDI, 1, 2, PUSH, 0, PUSH, 1, POP, 0, POP, 1, PRN, 0, PRN, 1, HLT,
    ])
    .unwrap();
    assert_eq!(out, "2\n1\n");
}

#[test]
fn test_nothing_after_halt_runs() {
    // the byte after HLT is not a valid opcode, so fetching it would fail
    let (mach, out) = run(&[LDI, 0, 1, PRN, 0, HLT, 0x00, PRN, 0]).unwrap();
    assert_eq!(out, "1\n");
    assert_eq!(mach.pc(), 5);
}

#[test]
fn test_unknown_opcode_is_fatal() {
    let err = run(&[LDI, 0, 1, 0xFF]).unwrap_err();
    assert_eq!(
        err,
        VmError::UnknownInstruction {
            address: 3,
            opcode: 0xFF
        }
    );
    assert_eq!(
        err.to_string(),
        "unknown instruction 0xFF at address 0x03"
    );
}

proptest! {
    #[test]
    fn ldi_then_prn_prints_value(r in 0u8..8, v in any::<u8>()) {
        let (_, out) = run(&[LDI, r, v, PRN, r, HLT]).unwrap();
        prop_assert_eq!(out, format!("{}\n", v));
    }

    #[test]
    fn push_pop_round_trip(r in 0u8..7, v in any::<u8>()) {
        let (mach, _) = run(&[LDI, r, v, PUSH, r, POP, r, HLT]).unwrap();
        prop_assert_eq!(mach.reg(r).unwrap(), v);
        prop_assert_eq!(mach.sp(), 0xF4);
    }

    #[test]
    fn alu_is_modulo_256(a in any::<u8>(), b in any::<u8>()) {
        let (mach, _) = run(&[
            LDI, 0, a, LDI, 1, b, ADD, 0, 1,
            LDI, 2, a, LDI, 3, b, SUB, 2, 3,
            LDI, 4, a, LDI, 5, b, MUL, 4, 5,
            HLT,
        ]).unwrap();
        prop_assert_eq!(mach.reg(0).unwrap(), ((a as u16 + b as u16) % 256) as u8);
        prop_assert_eq!(mach.reg(2).unwrap(), ((256 + a as u16 - b as u16) % 256) as u8);
        prop_assert_eq!(mach.reg(4).unwrap(), ((a as u16 * b as u16) % 256) as u8);
    }
}
