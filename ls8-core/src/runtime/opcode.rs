//! LS-8 instruction encoding.
//!
//! An opcode byte is laid out as `AABCDDDD`:
//!
//! * `AA` - number of operand bytes that follow (0, 1 or 2)
//! * `B`  - set for instructions handled by the ALU
//! * `C`  - set for instructions that set the program counter themselves
//! * `DDDD` - instruction identifier
//!
//! Only the operand count is used for decoding; the other bits just group
//! related instructions.

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    HLT = 0b0000_0001,

    // Data movement
    LDI = 0b1000_0010,
    PRN = 0b0100_0111,

    // Stack
    PUSH = 0b0100_0101,
    POP = 0b0100_0110,

    // ALU
    ADD = 0b1010_0000,
    SUB = 0b1010_0001,
    MUL = 0b1010_0010,
    INC = 0b0110_0101,
    DEC = 0b0110_0110,
}

/// Every instruction the machine knows how to decode, in branch table order.
pub const ALL: [Op; 10] = [
    Op::HLT,
    Op::LDI,
    Op::PRN,
    Op::PUSH,
    Op::POP,
    Op::ADD,
    Op::SUB,
    Op::MUL,
    Op::INC,
    Op::DEC,
];

impl TryFrom<u8> for Op {
    type Error = &'static str;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0b0000_0001 => Ok(Op::HLT),
            0b1000_0010 => Ok(Op::LDI),
            0b0100_0111 => Ok(Op::PRN),
            0b0100_0101 => Ok(Op::PUSH),
            0b0100_0110 => Ok(Op::POP),
            0b1010_0000 => Ok(Op::ADD),
            0b1010_0001 => Ok(Op::SUB),
            0b1010_0010 => Ok(Op::MUL),
            0b0110_0101 => Ok(Op::INC),
            0b0110_0110 => Ok(Op::DEC),
            _ => Err("Unknown opcode"),
        }
    }
}

impl Op {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::HLT => "HLT",
            Op::LDI => "LDI",
            Op::PRN => "PRN",
            Op::PUSH => "PUSH",
            Op::POP => "POP",
            Op::ADD => "ADD",
            Op::SUB => "SUB",
            Op::MUL => "MUL",
            Op::INC => "INC",
            Op::DEC => "DEC",
        }
    }

    pub fn operand_count(self) -> usize {
        operand_count(self as u8)
    }
}

/// Number of operand bytes encoded in the top two bits of `opcode`.
pub fn operand_count(opcode: u8) -> usize {
    (opcode >> 6) as usize
}
