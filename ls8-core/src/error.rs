use thiserror::Error;

/// Errors raised while loading or executing an LS-8 program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// The byte at `address` has no handler registered.
    #[error("unknown instruction 0x{opcode:02X} at address 0x{address:02X}")]
    UnknownInstruction { address: usize, opcode: u8 },

    /// A read or write touched an address outside of memory.
    #[error("address 0x{0:X} is out of bounds")]
    AddressOutOfBounds(usize),

    /// PUSH or POP would move the stack pointer outside of memory.
    #[error("stack pointer out of bounds: {op} with sp=0x{sp:02X}")]
    StackOutOfBounds { op: &'static str, sp: u8 },

    /// Register operand does not name one of R0..R7.
    #[error("register index {0} out of bounds")]
    InvalidRegister(u8),

    /// The program image does not fit in memory.
    #[error("program is {len} bytes, memory holds {capacity}")]
    ProgramTooLarge { len: usize, capacity: usize },

    /// The machine already executed HLT.
    #[error("machine is halted")]
    Halted,

    /// An earlier error stopped the machine.
    #[error("machine stopped after a fatal error")]
    Faulted,

    /// Writing program output failed.
    #[error("output error ({kind}): {message}")]
    Output {
        kind: std::io::ErrorKind,
        message: String,
    },
}

pub type VmResult<T> = Result<T, VmError>;

impl From<std::io::Error> for VmError {
    fn from(err: std::io::Error) -> Self {
        VmError::Output {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
