//! LS-8: a small 8-bit byte-code virtual machine.
//!
//! The machine has 256 bytes of memory, eight byte-wide registers (R7 doubles
//! as the stack pointer) and a table-driven fetch/decode/execute loop.

pub mod error;
pub mod runtime;

pub use error::{VmError, VmResult};
pub use runtime::machine::{Cpu, MachineOptions, State};
pub use runtime::memory::{MEMORY_SIZE, Memory};
pub use runtime::opcode::Op;
