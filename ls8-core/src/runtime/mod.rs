pub mod disasm;
pub mod machine;
pub mod memory;
pub mod opcode;
