use crate::runtime::opcode::Op;

/// Disassemble the instruction at `addr`, returning its text and length.
///
/// Bytes that do not decode to a known instruction, or whose operands run
/// past the end of `memory`, are shown as a single `DB` byte.
pub fn disasm_instruction(memory: &[u8], addr: usize) -> (String, usize) {
    let Some(&byte) = memory.get(addr) else {
        return ("??".to_string(), 1);
    };

    let data_byte = (format!("DB 0x{:02X}", byte), 1);
    let Ok(op) = Op::try_from(byte) else {
        return data_byte;
    };

    let len = op.operand_count() + 1;
    let Some(operands) = memory.get(addr + 1..addr + len) else {
        return data_byte;
    };

    let text = match (op, operands) {
        (Op::LDI, [reg, value]) => format!("LDI R{},{}", reg, value),
        (_, [a, b]) => format!("{} R{},R{}", op.mnemonic(), a, b),
        (_, [a]) => format!("{} R{}", op.mnemonic(), a),
        _ => op.mnemonic().to_string(),
    };

    (text, len)
}

/// Disassemble the first `len` bytes of `memory`, one instruction per line.
pub fn disassemble(memory: &[u8], len: usize) -> Vec<String> {
    let end = len.min(memory.len());
    let mut lines = Vec::new();
    let mut addr = 0;

    while addr < end {
        let (text, size) = disasm_instruction(memory, addr);
        let bytes: Vec<String> = memory[addr..addr + size]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect();

        lines.push(format!("{:02X}: {:<9} {}", addr, bytes.join(" "), text));
        addr += size;
    }

    lines
}
