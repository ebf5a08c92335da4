//! Core of the LS-8 VM
//! The machine is a register machine with a memory-backed stack. Each cycle
//! decodes one instruction at `pc` and dispatches it through a branch table.

use std::io::Write;

use crate::error::{VmError, VmResult};
use crate::runtime::disasm;
use crate::runtime::memory::Memory;
use crate::runtime::opcode::{self, Op};

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Register reserved for the stack pointer.
pub const SP: usize = 7;

/// Initial stack pointer, just below the reserved top of memory.
pub const STACK_START: u8 = 0xF4;

/// Signature of an instruction handler: `(cpu, operand_a, operand_b, output)`.
pub type Handler = fn(&mut Cpu, u8, u8, &mut dyn Write) -> VmResult<Flow>;

/// What the cycle should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
    /// Stopped by a fatal error; no further instructions are fetched.
    Faulted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineOptions {
    /// Print a trace line to stderr before every cycle.
    pub trace: bool,
}

/// Opcode-indexed handler table.
#[derive(Debug, Clone)]
pub struct BranchTable {
    handlers: [Option<Handler>; 256],
}

impl Default for BranchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchTable {
    /// Table with every implemented instruction registered.
    pub fn new() -> Self {
        let mut table = Self::empty();
        for op in opcode::ALL {
            table.register(op, Cpu::handler_for(op));
        }

        table
    }

    pub fn empty() -> Self {
        Self {
            handlers: [None; 256],
        }
    }

    pub fn register(&mut self, op: Op, handler: Handler) {
        self.handlers[op as usize] = Some(handler);
    }

    pub fn get(&self, opcode: u8) -> Option<Handler> {
        self.handlers[opcode as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Cpu {
    pc: usize,
    reg: [u8; REGISTER_COUNT],
    memory: Memory,

    state: State,
    options: MachineOptions,
    branchtable: BranchTable,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_options(MachineOptions::default())
    }

    pub fn with_options(options: MachineOptions) -> Self {
        let mut reg = [0; REGISTER_COUNT];
        reg[SP] = STACK_START;

        Self {
            pc: 0,
            reg,
            memory: Memory::new(),
            state: State::Running,
            options,
            branchtable: BranchTable::new(),
        }
    }

    /// Load a program image at address 0.
    pub fn load(&mut self, program: &[u8]) -> VmResult<()> {
        self.memory.load(program)?;
        log::debug!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.reg[SP]
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Value of register `index`.
    pub fn reg(&self, index: u8) -> VmResult<u8> {
        self.reg
            .get(index as usize)
            .copied()
            .ok_or(VmError::InvalidRegister(index))
    }

    fn reg_mut(&mut self, index: u8) -> VmResult<&mut u8> {
        self.reg
            .get_mut(index as usize)
            .ok_or(VmError::InvalidRegister(index))
    }

    /// Run a single fetch/decode/execute cycle.
    ///
    /// Any error is fatal: the machine moves to [`State::Faulted`] and every
    /// later call fails without fetching.
    pub fn step(&mut self, out: &mut dyn Write) -> VmResult<State> {
        match self.state {
            State::Running => {}
            State::Halted => return Err(VmError::Halted),
            State::Faulted => return Err(VmError::Faulted),
        }

        self.cycle(out).inspect_err(|e| {
            log::debug!("fault at {:02X}: {}", self.pc, e);
            self.state = State::Faulted;
        })
    }

    fn cycle(&mut self, out: &mut dyn Write) -> VmResult<State> {
        if self.options.trace {
            eprintln!("{}", self.trace());
        }

        let address = self.pc;
        let ir = self.memory.read(address)?;
        let handler = self
            .branchtable
            .get(ir)
            .ok_or(VmError::UnknownInstruction {
                address,
                opcode: ir,
            })?;

        // Only fetch the operands the instruction declares, so a short
        // instruction near the top of memory never reads past the end.
        let operand_count = opcode::operand_count(ir);
        let mut operands = [0u8; 2];
        for (i, slot) in operands.iter_mut().take(operand_count).enumerate() {
            *slot = self.memory.read(address + 1 + i)?;
        }

        log::trace!(
            "{:02X}: {}",
            address,
            disasm::disasm_instruction(self.memory.as_slice(), address).0
        );

        match handler(self, operands[0], operands[1], out)? {
            Flow::Continue => {
                self.pc += operand_count + 1;
            }
            Flow::Halt => {
                log::debug!("halted at {:02X}", address);
                self.state = State::Halted;
            }
        }

        Ok(self.state)
    }

    /// Cycle until the program halts.
    pub fn run(&mut self, out: &mut dyn Write) -> VmResult<()> {
        while self.step(out)? == State::Running {}
        Ok(())
    }

    /// Load `program` and run it to completion.
    pub fn run_with(&mut self, program: &[u8], out: &mut dyn Write) -> VmResult<()> {
        self.load(program)?;
        self.run(out)
    }

    /// One line summary of the machine state.
    pub fn trace(&self) -> String {
        let cell = |offset: usize| match self.memory.read(self.pc + offset) {
            Ok(byte) => format!("{:02X}", byte),
            Err(_) => "--".to_string(),
        };

        let mut line = format!(
            "TRACE: {:02X} | {} {} {} |",
            self.pc,
            cell(0),
            cell(1),
            cell(2)
        );
        for value in self.reg {
            line.push_str(&format!(" {:02X}", value));
        }

        line
    }

    // Handlers
    // --------------------------------------

    fn handler_for(op: Op) -> Handler {
        match op {
            Op::HLT => Cpu::handle_hlt,
            Op::LDI => Cpu::handle_ldi,
            Op::PRN => Cpu::handle_prn,
            Op::PUSH => Cpu::handle_push,
            Op::POP => Cpu::handle_pop,

            Op::ADD => Cpu::alu_handle_add,
            Op::SUB => Cpu::alu_handle_sub,
            Op::MUL => Cpu::alu_handle_mul,
            Op::INC => Cpu::alu_handle_inc,
            Op::DEC => Cpu::alu_handle_dec,
        }
    }

    fn handle_hlt(&mut self, _a: u8, _b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        Ok(Flow::Halt)
    }

    fn handle_ldi(&mut self, a: u8, b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        *self.reg_mut(a)? = b;
        Ok(Flow::Continue)
    }

    fn handle_prn(&mut self, a: u8, _b: u8, out: &mut dyn Write) -> VmResult<Flow> {
        writeln!(out, "{}", self.reg(a)?)?;
        Ok(Flow::Continue)
    }

    fn handle_push(&mut self, a: u8, _b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        self.reg(a)?;

        let sp = self.reg[SP];
        self.reg[SP] = sp
            .checked_sub(1)
            .ok_or(VmError::StackOutOfBounds { op: "PUSH", sp })?;

        // Read after the decrement: pushing R7 pushes the new stack pointer.
        let value = self.reg(a)?;
        self.memory.write(self.reg[SP] as usize, value)?;
        Ok(Flow::Continue)
    }

    fn handle_pop(&mut self, a: u8, _b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        self.reg(a)?;

        let sp = self.reg[SP];
        let value = self.memory.read(sp as usize)?;

        // Popping into R7 replaces the stack pointer before the increment.
        let base = if a as usize == SP { value } else { sp };
        let next_sp = base
            .checked_add(1)
            .ok_or(VmError::StackOutOfBounds { op: "POP", sp })?;

        *self.reg_mut(a)? = value;
        self.reg[SP] = next_sp;
        Ok(Flow::Continue)
    }

    // ALU
    // --------------------------------------

    fn alu_binary(&mut self, a: u8, b: u8, f: fn(u8, u8) -> u8) -> VmResult<Flow> {
        let rhs = self.reg(b)?;
        let lhs = self.reg_mut(a)?;
        *lhs = f(*lhs, rhs);
        Ok(Flow::Continue)
    }

    fn alu_handle_add(&mut self, a: u8, b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        self.alu_binary(a, b, u8::wrapping_add)
    }

    fn alu_handle_sub(&mut self, a: u8, b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        self.alu_binary(a, b, u8::wrapping_sub)
    }

    fn alu_handle_mul(&mut self, a: u8, b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        self.alu_binary(a, b, u8::wrapping_mul)
    }

    fn alu_handle_inc(&mut self, a: u8, _b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        let r = self.reg_mut(a)?;
        *r = r.wrapping_add(1);
        Ok(Flow::Continue)
    }

    fn alu_handle_dec(&mut self, a: u8, _b: u8, _out: &mut dyn Write) -> VmResult<Flow> {
        let r = self.reg_mut(a)?;
        *r = r.wrapping_sub(1);
        Ok(Flow::Continue)
    }
}
