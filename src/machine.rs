//! Fetch-decode-execute driver.

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::{debug, trace, warn};

use crate::alu;
use crate::constants::MEMORY_SIZE;
use crate::flags::Flags;
use crate::memory::Memory;
use crate::opcodes::{DecodeTable, Instruction, OpcodeEntry};
use crate::snapshot::MachineSnapshot;
use crate::state::{CpuState, RunState};
use crate::{Ls8Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Stop with [`Ls8Error::CycleLimit`] after this many instructions.
    pub max_cycles: Option<u64>,
    /// Emit a `TRACE:` line at `trace` level before every instruction.
    pub trace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed by this call, `HLT` included.
    pub cycles: u64,
}

pub struct Machine {
    memory: Memory,
    state: CpuState,
    decode: DecodeTable,
    config: MachineConfig,
    cycles: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            memory: Memory::new(),
            state: CpuState::new(),
            decode: DecodeTable::new(),
            config,
            cycles: 0,
        }
    }

    /// Copy `program` into RAM at address 0 and rewind PC, FL and SP.
    ///
    /// Bytes past the end of the program are zeroed. On error the machine is
    /// left exactly as it was.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let mut image = Memory::new();
        image.load_program(program)?;
        self.memory = image;
        self.state.rewind();
        self.cycles = 0;
        debug!(bytes = program.len(), "program loaded");
        Ok(())
    }

    /// Back to power-on state with empty memory.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.state.reset();
        self.cycles = 0;
    }

    pub fn read(&self, mar: usize) -> Result<u8> {
        self.memory.read(mar)
    }

    pub fn write(&mut self, mar: usize, mdr: u8) -> Result<()> {
        self.memory.write(mar, mdr)
    }

    pub fn register(&self, index: u8) -> Result<u8> {
        self.state.get_reg(index)
    }

    pub fn set_register(&mut self, index: u8, value: u8) -> Result<()> {
        self.state.set_reg(index, value)
    }

    pub fn pc(&self) -> u8 {
        self.state.pc()
    }

    pub fn flags(&self) -> Flags {
        self.state.flags()
    }

    pub fn stack_pointer(&self) -> u8 {
        self.state.sp()
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    /// Instructions executed since the last load or reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run until `HLT`, printing `PRN` output to stdout.
    pub fn run_to_stdout(&mut self) -> Result<RunSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let summary = self.run(&mut out)?;
        out.flush()?;
        Ok(summary)
    }

    /// Run until `HLT`. Any fault halts the machine and is returned.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<RunSummary> {
        let start = self.cycles;
        loop {
            if self.is_halted() {
                break;
            }
            if let Some(limit) = self.config.max_cycles {
                if self.cycles >= limit {
                    self.state.halt();
                    warn!(limit, pc = self.state.pc(), "cycle limit reached");
                    return Err(Ls8Error::CycleLimit { limit });
                }
            }
            if self.step(out)? == StepOutcome::Halted {
                break;
            }
        }
        Ok(RunSummary {
            cycles: self.cycles - start,
        })
    }

    /// Execute a single instruction.
    pub fn step<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<StepOutcome> {
        if self.is_halted() {
            return Ok(StepOutcome::Halted);
        }
        if self.config.trace {
            trace!(target: "ls8::trace", "{}", self.trace_line());
        }
        let pc = self.state.pc();
        match self.execute(out) {
            Ok(outcome) => {
                self.cycles += 1;
                if outcome == StepOutcome::Halted {
                    debug!(pc, cycles = self.cycles, "halted");
                }
                Ok(outcome)
            }
            Err(err) => {
                self.state.halt();
                warn!(pc, "fault: {err}");
                Err(err)
            }
        }
    }

    fn execute<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<StepOutcome> {
        let pc = self.state.pc();
        let opcode = self.memory.read(pc as usize)?;
        let entry = self
            .decode
            .decode(opcode)
            .ok_or(Ls8Error::UnknownOpcode { opcode, pc })?;
        let (operand_a, operand_b) = self.fetch_operands(pc, entry)?;

        match entry.instruction {
            Instruction::Hlt => {
                self.state.advance_pc(entry.length());
                self.state.halt();
                return Ok(StepOutcome::Halted);
            }
            Instruction::Ldi => self.state.set_reg(operand_a, operand_b)?,
            Instruction::Prn => {
                let value = self.state.get_reg(operand_a)?;
                writeln!(out, "{value}")?;
            }
            Instruction::Alu(op) => alu::apply(&mut self.state, op, operand_a, operand_b)?,
            // SP moves first, so `PUSH R7` stores the decremented pointer.
            Instruction::Push => {
                let sp = self.decrement_sp();
                let value = self.state.get_reg(operand_a)?;
                self.memory.write(sp as usize, value)?;
            }
            // The register is written before SP is bumped, so `POP R7`
            // leaves SP one past the popped byte.
            Instruction::Pop => {
                let value = self.memory.read(self.state.sp() as usize)?;
                self.state.set_reg(operand_a, value)?;
                self.increment_sp();
            }
            Instruction::Call => {
                let sp = self.decrement_sp();
                self.memory
                    .write(sp as usize, pc.wrapping_add(entry.length()))?;
                let target = self.state.get_reg(operand_a)?;
                self.state.set_pc(target);
            }
            Instruction::Ret => {
                let target = self.memory.read(self.state.sp() as usize)?;
                self.increment_sp();
                self.state.set_pc(target);
            }
            Instruction::Jmp => {
                let target = self.state.get_reg(operand_a)?;
                self.state.set_pc(target);
            }
            Instruction::Jeq | Instruction::Jne => {
                let equal = self.state.flags().contains(Flags::EQUAL);
                let taken = equal == (entry.instruction == Instruction::Jeq);
                if taken {
                    let target = self.state.get_reg(operand_a)?;
                    self.state.set_pc(target);
                } else {
                    self.state.advance_pc(entry.length());
                }
            }
        }

        if !entry.sets_pc() {
            self.state.advance_pc(entry.length());
        }
        Ok(StepOutcome::Continue)
    }

    // Only operands the instruction declares are read, so a 1-byte HLT in the
    // last cell does not fault.
    fn fetch_operands(&self, pc: u8, entry: &OpcodeEntry) -> Result<(u8, u8)> {
        let base = pc as usize;
        let operand_a = if entry.operands >= 1 {
            self.memory.read(base + 1)?
        } else {
            0
        };
        let operand_b = if entry.operands >= 2 {
            self.memory.read(base + 2)?
        } else {
            0
        };
        Ok((operand_a, operand_b))
    }

    fn decrement_sp(&mut self) -> u8 {
        let sp = self.state.sp().wrapping_sub(1);
        self.state.set_sp(sp);
        sp
    }

    fn increment_sp(&mut self) {
        self.state.set_sp(self.state.sp().wrapping_add(1));
    }

    /// `TRACE: PC | op a b | R0 .. R7` in hex.
    pub fn trace_line(&self) -> String {
        let pc = self.state.pc() as usize;
        let peek = |addr: usize| self.memory.as_slice().get(addr).copied().unwrap_or(0);
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            pc,
            peek(pc),
            peek(pc + 1),
            peek(pc + 2)
        );
        for reg in self.state.registers() {
            let _ = write!(line, " {reg:02X}");
        }
        line
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            pc: self.state.pc(),
            fl: self.state.flags().bits(),
            registers: self.state.registers(),
            halted: self.state.is_halted(),
            cycles: self.cycles,
            memory: self.memory.as_slice().to_vec(),
        }
    }

    pub fn restore(&mut self, snapshot: &MachineSnapshot) -> Result<()> {
        if snapshot.memory.len() > MEMORY_SIZE {
            return Err(Ls8Error::InvalidSnapshot(format!(
                "memory image is {} bytes, expected at most {MEMORY_SIZE}",
                snapshot.memory.len()
            )));
        }
        let mut image = Memory::new();
        for (addr, byte) in snapshot.memory.iter().enumerate() {
            image.write(addr, *byte)?;
        }
        self.memory = image;
        self.state.set_registers(snapshot.registers);
        self.state.set_pc(snapshot.pc);
        self.state.set_flags(Flags::from_bits_truncate(snapshot.fl));
        self.state.set_run_state(if snapshot.halted {
            RunState::Halted
        } else {
            RunState::Running
        });
        self.cycles = snapshot.cycles;
        Ok(())
    }
}
