//! Register file, program counter and flags.

use crate::constants::{REGISTER_COUNT, SP, SP_INIT};
use crate::flags::Flags;
use crate::{Ls8Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    regs: [u8; REGISTER_COUNT],
    pc: u8,
    fl: Flags,
    run_state: RunState,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuState {
    pub fn new() -> Self {
        let mut regs = [0u8; REGISTER_COUNT];
        regs[SP as usize] = SP_INIT;
        Self {
            regs,
            pc: 0,
            fl: Flags::empty(),
            run_state: RunState::Running,
        }
    }

    pub fn get_reg(&self, index: u8) -> Result<u8> {
        self.regs
            .get(index as usize)
            .copied()
            .ok_or(Ls8Error::InvalidRegister { index })
    }

    pub fn set_reg(&mut self, index: u8, value: u8) -> Result<()> {
        let slot = self
            .regs
            .get_mut(index as usize)
            .ok_or(Ls8Error::InvalidRegister { index })?;
        *slot = value;
        Ok(())
    }

    pub fn registers(&self) -> [u8; REGISTER_COUNT] {
        self.regs
    }

    pub fn set_registers(&mut self, regs: [u8; REGISTER_COUNT]) {
        self.regs = regs;
    }

    pub fn sp(&self) -> u8 {
        self.regs[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs[SP as usize] = value;
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn set_pc(&mut self, value: u8) {
        self.pc = value;
    }

    pub fn advance_pc(&mut self, len: u8) {
        self.pc = self.pc.wrapping_add(len);
    }

    pub fn flags(&self) -> Flags {
        self.fl
    }

    pub fn set_flags(&mut self, fl: Flags) {
        self.fl = fl;
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    pub fn halt(&mut self) {
        self.run_state = RunState::Halted;
    }

    pub fn is_halted(&self) -> bool {
        self.run_state == RunState::Halted
    }

    /// Prepare for a freshly loaded program. General registers keep their values.
    pub fn rewind(&mut self) {
        self.pc = 0;
        self.fl = Flags::empty();
        self.set_sp(SP_INIT);
        self.run_state = RunState::Running;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
