//! LS-8 emulator core.
//!
//! A [`Machine`] owns 256 bytes of RAM, eight byte registers (R7 doubles as the
//! stack pointer), a program counter and the `00000LGE` flags register. Programs
//! are loaded as raw bytes (see [`loader`] for the text format) and executed by
//! [`Machine::run`] until `HLT` or a fault.

use thiserror::Error;

pub mod alu;
pub mod constants;
pub mod flags;
pub mod loader;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod snapshot;
pub mod state;

pub use alu::AluOp;
pub use constants::{MEMORY_SIZE, REGISTER_COUNT, SP, SP_INIT};
pub use flags::Flags;
pub use loader::{load_file, parse_program};
pub use machine::{Machine, MachineConfig, RunSummary, StepOutcome};
pub use memory::Memory;
pub use opcodes::{lookup, Instruction, OpcodeEntry, OPCODES};
pub use snapshot::MachineSnapshot;
pub use state::{CpuState, RunState};

pub type Result<T> = std::result::Result<T, Ls8Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum LoadError {
    #[error("program is empty")]
    Empty,
    #[error("program is {len} bytes; memory holds {max}", max = MEMORY_SIZE)]
    TooLarge { len: usize },
}

#[derive(Debug, Error)]
pub enum Ls8Error {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("address 0x{address:X} is outside memory")]
    OutOfBounds { address: usize },
    #[error("unsupported ALU operation: {0}")]
    UnsupportedOperation(String),
    #[error("unknown opcode 0b{opcode:08b} at pc 0x{pc:02X}")]
    UnknownOpcode { opcode: u8, pc: u8 },
    #[error("invalid register R{index}")]
    InvalidRegister { index: u8 },
    #[error("cycle limit of {limit} reached")]
    CycleLimit { limit: u64 },
    #[error("line {line}: invalid instruction {text:?}")]
    Parse { line: usize, text: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("serialize error: {0}")]
    Serde(#[from] serde_json::Error),
}
