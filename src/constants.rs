//! Architectural constants for the LS-8.

/// Number of addressable bytes of RAM.
pub const MEMORY_SIZE: usize = 0x100;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Register reserved as the stack pointer.
pub const SP: u8 = 7;

/// Initial stack pointer value; the stack grows down from here.
pub const SP_INIT: u8 = 0xF4;
