use std::io;

/// Everything that can stop the interpreter. All of these are fatal for the
/// running program; arithmetic never fails.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("Wrong opcode: i:{i:#x}, kk:{kk:#04x}, e:{e:#x}")]
    UnknownOpcode { i: u8, kk: u8, e: u8 },

    #[error("Stack overflow: CALL at {address:#05x} with all 16 frames in use")]
    StackOverflow { address: u16 },

    #[error("Stack underflow: RET at {address:#05x} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("Memory access out of bounds at address {address:#06x}")]
    MemoryOutOfBounds { address: usize },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Invalid key layout {0:?}: expected 16 characters, '.' for unbound keys")]
    InvalidKeyLayout(String),

    #[error("Invalid frame rate {0}: must be a positive number of frames per second")]
    InvalidFrameRate(f64),

    #[error(transparent)]
    Io(#[from] io::Error),
}
