use crate::error::Chip8Error;
use crate::memory::CHIP8_PROGRAM_ADDR;

/// how many return addresses the call stack holds
pub const CHIP8_STACK_FRAMES: usize = 16;

/// index of the flag register
pub const VF: usize = 0xf;

/// Fixed-capacity call stack. Exceeding 16 frames or returning from an empty
/// stack is an error rather than anything the host language would default to.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: [u16; CHIP8_STACK_FRAMES],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; CHIP8_STACK_FRAMES],
            depth: 0,
        }
    }

    /// push a return address; `pc` is only used to describe the failure
    pub fn push(&mut self, addr: u16, pc: u16) -> Result<(), Chip8Error> {
        if self.depth == CHIP8_STACK_FRAMES {
            return Err(Chip8Error::StackOverflow { address: pc });
        }
        self.frames[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16, Chip8Error> {
        if self.depth == 0 {
            return Err(Chip8Error::StackUnderflow { address: pc });
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// the return addresses currently in use, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.depth]
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

/// # registers
///
///  - V0-VF: 8bit general purpose; VF is also carry/borrow/collision flag
///  - I: 16bit index register
///  - PC: 16bit program counter, starts at 0x200
///  - call stack of return addresses
#[derive(Clone, Debug)]
pub struct Registers {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: CallStack::new(),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
