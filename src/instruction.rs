//! # instruction set
//!
//! A CHIP-8 instruction is a big-endian 16bit word:
//!
//! ```text
//!  i    x    y    e
//! [15..12][11..8][7..4][3..0]
//!            [   kk    ]
//!       [      nnn     ]
//! ```
//!
//! `i` picks the class. Classes 0x0, 0x8, 0xE and 0xF need a second look at
//! `kk` or `e` to find the actual instruction.
use crate::error::Chip8Error;

/// the fields of an instruction word
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub i: u8,
    pub x: u8,
    pub y: u8,
    pub kk: u8,
    pub nnn: u16,
    pub e: u8,
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode {
            i: ((word & 0xf000) >> 12) as u8,
            x: ((word & 0x0f00) >> 8) as u8,
            y: ((word & 0x00f0) >> 4) as u8,
            kk: (word & 0x00ff) as u8,
            nnn: word & 0x0fff,
            e: (word & 0x000f) as u8,
        }
    }
}

/// Every instruction the interpreter knows about, carrying the operands it
/// needs. Registers are indices 0x0-0xf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp { nnn: u16 },
    /// 2nnn
    Call { nnn: u16 },
    /// 3xkk
    SeByte { x: u8, kk: u8 },
    /// 4xkk
    SneByte { x: u8, kk: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xkk
    LdByte { x: u8, kk: u8 },
    /// 7xkk
    AddByte { x: u8, kk: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI { nnn: u16 },
    /// Bnnn
    JpV0 { nnn: u16 },
    /// Cxkk
    Rnd { x: u8, kk: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp { x: u8 },
    /// ExA1
    Sknp { x: u8 },
    /// Fx07
    LdVxDt { x: u8 },
    /// Fx0A
    LdVxK { x: u8 },
    /// Fx15
    LdDtVx { x: u8 },
    /// Fx18
    LdStVx { x: u8 },
    /// Fx1E
    AddIVx { x: u8 },
    /// Fx29
    LdFVx { x: u8 },
    /// Fx33
    LdBVx { x: u8 },
    /// Fx55
    LdIVx { x: u8 },
    /// Fx65
    LdVxI { x: u8 },
}

impl Instruction {
    /// Resolve a word to an instruction, keyed on (i, kk, e). Anything that
    /// doesn't resolve, including 0nnn machine calls, is an error.
    pub fn decode(word: u16) -> Result<Instruction, Chip8Error> {
        use Instruction::*;
        let Opcode {
            i,
            x,
            y,
            kk,
            nnn,
            e,
        } = Opcode::from(word);
        let instruction = match (i, kk, e) {
            (0x0, 0xe0, _) => Cls,
            (0x0, 0xee, _) => Ret,
            (0x1, _, _) => Jp { nnn },
            (0x2, _, _) => Call { nnn },
            (0x3, _, _) => SeByte { x, kk },
            (0x4, _, _) => SneByte { x, kk },
            (0x5, _, _) => SeReg { x, y },
            (0x6, _, _) => LdByte { x, kk },
            (0x7, _, _) => AddByte { x, kk },
            (0x8, _, 0x0) => LdReg { x, y },
            (0x8, _, 0x1) => Or { x, y },
            (0x8, _, 0x2) => And { x, y },
            (0x8, _, 0x3) => Xor { x, y },
            (0x8, _, 0x4) => AddReg { x, y },
            (0x8, _, 0x5) => Sub { x, y },
            (0x8, _, 0x6) => Shr { x },
            (0x8, _, 0x7) => Subn { x, y },
            (0x8, _, 0xe) => Shl { x },
            (0x9, _, _) => SneReg { x, y },
            (0xa, _, _) => LdI { nnn },
            (0xb, _, _) => JpV0 { nnn },
            (0xc, _, _) => Rnd { x, kk },
            (0xd, _, _) => Drw { x, y, n: e },
            (0xe, 0x9e, _) => Skp { x },
            (0xe, 0xa1, _) => Sknp { x },
            (0xf, 0x07, _) => LdVxDt { x },
            (0xf, 0x0a, _) => LdVxK { x },
            (0xf, 0x15, _) => LdDtVx { x },
            (0xf, 0x18, _) => LdStVx { x },
            (0xf, 0x1e, _) => AddIVx { x },
            (0xf, 0x29, _) => LdFVx { x },
            (0xf, 0x33, _) => LdBVx { x },
            (0xf, 0x55, _) => LdIVx { x },
            (0xf, 0x65, _) => LdVxI { x },
            (i, kk, e) => return Err(Chip8Error::UnknownOpcode { i, kk, e }),
        };
        Ok(instruction)
    }
}
