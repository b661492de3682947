//!
//! ## Design
//!
//! * faithful to the original CHIP-8 instruction semantics, quirks included
//! * one `cycle()` is one frame: a batch of instructions, a timer tick and a
//!   paint; the host calls it at 60Hz
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * input device, with trait for reading key-presses
//! * audio device, with trait for making beeps
//!
//! Model
//!
//! Environment (main.rs)
//!  |-- config, display, input, sound
//!  |-- interpreter(display, input, sound)
//!  |    |-- memory: 4K, font at 0x000, program at 0x200
//!  |    |-- registers: V0-VF, I, PC, 16 deep call stack
//!  |    |-- timers: delay, sound
//!  |    `-- instruction set: decode word -> Instruction, then execute
//!  `-- main loop
//!       |-- deliver key-downs (resumes a waiting LD Vx, K)
//!       |-- interpreter.cycle()
//!       `-- sleep out the rest of the frame
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;

pub use error::Chip8Error;
pub use interpreter::Chip8Interpreter;
