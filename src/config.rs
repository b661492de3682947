use clap::Parser;
use std::path::PathBuf;

use crate::error::Chip8Error;
use crate::input::KeyBindings;
use crate::interpreter::{DEFAULT_FRAME_RATE, DEFAULT_SPEED};
use crate::sound::SIMPLEBEEP_PITCH;

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "chip8vm", version, about)]
pub struct Config {
    /// program to load at 0x200
    pub rom: PathBuf,

    /// instructions per frame
    #[arg(short, long, default_value_t = DEFAULT_SPEED)]
    pub speed: u32,

    /// frames per second
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = parse_frame_rate)]
    pub fps: f64,

    /// stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// host keys for chip-8 keys 0..f, '.' for unbound
    #[arg(short, long, default_value = "x123qweasdzc4rfv")]
    pub keys: String,

    /// beep pitch in Hz
    #[arg(long, default_value_t = SIMPLEBEEP_PITCH)]
    pub pitch: u16,

    /// no beeping
    #[arg(short, long)]
    pub mute: bool,

    /// seed for the RND instruction
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_frame_rate(arg: &str) -> Result<f64, String> {
    let rate: f64 = arg.parse().map_err(|e| format!("{}", e))?;
    if rate > 0.0 && rate.is_finite() {
        Ok(rate)
    } else {
        Err(Chip8Error::InvalidFrameRate(rate).to_string())
    }
}

impl Config {
    pub fn key_bindings(&self) -> Result<KeyBindings, Chip8Error> {
        KeyBindings::from_layout(&self.keys)
    }
}
