/// # interpreter
///
/// Fetch, decode, execute. One call to `cycle` is one frame:
///  1. run `speed` instructions, unless waiting on a key
///  2. count the timers down, unless waiting on a key
///  3. paint the display, always
///
/// The only time execution suspends is `LD Vx, K`. That sets `paused` and
/// remembers which register wants the key; `key_down` fills it in and
/// resumes. Everything else runs to completion or stops with an error.
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spin_sleep::LoopHelper;

use crate::display::{Display, FrameBuffer, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use crate::error::Chip8Error;
use crate::input::{Input, KeyBindings};
use crate::instruction::Instruction;
use crate::memory::{Chip8Memory, MemoryMap};
use crate::registers::{Registers, VF};
use crate::sound::{tone_duration, Sound};
use crate::timer::Timers;

/// instructions per frame unless told otherwise
pub const DEFAULT_SPEED: u32 = 10;

/// frames per second for `main_loop` unless told otherwise
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// rows drawn by `DRW Vx, Vy, 0`
const CHIP8_DRW_ZERO_ROWS: u8 = 16;

pub struct Chip8Interpreter<'a> {
    memory: Chip8Memory,
    registers: Registers,
    timers: Timers,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    rng: StdRng,
    speed: u32,
    paused: bool,
    pending: Option<u8>,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Self {
        Chip8Interpreter {
            memory: Chip8Memory::new(),
            registers: Registers::new(),
            timers: Timers::new(),
            display,
            input,
            sound,
            rng: StdRng::from_entropy(),
            speed: DEFAULT_SPEED,
            paused: false,
            pending: None,
        }
    }

    /// instructions per frame
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// make `RND` repeatable
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Start over with a new program: fresh memory (font included),
    /// registers, timers and a blank screen, then optionally new key bindings.
    pub fn load_rom(
        &mut self,
        program: &[u8],
        bindings: Option<&KeyBindings>,
    ) -> Result<(), Chip8Error> {
        let mut memory = Chip8Memory::new();
        memory.load_program(program)?;
        self.memory = memory;
        self.registers = Registers::new();
        self.timers = Timers::new();
        self.paused = false;
        self.pending = None;
        self.display.clear();
        if let Some(bindings) = bindings {
            self.input.bind(bindings);
        }
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Chip8Memory {
        &self.memory
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.display.frame()
    }

    /// waiting on `LD Vx, K`
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// the register `LD Vx, K` will write to
    pub fn pending_register(&self) -> Option<u8> {
        self.pending
    }

    /// Key-down notification from the input collaborator. Only does anything
    /// while an `LD Vx, K` is waiting, and only once per wait.
    pub fn key_down(&mut self, key: u8) {
        if let Some(x) = self.pending.take() {
            self.registers.v[x as usize] = key & 0xf;
            self.paused = false;
            debug!("key {:x} -> V{:X}, resuming", key & 0xf, x);
        }
    }

    /// one frame
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        for _ in 0..self.speed {
            if self.paused {
                break;
            }
            self.step()?;
        }
        if !self.paused {
            self.timers.tick();
        }
        self.display.paint()?;
        Ok(())
    }

    /// fetch, decode and execute a single instruction
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        let pc = self.registers.pc;
        let word = self.memory.get_word(pc)?;
        let instruction = Instruction::decode(word)?;
        trace!("{:03x}: {:04x} {:?}", pc, word, instruction);
        self.registers.pc = pc.wrapping_add(2);
        self.execute(instruction)
    }

    /// Run frames until `frames` have gone by (forever if `None`), the input
    /// asks to quit, or the program fails.
    pub fn main_loop(&mut self, frames: Option<u64>, frame_rate: f64) -> Result<(), Chip8Error> {
        if !(frame_rate > 0.0 && frame_rate.is_finite()) {
            return Err(Chip8Error::InvalidFrameRate(frame_rate));
        }
        let mut pacer = LoopHelper::builder().build_with_target_rate(frame_rate);
        let mut count = 0u64;
        info!("running at {} fps, {} instructions per frame", frame_rate, self.speed);
        while frames.map_or(true, |f| count < f) {
            pacer.loop_start();
            for key in self.input.poll()? {
                self.key_down(key);
            }
            if self.input.quit_requested() {
                info!("quit requested after {} frames", count);
                break;
            }
            self.cycle()?;
            count += 1;
            pacer.loop_sleep();
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.registers.pc = self.registers.pc.wrapping_add(2);
        }
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;
        let r = &mut self.registers;
        match instruction {
            Cls => self.display.clear(),
            Ret => r.pc = r.stack.pop(r.pc.wrapping_sub(2))?,
            Jp { nnn } => r.pc = nnn,
            Call { nnn } => {
                r.stack.push(r.pc, r.pc.wrapping_sub(2))?;
                r.pc = nnn;
            }
            SeByte { x, kk } => {
                let eq = r.v[x as usize] == kk;
                self.skip_if(eq);
            }
            SneByte { x, kk } => {
                let ne = r.v[x as usize] != kk;
                self.skip_if(ne);
            }
            SeReg { x, y } => {
                let eq = r.v[x as usize] == r.v[y as usize];
                self.skip_if(eq);
            }
            SneReg { x, y } => {
                let ne = r.v[x as usize] != r.v[y as usize];
                self.skip_if(ne);
            }
            LdByte { x, kk } => r.v[x as usize] = kk,
            AddByte { x, kk } => r.v[x as usize] = r.v[x as usize].wrapping_add(kk),
            LdReg { x, y } => r.v[x as usize] = r.v[y as usize],
            Or { x, y } => r.v[x as usize] |= r.v[y as usize],
            And { x, y } => r.v[x as usize] &= r.v[y as usize],
            Xor { x, y } => r.v[x as usize] ^= r.v[y as usize],
            AddReg { x, y } => {
                let (sum, carry) = r.v[x as usize].overflowing_add(r.v[y as usize]);
                r.v[VF] = carry as u8;
                r.v[x as usize] = sum;
            }
            Sub { x, y } => {
                // clamps at zero rather than wrapping
                let (vx, vy) = (r.v[x as usize], r.v[y as usize]);
                r.v[VF] = (vx > vy) as u8;
                r.v[x as usize] = vx.saturating_sub(vy);
            }
            Subn { x, y } => {
                let (vx, vy) = (r.v[x as usize], r.v[y as usize]);
                r.v[VF] = (vy > vx) as u8;
                r.v[x as usize] = vy.wrapping_sub(vx);
            }
            Shr { x } => {
                let vx = r.v[x as usize];
                r.v[VF] = vx & 0x01;
                r.v[x as usize] = vx >> 1;
            }
            Shl { x } => {
                // NB. the flag is the masked bit itself: 0x00 or 0x80
                let vx = r.v[x as usize];
                r.v[VF] = vx & 0x80;
                r.v[x as usize] = vx << 1;
            }
            LdI { nnn } => r.i = nnn,
            JpV0 { nnn } => r.pc = nnn + r.v[0] as u16,
            Rnd { x, kk } => {
                let byte: u8 = self.rng.gen();
                self.registers.v[x as usize] = byte & kk;
            }
            Drw { x, y, n } => self.draw(x, y, n)?,
            Skp { x } => {
                let pressed = self.input.is_pressed(r.v[x as usize] & 0xf);
                self.skip_if(pressed);
            }
            Sknp { x } => {
                let pressed = self.input.is_pressed(r.v[x as usize] & 0xf);
                self.skip_if(!pressed);
            }
            LdVxDt { x } => r.v[x as usize] = self.timers.delay,
            LdVxK { x } => {
                self.paused = true;
                self.pending = Some(x);
                debug!("waiting for a key for V{:X}", x);
            }
            LdDtVx { x } => self.timers.delay = r.v[x as usize],
            LdStVx { x } => {
                let st = r.v[x as usize];
                self.timers.sound = st;
                if st > 0 {
                    let duration = tone_duration(st);
                    debug!("tone for {:?}", duration);
                    if let Err(e) = self.sound.tone(duration) {
                        warn!("couldn't play tone: {}", e);
                    }
                }
            }
            AddIVx { x } => r.i = r.i.wrapping_add(r.v[x as usize] as u16),
            LdFVx { x } => r.i = Chip8Memory::font_addr(r.v[x as usize]),
            LdBVx { x } => {
                let vx = r.v[x as usize];
                self.memory.write(&[vx / 100, (vx % 100) / 10, vx % 10], r.i)?;
            }
            LdIVx { x } => {
                let count = x as usize + 1;
                self.memory.write(&r.v[..count], r.i)?;
            }
            LdVxI { x } => {
                let count = x as usize + 1;
                let bytes = self.memory.get_ro_slice(r.i, count)?;
                r.v[..count].copy_from_slice(bytes);
            }
        }
        Ok(())
    }

    /// XOR an n-row sprite from memory[I..] onto the screen at (Vx, Vy),
    /// wrapping at the edges. VF ends up 1 if any lit pixel got turned off.
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        let rows = if n == 0 { CHIP8_DRW_ZERO_ROWS } else { n };
        let origin_x = self.registers.v[x as usize] as usize;
        let origin_y = self.registers.v[y as usize] as usize;
        let sprite = self.memory.get_ro_slice(self.registers.i, rows as usize)?;

        self.registers.v[VF] = 0;
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let py = (origin_y + row) % CHIP8_DISPLAY_HEIGHT;
            for col in 0..8 {
                if byte & (0x80 >> col) != 0 {
                    let px = (origin_x + col) % CHIP8_DISPLAY_WIDTH;
                    collision |= self.display.set_pixel(px, py);
                }
            }
        }
        if collision {
            self.registers.v[VF] = 1;
        }
        Ok(())
    }
}
