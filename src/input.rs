use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::io;
use std::time::{Duration, Instant};

use crate::error::Chip8Error;

/// number of keys on the COSMAC keypad
pub const CHIP8_KEY_COUNT: usize = 16;

/// left-hand side of qwerty keyboard, indexed by chip-8 key
///
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |q|w|e|r|
/// |7|8|9|E|  ->  |a|s|d|f|
/// |A|0|B|F|      |z|x|c|v|
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [char; CHIP8_KEY_COUNT] = [
    'x', // 0
    '1', // 1
    '2', // 2
    '3', // 3
    'q', // 4
    'w', // 5
    'e', // 6
    'a', // 7
    's', // 8
    'd', // 9
    'z', // a
    'c', // b
    '4', // c
    'r', // d
    'f', // e
    'v', // f
];

/// marks an unbound key in a layout string
const UNBOUND: char = '.';

/// Which host key, if any, drives each of the 16 chip-8 keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    keys: [Option<char>; CHIP8_KEY_COUNT],
}

impl KeyBindings {
    /// nothing bound
    pub fn empty() -> Self {
        KeyBindings {
            keys: [None; CHIP8_KEY_COUNT],
        }
    }

    pub fn conventional() -> Self {
        KeyBindings {
            keys: CHIP8_CONVENTIONAL_KEYMAP.map(Some),
        }
    }

    /// parse 16 characters, one per chip-8 key 0..f; '.' leaves a key unbound
    ///
    /// Letters are bound lowercase, which is how `StdinInput` looks them up.
    pub fn from_layout(layout: &str) -> Result<Self, Chip8Error> {
        let chars: Vec<char> = layout.chars().map(|c| c.to_ascii_lowercase()).collect();
        if chars.len() != CHIP8_KEY_COUNT {
            return Err(Chip8Error::InvalidKeyLayout(layout.to_string()));
        }
        let mut bindings = KeyBindings::empty();
        for (key, c) in chars.into_iter().enumerate() {
            if c == UNBOUND {
                continue;
            }
            // the same host key can't drive two chip-8 keys
            if bindings.key_for(c).is_some() {
                return Err(Chip8Error::InvalidKeyLayout(layout.to_string()));
            }
            bindings.keys[key] = Some(c);
        }
        Ok(bindings)
    }

    pub fn bind(&mut self, key: u8, code: Option<char>) {
        self.keys[(key & 0xf) as usize] = code;
    }

    pub fn get(&self, key: u8) -> Option<char> {
        self.keys[(key & 0xf) as usize]
    }

    /// the chip-8 key a host key is bound to
    pub fn key_for(&self, code: char) -> Option<u8> {
        self.keys
            .iter()
            .position(|k| *k == Some(code))
            .map(|k| k as u8)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::conventional()
    }
}

/// reads keypresses
pub trait Input {
    /// is this chip-8 key (0x0-0xf) held down right now
    fn is_pressed(&self, key: u8) -> bool;

    /// read pending host events, returning chip-8 keys that went down since
    /// the last poll, oldest first
    fn poll(&mut self) -> Result<Vec<u8>, io::Error>;

    /// replace the key bindings
    fn bind(&mut self, bindings: &KeyBindings);

    /// the user asked to stop
    fn quit_requested(&self) -> bool;
}

/// terminals only report key presses (and auto-repeats), never releases, so
/// a key counts as held for this long after it was last seen
const STDIN_HOLD_TIME: Duration = Duration::from_millis(120);

/// simple implementation of Input, using STDIN in raw mode
pub struct StdinInput {
    bindings: KeyBindings,
    last_seen: [Option<Instant>; CHIP8_KEY_COUNT],
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            bindings: KeyBindings::conventional(),
            last_seen: [None; CHIP8_KEY_COUNT],
            quit: false,
        })
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("couldn't restore terminal mode: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn is_pressed(&self, key: u8) -> bool {
        match self.last_seen[(key & 0xf) as usize] {
            Some(seen) => seen.elapsed() < STDIN_HOLD_TIME,
            None => false,
        }
    }

    fn poll(&mut self) -> Result<Vec<u8>, io::Error> {
        let mut pressed = Vec::new();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => self.quit = true,
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(c) => match self.bindings.key_for(c.to_ascii_lowercase()) {
                        Some(key) => {
                            self.last_seen[key as usize] = Some(Instant::now());
                            pressed.push(key);
                        }
                        None => warn!("can't map {:?} to a COSMAC key", c),
                    },
                    other => warn!("unmapped key event received: {:?}", other),
                },
                // resizes and mouse events are no concern of ours
                _ => {}
            }
        }
        Ok(pressed)
    }

    fn bind(&mut self, bindings: &KeyBindings) {
        self.bindings = bindings.clone();
        self.last_seen = [None; CHIP8_KEY_COUNT];
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; `held` keys are pressed, `queued`
/// keys are delivered by the next poll
pub struct DummyInput {
    pub held: Vec<u8>,
    pub queued: Vec<u8>,
    pub bindings: KeyBindings,
    pub quit: bool,
}

impl DummyInput {
    pub fn new(held: &[u8]) -> Self {
        DummyInput {
            held: Vec::from(held),
            queued: Vec::new(),
            bindings: KeyBindings::empty(),
            quit: false,
        }
    }
}

impl Input for DummyInput {
    fn is_pressed(&self, key: u8) -> bool {
        self.held.contains(&key)
    }

    fn poll(&mut self) -> Result<Vec<u8>, io::Error> {
        Ok(std::mem::take(&mut self.queued))
    }

    fn bind(&mut self, bindings: &KeyBindings) {
        self.bindings = bindings.clone();
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}
