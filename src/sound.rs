use beep::beep;
use log::warn;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// The one thing the interpreter needs from audio: play a tone for roughly
/// this long. Fire and forget; it isn't synchronised with the sound timer.
pub trait Sound {
    fn tone(&mut self, duration: Duration) -> Result<(), Box<dyn Error>>;
}

/// how long a tone lasts for a given sound timer value (60Hz ticks)
pub fn tone_duration(sound_timer: u8) -> Duration {
    Duration::from_millis(sound_timer as u64 * 1000 / 60)
}

pub const SIMPLEBEEP_PITCH: u16 = 440; // A

/// PC speaker beeps. The tone is started here and a helper thread stops it
/// when it runs out; a newer tone supersedes any older one still playing.
pub struct SimpleBeep {
    pitch: u16,
    generation: Arc<AtomicU64>,
}

impl SimpleBeep {
    pub fn new(pitch: u16) -> Self {
        SimpleBeep {
            pitch,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Sound for SimpleBeep {
    fn tone(&mut self, duration: Duration) -> Result<(), Box<dyn Error>> {
        beep(self.pitch)?;
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        thread::spawn(move || {
            spin_sleep::sleep(duration);
            if generation.load(Ordering::SeqCst) == mine {
                if let Err(e) = beep(0) {
                    warn!("couldn't stop beeping: {}", e);
                }
            }
        });
        Ok(())
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn tone(&mut self, _duration: Duration) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}
