/// The delay and sound timers. Both count down once per frame (nominally
/// 60Hz) and stop at zero.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers { delay: 0, sound: 0 }
    }

    /// one frame's worth of countdown
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}
