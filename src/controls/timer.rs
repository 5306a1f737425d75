/// One-second countdown used to throttle resend actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    time: u32,
}

impl Countdown {
    /// Starts, or restarts, the countdown.
    pub fn start(&mut self, seconds: u32) {
        self.time = seconds;
    }

    /// Advances one second. Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.time == 0 {
            return false;
        }
        self.time -= 1;
        self.time == 0
    }

    #[must_use]
    pub fn time(&self) -> u32 {
        self.time
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.time > 0
    }

    pub fn clear(&mut self) {
        self.time = 0;
    }
}
