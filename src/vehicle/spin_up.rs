use std::time::Duration;

/// Engine spin-up ramp.
///
/// `started` holds the run time the current spin-up began, if one is in
/// progress; `done` latches once the status indicator has gone steady.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpinUp {
    level: f64,
    started: Option<Duration>,
    done: bool,
}

impl SpinUp {
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn started(&self) -> Option<Duration> {
        self.started
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// One tick of the ramp: rise by `rise` while held, fall by `fall`
    /// otherwise.
    pub fn advance(&mut self, held: bool, rise: f64, fall: f64, now: Duration) {
        if held {
            if self.level < 1.0 && self.started.is_none() {
                self.started = Some(now);
                self.done = false;
            }
            self.level = (self.level + rise).min(1.0);
        } else if self.level > 0.0 {
            self.level = (self.level - fall).max(0.0);
        }
    }

    /// Start over from `preset`.
    pub fn restart(&mut self, preset: f64, now: Duration) {
        self.level = preset.clamp(0.0, 1.0);
        self.started = Some(now);
        self.done = false;
    }

    /// The ramp reached full level.
    pub fn finish(&mut self) {
        self.started = None;
        self.done = true;
    }

    /// The hold control was released before the ramp finished.
    pub fn abandon(&mut self) {
        self.started = None;
    }
}
