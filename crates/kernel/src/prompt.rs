use jellyscape_common::RunMode;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// Never armed: the session already runs in diagnostic mode.
    Disarmed,
    Armed { deadline: Instant },
    /// Fired once; stays here for the rest of the session.
    Fired,
}

/// One-shot timer offering the switch into diagnostic mode.
#[derive(Debug, Clone)]
pub struct PromptTimer {
    state: PromptState,
}

impl PromptTimer {
    pub fn new(mode: RunMode, delay: Duration, now: Instant) -> Self {
        let state = match mode {
            RunMode::Diagnostic => PromptState::Disarmed,
            RunMode::Normal => PromptState::Armed {
                deadline: now + delay,
            },
        };
        Self { state }
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    /// Returns true exactly once, on the first poll at or past the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            PromptState::Armed { deadline } if now >= deadline => {
                self.state = PromptState::Fired;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending prompt without firing it.
    pub fn disarm(&mut self) {
        if matches!(self.state, PromptState::Armed { .. }) {
            self.state = PromptState::Disarmed;
        }
    }
}
