use std::time::Instant;

/// Wall-clock timing for the scene.
///
/// `elapsed_ms` always equals `current - start`, and because readings are
/// taken from a monotonic source (earlier readings saturate) it never
/// decreases across updates.
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    current: Instant,
    delta_ms: f64,
    elapsed_ms: f64,
}

impl Clock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start a clock at a caller-supplied instant.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            current: start,
            delta_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Advance to the current instant.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Advance to `now`. Readings older than the previous one count as no
    /// time passing.
    pub fn update_at(&mut self, now: Instant) {
        let now = now.max(self.current);
        self.delta_ms = now.duration_since(self.current).as_secs_f64() * 1000.0;
        self.current = now;
        self.elapsed_ms = now.duration_since(self.start).as_secs_f64() * 1000.0;
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn current(&self) -> Instant {
        self.current
    }

    /// Milliseconds since the previous update.
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Milliseconds since construction.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
