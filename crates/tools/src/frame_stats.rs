use std::collections::VecDeque;

/// Rolling frame-timing window for the diagnostic overlay.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: VecDeque<f64>,
    capacity: usize,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            total_frames: 0,
        }
    }

    /// Record one frame's delta in milliseconds.
    pub fn record(&mut self, delta_ms: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(delta_ms.max(0.0));
        self.total_frames += 1;
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn average_ms(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    pub fn worst_ms(&self) -> f64 {
        self.window.iter().copied().fold(0.0, f64::max)
    }

    /// Frames per second over the window; 0 until a non-zero delta arrives.
    pub fn fps(&self) -> f64 {
        let avg = self.average_ms();
        if avg > 0.0 { 1000.0 / avg } else { 0.0 }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}
