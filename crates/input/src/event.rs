#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// An event delivered by the host window to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The drawable area changed size or the display scale changed.
    Resized {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },
    /// Pointer moved to a logical-pixel position.
    CursorMoved { x: f32, y: f32 },
    /// Pointer button pressed or released.
    Button { button: PointerButton, pressed: bool },
    /// Raw relative pointer motion.
    Motion { dx: f32, dy: f32 },
}

/// Tracks the orbit button between events.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    secondary_held: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &HostEvent) {
        if let HostEvent::Button {
            button: PointerButton::Secondary,
            pressed,
        } = *event
        {
            self.secondary_held = pressed;
        }
    }

    /// Whether an orbit drag (secondary button held) is in progress.
    pub fn dragging(&self) -> bool {
        self.secondary_held
    }
}
