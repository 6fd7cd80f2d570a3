use crate::clock::Clock;
use crate::viewport::ViewportState;

/// Capability contract shared by every visual piece of the scene.
///
/// Components own their resources exclusively and are driven by the
/// composition root; they only read the clock and viewport handed to them.
pub trait SceneComponent {
    /// React to new viewport dimensions.
    fn resize(&mut self, viewport: &ViewportState) {
        let _ = viewport;
    }

    /// Advance per-frame state.
    fn update(&mut self, clock: &Clock) {
        let _ = clock;
    }
}
