//! Host events: the platform-independent subset of window input the scene
//! reacts to.
//!
//! # Invariants
//! - The scene consumes [`HostEvent`]s, never raw windowing events.
//! - Cursor coordinates are logical pixels from the top-left corner.

pub mod event;

pub use event::{HostEvent, PointerButton, PointerState};
