//! Fixed-capacity buffer views over orchestrator-owned memory.
//!
//! - [`StreamBuffer`] - a borrowed byte region plus a write position

mod view;

pub use view::StreamBuffer;
