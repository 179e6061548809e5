//! The channel - staged lifecycle driver for one pipeline stage.
//!
//! - [`Channel`] - owns both buffer views, dispatches to the stage hooks

mod engine;

pub use engine::Channel;
