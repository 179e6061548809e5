//! stagelink
//!
//! A flow-controlled streaming channel for staged batch pipelines.
//!
//! `stagelink` lets a performance-critical pipeline stage (map, partition,
//! combine, reduce) run natively while an external orchestrator drives its
//! lifecycle. Data moves through two pre-allocated, fixed-capacity byte
//! buffers, one per direction, instead of per-call marshalling:
//!
//! - the orchestrator fills the input buffer and announces valid bytes
//! - the stage consumes them and buffers its output
//! - the channel drains output back to the orchestrator *before* the
//!   buffer would overflow, never after
//! - either side can exchange opaque synchronous commands
//!
//! The crate intentionally:
//! - does NOT allocate or own buffer memory (it is borrowed)
//! - does NOT manage task scheduling or I/O sources
//! - does NOT frame payload bytes (that is the stage's contract)
//! - does NOT dispatch arbitrary RPC methods
//!
//! It only does one thing: **drive one stage through setup → input → finish**
//!
//! # Example
//!
//! ```
//! use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};
//!
//! /// A stage that forwards every delivery unchanged.
//! struct Passthrough;
//!
//! impl Stage for Passthrough {
//!     fn handle_input(
//!         &mut self,
//!         input: &[u8],
//!         ctx: &mut StageContext<'_, '_>,
//!     ) -> Result<(), ChannelError> {
//!         ctx.write(input)
//!     }
//! }
//!
//! fn main() -> Result<(), ChannelError> {
//!     let mut orch = CollectingOrchestrator::new();
//!     let mut input = [0u8; 1024];
//!     let mut output = [0u8; 1024];
//!
//!     let mut channel = Channel::setup(Passthrough, &mut orch, &mut input, &mut output)?;
//!
//!     channel.input_mut()[..11].copy_from_slice(b"hello world");
//!     channel.deliver_input(&mut orch, 11)?;
//!     channel.signal_finish(&mut orch)?;
//!
//!     assert_eq!(orch.concatenated(), b"hello world");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod channel;
mod error;
mod orchestrator;
mod stage;

//
// Public surface (intentionally tiny)
//

pub use buffer::StreamBuffer;
pub use channel::Channel;
pub use error::ChannelError;
pub use orchestrator::{CollectingOrchestrator, Orchestrator};
pub use stage::{Stage, StageContext};
