//! Stage hooks - where concrete pipeline logic plugs in.
//!
//! - [`Stage`] - the hook set a concrete stage implements (all defaulted)
//! - [`StageContext`] - the per-call handle carrying the buffered-write and
//!   command helpers

mod context;

use bytes::Bytes;

pub use context::StageContext;

use crate::error::ChannelError;

/// Hooks a concrete pipeline stage implements.
///
/// A stage is one unit of batch processing (map, partition, combine, reduce)
/// driven through a [`Channel`](crate::Channel). Every hook has a default,
/// so a stage only implements the ones it needs; one level of
/// specialization is all the design supports.
///
/// Hooks never receive the orchestrator directly. They get a
/// [`StageContext`], valid only for the duration of the call, which exposes
/// the buffered output helpers (`write`, `put_u32`, `flush`) and the
/// outbound command channel.
///
/// # Example
///
/// ```
/// use stagelink::{ChannelError, Stage, StageContext};
///
/// /// Frames each delivery as a length-prefixed record.
/// struct RecordStage;
///
/// impl Stage for RecordStage {
///     fn handle_input(
///         &mut self,
///         input: &[u8],
///         ctx: &mut StageContext<'_, '_>,
///     ) -> Result<(), ChannelError> {
///         ctx.put_u32(input.len() as u32)?;
///         ctx.write(input)
///     }
/// }
/// ```
pub trait Stage {
    /// Called once from [`Channel::setup`](crate::Channel::setup), before
    /// any input is delivered. Does nothing by default.
    fn setup(&mut self, ctx: &mut StageContext<'_, '_>) -> Result<(), ChannelError> {
        let _ = ctx;
        Ok(())
    }

    /// Consumes one input delivery. `input` is the valid prefix of the
    /// input buffer. Does nothing by default.
    fn handle_input(
        &mut self,
        input: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<(), ChannelError> {
        let _ = (input, ctx);
        Ok(())
    }

    /// Called once at end of stream.
    ///
    /// The default flushes any buffered output, then signals the
    /// orchestrator that output has ended. Overrides adding stage teardown
    /// are expected to preserve that flush-then-finish ordering unless they
    /// fully replace it.
    fn finish(&mut self, ctx: &mut StageContext<'_, '_>) -> Result<(), ChannelError> {
        ctx.flush()?;
        ctx.finish_output()
    }

    /// Answers an inbound command from the orchestrator.
    ///
    /// Payloads are opaque; a command with no stage-defined meaning is not
    /// an error. The default response is empty.
    fn command(
        &mut self,
        cmd: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<Bytes, ChannelError> {
        let _ = (cmd, ctx);
        Ok(Bytes::new())
    }
}
