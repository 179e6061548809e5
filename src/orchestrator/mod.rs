//! The orchestrator boundary - callbacks from the channel back to its owner.
//!
//! - [`Orchestrator`] - the injected callback strategy a channel re-enters
//!   during drains, finish, and outbound commands
//! - [`CollectingOrchestrator`] - an in-memory implementation for tests,
//!   benches, and demos

mod collect;

use bytes::Bytes;

pub use collect::CollectingOrchestrator;

/// Callbacks the channel makes back into its owner.
///
/// The orchestrator owns task lifecycle, buffer memory, and scheduling; the
/// channel only borrows an `&mut dyn Orchestrator` for the duration of each
/// public operation and re-enters it synchronously from inside that
/// operation. Passing the handle per call rather than storing it keeps the
/// re-entrancy contract visible at the call site and prevents the channel
/// from retaining it beyond the call in which it is valid.
///
/// Every callback returns `io::Result`; an `Err` means the counterpart hit
/// an exceptional condition. The channel records it in its fault flag,
/// converts it to [`ChannelError::Io`](crate::ChannelError::Io), and
/// unwinds. No callback is retried.
///
/// Recursive re-entry into the same channel from inside a callback is
/// impossible: the channel is exclusively borrowed for the whole operation.
pub trait Orchestrator {
    /// Consumes `data`, the filled prefix of the output buffer.
    ///
    /// Called while the buffer still holds its logical content; the channel
    /// rewinds the write position only after this returns.
    fn flush_output(&mut self, data: &[u8]) -> std::io::Result<()>;

    /// One-shot signal that output streaming has ended for this task.
    fn finish_output(&mut self) -> std::io::Result<()>;

    /// Answers a synchronous command sent by the stage.
    ///
    /// Blocks the driving thread until a response is available. Payloads are
    /// opaque; their meaning is a contract between a concrete stage and its
    /// orchestrator-side counterpart.
    fn send_command(&mut self, cmd: &[u8]) -> std::io::Result<Bytes>;
}
