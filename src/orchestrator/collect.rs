//! In-memory orchestrator for tests, benches, and demos.

use bytes::Bytes;

use super::Orchestrator;

/// An [`Orchestrator`] that collects drained output in memory.
///
/// Each drain callback is recorded as its own `Vec<u8>` so callers can
/// assert on drain boundaries, not just on the concatenated byte stream.
/// Commands are answered by an optional responder closure; without one,
/// every command gets an empty response.
///
/// # Example
///
/// ```
/// use stagelink::{Channel, CollectingOrchestrator, Stage};
///
/// struct Echo;
///
/// impl Stage for Echo {
///     fn handle_input(
///         &mut self,
///         input: &[u8],
///         ctx: &mut stagelink::StageContext<'_, '_>,
///     ) -> Result<(), stagelink::ChannelError> {
///         ctx.write(input)
///     }
/// }
///
/// let mut orch = CollectingOrchestrator::new();
/// let mut input = [0u8; 16];
/// let mut output = [0u8; 16];
/// let mut channel = Channel::setup(Echo, &mut orch, &mut input, &mut output)?;
///
/// channel.input_mut()[..5].copy_from_slice(b"hello");
/// channel.deliver_input(&mut orch, 5)?;
/// channel.signal_finish(&mut orch)?;
///
/// assert_eq!(orch.concatenated(), b"hello");
/// assert!(orch.is_output_finished());
/// # Ok::<(), stagelink::ChannelError>(())
/// ```
#[derive(Default)]
pub struct CollectingOrchestrator {
    drains: Vec<Vec<u8>>,
    finish_calls: usize,
    commands: Vec<Vec<u8>>,
    responder: Option<Box<dyn FnMut(&[u8]) -> Bytes>>,
}

impl CollectingOrchestrator {
    /// Creates an orchestrator with no responder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an orchestrator that answers stage commands with `responder`.
    pub fn with_responder(responder: impl FnMut(&[u8]) -> Bytes + 'static) -> Self {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// Returns every drain in call order, one entry per callback.
    pub fn drains(&self) -> &[Vec<u8>] {
        &self.drains
    }

    /// Returns all drained bytes concatenated in call order.
    pub fn concatenated(&self) -> Vec<u8> {
        self.drains.concat()
    }

    /// Returns the number of drain callbacks received.
    pub fn drain_count(&self) -> usize {
        self.drains.len()
    }

    /// Returns true if `finish_output` has been called.
    pub fn is_output_finished(&self) -> bool {
        self.finish_calls > 0
    }

    /// Returns how many times `finish_output` was called.
    pub fn finish_calls(&self) -> usize {
        self.finish_calls
    }

    /// Returns every command the stage sent outbound, in call order.
    pub fn commands(&self) -> &[Vec<u8>] {
        &self.commands
    }
}

impl Orchestrator for CollectingOrchestrator {
    fn flush_output(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.drains.push(data.to_vec());
        Ok(())
    }

    fn finish_output(&mut self) -> std::io::Result<()> {
        self.finish_calls += 1;
        Ok(())
    }

    fn send_command(&mut self, cmd: &[u8]) -> std::io::Result<Bytes> {
        self.commands.push(cmd.to_vec());
        match self.responder.as_mut() {
            Some(responder) => Ok(responder(cmd)),
            None => Ok(Bytes::new()),
        }
    }
}

impl std::fmt::Debug for CollectingOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectingOrchestrator")
            .field("drains", &self.drains.len())
            .field("finish_calls", &self.finish_calls)
            .field("commands", &self.commands.len())
            .finish()
    }
}
