//! Core channel engine - lifecycle, input delivery, command dispatch.

use bytes::Bytes;
use log::debug;

use crate::buffer::StreamBuffer;
use crate::error::ChannelError;
use crate::orchestrator::Orchestrator;
use crate::stage::{Stage, StageContext};

/// Lifecycle state of a channel.
///
/// A channel is born set up (binding happens at construction), runs through
/// zero or more input deliveries and commands, and finishes exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
}

/// A flow-controlled streaming channel wrapping one pipeline stage.
///
/// `Channel` is the native side of the buffer handshake: the orchestrator
/// fills the input buffer, announces how many bytes are valid, and the
/// wrapped [`Stage`] consumes them, optionally producing output that is
/// buffered and drained back to the orchestrator before it would overflow.
///
/// # Buffers
///
/// Both buffers are borrowed from the orchestrator for the channel's whole
/// lifetime (`'buf`); the channel never allocates, frees, or reallocates
/// them. Capacities are fixed at setup.
///
/// # Driving model
///
/// Strictly single-threaded call-response. Every operation takes the
/// orchestrator as an explicit `&mut dyn Orchestrator` parameter because
/// the handle is only valid for the duration of that one call; the channel
/// stores no orchestrator state between calls. Operations may synchronously
/// re-enter the orchestrator (drains, outbound commands) before returning.
/// There is no cancellation and no timeout at this layer; the only way to
/// stop processing is [`signal_finish`](Self::signal_finish).
///
/// # Example
///
/// ```
/// use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};
///
/// /// Forwards input unchanged, framed as length-prefixed records.
/// struct Frame;
///
/// impl Stage for Frame {
///     fn handle_input(
///         &mut self,
///         input: &[u8],
///         ctx: &mut StageContext<'_, '_>,
///     ) -> Result<(), ChannelError> {
///         ctx.put_u32(input.len() as u32)?;
///         ctx.write(input)
///     }
/// }
///
/// let mut orch = CollectingOrchestrator::new();
/// let mut input = [0u8; 64];
/// let mut output = [0u8; 64];
/// let mut channel = Channel::setup(Frame, &mut orch, &mut input, &mut output)?;
///
/// channel.input_mut()[..3].copy_from_slice(b"abc");
/// channel.deliver_input(&mut orch, 3)?;
/// channel.signal_finish(&mut orch)?;
///
/// assert_eq!(orch.concatenated(), b"\x00\x00\x00\x03abc");
/// # Ok::<(), ChannelError>(())
/// ```
#[derive(Debug)]
pub struct Channel<'buf, S> {
    input: StreamBuffer<'buf>,
    output: StreamBuffer<'buf>,
    stage: S,
    state: State,
    has_fault: bool,
}

impl<'buf, S: Stage> Channel<'buf, S> {
    /// Binds both buffers and runs the stage's `setup` hook.
    ///
    /// Construction is the setup call: there is no way to obtain a channel
    /// whose buffers are unbound, and setup cannot run twice.
    ///
    /// # Errors
    ///
    /// Propagates any error from the stage's `setup` hook; on error the
    /// channel is not constructed.
    pub fn setup(
        stage: S,
        orch: &mut dyn Orchestrator,
        input: &'buf mut [u8],
        output: &'buf mut [u8],
    ) -> Result<Self, ChannelError> {
        let mut channel = Self {
            input: StreamBuffer::bind(input),
            output: StreamBuffer::bind(output),
            stage,
            state: State::Running,
            has_fault: false,
        };
        debug!(
            "channel setup: input capacity {}, output capacity {}",
            channel.input.capacity(),
            channel.output.capacity()
        );
        let mut ctx = StageContext::new(&mut channel.output, orch, &mut channel.has_fault);
        channel.stage.setup(&mut ctx)?;
        Ok(channel)
    }

    /// Announces that the first `length` bytes of the input buffer are
    /// valid and hands them to the stage's `handle_input` hook.
    ///
    /// # Errors
    ///
    /// [`ChannelError::InputOverflow`] if `length` exceeds the input
    /// buffer's capacity; the hook is not invoked and the task is
    /// considered failed. [`ChannelError::Finished`] after
    /// [`signal_finish`](Self::signal_finish). Stage and drain errors
    /// propagate unchanged.
    pub fn deliver_input(
        &mut self,
        orch: &mut dyn Orchestrator,
        length: usize,
    ) -> Result<(), ChannelError> {
        self.check_running()?;
        if length > self.input.capacity() {
            return Err(ChannelError::InputOverflow {
                length,
                capacity: self.input.capacity(),
            });
        }
        self.input.set_position(length);
        let mut ctx = StageContext::new(&mut self.output, orch, &mut self.has_fault);
        self.stage.handle_input(self.input.filled(), &mut ctx)
    }

    /// Signals end of input and runs the stage's `finish` hook.
    ///
    /// The default hook flushes buffered output, then tells the
    /// orchestrator output has ended. Legal exactly once; the channel is
    /// `Finished` afterwards even if the hook failed (there is no retry at
    /// this layer).
    ///
    /// # Errors
    ///
    /// [`ChannelError::Finished`] on a second call; otherwise whatever the
    /// finish hook returns.
    pub fn signal_finish(&mut self, orch: &mut dyn Orchestrator) -> Result<(), ChannelError> {
        self.check_running()?;
        self.state = State::Finished;
        debug!("channel finishing");
        let mut ctx = StageContext::new(&mut self.output, orch, &mut self.has_fault);
        self.stage.finish(&mut ctx)
    }

    /// Dispatches an inbound command to the stage's `command` hook.
    ///
    /// Commands are opaque; a stage with no override answers every command
    /// with an empty response, which is the defined default rather than an
    /// error.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Finished`] after finish; otherwise whatever the hook
    /// returns.
    pub fn on_command(
        &mut self,
        orch: &mut dyn Orchestrator,
        cmd: &[u8],
    ) -> Result<Bytes, ChannelError> {
        self.check_running()?;
        let mut ctx = StageContext::new(&mut self.output, orch, &mut self.has_fault);
        self.stage.command(cmd, &mut ctx)
    }

    /// Returns true if any orchestrator callback has reported a fault since
    /// the channel was set up. The flag is sticky for the channel's
    /// lifetime; it is observational only and never cleared.
    pub fn has_fault(&self) -> bool {
        self.has_fault
    }

    /// Returns the whole input region mutably so the orchestrator can fill
    /// it before calling [`deliver_input`](Self::deliver_input).
    pub fn input_mut(&mut self) -> &mut [u8] {
        self.input.as_mut_slice()
    }

    /// Returns the input buffer's fixed capacity.
    pub fn input_capacity(&self) -> usize {
        self.input.capacity()
    }

    /// Returns the number of input bytes announced by the latest delivery.
    pub fn input_position(&self) -> usize {
        self.input.position()
    }

    /// Returns the output buffer's fixed capacity.
    pub fn output_capacity(&self) -> usize {
        self.output.capacity()
    }

    /// Returns the number of output bytes buffered but not yet drained.
    pub fn output_position(&self) -> usize {
        self.output.position()
    }

    /// Returns true once [`signal_finish`](Self::signal_finish) has run.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Returns the wrapped stage.
    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Returns the wrapped stage mutably.
    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    fn check_running(&self) -> Result<(), ChannelError> {
        match self.state {
            State::Running => Ok(()),
            State::Finished => Err(ChannelError::Finished),
        }
    }
}
