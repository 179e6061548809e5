//! Per-call context handed to stage hooks.

use bytes::Bytes;
use log::{trace, warn};

use crate::buffer::StreamBuffer;
use crate::error::ChannelError;
use crate::orchestrator::Orchestrator;

/// The handle a stage uses to emit output and talk to the orchestrator.
///
/// A `StageContext` exists only for the duration of one synchronous hook
/// invocation; it borrows the channel's output buffer and the
/// orchestrator handle that is valid for the current call. Stages never
/// store it.
///
/// # Flow control
///
/// [`write`](Self::write) and [`put_u32`](Self::put_u32) buffer bytes into
/// the fixed-capacity output buffer and drain it to the orchestrator
/// *before* it would overflow, never after. A single `write` may re-enter
/// the orchestrator several times when the payload exceeds the buffer's
/// total capacity. The drain callback always observes the buffer's logical
/// content; the write position is rewound only after it returns.
pub struct StageContext<'a, 'buf> {
    output: &'a mut StreamBuffer<'buf>,
    orch: &'a mut dyn Orchestrator,
    has_fault: &'a mut bool,
}

impl<'a, 'buf> StageContext<'a, 'buf> {
    pub(crate) fn new(
        output: &'a mut StreamBuffer<'buf>,
        orch: &'a mut dyn Orchestrator,
        has_fault: &'a mut bool,
    ) -> Self {
        Self {
            output,
            orch,
            has_fault,
        }
    }

    /// Appends `bytes` to the output buffer, draining as needed.
    ///
    /// Bytes are copied until the buffer is full, the full buffer is
    /// drained, and the remainder continues from offset 0; concatenating
    /// all drains (plus a final [`flush`](Self::flush)) reproduces the
    /// written byte sequence exactly.
    ///
    /// # Errors
    ///
    /// [`ChannelError::OutputTooSmall`] if `bytes` is non-empty and the
    /// output buffer has zero capacity; [`ChannelError::Io`] if a drain
    /// callback reports a fault.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        if !bytes.is_empty() && self.output.capacity() == 0 {
            return Err(ChannelError::OutputTooSmall {
                needed: 1,
                capacity: 0,
            });
        }

        let mut rest = bytes;
        while !rest.is_empty() {
            if self.output.remaining() == 0 {
                self.drain()?;
            }
            let step = rest.len().min(self.output.remaining());
            self.output.extend(&rest[..step]);
            rest = &rest[step..];
        }
        Ok(())
    }

    /// Appends a 4-byte big-endian integer as one atomic unit.
    ///
    /// If fewer than 4 bytes remain, the buffer is drained first; the value
    /// is never split across a drain boundary.
    ///
    /// # Errors
    ///
    /// [`ChannelError::OutputTooSmall`] if the output buffer's capacity is
    /// below 4; [`ChannelError::Io`] if the drain reports a fault.
    pub fn put_u32(&mut self, value: u32) -> Result<(), ChannelError> {
        if self.output.capacity() < 4 {
            return Err(ChannelError::OutputTooSmall {
                needed: 4,
                capacity: self.output.capacity(),
            });
        }
        if self.output.remaining() < 4 {
            self.drain()?;
        }
        self.output.extend(&value.to_be_bytes());
        Ok(())
    }

    /// Drains any buffered output to the orchestrator. Idempotent; a no-op
    /// when nothing is buffered.
    pub fn flush(&mut self) -> Result<(), ChannelError> {
        if self.output.is_empty() {
            return Ok(());
        }
        self.drain()
    }

    /// Signals the orchestrator that output streaming has ended.
    ///
    /// Called by the default [`Stage::finish`](crate::Stage::finish) after
    /// the final flush; a stage replacing that hook calls it itself,
    /// exactly once.
    pub fn finish_output(&mut self) -> Result<(), ChannelError> {
        self.orch.finish_output().map_err(|e| self.record_fault(e))
    }

    /// Sends an opaque command to the orchestrator and blocks for the
    /// response.
    pub fn send_command(&mut self, cmd: &[u8]) -> Result<Bytes, ChannelError> {
        self.orch.send_command(cmd).map_err(|e| self.record_fault(e))
    }

    /// Returns the output buffer's fixed capacity.
    pub fn output_capacity(&self) -> usize {
        self.output.capacity()
    }

    /// Returns the number of bytes currently buffered, not yet drained.
    pub fn buffered(&self) -> usize {
        self.output.position()
    }

    // Hands the filled prefix to the orchestrator, then rewinds. Callers
    // guarantee the buffer is non-empty.
    fn drain(&mut self) -> Result<(), ChannelError> {
        trace!("draining {} bytes to orchestrator", self.output.position());
        let result = self.orch.flush_output(self.output.filled());
        match result {
            Ok(()) => {
                self.output.clear();
                Ok(())
            }
            Err(e) => Err(self.record_fault(e)),
        }
    }

    fn record_fault(&mut self, e: std::io::Error) -> ChannelError {
        warn!("orchestrator reported fault: {}", e);
        *self.has_fault = true;
        ChannelError::Io(e)
    }
}
