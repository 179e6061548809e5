//! Error types for stagelink.

use std::fmt;

/// Errors that can occur while driving a channel.
#[derive(Debug)]
pub enum ChannelError {
    /// The orchestrator reported a fault during a callback (drain, finish,
    /// or outbound command). The channel's fault flag is set before this
    /// error is returned.
    Io(std::io::Error),

    /// An input delivery announced more bytes than the input buffer holds.
    ///
    /// This is a contract violation and is fatal to the current task: the
    /// buffer invariant cannot be restored once broken, and the input hook
    /// is never invoked.
    InputOverflow {
        /// The announced input length.
        length: usize,
        /// The input buffer's capacity.
        capacity: usize,
    },

    /// The output buffer can never hold the unit being written, so no number
    /// of drains would make the write fit.
    OutputTooSmall {
        /// The smallest append that must fit as one unit.
        needed: usize,
        /// The output buffer's capacity.
        capacity: usize,
    },

    /// A lifecycle operation was invoked after the channel was finished.
    Finished,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Io(e) => write!(f, "orchestrator fault: {}", e),
            ChannelError::InputOverflow { length, capacity } => {
                write!(
                    f,
                    "input length {} exceeds input buffer capacity {}",
                    length, capacity
                )
            }
            ChannelError::OutputTooSmall { needed, capacity } => {
                write!(
                    f,
                    "output buffer capacity {} cannot hold a {}-byte unit",
                    capacity, needed
                )
            }
            ChannelError::Finished => {
                write!(f, "channel is finished; no further operations allowed")
            }
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChannelError {
    fn from(e: std::io::Error) -> Self {
        ChannelError::Io(e)
    }
}
