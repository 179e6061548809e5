//! The command side-channel, both directions.
//!
//! The stage reports progress when the orchestrator polls it, and asks the
//! orchestrator for a checkpoint interval at setup time.
//!
//! Run with:
//!     cargo run --example checkpoint_command

use bytes::Bytes;
use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};

struct CountingStage {
    checkpoint_every: u64,
    bytes_seen: u64,
}

impl Stage for CountingStage {
    fn setup(&mut self, ctx: &mut StageContext<'_, '_>) -> Result<(), ChannelError> {
        // Outbound command: ask the orchestrator how often to checkpoint
        let reply = ctx.send_command(b"checkpoint-interval?")?;
        self.checkpoint_every = String::from_utf8_lossy(&reply).parse().unwrap_or(1024);
        Ok(())
    }

    fn handle_input(
        &mut self,
        input: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<(), ChannelError> {
        let before = self.bytes_seen / self.checkpoint_every;
        self.bytes_seen += input.len() as u64;
        if self.bytes_seen / self.checkpoint_every > before {
            ctx.send_command(format!("checkpoint:{}", self.bytes_seen).as_bytes())?;
        }
        ctx.write(input)
    }

    fn command(
        &mut self,
        cmd: &[u8],
        _ctx: &mut StageContext<'_, '_>,
    ) -> Result<Bytes, ChannelError> {
        // Inbound command: answer progress polls, ignore everything else
        if cmd == b"progress" {
            Ok(Bytes::from(self.bytes_seen.to_string()))
        } else {
            Ok(Bytes::new())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut orch = CollectingOrchestrator::with_responder(|cmd| {
        if cmd == b"checkpoint-interval?" {
            Bytes::from_static(b"100")
        } else {
            Bytes::new()
        }
    });

    let mut input = [0u8; 64];
    let mut output = [0u8; 256];
    let stage = CountingStage {
        checkpoint_every: 0,
        bytes_seen: 0,
    };
    let mut channel = Channel::setup(stage, &mut orch, &mut input, &mut output)?;

    for _ in 0..6 {
        channel.input_mut()[..40].fill(b'x');
        channel.deliver_input(&mut orch, 40)?;

        let progress = channel.on_command(&mut orch, b"progress")?;
        println!("progress poll: {} bytes", String::from_utf8_lossy(&progress));
    }
    channel.signal_finish(&mut orch)?;

    println!("stage sent {} outbound commands:", orch.commands().len());
    for cmd in orch.commands() {
        println!("  {}", String::from_utf8_lossy(cmd));
    }

    Ok(())
}
