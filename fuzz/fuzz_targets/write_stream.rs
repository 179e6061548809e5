#![no_main]

use libfuzzer_sys::fuzz_target;
use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};

/// Replays one fuzz-chosen write sequence against the output buffer.
struct Writes<'d> {
    pieces: Vec<&'d [u8]>,
}

impl Stage for Writes<'_> {
    fn handle_input(
        &mut self,
        _input: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<(), ChannelError> {
        for piece in &self.pieces {
            ctx.write(piece)?;
        }
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the output capacity (1..=64), the rest becomes a
    // sequence of writes of varying sizes.
    let capacity = (data[0] as usize % 64) + 1;
    let body = &data[1..];

    let mut pieces = Vec::new();
    let mut at = 0;
    let mut step = 1;
    while at < body.len() {
        let end = (at + step).min(body.len());
        pieces.push(&body[at..end]);
        at = end;
        step = (step * 3 + 1) % 23 + 1;
    }
    let expected: Vec<u8> = pieces.concat();

    let mut orch = CollectingOrchestrator::new();
    let mut input = [0u8; 1];
    let mut output = vec![0u8; capacity];
    let mut channel =
        Channel::setup(Writes { pieces }, &mut orch, &mut input, &mut output).unwrap();

    channel.deliver_input(&mut orch, 0).unwrap();
    channel.signal_finish(&mut orch).unwrap();

    // Invariant: every drain fits the buffer
    for drain in orch.drains() {
        assert!(!drain.is_empty());
        assert!(drain.len() <= capacity);
    }

    // Invariant: drains concatenated in call order reproduce the writes
    assert_eq!(orch.concatenated(), expected);

    // Invariant: exactly one end-of-output signal
    assert_eq!(orch.finish_calls(), 1);
    assert!(!channel.has_fault());
});
