//! A map stage that uppercases records, driven batch by batch.
//!
//! Run with:
//!     cargo run --example map_stage

use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};

/// Uppercases each delivery and emits it as a length-prefixed record.
struct UppercaseMapper {
    records_in: u64,
    bytes_out: u64,
}

impl Stage for UppercaseMapper {
    fn handle_input(
        &mut self,
        input: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<(), ChannelError> {
        let mapped: Vec<u8> = input.iter().map(|b| b.to_ascii_uppercase()).collect();
        ctx.put_u32(mapped.len() as u32)?;
        ctx.write(&mapped)?;
        self.records_in += 1;
        self.bytes_out += 4 + mapped.len() as u64;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let records: &[&[u8]] = &[
        b"the quick brown fox",
        b"jumps over",
        b"the lazy dog",
        b"pack my box with five dozen liquor jugs",
    ];

    let mut orch = CollectingOrchestrator::new();
    // Deliberately tiny output buffer so the drain loop is visible
    let mut input = [0u8; 64];
    let mut output = [0u8; 16];

    let stage = UppercaseMapper {
        records_in: 0,
        bytes_out: 0,
    };
    let mut channel = Channel::setup(stage, &mut orch, &mut input, &mut output)?;

    for record in records {
        channel.input_mut()[..record.len()].copy_from_slice(record);
        channel.deliver_input(&mut orch, record.len())?;
    }
    channel.signal_finish(&mut orch)?;

    println!(
        "mapped {} records into {} output bytes",
        channel.stage().records_in,
        channel.stage().bytes_out
    );
    println!("drain callbacks: {}", orch.drain_count());
    for (i, drain) in orch.drains().iter().enumerate() {
        println!("  drain {}: {} bytes", i, drain.len());
    }

    // Decode the drained stream back into records
    let stream = orch.concatenated();
    let mut at = 0;
    while at < stream.len() {
        let len = u32::from_be_bytes(stream[at..at + 4].try_into()?) as usize;
        at += 4;
        println!("record: {}", String::from_utf8_lossy(&stream[at..at + len]));
        at += len;
    }

    Ok(())
}
