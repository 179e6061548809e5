//! Benchmarks for stagelink.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use stagelink::{Channel, ChannelError, CollectingOrchestrator, Stage, StageContext};

/// Forwards input to the output buffer unchanged.
struct Passthrough;

impl Stage for Passthrough {
    fn handle_input(
        &mut self,
        input: &[u8],
        ctx: &mut StageContext<'_, '_>,
    ) -> Result<(), ChannelError> {
        ctx.write(input)
    }
}

/// Discards drained output as fast as possible.
struct NullOrchestrator;

impl stagelink::Orchestrator for NullOrchestrator {
    fn flush_output(&mut self, data: &[u8]) -> std::io::Result<()> {
        black_box(data.len());
        Ok(())
    }
    fn finish_output(&mut self) -> std::io::Result<()> {
        Ok(())
    }
    fn send_command(&mut self, _cmd: &[u8]) -> std::io::Result<bytes::Bytes> {
        Ok(bytes::Bytes::new())
    }
}

fn bench_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel");

    // Steady-state write throughput across delivery sizes
    for delivery in [256usize, 4 * 1024, 64 * 1024] {
        let total = 16 * 1024 * 1024;
        let deliveries = total / delivery;

        group.throughput(Throughput::Bytes(total as u64));
        group.bench_function(format!("passthrough_{}b_deliveries", delivery), |b| {
            let mut input = vec![0u8; delivery];
            let mut output = vec![0u8; 32 * 1024];
            for (i, byte) in input.iter_mut().enumerate() {
                *byte = (i * 7 + 13) as u8;
            }

            b.iter(|| {
                let mut orch = NullOrchestrator;
                let mut channel =
                    Channel::setup(Passthrough, &mut orch, &mut input, &mut output)
                        .expect("setup");
                for _ in 0..deliveries {
                    channel
                        .deliver_input(&mut orch, black_box(delivery))
                        .expect("deliver");
                }
                channel.signal_finish(&mut orch).expect("finish");
            });
        });
    }

    // Drain-heavy: output buffer far smaller than each delivery
    group.throughput(Throughput::Bytes(1024 * 1024));
    group.bench_function("passthrough_drain_heavy", |b| {
        let mut input = vec![0xA5u8; 64 * 1024];
        let mut output = vec![0u8; 512];

        b.iter(|| {
            let mut orch = NullOrchestrator;
            let mut channel = Channel::setup(Passthrough, &mut orch, &mut input, &mut output)
                .expect("setup");
            for _ in 0..16 {
                channel.deliver_input(&mut orch, 64 * 1024).expect("deliver");
            }
            channel.signal_finish(&mut orch).expect("finish");
        });
    });

    // Collecting orchestrator overhead, for comparison with tests
    group.bench_function("passthrough_collecting", |b| {
        let mut input = vec![0x5Au8; 4 * 1024];
        let mut output = vec![0u8; 4 * 1024];

        b.iter(|| {
            let mut orch = CollectingOrchestrator::new();
            let mut channel = Channel::setup(Passthrough, &mut orch, &mut input, &mut output)
                .expect("setup");
            for _ in 0..64 {
                channel.deliver_input(&mut orch, 4 * 1024).expect("deliver");
            }
            channel.signal_finish(&mut orch).expect("finish");
            black_box(orch.drain_count())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_channel);
criterion_main!(benches);
