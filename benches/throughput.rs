use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use switch_access_hints::{ActionId, ActionInfo, GlobalFlags, HintEngine, NodeSnapshot};

fn shared_engine() -> (Arc<HintEngine>, NodeSnapshot) {
    let engine = Arc::new(HintEngine::switch_access_default().unwrap());
    let node = NodeSnapshot::new()
        .clickable(true)
        .checkable(true)
        .action(ActionInfo::new(ActionId::Expand))
        .action(ActionInfo::custom(1001, "Reply"))
        .action(ActionInfo::new(ActionId::LongClick).with_label("select text"));
    (engine, node)
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let (engine, node) = shared_engine();

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let e = Arc::clone(&engine);
                        let n = node.clone();
                        thread::spawn(move || {
                            let globals = GlobalFlags::new();
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                let _ = e.generate_hint(&n, &globals);
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
