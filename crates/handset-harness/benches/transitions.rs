//! Benchmarks for screen register transitions.
//!
//! Run with: cargo bench -p handset-harness --bench transitions

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use handset_core::ticker::Ticker;
use handset_harness::{DisplayFixture, ProbeScreen};
use handset_runtime::DisplayConfig;
use handset_runtime::ticker_animator::animate_once;
use std::hint::black_box;
use std::sync::Arc;

// =============================================================================
// Plain transitions
// =============================================================================

fn bench_set_current(c: &mut Criterion) {
    let mut group = c.benchmark_group("register/set_current");

    for commands in [0usize, 4, 16] {
        let fx = DisplayFixture::new().expect("fixture");
        let make = |name: &str| {
            let mut builder = ProbeScreen::builder(name, &fx.journal);
            for i in 0..commands {
                builder = builder.command(handset_core::command::Command::new(
                    format!("cmd{i}"),
                    handset_core::command::CommandKind::Item,
                    i as i32,
                ));
            }
            builder.build()
        };
        let a = make("a");
        let b = make("b");
        group.bench_with_input(BenchmarkId::new("swap", commands), &(), |bench, _| {
            bench.iter(|| {
                fx.display.set_current(Some(Arc::clone(&a)));
                fx.display.set_current(Some(Arc::clone(&b)));
                fx.journal.clear();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Alert show + expiry
// =============================================================================

fn bench_alert_cycle(c: &mut Criterion) {
    let fx = DisplayFixture::new().expect("fixture");
    let s = fx.plain("s");
    let alert = fx.alert("a", 100);
    fx.display.set_current(Some(Arc::clone(&s)));

    c.bench_function("register/alert_show_expire", |bench| {
        bench.iter(|| {
            fx.display.set_current(Some(Arc::clone(&alert)));
            black_box(fx.advance_ms(100));
            fx.journal.clear();
        });
    });
}

// =============================================================================
// Ticker step
// =============================================================================

fn bench_ticker_step(c: &mut Criterion) {
    let fx = DisplayFixture::with_config(DisplayConfig::default().without_ticker())
        .expect("fixture");
    let ticker = Arc::new(Ticker::new("Scrolling status line for benchmarks"));
    let screen = ProbeScreen::builder("t", &fx.journal)
        .ticker(Arc::clone(&ticker))
        .build();
    fx.display.set_current(Some(screen));

    c.bench_function("ticker/animate_once", |bench| {
        bench.iter(|| {
            black_box(animate_once(&fx.display));
            fx.journal.clear();
        });
    });
    c.bench_function("ticker/visible_start", |bench| {
        bench.iter(|| black_box(ticker.visible_start(black_box(128))));
    });
}

criterion_group!(
    benches,
    bench_set_current,
    bench_alert_cycle,
    bench_ticker_step
);
criterion_main!(benches);
