//! Spin benchmarks per preset

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rf_slot_engine::{SlotEngine, SpinMode, presets, rng};

fn bench_presets(c: &mut Criterion) {
    for config in presets::all_presets() {
        let name = format!("spin_{}", config.id);
        let engine = SlotEngine::new(config).expect("preset validates");
        let mut rng = rng::seeded(1);

        c.bench_function(&name, |b| {
            b.iter(|| {
                let meter = engine.new_meter();
                let result = engine.spin(black_box(1.0), SpinMode::Base, meter, &mut rng);
                black_box(result)
            })
        });
    }
}

fn bench_free_spin_cascades(c: &mut Criterion) {
    let engine = SlotEngine::new(presets::cascade_grid()).expect("preset validates");
    let mut rng = rng::seeded(2);
    let mut meter = engine.new_meter();
    meter.free_spins_remaining = 1_000_000;

    c.bench_function("free_spin_gem_cascade", |b| {
        b.iter(|| black_box(engine.spin(1.0, SpinMode::FreeSpin, meter.clone(), &mut rng)))
    });
}

criterion_group!(benches, bench_presets, bench_free_spin_cascades);
criterion_main!(benches);
