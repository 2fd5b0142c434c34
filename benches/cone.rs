use criterion::{black_box, criterion_group, criterion_main, Criterion};
use compflow::taylor_maccoll::TaylorMaccoll;
use compflow::{ConeSolver, Dopri5, SolverConfig, Tolerances, GAMMA_AIR};

fn bench_effective_angle_fresh(c: &mut Criterion) {
    let solver = ConeSolver::new(SolverConfig::default().uncached());
    c.bench_function("effective_angle_m3_cone20", |b| {
        b.iter(|| {
            solver
                .effective_wedge_angle(black_box(3.0), black_box(20.0), GAMMA_AIR)
                .unwrap()
        })
    });
}

fn bench_detached_solve(c: &mut Criterion) {
    let solver = ConeSolver::new(SolverConfig::default().uncached());
    c.bench_function("effective_angle_detached_m2_cone40", |b| {
        b.iter(|| {
            solver
                .effective_wedge_angle(black_box(2.0), black_box(40.0), GAMMA_AIR)
                .unwrap()
        })
    });
}

fn bench_cached_queries(c: &mut Criterion) {
    let solver = ConeSolver::default();
    solver.effective_wedge_angle(3.0, 20.0, GAMMA_AIR).unwrap();
    c.bench_function("cached_full_jump", |b| {
        b.iter(|| {
            solver
                .cone_full_jump(black_box(3.0), black_box(20.0), GAMMA_AIR)
                .unwrap()
        })
    });
}

fn bench_raw_integration(c: &mut Criterion) {
    // Shock to surface for M = 3, 20° cone
    let sys = TaylorMaccoll { gamma: GAMMA_AIR };
    let y0 = [0.697045, -0.216268];
    let from = 29.6146f64.to_radians();
    let to = 20f64.to_radians();
    c.bench_function("taylor_maccoll_shock_to_surface", |b| {
        b.iter(|| {
            let mut solver = Dopri5::new(Tolerances::new(1e-12, 1e-10));
            solver
                .integrate(&sys, from, black_box(&y0), to, (to - from) / 64.0)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_effective_angle_fresh,
    bench_detached_solve,
    bench_cached_queries,
    bench_raw_integration
);
criterion_main!(benches);
