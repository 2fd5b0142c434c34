//! Cone shock chart: shock angle and surface pressure against cone
//! half-angle at several Mach numbers, plus dimensional surface pressure for
//! a cone flying at altitude.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example cone_chart

use compflow::{ConeSolver, ErrorKind, StandardAtmosphere, GAMMA_AIR};

fn main() {
    env_logger::init();

    let solver = ConeSolver::default();
    let machs = [1.5, 2.0, 3.0, 5.0];

    println!("Shock angle β (deg) / surface p/p∞, γ = {}", GAMMA_AIR);
    print!("{:>8}", "cone");
    for mach in machs {
        print!("{:>22}", format!("M = {}", mach));
    }
    println!();

    for i in 1..=10 {
        let cone = 4.0 * i as f64;
        print!("{:>8.1}", cone);
        for mach in machs {
            match solver.solution(mach, cone, GAMMA_AIR) {
                Ok(s) if s.detached => print!("{:>22}", "detached"),
                Ok(s) => print!("{:>13.3} / {:>6.3}", s.wave_angle, s.surface_pressure_ratio),
                Err(e) if e.kind() == ErrorKind::NoSolution => print!("{:>22}", "no solution"),
                Err(e) => {
                    eprintln!("M = {}, cone {}°: {}", mach, cone, e);
                    return;
                }
            }
        }
        println!();
    }

    // A 15° cone at Mach 3 and 20 km
    let atmosphere = StandardAtmosphere::new();
    let (mach, cone, altitude) = (3.0, 15.0, 20_000.0);
    let freestream = match atmosphere.at(altitude) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    match solver.cone_ray_properties(mach, cone, GAMMA_AIR, None) {
        Ok(surface) => {
            println!();
            println!(
                "{}° cone at M = {}, {} km ({:.0} m/s, Re/m = {:.3e}):",
                cone,
                mach,
                altitude / 1000.0,
                freestream.velocity(mach),
                freestream.unit_reynolds(mach)
            );
            println!(
                "  surface M = {:.4}, p = {:.1} Pa (freestream {:.1} Pa)",
                surface.mach,
                surface.pressure_ratio * freestream.pressure,
                freestream.pressure
            );
        }
        Err(e) => eprintln!("{}", e),
    }
    println!("memoized solutions: {}", solver.cache_len());
}
