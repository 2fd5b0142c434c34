//! # compflow: Compressible Flow Relations
//!
//! Closed-form and semi-numerical relations of one-dimensional and
//! axisymmetric compressible flow of a calorically perfect gas, centred on a
//! Taylor-Maccoll solver for supersonic flow over sharp cones.
//!
//! ## Features
//!
//! - Isentropic ratios, normal and oblique shocks, Prandtl-Meyer expansion
//! - **Conical shocks**: effective wedge angle, shock angle, surface state and
//!   flow-field ratios on any ray, by shooting on the Taylor-Maccoll equation
//! - Explicit bracket check: cones beyond the attachment limit take a defined
//!   bow-shock branch or fail with [`FlowError::NoSolution`], never a
//!   spurious root
//! - Quasi-1D nozzle flow, a standard atmosphere to 86 km, and multi-ramp
//!   intakes built from the oblique-shock relations
//! - Adaptive Dormand-Prince 5(4) integrator with event location, usable on
//!   its own
//! - Optional data-parallel sweeps (`parallel` feature, rayon)
//!
//! All angles at the public boundary are degrees. Every function takes γ
//! explicitly; [`GAMMA_AIR`] is the usual value.
//!
//! ## Basic Usage
//!
//! ```rust
//! use compflow::{cone_full_jump, effective_wedge_angle, ObliqueShock, GAMMA_AIR};
//!
//! // A 20° cone at Mach 4
//! let jump = cone_full_jump(4.0, 20.0, GAMMA_AIR).unwrap();
//! assert!((jump.wave_angle - 26.485).abs() < 0.01);
//! assert!((jump.mach - 2.970).abs() < 0.01);
//!
//! // The 2-D wedge with the same shock
//! let wedge = effective_wedge_angle(4.0, 20.0, GAMMA_AIR).unwrap();
//! let shock = ObliqueShock::new(4.0, wedge, GAMMA_AIR).unwrap();
//! assert!((shock.wave_angle - jump.wave_angle).abs() < 1e-6);
//! ```
//!
//! Repeated queries on one geometry should share a [`ConeSolver`], which
//! memoizes the shooting solve:
//!
//! ```rust
//! use compflow::{ConeSolver, GAMMA_AIR};
//!
//! let solver = ConeSolver::default();
//! let surface = solver.cone_surface_state(3.0, 20.0, GAMMA_AIR).unwrap();
//! let midway = solver.cone_ray_properties(3.0, 20.0, GAMMA_AIR, Some(25.0)).unwrap();
//! assert!(midway.mach > surface.mach);
//! assert_eq!(solver.cache_len(), 1);
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns [`FlowError`]. [`FlowError::kind`]
//! separates rejected input ([`ErrorKind::InvalidDomain`]), problems without
//! a solution ([`ErrorKind::NoSolution`]) and solvers that ran out of budget
//! ([`ErrorKind::NotConverged`]), which may succeed with a looser
//! [`SolverConfig`].
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade. The default [`LogObserver`]
//! reports bow-shock trials at debug level; install another
//! [`ShockObserver`] with [`ConeSolver::with_observer`] to capture or
//! silence them.
//!
//! ## References
//!
//! 1. Taylor, G.I., & Maccoll, J.W. (1933). "The Air Pressure on a Cone
//!    Moving at High Speeds". Proc. R. Soc. Lond. A 139.
//!
//! 2. Anderson, J.D. (2003). "Modern Compressible Flow", 3rd ed.
//!    McGraw-Hill.
//!
//! 3. Dormand, J.R., & Prince, P.J. (1980). "A family of embedded
//!    Runge-Kutta formulae". J. Comput. Appl. Math. 6.
//!
//! 4. Brent, R.P. (1973). "Algorithms for Minimization without
//!    Derivatives". Prentice-Hall.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod atmosphere;
pub mod coefficients;
pub mod cone;
pub mod config;
pub mod error;
pub mod events;
pub mod intake;
pub mod isentropic;
pub mod normal_shock;
pub mod nozzle;
pub mod oblique_shock;
pub mod observer;
pub mod prandtl_meyer;
pub mod roots;
pub mod solver;
#[cfg(feature = "parallel")]
pub mod sweep;
pub mod taylor_maccoll;

pub use atmosphere::{AtmosphereState, StandardAtmosphere};
pub use cone::{
    cone_downstream_mach, cone_full_jump, cone_ray_properties, cone_shock_angle,
    cone_surface_state, effective_wedge_angle, ConeFromShock, ConeJump, ConeSolution, ConeSolver,
    RayProperties, SurfaceState,
};
pub use config::{SolverConfig, GAMMA_AIR};
pub use error::{ErrorKind, FlowError};
pub use events::{EventConfig, EventDirection, EventFunction, EventResult};
pub use intake::{IntakeAnalysis, RampIntake, Stage};
pub use normal_shock::NormalShock;
pub use nozzle::{area_ratio, mach_from_area_ratio, mass_flow_parameter, FlowRegime};
pub use oblique_shock::{max_deflection, wave_angle, MaxDeflection, ObliqueShock, ShockBranch};
pub use observer::{LogObserver, ShockObserver, SilentObserver};
pub use prandtl_meyer::{expansion, mach_from_prandtl_meyer, prandtl_meyer_angle, Expansion};
pub use roots::{BrentError, BrentMinimizer, BrentSolver};
pub use solver::{
    Dopri5, IntegrationError, IntegrationResult, OdeSystem, Stats, StepController, StepResult,
    Tolerances,
};
