//! Taylor-Maccoll conical flow
//!
//! Behind an attached conical shock the flow is self-similar: every quantity
//! depends only on the polar ray angle φ measured from the cone axis. With
//! velocities normalized by the limiting speed V_max, the state
//! y = [v_r, v_θ] obeys
//!
//! ```text
//! dv_r/dφ = v_θ
//! dv_θ/dφ = (v_θ² v_r − a (2 v_r + v_θ cot φ)) / (a − v_θ²)
//! a       = (γ−1)/2 (1 − v_r² − v_θ²)          (local sound speed squared)
//! ```
//!
//! The equation is singular on the axis and where the velocity component
//! normal to the ray is sonic (a = v_θ²). Integration starts just behind the
//! shock, where the normal component is subsonic, and proceeds toward the
//! cone. The cone surface is the ray on which v_θ vanishes.

use std::f64::consts::FRAC_PI_2;

use crate::config::SolverConfig;
use crate::error::FlowError;
use crate::events::{EventConfig, EventDirection, EventFunction};
use crate::normal_shock::NormalShock;
use crate::oblique_shock::{tan_deflection, wave_angle_rad, ObliqueShock, ShockBranch};
use crate::observer::ShockObserver;
use crate::solver::{Dopri5, IntegrationResult, OdeSystem, Tolerances};

/// Right-hand side of the Taylor-Maccoll equation, independent variable φ in
/// radians
#[derive(Debug, Clone, Copy)]
pub struct TaylorMaccoll {
    /// Specific-heat ratio
    pub gamma: f64,
}

impl OdeSystem<2> for TaylorMaccoll {
    fn rhs(&self, phi: f64, y: &[f64; 2], dydx: &mut [f64; 2]) {
        let (vr, vt) = (y[0], y[1]);
        let a = 0.5 * (self.gamma - 1.0) * (1.0 - vr * vr - vt * vt);
        dydx[0] = vt;
        dydx[1] = (vt * vt * vr - a * (2.0 * vr + vt / phi.tan())) / (a - vt * vt);
    }
}

/// Cone surface: tangential velocity crossing zero from below
struct SurfaceTangency;

impl EventFunction<2> for SurfaceTangency {
    fn eval(&self, _phi: f64, y: &[f64; 2]) -> f64 {
        y[1]
    }
}

/// Speed normalized by the limiting speed, V/V_max, for Mach number `mach`
pub fn velocity_from_mach(mach: f64, gamma: f64) -> f64 {
    let k = 0.5 * (gamma - 1.0) * mach * mach;
    (k / (1.0 + k)).sqrt()
}

/// Mach number for normalized speed `velocity` (< 1)
pub fn mach_from_velocity(velocity: f64, gamma: f64) -> f64 {
    let v2 = velocity * velocity;
    (2.0 / (gamma - 1.0) * v2 / (1.0 - v2)).sqrt()
}

/// State just behind the shock for one trial deflection; initial condition of
/// the conical flow. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockBoundary {
    /// Trial 2-D deflection
    pub deflection: f64,
    /// Shock wave angle (π/2 when detached)
    pub wave_angle: f64,
    /// Downstream Mach number
    pub mach: f64,
    /// ρ2/ρ1 across the shock
    pub density_ratio: f64,
    /// p2/p1 across the shock
    pub pressure_ratio: f64,
    /// p02/p01 across the shock
    pub total_pressure_ratio: f64,
    /// Bow-shock branch taken: deflection at or beyond θ_max
    pub detached: bool,
}

impl ShockBoundary {
    /// Jump for trial deflection `deflection`.
    ///
    /// At or beyond θ_max no attached shock exists; the wave angle is forced
    /// to 90° and the normal-shock relations on the freestream Mach number
    /// replace the oblique ones. The observer hears about every such trial.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        mach: f64,
        deflection: f64,
        gamma: f64,
        theta_max: f64,
        beta_max: f64,
        config: &SolverConfig,
        observer: &dyn ShockObserver,
    ) -> Result<Self, FlowError> {
        let detached = deflection >= theta_max;
        let beta = if detached {
            observer.bow_shock(mach, deflection.to_degrees(), theta_max.to_degrees());
            FRAC_PI_2
        } else {
            wave_angle_rad(
                mach,
                deflection,
                gamma,
                ShockBranch::Weak,
                theta_max,
                beta_max,
                config,
            )?
        };

        let shock = ObliqueShock::from_angles_rad(mach, deflection, beta, gamma);
        let total_pressure_ratio = if detached {
            NormalShock::jump(mach, gamma).total_pressure_ratio
        } else {
            shock.total_pressure_ratio
        };
        Ok(Self {
            deflection,
            wave_angle: beta,
            mach: shock.mach,
            density_ratio: shock.density_ratio,
            pressure_ratio: shock.pressure_ratio,
            total_pressure_ratio,
            detached,
        })
    }

    /// Attached jump for a given wave angle β (radians), between the Mach
    /// angle and 90°
    pub(crate) fn from_wave_angle(mach: f64, beta: f64, gamma: f64) -> Self {
        let deflection = tan_deflection(mach, beta, gamma).atan().max(0.0);
        let shock = ObliqueShock::from_angles_rad(mach, deflection, beta, gamma);
        Self {
            deflection,
            wave_angle: beta,
            mach: shock.mach,
            density_ratio: shock.density_ratio,
            pressure_ratio: shock.pressure_ratio,
            total_pressure_ratio: shock.total_pressure_ratio,
            detached: false,
        }
    }

    /// Uniform flow at the Mach wave (zero deflection)
    pub(crate) fn mach_wave(mach: f64) -> Self {
        Self {
            deflection: 0.0,
            wave_angle: (1.0 / mach).asin(),
            mach,
            density_ratio: 1.0,
            pressure_ratio: 1.0,
            total_pressure_ratio: 1.0,
            detached: false,
        }
    }

    /// [v_r, v_θ] just behind the shock: the flow leaves the shock turned by
    /// the deflection, at β − θ to the shock ray
    pub fn velocity(&self, gamma: f64) -> [f64; 2] {
        let v = velocity_from_mach(self.mach, gamma);
        let turn = self.wave_angle - self.deflection;
        [v * turn.cos(), -v * turn.sin()]
    }
}

fn integrator(config: &SolverConfig) -> Dopri5<2> {
    Dopri5::new(Tolerances::new(config.ode_atol, config.ode_rtol)).with_max_steps(config.max_steps)
}

fn initial_step(from: f64, to: f64) -> f64 {
    (to - from) / 64.0
}

fn tangency_config(config: &SolverConfig) -> EventConfig {
    EventConfig {
        direction: EventDirection::Rising,
        root_tol: config.root_tol,
        max_iter: config.max_iter,
    }
}

/// Velocity [v_r, v_θ] on ray `ray` (radians, between the cone and the shock)
/// and the ray actually reached.
///
/// Integration stops early on a ray where v_θ vanishes: past it the flow
/// would cross the surface. Behind a converged attached shock that ray is the
/// cone itself to within the root tolerance; behind a bow shock it can lie
/// above the requested ray. Zero deflection is uniform flow and is evaluated
/// in closed form, which also covers rays on the axis.
pub(crate) fn integrate_to_ray(
    boundary: &ShockBoundary,
    gamma: f64,
    ray: f64,
    config: &SolverConfig,
) -> Result<(f64, [f64; 2]), FlowError> {
    if boundary.deflection == 0.0 && !boundary.detached {
        let v = velocity_from_mach(boundary.mach, gamma);
        return Ok((ray, [v * ray.cos(), -v * ray.sin()]));
    }
    let y0 = boundary.velocity(gamma);
    let start = boundary.wave_angle;
    if ray >= start {
        return Ok((start, y0));
    }
    let sys = TaylorMaccoll { gamma };
    match integrator(config).integrate_to_event(
        &sys,
        &SurfaceTangency,
        &tangency_config(config),
        start,
        &y0,
        ray,
        initial_step(start, ray),
    )? {
        IntegrationResult::Completed { x, y } => Ok((x, y)),
        IntegrationResult::Event(ev) => Ok((ev.x, ev.y)),
    }
}

/// Shooting residual: tangential velocity at the cone ray `cone` (radians).
///
/// Negative when the trial shock is too weak for this cone. When v_θ vanishes
/// before the cone ray is reached the shock is too strong; integration stops
/// on that surface and the residual is the linear continuation of v_θ to the
/// cone ray, 2 v_r (φ_s − θ_c), using dv_θ/dφ = −2 v_r where v_θ = 0. The
/// continuation keeps the residual continuous through the root without
/// integrating into the sonic singularity beyond the surface.
pub(crate) fn shooting_residual(
    boundary: &ShockBoundary,
    gamma: f64,
    cone: f64,
    config: &SolverConfig,
) -> Result<f64, FlowError> {
    let y0 = boundary.velocity(gamma);
    let start = boundary.wave_angle;
    if start <= cone {
        return Ok(y0[1]);
    }

    let sys = TaylorMaccoll { gamma };
    let result = integrator(config).integrate_to_event(
        &sys,
        &SurfaceTangency,
        &tangency_config(config),
        start,
        &y0,
        cone,
        initial_step(start, cone),
    )?;
    Ok(match result {
        IntegrationResult::Completed { y, .. } => y[1],
        IntegrationResult::Event(ev) => 2.0 * ev.y[0] * (ev.x - cone),
    })
}

/// Integrate from the shock toward the axis until the flow is tangent to a
/// ray; returns that ray (radians) and the velocity on it.
pub(crate) fn surface_from_shock(
    boundary: &ShockBoundary,
    gamma: f64,
    config: &SolverConfig,
) -> Result<(f64, [f64; 2]), FlowError> {
    let y0 = boundary.velocity(gamma);
    let start = boundary.wave_angle;
    // Stop short of the axis singularity
    let floor = 1e-6;
    let sys = TaylorMaccoll { gamma };
    match integrator(config).integrate_to_event(
        &sys,
        &SurfaceTangency,
        &tangency_config(config),
        start,
        &y0,
        floor,
        initial_step(start, floor),
    )? {
        IntegrationResult::Event(ev) => Ok((ev.x, ev.y)),
        IntegrationResult::Completed { .. } => Err(FlowError::NoSolution {
            message: format!(
                "flow behind a {:.6}° shock never becomes tangent to a cone",
                start.to_degrees()
            ),
        }),
    }
}
