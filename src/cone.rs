//! Supersonic flow over a sharp cone at zero incidence
//!
//! [`ConeSolver`] finds the effective wedge angle of a cone: the 2-D
//! deflection whose oblique shock, used as the initial condition of the
//! Taylor-Maccoll equation, produces a conical flow tangent to the cone
//! surface. Every other cone property is derived from that one shooting
//! solve, so the solver memoizes it per (M, θ_c, γ).
//!
//! All angles at this boundary are degrees.
//!
//! # Example
//!
//! ```
//! use compflow::{ConeSolver, GAMMA_AIR};
//!
//! let solver = ConeSolver::default();
//! let beta = solver.cone_shock_angle(2.0, 20.0, GAMMA_AIR).unwrap();
//! assert!((beta - 37.796).abs() < 0.01);
//!
//! // The surface state reuses the memoized solve
//! let surface = solver.cone_surface_state(2.0, 20.0, GAMMA_AIR).unwrap();
//! assert!((surface.mach - 1.568).abs() < 0.01);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::trace;

use crate::config::SolverConfig;
use crate::error::{check_angle, check_gamma, check_supersonic, FlowError};
use crate::isentropic;
use crate::oblique_shock::max_deflection_rad;
use crate::observer::{LogObserver, ShockObserver};
use crate::roots::BrentSolver;
use crate::taylor_maccoll::{
    integrate_to_ray, mach_from_velocity, shooting_residual, surface_from_shock,
    velocity_from_mach, ShockBoundary,
};

/// Slack on angles checked against a closed range, degrees
const ANGLE_SLACK: f64 = 1e-9;

type CacheKey = (i64, i64, i64);

fn cache_key(mach: f64, cone: f64, gamma: f64) -> CacheKey {
    let q = |v: f64| (v * 1e9).round() as i64;
    (q(mach), q(cone), q(gamma))
}

/// Local flow on the cone surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    /// Surface Mach number
    pub mach: f64,
    /// Flow direction relative to the cone axis, degrees
    pub flow_angle: f64,
}

/// State just behind the conical shock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeJump {
    /// Downstream Mach number M2
    pub mach: f64,
    /// ρ2/ρ1
    pub density_ratio: f64,
    /// p2/p1
    pub pressure_ratio: f64,
    /// p02/p01
    pub total_pressure_ratio: f64,
    /// Shock wave angle β, degrees
    pub wave_angle: f64,
    /// Bow-shock branch
    pub detached: bool,
}

/// Conical flow on one ray, ratios relative to the freestream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayProperties {
    /// Local Mach number
    pub mach: f64,
    /// ρ/ρ∞
    pub density_ratio: f64,
    /// p/p∞
    pub pressure_ratio: f64,
    /// p0/p0∞, constant between the shock and the cone
    pub total_pressure_ratio: f64,
    /// Shock wave angle β, degrees
    pub wave_angle: f64,
    /// Flow direction relative to the cone axis, degrees. Present only when
    /// the ray was given explicitly.
    pub flow_angle: Option<f64>,
}

/// Summary of one cone solution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSolution {
    /// Effective 2-D wedge angle, degrees
    pub effective_angle: f64,
    /// Shock wave angle, degrees
    pub wave_angle: f64,
    /// Mach number just behind the shock
    pub downstream_mach: f64,
    /// Mach number on the cone surface
    pub surface_mach: f64,
    /// Surface static pressure over freestream static pressure
    pub surface_pressure_ratio: f64,
    /// Bow-shock branch
    pub detached: bool,
}

/// Cone that supports a given shock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeFromShock {
    /// Cone half-angle, degrees
    pub cone_angle: f64,
    /// Deflection of the oblique shock at that wave angle, degrees
    pub effective_angle: f64,
    /// Mach number on the cone surface
    pub surface_mach: f64,
}

/// Taylor-Maccoll cone solver with a memo of effective wedge angles
pub struct ConeSolver {
    config: SolverConfig,
    observer: Arc<dyn ShockObserver + Send + Sync>,
    cache: Mutex<HashMap<CacheKey, ShockBoundary>>,
}

impl Default for ConeSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl std::fmt::Debug for ConeSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConeSolver")
            .field("config", &self.config)
            .field("cached", &self.cache_len())
            .finish()
    }
}

impl ConeSolver {
    /// Solver reporting through [`LogObserver`]
    pub fn new(config: SolverConfig) -> Self {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    /// Solver reporting bow-shock trials and fresh solves to `observer`
    pub fn with_observer(
        config: SolverConfig,
        observer: Arc<dyn ShockObserver + Send + Sync>,
    ) -> Self {
        Self {
            config,
            observer,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Numerical configuration in use
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Effective 2-D wedge angle reproducing the cone's shock angle
    pub fn effective_wedge_angle(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<f64, FlowError> {
        Ok(self.solve(mach, cone_angle, gamma)?.deflection.to_degrees())
    }

    /// Shock wave angle β of the conical shock; 90° when detached
    pub fn cone_shock_angle(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<f64, FlowError> {
        Ok(self.solve(mach, cone_angle, gamma)?.wave_angle.to_degrees())
    }

    /// Mach number just behind the conical shock
    pub fn cone_downstream_mach(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<f64, FlowError> {
        Ok(self.solve(mach, cone_angle, gamma)?.mach)
    }

    /// Mach number and flow direction on the cone surface.
    ///
    /// Behind a bow shock the flow turns tangent on a ray above the cone and
    /// the state is taken there, so `flow_angle` is that ray rather than the
    /// cone half-angle (about 46.09° for a 40° cone at M = 2).
    pub fn cone_surface_state(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<SurfaceState, FlowError> {
        let props = self.cone_ray_properties(mach, cone_angle, gamma, Some(cone_angle))?;
        Ok(SurfaceState {
            mach: props.mach,
            flow_angle: props.flow_angle.unwrap_or(cone_angle),
        })
    }

    /// Jump across the conical shock
    pub fn cone_full_jump(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<ConeJump, FlowError> {
        let b = self.solve(mach, cone_angle, gamma)?;
        Ok(ConeJump {
            mach: b.mach,
            density_ratio: b.density_ratio,
            pressure_ratio: b.pressure_ratio,
            total_pressure_ratio: b.total_pressure_ratio,
            wave_angle: b.wave_angle.to_degrees(),
            detached: b.detached,
        })
    }

    /// Flow on ray `ray` (degrees), or on the cone surface when `None`.
    ///
    /// The flow between the shock and the cone is isentropic, so density and
    /// pressure chain the shock jump with the stagnation ratios at the shock
    /// exit and at the local Mach number. Behind a bow shock the flow can
    /// become tangent above the cone; rays below that are reported at the
    /// tangency ray.
    ///
    /// # Errors
    /// `InvalidDomain` if the ray lies outside [θ_c, β].
    pub fn cone_ray_properties(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
        ray: Option<f64>,
    ) -> Result<RayProperties, FlowError> {
        let b = self.solve(mach, cone_angle, gamma)?;
        let beta = b.wave_angle.to_degrees();
        let target = match ray {
            Some(r) => {
                if !r.is_finite() || r < cone_angle - ANGLE_SLACK || r > beta + ANGLE_SLACK {
                    return Err(FlowError::domain(format!(
                        "ray angle {}° outside [{}°, {}°]",
                        r, cone_angle, beta
                    )));
                }
                r.clamp(cone_angle, beta)
            }
            None => cone_angle,
        };

        let (reached, [vr, vt]) = integrate_to_ray(&b, gamma, target.to_radians(), &self.config)?;
        let local = mach_from_velocity((vr * vr + vt * vt).sqrt(), gamma);
        Ok(RayProperties {
            mach: local,
            density_ratio: b.density_ratio * isentropic::density_ratio(b.mach, gamma)
                / isentropic::density_ratio(local, gamma),
            pressure_ratio: b.pressure_ratio * isentropic::pressure_ratio(b.mach, gamma)
                / isentropic::pressure_ratio(local, gamma),
            total_pressure_ratio: b.total_pressure_ratio,
            wave_angle: beta,
            flow_angle: ray.map(|_| (reached + vt.atan2(vr)).to_degrees()),
        })
    }

    /// Effective angle, shock, and surface state in one call
    pub fn solution(
        &self,
        mach: f64,
        cone_angle: f64,
        gamma: f64,
    ) -> Result<ConeSolution, FlowError> {
        let b = self.solve(mach, cone_angle, gamma)?;
        let surface = self.cone_ray_properties(mach, cone_angle, gamma, None)?;
        Ok(ConeSolution {
            effective_angle: b.deflection.to_degrees(),
            wave_angle: b.wave_angle.to_degrees(),
            downstream_mach: b.mach,
            surface_mach: surface.mach,
            surface_pressure_ratio: surface.pressure_ratio,
            detached: b.detached,
        })
    }

    /// Inverse problem: the cone half-angle that supports an attached shock
    /// at wave angle `wave_angle` (degrees, from the Mach angle up to 90°).
    ///
    /// Integrates once from the shock until the flow is tangent to a ray; no
    /// root finding on the deflection is involved.
    pub fn cone_angle_from_shock(
        &self,
        mach: f64,
        wave_angle: f64,
        gamma: f64,
    ) -> Result<ConeFromShock, FlowError> {
        check_supersonic(mach)?;
        check_gamma(gamma)?;
        check_angle("shock wave angle", wave_angle)?;
        let mu = (1.0 / mach).asin();
        let beta = wave_angle.to_radians();
        if beta < mu - ANGLE_SLACK.to_radians() || wave_angle >= 90.0 {
            return Err(FlowError::domain(format!(
                "shock wave angle {}° outside [{}°, 90°) at M = {}",
                wave_angle,
                mu.to_degrees(),
                mach
            )));
        }
        if beta - mu <= ANGLE_SLACK.to_radians() {
            return Ok(ConeFromShock {
                cone_angle: 0.0,
                effective_angle: 0.0,
                surface_mach: mach,
            });
        }

        let boundary = ShockBoundary::from_wave_angle(mach, beta, gamma);
        let (cone, [vr, vt]) = surface_from_shock(&boundary, gamma, &self.config)?;
        Ok(ConeFromShock {
            cone_angle: cone.to_degrees(),
            effective_angle: boundary.deflection.to_degrees(),
            surface_mach: mach_from_velocity((vr * vr + vt * vt).sqrt(), gamma),
        })
    }

    /// Forget every memoized solution
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Number of memoized solutions
    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn solve(&self, mach: f64, cone_angle: f64, gamma: f64) -> Result<ShockBoundary, FlowError> {
        check_supersonic(mach)?;
        check_gamma(gamma)?;
        check_angle("cone half-angle", cone_angle)?;
        if cone_angle >= 90.0 {
            return Err(FlowError::domain(format!(
                "cone half-angle must be below 90°, got {}",
                cone_angle
            )));
        }

        let key = cache_key(mach, cone_angle, gamma);
        if self.config.cache {
            if let Some(b) = self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
                trace!("cone cache hit: M = {}, cone {}°", mach, cone_angle);
                return Ok(*b);
            }
        }

        let boundary = if cone_angle == 0.0 {
            ShockBoundary::mach_wave(mach)
        } else {
            self.shoot(mach, cone_angle.to_radians(), gamma)?
        };
        self.observer.effective_angle_solved(
            mach,
            cone_angle,
            boundary.deflection.to_degrees(),
            boundary.detached,
        );

        if self.config.cache {
            self.cache
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(key, boundary);
        }
        Ok(boundary)
    }

    /// Bracket and solve the shooting problem for cone `cone` (radians)
    fn shoot(&self, mach: f64, cone: f64, gamma: f64) -> Result<ShockBoundary, FlowError> {
        let config = &self.config;
        let observer: &dyn ShockObserver = &*self.observer;
        let (theta_max, beta_max) = max_deflection_rad(mach, gamma, config)?;
        let boundary =
            |x: f64| ShockBoundary::new(mach, x, gamma, theta_max, beta_max, config, observer);
        let residual = |x: f64| -> Result<f64, FlowError> {
            shooting_residual(&boundary(x)?, gamma, cone, config)
        };

        // Lower end: the seed deflection, or zero deflection (uniform flow)
        // when even the seed shock overshoots a very slender cone
        let seed = config.seed_deflection_deg.to_radians().min(0.5 * theta_max);
        let f_seed = residual(seed)?;
        if f_seed == 0.0 {
            return boundary(seed);
        }
        let (lo, f_lo) = if f_seed > 0.0 {
            (0.0, -velocity_from_mach(mach, gamma) * cone.sin())
        } else {
            (seed, f_seed)
        };

        let hi = theta_max * (1.0 - 1e-9);
        let f_hi = residual(hi)?;
        if f_hi >= 0.0 {
            let x = self.bracketed_root(&residual, lo, f_lo, hi, f_hi)?;
            return if x == 0.0 {
                Ok(ShockBoundary::mach_wave(mach))
            } else {
                boundary(x)
            };
        }

        // Beyond the attached limit the bow shock stands at θ_max. Its flow
        // must turn tangent before reaching the cone, otherwise no conical
        // field fits this cone.
        let f_detached = residual(theta_max)?;
        if f_detached < 0.0 {
            return Err(FlowError::NoSolution {
                message: format!(
                    "bow-shock flow at M = {} reaches the {:.6}° cone before turning tangent",
                    mach,
                    cone.to_degrees()
                ),
            });
        }
        boundary(theta_max)
    }

    /// Brent on a residual that may itself fail; the first failure wins
    fn bracketed_root<F>(
        &self,
        residual: &F,
        a: f64,
        fa: f64,
        b: f64,
        fb: f64,
    ) -> Result<f64, FlowError>
    where
        F: Fn(f64) -> Result<f64, FlowError>,
    {
        let solver = BrentSolver::new(self.config.root_tol, self.config.max_iter);
        let mut failure = None;
        let root = solver.find_root(
            |x| match residual(x) {
                Ok(f) => f,
                Err(e) => {
                    failure.get_or_insert(e);
                    f64::NAN
                }
            },
            a,
            b,
            Some(fa),
            Some(fb),
        );
        if let Some(e) = failure {
            return Err(e);
        }
        let root = root?;
        trace!(
            "effective angle {:.9}° after {} iterations (residual {:e})",
            root.x.to_degrees(),
            root.iterations,
            root.f
        );
        Ok(root.x)
    }
}

fn uncached() -> ConeSolver {
    ConeSolver::new(SolverConfig::default().uncached())
}

/// [`ConeSolver::effective_wedge_angle`] with default settings
pub fn effective_wedge_angle(mach: f64, cone_angle: f64, gamma: f64) -> Result<f64, FlowError> {
    uncached().effective_wedge_angle(mach, cone_angle, gamma)
}

/// [`ConeSolver::cone_shock_angle`] with default settings
pub fn cone_shock_angle(mach: f64, cone_angle: f64, gamma: f64) -> Result<f64, FlowError> {
    uncached().cone_shock_angle(mach, cone_angle, gamma)
}

/// [`ConeSolver::cone_downstream_mach`] with default settings
pub fn cone_downstream_mach(mach: f64, cone_angle: f64, gamma: f64) -> Result<f64, FlowError> {
    uncached().cone_downstream_mach(mach, cone_angle, gamma)
}

/// [`ConeSolver::cone_surface_state`] with default settings
pub fn cone_surface_state(
    mach: f64,
    cone_angle: f64,
    gamma: f64,
) -> Result<SurfaceState, FlowError> {
    uncached().cone_surface_state(mach, cone_angle, gamma)
}

/// [`ConeSolver::cone_full_jump`] with default settings
pub fn cone_full_jump(mach: f64, cone_angle: f64, gamma: f64) -> Result<ConeJump, FlowError> {
    uncached().cone_full_jump(mach, cone_angle, gamma)
}

/// [`ConeSolver::cone_ray_properties`] with default settings
pub fn cone_ray_properties(
    mach: f64,
    cone_angle: f64,
    gamma: f64,
    ray: Option<f64>,
) -> Result<RayProperties, FlowError> {
    uncached().cone_ray_properties(mach, cone_angle, gamma, ray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_cache_is_shared_across_queries() {
        let solver = ConeSolver::default();
        solver.cone_shock_angle(3.0, 20.0, 1.4).unwrap();
        solver.cone_full_jump(3.0, 20.0, 1.4).unwrap();
        solver.cone_surface_state(3.0, 20.0, 1.4).unwrap();
        assert_eq!(solver.cache_len(), 1);
        solver.clear_cache();
        assert_eq!(solver.cache_len(), 0);
    }

    #[test]
    fn test_uncached_solver_stores_nothing() {
        let solver = ConeSolver::new(SolverConfig::default().uncached());
        solver.effective_wedge_angle(3.0, 20.0, 1.4).unwrap();
        assert_eq!(solver.cache_len(), 0);
    }

    #[test]
    fn test_cached_and_fresh_agree() {
        let solver = ConeSolver::default();
        let a = solver.cone_shock_angle(2.5, 15.0, 1.4).unwrap();
        let b = solver.cone_shock_angle(2.5, 15.0, 1.4).unwrap();
        let c = cone_shock_angle(2.5, 15.0, 1.4).unwrap();
        assert_eq!(a, b);
        assert!((a - c).abs() < 1e-12);
    }

    #[test]
    fn test_zero_cone_is_mach_wave() {
        let solver = ConeSolver::default();
        assert_eq!(solver.effective_wedge_angle(2.0, 0.0, 1.4).unwrap(), 0.0);
        assert!((solver.cone_shock_angle(2.0, 0.0, 1.4).unwrap() - 30.0).abs() < 1e-12);
        let s = solver.cone_surface_state(2.0, 0.0, 1.4).unwrap();
        assert!((s.mach - 2.0).abs() < 1e-12);
        assert!(s.flow_angle.abs() < 1e-12);
    }

    #[test]
    fn test_flow_angle_only_for_explicit_ray() {
        let solver = ConeSolver::default();
        let implicit = solver.cone_ray_properties(3.0, 20.0, 1.4, None).unwrap();
        let explicit = solver.cone_ray_properties(3.0, 20.0, 1.4, Some(20.0)).unwrap();
        assert!(implicit.flow_angle.is_none());
        let flow = explicit.flow_angle.unwrap();
        assert!((flow - 20.0).abs() < 1e-6, "surface flow angle {}", flow);
    }

    #[test]
    fn test_ray_at_shock_matches_jump() {
        let solver = ConeSolver::default();
        let jump = solver.cone_full_jump(3.0, 20.0, 1.4).unwrap();
        let at_shock = solver
            .cone_ray_properties(3.0, 20.0, 1.4, Some(jump.wave_angle))
            .unwrap();
        assert!((at_shock.mach - jump.mach).abs() < 1e-9);
        assert!((at_shock.pressure_ratio - jump.pressure_ratio).abs() < 1e-9);
        assert!((at_shock.density_ratio - jump.density_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_ray_outside_field_rejected() {
        let solver = ConeSolver::default();
        let err = solver
            .cone_ray_properties(3.0, 20.0, 1.4, Some(10.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
        let err = solver
            .cone_ray_properties(3.0, 20.0, 1.4, Some(45.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
    }

    #[test]
    fn test_inverse_recovers_cone() {
        let solver = ConeSolver::default();
        let beta = solver.cone_shock_angle(3.0, 20.0, 1.4).unwrap();
        let inv = solver.cone_angle_from_shock(3.0, beta, 1.4).unwrap();
        assert!((inv.cone_angle - 20.0).abs() < 1e-6, "cone {}", inv.cone_angle);
        let eff = solver.effective_wedge_angle(3.0, 20.0, 1.4).unwrap();
        assert!((inv.effective_angle - eff).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_at_mach_angle() {
        let solver = ConeSolver::default();
        let inv = solver.cone_angle_from_shock(2.0, 30.0, 1.4).unwrap();
        assert_eq!(inv.cone_angle, 0.0);
        assert!(solver.cone_angle_from_shock(2.0, 20.0, 1.4).is_err());
        assert!(solver.cone_angle_from_shock(2.0, 90.0, 1.4).is_err());
    }

    #[test]
    fn test_bow_shock_surface_is_tangency_ray() {
        let solver = ConeSolver::default();
        let s = solver.cone_surface_state(2.0, 40.0, 1.4).unwrap();
        assert!((s.flow_angle - 46.09).abs() < 0.02, "flow angle {}", s.flow_angle);
        assert!(s.mach < 1.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let solver = ConeSolver::default();
        for (m, c, g) in [
            (1.0, 10.0, 1.4),
            (0.5, 10.0, 1.4),
            (2.0, -1.0, 1.4),
            (2.0, 90.0, 1.4),
            (2.0, 10.0, 1.0),
        ] {
            let err = solver.effective_wedge_angle(m, c, g).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDomain, "({}, {}, {})", m, c, g);
        }
    }
}
