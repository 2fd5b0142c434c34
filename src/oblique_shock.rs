//! Oblique shock relations
//!
//! The θ-β-M relation
//!
//! ```text
//! tan θ = 2 cot β (M² sin²β − 1) / (M² (γ + cos 2β) + 2)
//! ```
//!
//! links the flow deflection θ to the wave angle β. It is explicit in θ; the
//! wave angle for a given deflection is found with Brent's method on either
//! side of the maximum-deflection wave angle, which itself comes from a
//! bounded 1-D maximization of tan θ(β) over [μ, 90°].
//!
//! Public functions take and return degrees; the `pub(crate)` kernels used by
//! the cone solver work in radians.

use std::f64::consts::FRAC_PI_2;

use crate::config::SolverConfig;
use crate::error::{check_angle, check_gamma, check_supersonic, FlowError};
use crate::isentropic;
use crate::normal_shock::NormalShock;
use crate::roots::{BrentMinimizer, BrentSolver};

/// Which root of the θ-β-M relation to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShockBranch {
    /// Smaller wave angle, supersonic downstream flow (the one realized by
    /// attached shocks)
    #[default]
    Weak,
    /// Larger wave angle, subsonic downstream flow
    Strong,
}

/// Maximum attached deflection and the wave angle at which it occurs, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxDeflection {
    /// θ_max
    pub deflection: f64,
    /// β at θ_max
    pub wave_angle: f64,
}

/// Flow deflection produced by a shock at wave angle `wave_angle` (degrees)
pub fn deflection_angle(mach: f64, wave_angle: f64, gamma: f64) -> Result<f64, FlowError> {
    check_supersonic(mach)?;
    check_gamma(gamma)?;
    let mu = (1.0 / mach).asin();
    let beta = wave_angle.to_radians();
    if !beta.is_finite() || beta < mu - 1e-12 || beta > FRAC_PI_2 + 1e-12 {
        return Err(FlowError::domain(format!(
            "wave angle must lie between the Mach angle {:.6}° and 90°, got {}°",
            mu.to_degrees(),
            wave_angle
        )));
    }
    Ok(tan_deflection(mach, beta, gamma).atan().max(0.0).to_degrees())
}

/// Maximum deflection for an attached shock at Mach `mach`
pub fn max_deflection(mach: f64, gamma: f64) -> Result<MaxDeflection, FlowError> {
    check_supersonic(mach)?;
    check_gamma(gamma)?;
    let (theta, beta) = max_deflection_rad(mach, gamma, &SolverConfig::default())?;
    Ok(MaxDeflection {
        deflection: theta.to_degrees(),
        wave_angle: beta.to_degrees(),
    })
}

/// Wave angle (degrees) for deflection `deflection` (degrees) on the given branch
pub fn wave_angle(
    mach: f64,
    deflection: f64,
    gamma: f64,
    branch: ShockBranch,
) -> Result<f64, FlowError> {
    check_supersonic(mach)?;
    check_gamma(gamma)?;
    check_angle("deflection angle", deflection)?;
    let config = SolverConfig::default();
    let (theta_max, beta_max) = max_deflection_rad(mach, gamma, &config)?;
    let beta = wave_angle_rad(
        mach,
        deflection.to_radians(),
        gamma,
        branch,
        theta_max,
        beta_max,
        &config,
    )?;
    Ok(beta.to_degrees())
}

/// Downstream state of an attached oblique shock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObliqueShock {
    /// Upstream Mach number
    pub upstream_mach: f64,
    /// Flow deflection θ, degrees
    pub deflection: f64,
    /// Wave angle β, degrees
    pub wave_angle: f64,
    /// Upstream Mach component normal to the shock, M sin β
    pub normal_mach: f64,
    /// Downstream Mach component normal to the shock
    pub downstream_normal_mach: f64,
    /// Downstream Mach number
    pub mach: f64,
    /// ρ2/ρ1
    pub density_ratio: f64,
    /// p2/p1
    pub pressure_ratio: f64,
    /// T2/T1
    pub temperature_ratio: f64,
    /// p02/p01
    pub total_pressure_ratio: f64,
}

impl ObliqueShock {
    /// Weak attached shock for deflection `deflection` (degrees).
    ///
    /// Returns [`FlowError::Detached`] when the deflection exceeds θ_max.
    pub fn new(mach: f64, deflection: f64, gamma: f64) -> Result<Self, FlowError> {
        Self::on_branch(mach, deflection, gamma, ShockBranch::Weak)
    }

    /// Attached shock on an explicit branch
    pub fn on_branch(
        mach: f64,
        deflection: f64,
        gamma: f64,
        branch: ShockBranch,
    ) -> Result<Self, FlowError> {
        let beta = wave_angle(mach, deflection, gamma, branch)?;
        Ok(Self::from_angles_rad(
            mach,
            deflection.to_radians(),
            beta.to_radians(),
            gamma,
        ))
    }

    /// Shock at a prescribed wave angle (degrees, between μ and 90°)
    pub fn from_wave_angle(mach: f64, wave_angle: f64, gamma: f64) -> Result<Self, FlowError> {
        let theta = deflection_angle(mach, wave_angle, gamma)?;
        Ok(Self::from_angles_rad(
            mach,
            theta.to_radians(),
            wave_angle.to_radians(),
            gamma,
        ))
    }

    /// Assemble the downstream state from known angles (radians)
    pub(crate) fn from_angles_rad(mach: f64, theta: f64, beta: f64, gamma: f64) -> Self {
        let normal_mach = mach * beta.sin();
        let jump = NormalShock::jump(normal_mach, gamma);
        let mach_down = jump.mach / (beta - theta).sin();
        let total_pressure_ratio = jump.pressure_ratio
            * isentropic::pressure_ratio(mach_down, gamma)
            / isentropic::pressure_ratio(mach, gamma);

        Self {
            upstream_mach: mach,
            deflection: theta.to_degrees(),
            wave_angle: beta.to_degrees(),
            normal_mach,
            downstream_normal_mach: jump.mach,
            mach: mach_down,
            density_ratio: jump.density_ratio,
            pressure_ratio: jump.pressure_ratio,
            temperature_ratio: jump.temperature_ratio,
            total_pressure_ratio,
        }
    }
}

/// tan θ as a function of β (radians)
pub(crate) fn tan_deflection(mach: f64, beta: f64, gamma: f64) -> f64 {
    let m2 = mach * mach;
    let s = beta.sin();
    2.0 / beta.tan() * (m2 * s * s - 1.0) / (m2 * (gamma + (2.0 * beta).cos()) + 2.0)
}

/// (θ_max, β at θ_max), radians
pub(crate) fn max_deflection_rad(
    mach: f64,
    gamma: f64,
    config: &SolverConfig,
) -> Result<(f64, f64), FlowError> {
    let mu = (1.0 / mach).asin();
    let minimizer = BrentMinimizer::new(1.5e-8, config.max_iter);
    let min = minimizer.minimize(|beta| -tan_deflection(mach, beta, gamma), mu, FRAC_PI_2)?;
    Ok(((-min.f).atan(), min.x))
}

/// Wave angle (radians) for deflection `theta` (radians), given θ_max and
/// the wave angle at θ_max
pub(crate) fn wave_angle_rad(
    mach: f64,
    theta: f64,
    gamma: f64,
    branch: ShockBranch,
    theta_max: f64,
    beta_max: f64,
    config: &SolverConfig,
) -> Result<f64, FlowError> {
    if theta > theta_max {
        return Err(FlowError::Detached {
            mach,
            deflection: theta.to_degrees(),
            max_deflection: theta_max.to_degrees(),
        });
    }
    let mu = (1.0 / mach).asin();
    if theta == 0.0 {
        return Ok(match branch {
            ShockBranch::Weak => mu,
            ShockBranch::Strong => FRAC_PI_2,
        });
    }

    let target = theta.tan();
    let residual = |beta: f64| tan_deflection(mach, beta, gamma) - target;
    // The residual is non-negative at β_max by construction; clamp round-off
    let at_peak = residual(beta_max).max(0.0);
    let (a, b) = match branch {
        ShockBranch::Weak => (mu, beta_max),
        ShockBranch::Strong => (beta_max, FRAC_PI_2),
    };
    let (fa, fb) = match branch {
        ShockBranch::Weak => (-target, at_peak),
        ShockBranch::Strong => (at_peak, -target),
    };
    let solver = BrentSolver::new(config.root_tol, config.max_iter);
    let root = solver.find_root(residual, a, b, Some(fa), Some(fb))?;
    Ok(root.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_deflection_table_values() {
        let m2 = max_deflection(2.0, 1.4).unwrap();
        assert!(
            (m2.deflection - 22.973532).abs() < 1e-5,
            "θ_max(2) = {}",
            m2.deflection
        );
        assert!((m2.wave_angle - 64.66898).abs() < 1e-3);

        let m3 = max_deflection(3.0, 1.4).unwrap();
        assert!((m3.deflection - 34.073440).abs() < 1e-5);
    }

    #[test]
    fn test_weak_and_strong_branches() {
        let weak = wave_angle(2.0, 10.0, 1.4, ShockBranch::Weak).unwrap();
        let strong = wave_angle(2.0, 10.0, 1.4, ShockBranch::Strong).unwrap();
        assert!((weak - 39.313932).abs() < 1e-5, "weak β = {}", weak);
        assert!((strong - 83.700080).abs() < 1e-5, "strong β = {}", strong);
    }

    #[test]
    fn test_zero_deflection_is_mach_wave() {
        let beta = wave_angle(2.0, 0.0, 1.4, ShockBranch::Weak).unwrap();
        assert!((beta - 30.0).abs() < 1e-12);
        let beta = wave_angle(2.0, 0.0, 1.4, ShockBranch::Strong).unwrap();
        assert!((beta - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_deflection_round_trip() {
        let beta = wave_angle(3.5, 17.0, 1.3, ShockBranch::Weak).unwrap();
        let theta = deflection_angle(3.5, beta, 1.3).unwrap();
        assert!((theta - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_downstream_state() {
        let s = ObliqueShock::new(2.0, 10.0, 1.4).unwrap();
        assert!((s.mach - 1.640522).abs() < 1e-5, "M2 = {}", s.mach);
        assert!((s.pressure_ratio - 1.706579).abs() < 1e-5);
        assert!((s.density_ratio - 1.458426).abs() < 1e-5);
        assert!(s.total_pressure_ratio < 1.0 && s.total_pressure_ratio > 0.98);
        assert!((s.normal_mach - 2.0 * s.wave_angle.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_from_wave_angle_matches_deflection_form() {
        let a = ObliqueShock::new(2.5, 12.0, 1.4).unwrap();
        let b = ObliqueShock::from_wave_angle(2.5, a.wave_angle, 1.4).unwrap();
        assert!((a.mach - b.mach).abs() < 1e-9);
        assert!((b.deflection - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_detached_is_reported() {
        match ObliqueShock::new(2.0, 25.0, 1.4) {
            Err(FlowError::Detached { max_deflection, .. }) => {
                assert!((max_deflection - 22.9735).abs() < 1e-3);
            }
            other => panic!("expected detachment, got {:?}", other),
        }
    }

    #[test]
    fn test_at_max_deflection_branches_meet() {
        let m = max_deflection(2.0, 1.4).unwrap();
        let weak = wave_angle(2.0, m.deflection, 1.4, ShockBranch::Weak).unwrap();
        let strong = wave_angle(2.0, m.deflection, 1.4, ShockBranch::Strong).unwrap();
        assert!((weak - strong).abs() < 1e-2, "weak {} strong {}", weak, strong);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(wave_angle(0.9, 5.0, 1.4, ShockBranch::Weak).is_err());
        assert!(wave_angle(2.0, -5.0, 1.4, ShockBranch::Weak).is_err());
        assert!(deflection_angle(2.0, 20.0, 1.4).is_err());
    }
}
