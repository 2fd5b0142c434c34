//! Prandtl-Meyer expansion
//!
//! ν(M) = sqrt((γ+1)/(γ-1)) atan(sqrt((γ-1)/(γ+1) (M²-1))) − atan(sqrt(M²-1))
//!
//! A centred expansion turning the flow by θ raises ν by θ. The inverse has
//! no closed form and is found with Brent's method.

use crate::error::{check_angle, check_gamma, FlowError};
use crate::isentropic;
use crate::roots::BrentSolver;

/// Prandtl-Meyer angle ν(M), degrees; M ≥ 1
pub fn prandtl_meyer_angle(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    if !mach.is_finite() || mach < 1.0 {
        return Err(FlowError::domain(format!(
            "Prandtl-Meyer function requires M >= 1, got {}",
            mach
        )));
    }
    Ok(nu(mach, gamma).to_degrees())
}

/// ν(∞) = 90° (sqrt((γ+1)/(γ-1)) − 1), degrees
pub fn max_prandtl_meyer_angle(gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    Ok(90.0 * (((gamma + 1.0) / (gamma - 1.0)).sqrt() - 1.0))
}

/// Mach number with Prandtl-Meyer angle `angle` (degrees)
pub fn mach_from_prandtl_meyer(angle: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    check_angle("Prandtl-Meyer angle", angle)?;
    let nu_max = max_prandtl_meyer_angle(gamma)?;
    if angle >= nu_max {
        return Err(FlowError::domain(format!(
            "Prandtl-Meyer angle {}° reaches the vacuum limit {}°",
            angle, nu_max
        )));
    }
    if angle == 0.0 {
        return Ok(1.0);
    }

    let target = angle.to_radians();
    // Grow the upper bracket until it passes the target
    let mut hi = 2.0;
    while nu(hi, gamma) < target {
        hi *= 2.0;
        if hi > 1e12 {
            return Err(FlowError::NoSolution {
                message: format!("Prandtl-Meyer inverse for {}° did not bracket", angle),
            });
        }
    }
    let root =
        BrentSolver::new(1e-13, 200).find_root(|m| nu(m, gamma) - target, 1.0, hi, None, None)?;
    Ok(root.x)
}

/// State after a centred expansion fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expansion {
    /// Downstream Mach number
    pub mach: f64,
    /// Upstream ν, degrees
    pub upstream_angle: f64,
    /// Downstream ν, degrees
    pub downstream_angle: f64,
    /// p2/p1
    pub pressure_ratio: f64,
    /// T2/T1
    pub temperature_ratio: f64,
    /// ρ2/ρ1
    pub density_ratio: f64,
}

/// Expand a flow at Mach `mach` through a turn of `turn` degrees
pub fn expansion(mach: f64, turn: f64, gamma: f64) -> Result<Expansion, FlowError> {
    check_angle("turn angle", turn)?;
    let nu1 = prandtl_meyer_angle(mach, gamma)?;
    let nu2 = nu1 + turn;
    let m2 = mach_from_prandtl_meyer(nu2, gamma)?;
    Ok(Expansion {
        mach: m2,
        upstream_angle: nu1,
        downstream_angle: nu2,
        pressure_ratio: isentropic::pressure_ratio(mach, gamma)
            / isentropic::pressure_ratio(m2, gamma),
        temperature_ratio: isentropic::temperature_ratio(mach, gamma)
            / isentropic::temperature_ratio(m2, gamma),
        density_ratio: isentropic::density_ratio(mach, gamma)
            / isentropic::density_ratio(m2, gamma),
    })
}

fn nu(mach: f64, gamma: f64) -> f64 {
    let k = ((gamma + 1.0) / (gamma - 1.0)).sqrt();
    let s = (mach * mach - 1.0).sqrt();
    k * (s / k).atan() - s.atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        let nu2 = prandtl_meyer_angle(2.0, 1.4).unwrap();
        let nu3 = prandtl_meyer_angle(3.0, 1.4).unwrap();
        assert!((nu2 - 26.379761).abs() < 1e-5, "ν(2) = {}", nu2);
        assert!((nu3 - 49.757347).abs() < 1e-5, "ν(3) = {}", nu3);
        assert_eq!(prandtl_meyer_angle(1.0, 1.4).unwrap(), 0.0);
    }

    #[test]
    fn test_inverse() {
        let m = mach_from_prandtl_meyer(26.379761, 1.4).unwrap();
        assert!((m - 2.0).abs() < 1e-6);
        let m = mach_from_prandtl_meyer(120.0, 1.4).unwrap();
        assert!((prandtl_meyer_angle(m, 1.4).unwrap() - 120.0).abs() < 1e-8);
    }

    #[test]
    fn test_vacuum_limit() {
        let nu_max = max_prandtl_meyer_angle(1.4).unwrap();
        assert!((nu_max - 130.454077).abs() < 1e-5);
        assert!(mach_from_prandtl_meyer(131.0, 1.4).is_err());
    }

    #[test]
    fn test_expansion_turn() {
        let e = expansion(2.0, 10.0, 1.4).unwrap();
        assert!((e.mach - 2.384887).abs() < 1e-5, "M2 = {}", e.mach);
        assert!(e.pressure_ratio < 1.0);
        assert!((e.pressure_ratio - e.density_ratio * e.temperature_ratio).abs() < 1e-12);
    }

    #[test]
    fn test_subsonic_rejected() {
        assert!(prandtl_meyer_angle(0.5, 1.4).is_err());
        assert!(expansion(2.0, -1.0, 1.4).is_err());
    }
}
