//! Normal shock relations
//!
//! Closed-form Rankine-Hugoniot jump across a shock normal to the flow,
//! written in terms of the upstream normal Mach number. The oblique shock and
//! the detached (bow) branch of the cone solver both reduce to this.

use crate::error::{check_gamma, FlowError};
use crate::isentropic;

/// Downstream state of a normal shock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalShock {
    /// Upstream Mach number M1
    pub upstream_mach: f64,
    /// Downstream Mach number M2
    pub mach: f64,
    /// ρ2/ρ1
    pub density_ratio: f64,
    /// p2/p1
    pub pressure_ratio: f64,
    /// T2/T1
    pub temperature_ratio: f64,
    /// p02/p01, the total-pressure recovery
    pub total_pressure_ratio: f64,
    /// p02/p1, pitot pressure over upstream static pressure
    pub pitot_ratio: f64,
}

impl NormalShock {
    /// Jump conditions for upstream Mach number `mach` ≥ 1
    pub fn new(mach: f64, gamma: f64) -> Result<Self, FlowError> {
        check_gamma(gamma)?;
        if !mach.is_finite() || mach < 1.0 {
            return Err(FlowError::domain(format!(
                "normal shock requires upstream M >= 1, got {}",
                mach
            )));
        }
        Ok(Self::jump(mach, gamma))
    }

    /// Unchecked jump. Below M = 1 the algebra still evaluates, to a flow
    /// that accelerates through an expansion "shock".
    pub(crate) fn jump(mach: f64, gamma: f64) -> Self {
        let m2 = mach * mach;
        let gm1 = gamma - 1.0;
        let gp1 = gamma + 1.0;

        let mach_down = ((1.0 + 0.5 * gm1 * m2) / (gamma * m2 - 0.5 * gm1)).sqrt();
        let density_ratio = gp1 * m2 / (gm1 * m2 + 2.0);
        let pressure_ratio = 1.0 + 2.0 * gamma / gp1 * (m2 - 1.0);
        let stagnation_down = isentropic::pressure_ratio(mach_down, gamma);
        let total_pressure_ratio =
            pressure_ratio * stagnation_down / isentropic::pressure_ratio(mach, gamma);

        Self {
            upstream_mach: mach,
            mach: mach_down,
            density_ratio,
            pressure_ratio,
            temperature_ratio: pressure_ratio / density_ratio,
            total_pressure_ratio,
            pitot_ratio: pressure_ratio * stagnation_down,
        }
    }
}

/// Upstream Mach number from the static pressure ratio p2/p1 ≥ 1
pub fn upstream_mach_from_pressure_ratio(ratio: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(FlowError::domain(format!(
            "shock pressure ratio must be >= 1, got {}",
            ratio
        )));
    }
    Ok((1.0 + (ratio - 1.0) * (gamma + 1.0) / (2.0 * gamma)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mach_two_air() {
        let s = NormalShock::new(2.0, 1.4).unwrap();
        assert!((s.mach - 0.577350).abs() < 1e-6, "M2 = {}", s.mach);
        assert!((s.density_ratio - 8.0 / 3.0).abs() < 1e-12);
        assert!((s.pressure_ratio - 4.5).abs() < 1e-12);
        assert!((s.temperature_ratio - 1.6875).abs() < 1e-12);
        assert!((s.total_pressure_ratio - 0.720874).abs() < 1e-6);
        assert!((s.pitot_ratio - 5.640441).abs() < 1e-5);
    }

    #[test]
    fn test_sonic_shock_is_identity() {
        let s = NormalShock::new(1.0, 1.4).unwrap();
        assert!((s.mach - 1.0).abs() < 1e-12);
        assert!((s.pressure_ratio - 1.0).abs() < 1e-12);
        assert!((s.total_pressure_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_strong_shock_limit() {
        // ρ2/ρ1 → (γ+1)/(γ-1) and M2 → sqrt((γ-1)/(2γ))
        let s = NormalShock::new(1e4, 1.4).unwrap();
        assert!((s.density_ratio - 6.0).abs() < 1e-6);
        assert!((s.mach - (0.4_f64 / 2.8).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_rises() {
        for &m in &[1.1, 1.5, 3.0, 10.0] {
            let s = NormalShock::new(m, 1.4).unwrap();
            assert!(s.total_pressure_ratio < 1.0);
            assert!(s.mach < 1.0);
        }
    }

    #[test]
    fn test_subsonic_rejected() {
        assert!(NormalShock::new(0.9, 1.4).is_err());
        assert!(NormalShock::new(2.0, 0.9).is_err());
    }

    #[test]
    fn test_unchecked_subsonic_jump_accelerates() {
        let s = NormalShock::jump(0.8, 1.4);
        assert!(s.mach > 0.8);
    }

    #[test]
    fn test_pressure_ratio_inverse() {
        let m = upstream_mach_from_pressure_ratio(4.5, 1.4).unwrap();
        assert!((m - 2.0).abs() < 1e-12);
        assert!(upstream_mach_from_pressure_ratio(0.5, 1.4).is_err());
    }
}
