//! Quasi-one-dimensional isentropic duct flow
//!
//! A/A* = 1/M [2/(γ+1) (1 + (γ-1)/2 M²)]^((γ+1)/(2(γ-1)))
//!
//! Each area ratio above one has a subsonic and a supersonic Mach number;
//! the caller picks the branch with [`FlowRegime`].

use crate::error::{check_gamma, check_mach, FlowError};
use crate::isentropic;
use crate::roots::BrentSolver;

/// Branch of the area-Mach relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    /// M ≤ 1, converging side of the throat
    Subsonic,
    /// M ≥ 1, diverging side of the throat
    Supersonic,
}

/// A/A* at Mach `mach` > 0
pub fn area_ratio(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    if mach == 0.0 {
        return Err(FlowError::domain("area ratio is unbounded at M = 0"));
    }
    Ok(area(mach, gamma))
}

/// Mach number on `regime` where A/A* = `ratio` ≥ 1
pub fn mach_from_area_ratio(ratio: f64, gamma: f64, regime: FlowRegime) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(FlowError::domain(format!(
            "area ratio must be >= 1, got {}",
            ratio
        )));
    }
    if ratio == 1.0 {
        return Ok(1.0);
    }

    let residual = |m: f64| area(m, gamma) - ratio;
    let (lo, hi) = match regime {
        // A/A* > 0.5/M for small M at any γ
        FlowRegime::Subsonic => (1e-3 / ratio, 1.0),
        FlowRegime::Supersonic => {
            let mut hi = 2.0;
            while residual(hi) < 0.0 {
                hi *= 2.0;
                if hi > 1e6 {
                    return Err(FlowError::NoSolution {
                        message: format!("supersonic area ratio {} did not bracket", ratio),
                    });
                }
            }
            (1.0, hi)
        }
    };
    let root = BrentSolver::new(1e-14, 200).find_root(&residual, lo, hi, None, None)?;
    Ok(root.x)
}

/// Mass-flow parameter ṁ sqrt(R T0) / (A p0) at Mach `mach`.
/// Multiply by A p0 / sqrt(R T0) for the mass flow through area A.
pub fn mass_flow_parameter(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    let e = -0.5 * (gamma + 1.0) / (gamma - 1.0);
    Ok(gamma.sqrt() * mach * isentropic::temperature_ratio(mach, gamma).powf(e))
}

fn area(mach: f64, gamma: f64) -> f64 {
    let e = 0.5 * (gamma + 1.0) / (gamma - 1.0);
    (2.0 / (gamma + 1.0) * isentropic::temperature_ratio(mach, gamma)).powf(e) / mach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert!((area_ratio(2.0, 1.4).unwrap() - 1.6875).abs() < 1e-12);
        assert!((area_ratio(0.5, 1.4).unwrap() - 1.33984).abs() < 1e-5);
        assert!((area_ratio(1.0, 1.4).unwrap() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_both_branches() {
        let sup = mach_from_area_ratio(1.6875, 1.4, FlowRegime::Supersonic).unwrap();
        let sub = mach_from_area_ratio(1.6875, 1.4, FlowRegime::Subsonic).unwrap();
        assert!((sup - 2.0).abs() < 1e-10, "supersonic M = {}", sup);
        assert!(sub < 1.0);
        assert!((area_ratio(sub, 1.4).unwrap() - 1.6875).abs() < 1e-10);
    }

    #[test]
    fn test_large_ratio() {
        let m = mach_from_area_ratio(1000.0, 1.4, FlowRegime::Supersonic).unwrap();
        assert!((area_ratio(m, 1.4).unwrap() / 1000.0 - 1.0).abs() < 1e-10);
        let m = mach_from_area_ratio(1000.0, 1.4, FlowRegime::Subsonic).unwrap();
        assert!(m < 1e-3);
    }

    #[test]
    fn test_choked_mass_flow() {
        let mfp = mass_flow_parameter(1.0, 1.4).unwrap();
        assert!((mfp - 0.684731).abs() < 1e-6, "mfp = {}", mfp);
        // Choked flow is the maximum
        assert!(mass_flow_parameter(0.9, 1.4).unwrap() < mfp);
        assert!(mass_flow_parameter(1.1, 1.4).unwrap() < mfp);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(area_ratio(0.0, 1.4).is_err());
        assert!(mach_from_area_ratio(0.5, 1.4, FlowRegime::Supersonic).is_err());
        assert!(mass_flow_parameter(1.0, 1.0).is_err());
    }
}
