//! Isentropic flow relations
//!
//! Stagnation-to-static ratios of a calorically perfect gas as functions of
//! Mach number M and specific-heat ratio γ, and their closed-form inverses.

use crate::error::{check_gamma, check_mach, FlowError};

/// T0/T = 1 + (γ-1)/2 M²
pub fn stagnation_temperature_ratio(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    Ok(temperature_ratio(mach, gamma))
}

/// p0/p = (T0/T)^(γ/(γ-1))
pub fn stagnation_pressure_ratio(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    Ok(pressure_ratio(mach, gamma))
}

/// ρ0/ρ = (T0/T)^(1/(γ-1))
pub fn stagnation_density_ratio(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    Ok(density_ratio(mach, gamma))
}

/// a0/a = sqrt(T0/T)
pub fn stagnation_sound_speed_ratio(mach: f64, gamma: f64) -> Result<f64, FlowError> {
    check_mach(mach)?;
    check_gamma(gamma)?;
    Ok(temperature_ratio(mach, gamma).sqrt())
}

/// Mach angle μ = asin(1/M), degrees
pub fn mach_angle(mach: f64) -> Result<f64, FlowError> {
    if !mach.is_finite() || mach < 1.0 {
        return Err(FlowError::domain(format!(
            "Mach angle requires M >= 1, got {}",
            mach
        )));
    }
    Ok((1.0 / mach).asin().to_degrees())
}

/// Mach number from T0/T
pub fn mach_from_temperature_ratio(ratio: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    check_ratio("T0/T", ratio)?;
    Ok((2.0 / (gamma - 1.0) * (ratio - 1.0)).sqrt())
}

/// Mach number from p0/p
pub fn mach_from_pressure_ratio(ratio: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    check_ratio("p0/p", ratio)?;
    mach_from_temperature_ratio(ratio.powf((gamma - 1.0) / gamma), gamma)
}

/// Mach number from ρ0/ρ
pub fn mach_from_density_ratio(ratio: f64, gamma: f64) -> Result<f64, FlowError> {
    check_gamma(gamma)?;
    check_ratio("ρ0/ρ", ratio)?;
    mach_from_temperature_ratio(ratio.powf(gamma - 1.0), gamma)
}

/// Sonic-point ratios T*/T0, p*/p0, ρ*/ρ0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalRatios {
    /// T*/T0
    pub temperature: f64,
    /// p*/p0
    pub pressure: f64,
    /// ρ*/ρ0
    pub density: f64,
}

/// Ratios of sonic to stagnation conditions
pub fn critical_ratios(gamma: f64) -> Result<CriticalRatios, FlowError> {
    check_gamma(gamma)?;
    Ok(CriticalRatios {
        temperature: 1.0 / temperature_ratio(1.0, gamma),
        pressure: 1.0 / pressure_ratio(1.0, gamma),
        density: 1.0 / density_ratio(1.0, gamma),
    })
}

fn check_ratio(name: &str, ratio: f64) -> Result<(), FlowError> {
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(FlowError::domain(format!(
            "stagnation ratio {} must be >= 1, got {}",
            name, ratio
        )));
    }
    Ok(())
}

// Unchecked kernels shared with the shock and conical-flow modules

pub(crate) fn temperature_ratio(mach: f64, gamma: f64) -> f64 {
    1.0 + 0.5 * (gamma - 1.0) * mach * mach
}

pub(crate) fn pressure_ratio(mach: f64, gamma: f64) -> f64 {
    temperature_ratio(mach, gamma).powf(gamma / (gamma - 1.0))
}

pub(crate) fn density_ratio(mach: f64, gamma: f64) -> f64 {
    temperature_ratio(mach, gamma).powf(1.0 / (gamma - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios_at_mach_two() {
        // Standard table values for γ = 1.4
        let t = stagnation_temperature_ratio(2.0, 1.4).unwrap();
        let p = stagnation_pressure_ratio(2.0, 1.4).unwrap();
        let r = stagnation_density_ratio(2.0, 1.4).unwrap();
        assert!((t - 1.8).abs() < 1e-12);
        assert!((p - 7.824449).abs() < 1e-5, "p0/p = {}", p);
        assert!((r - 4.346916).abs() < 1e-5, "ρ0/ρ = {}", r);
        assert!((p - t * r).abs() < 1e-12, "equation of state p = ρT");
    }

    #[test]
    fn test_zero_mach_is_stagnation() {
        assert_eq!(stagnation_pressure_ratio(0.0, 1.4).unwrap(), 1.0);
        assert_eq!(stagnation_sound_speed_ratio(0.0, 1.4).unwrap(), 1.0);
    }

    #[test]
    fn test_inverses() {
        for &m in &[0.3, 1.0, 2.5, 7.0] {
            for &g in &[1.2, 1.4, 5.0 / 3.0] {
                let p = stagnation_pressure_ratio(m, g).unwrap();
                let r = stagnation_density_ratio(m, g).unwrap();
                assert!((mach_from_pressure_ratio(p, g).unwrap() - m).abs() < 1e-10);
                assert!((mach_from_density_ratio(r, g).unwrap() - m).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_critical_ratios_air() {
        let c = critical_ratios(1.4).unwrap();
        assert!((c.temperature - 0.833333).abs() < 1e-6);
        assert!((c.pressure - 0.528282).abs() < 1e-6);
        assert!((c.density - 0.633938).abs() < 1e-6);
    }

    #[test]
    fn test_mach_angle() {
        assert!((mach_angle(2.0).unwrap() - 30.0).abs() < 1e-12);
        assert!((mach_angle(1.0).unwrap() - 90.0).abs() < 1e-12);
        assert!(mach_angle(0.8).is_err());
    }

    #[test]
    fn test_domain_errors() {
        assert!(stagnation_pressure_ratio(-1.0, 1.4).is_err());
        assert!(stagnation_pressure_ratio(2.0, 1.0).is_err());
        assert!(mach_from_pressure_ratio(0.5, 1.4).is_err());
    }
}
