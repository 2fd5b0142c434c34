//! External-compression ramp intake
//!
//! Each ramp turns the flow through a weak oblique shock, the next ramp
//! seeing the Mach number left by the previous one. An optional terminal
//! normal shock takes the flow subsonic. Total-pressure recovery is the
//! product of the per-shock recoveries.
//!
//! ```
//! use compflow::RampIntake;
//!
//! let intake = RampIntake::new(1.4).ramp(8.0).ramp(8.0).terminal_shock();
//! let result = intake.analyse(2.5).unwrap();
//! assert_eq!(result.stages.len(), 3);
//! assert!(result.exit_mach < 1.0);
//! ```

use crate::error::{check_angle, check_gamma, check_supersonic, FlowError};
use crate::normal_shock::NormalShock;
use crate::oblique_shock::ObliqueShock;

/// One shock of the chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Ramp shock
    Oblique(ObliqueShock),
    /// Terminal normal shock
    Normal(NormalShock),
}

impl Stage {
    /// Mach number behind this shock
    pub fn mach(&self) -> f64 {
        match self {
            Stage::Oblique(s) => s.mach,
            Stage::Normal(s) => s.mach,
        }
    }

    /// p2/p1 across this shock
    pub fn pressure_ratio(&self) -> f64 {
        match self {
            Stage::Oblique(s) => s.pressure_ratio,
            Stage::Normal(s) => s.pressure_ratio,
        }
    }

    /// p02/p01 across this shock
    pub fn total_pressure_ratio(&self) -> f64 {
        match self {
            Stage::Oblique(s) => s.total_pressure_ratio,
            Stage::Normal(s) => s.total_pressure_ratio,
        }
    }
}

/// Result of running a freestream through the intake
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeAnalysis {
    /// Freestream Mach number
    pub freestream_mach: f64,
    /// Shocks in flow order
    pub stages: Vec<Stage>,
    /// p0 at the exit over freestream p0
    pub total_pressure_recovery: f64,
    /// p at the exit over freestream p
    pub static_pressure_ratio: f64,
    /// Mach number at the exit
    pub exit_mach: f64,
    /// Accumulated flow turning, degrees
    pub total_turning: f64,
}

/// Multi-ramp intake built up ramp by ramp
#[derive(Debug, Clone, PartialEq)]
pub struct RampIntake {
    gamma: f64,
    ramps: Vec<f64>,
    terminal_shock: bool,
}

impl RampIntake {
    /// Intake with no ramps for a gas with specific-heat ratio `gamma`
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            ramps: Vec::new(),
            terminal_shock: false,
        }
    }

    /// Add a ramp turning the flow by `deflection` degrees
    pub fn ramp(mut self, deflection: f64) -> Self {
        self.ramps.push(deflection);
        self
    }

    /// Close the chain with a normal shock
    pub fn terminal_shock(mut self) -> Self {
        self.terminal_shock = true;
        self
    }

    /// Ramp deflections in flow order, degrees
    pub fn ramps(&self) -> &[f64] {
        &self.ramps
    }

    /// Run freestream Mach `mach` through the chain.
    ///
    /// # Errors
    /// `Detached` when a ramp exceeds the maximum deflection at its local Mach
    /// number, `InvalidDomain` when the flow reaches a ramp or the terminal
    /// shock subsonic.
    pub fn analyse(&self, mach: f64) -> Result<IntakeAnalysis, FlowError> {
        check_gamma(self.gamma)?;
        check_supersonic(mach)?;

        let mut stages = Vec::with_capacity(self.ramps.len() + 1);
        let mut local = mach;
        for (i, &deflection) in self.ramps.iter().enumerate() {
            check_angle("ramp deflection", deflection)?;
            if local <= 1.0 {
                return Err(FlowError::domain(format!(
                    "flow is subsonic (M = {}) ahead of ramp {}",
                    local,
                    i + 1
                )));
            }
            let shock = ObliqueShock::new(local, deflection, self.gamma)?;
            local = shock.mach;
            stages.push(Stage::Oblique(shock));
        }
        if self.terminal_shock {
            let shock = NormalShock::new(local, self.gamma)?;
            local = shock.mach;
            stages.push(Stage::Normal(shock));
        }

        Ok(IntakeAnalysis {
            freestream_mach: mach,
            total_pressure_recovery: stages.iter().map(Stage::total_pressure_ratio).product(),
            static_pressure_ratio: stages.iter().map(Stage::pressure_ratio).product(),
            exit_mach: local,
            total_turning: self.ramps.iter().sum(),
            stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_single_ramp_matches_oblique_shock() {
        let r = RampIntake::new(1.4).ramp(10.0).analyse(3.0).unwrap();
        let s = ObliqueShock::new(3.0, 10.0, 1.4).unwrap();
        assert_eq!(r.stages.len(), 1);
        assert_eq!(r.exit_mach, s.mach);
        assert_eq!(r.total_pressure_recovery, s.total_pressure_ratio);
    }

    #[test]
    fn test_staged_compression_beats_normal_shock() {
        let pitot = RampIntake::new(1.4).terminal_shock().analyse(3.0).unwrap();
        let staged = RampIntake::new(1.4)
            .ramp(8.0)
            .ramp(8.0)
            .ramp(8.0)
            .terminal_shock()
            .analyse(3.0)
            .unwrap();
        assert!((pitot.total_pressure_recovery - 0.328344).abs() < 1e-5);
        assert!(staged.total_pressure_recovery > pitot.total_pressure_recovery);
        assert!(staged.exit_mach < 1.0);
        assert_eq!(staged.total_turning, 24.0);
    }

    #[test]
    fn test_chain_uses_local_mach() {
        let r = RampIntake::new(1.4).ramp(5.0).ramp(5.0).analyse(2.5).unwrap();
        let first = ObliqueShock::new(2.5, 5.0, 1.4).unwrap();
        let second = ObliqueShock::new(first.mach, 5.0, 1.4).unwrap();
        assert!((r.exit_mach - second.mach).abs() < 1e-12);
        let p = first.pressure_ratio * second.pressure_ratio;
        assert!((r.static_pressure_ratio - p).abs() < 1e-12);
    }

    #[test]
    fn test_detached_ramp() {
        let err = RampIntake::new(1.4).ramp(30.0).analyse(2.0).unwrap_err();
        assert!(matches!(err, FlowError::Detached { .. }));
        assert_eq!(err.kind(), ErrorKind::NoSolution);
    }

    #[test]
    fn test_subsonic_freestream() {
        let err = RampIntake::new(1.4).ramp(5.0).analyse(0.8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
    }
}
