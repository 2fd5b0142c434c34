//! Crate-level error type
//!
//! Failures fall into three classes, reported by [`FlowError::kind`]:
//! inputs outside the physical domain, problems that have no solution for the
//! given inputs, and iterative solvers that ran out of budget. Callers can
//! reject the input for the first two and retry with looser tolerances or a
//! larger budget for the third.

use crate::roots::BrentError;
use crate::solver::IntegrationError;

/// Coarse error class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input outside the domain of the relation (M ≤ 1, γ ≤ 1, ...)
    InvalidDomain,
    /// The problem has no solution for these inputs
    NoSolution,
    /// An iterative solver exhausted its budget
    NotConverged,
}

/// Errors returned by every fallible operation in this crate
#[derive(Debug, Clone)]
pub enum FlowError {
    /// Input outside the domain of the relation
    InvalidDomain {
        /// Description of the invalid input
        message: String,
    },
    /// No attached oblique shock exists: the deflection exceeds θ_max.
    /// Angles in degrees.
    Detached {
        /// Upstream Mach number
        mach: f64,
        /// Requested deflection
        deflection: f64,
        /// Maximum attached deflection at this Mach number
        max_deflection: f64,
    },
    /// A bracketed inverse found no sign change
    NoSolution {
        /// Description of the failed search
        message: String,
    },
    /// Root finder or integrator exceeded its budget
    NotConverged {
        /// Description of the failure
        message: String,
    },
}

impl FlowError {
    /// Which of the three error classes this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::InvalidDomain { .. } => ErrorKind::InvalidDomain,
            FlowError::Detached { .. } | FlowError::NoSolution { .. } => ErrorKind::NoSolution,
            FlowError::NotConverged { .. } => ErrorKind::NotConverged,
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        FlowError::InvalidDomain {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::InvalidDomain { message } => write!(f, "Invalid input: {}", message),
            FlowError::Detached {
                mach,
                deflection,
                max_deflection,
            } => write!(
                f,
                "Shock detached: deflection {}° exceeds maximum {}° at M = {}",
                deflection, max_deflection, mach
            ),
            FlowError::NoSolution { message } => write!(f, "No solution: {}", message),
            FlowError::NotConverged { message } => write!(f, "Failed to converge: {}", message),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<IntegrationError> for FlowError {
    fn from(e: IntegrationError) -> Self {
        match e {
            IntegrationError::InvalidInput { message } => FlowError::InvalidDomain { message },
            other => FlowError::NotConverged {
                message: other.to_string(),
            },
        }
    }
}

impl From<BrentError> for FlowError {
    fn from(e: BrentError) -> Self {
        match e {
            BrentError::NotBracketed { .. } => FlowError::NoSolution {
                message: e.to_string(),
            },
            BrentError::MaxIterations { .. } | BrentError::NonFinite { .. } => {
                FlowError::NotConverged {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Reject γ ≤ 1 and non-finite γ
pub(crate) fn check_gamma(gamma: f64) -> Result<(), FlowError> {
    if !gamma.is_finite() || gamma <= 1.0 {
        return Err(FlowError::domain(format!(
            "specific-heat ratio must be finite and > 1, got {}",
            gamma
        )));
    }
    Ok(())
}

/// Reject negative or non-finite Mach numbers
pub(crate) fn check_mach(mach: f64) -> Result<(), FlowError> {
    if !mach.is_finite() || mach < 0.0 {
        return Err(FlowError::domain(format!(
            "Mach number must be finite and non-negative, got {}",
            mach
        )));
    }
    Ok(())
}

/// Reject subsonic or sonic freestreams where a shock is required
pub(crate) fn check_supersonic(mach: f64) -> Result<(), FlowError> {
    if !mach.is_finite() || mach <= 1.0 {
        return Err(FlowError::domain(format!(
            "supersonic Mach number required, got {}",
            mach
        )));
    }
    Ok(())
}

/// Reject negative or non-finite angles (degrees)
pub(crate) fn check_angle(name: &str, angle: f64) -> Result<(), FlowError> {
    if !angle.is_finite() || angle < 0.0 {
        return Err(FlowError::domain(format!(
            "{} must be finite and non-negative, got {}",
            name, angle
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(FlowError::domain("x").kind(), ErrorKind::InvalidDomain);
        let detached = FlowError::Detached {
            mach: 2.0,
            deflection: 30.0,
            max_deflection: 22.97,
        };
        assert_eq!(detached.kind(), ErrorKind::NoSolution);
        assert!(detached.to_string().contains("22.97"));
    }

    #[test]
    fn test_from_integration_error() {
        let e: FlowError = IntegrationError::MaxStepsExceeded { x: 0.5 }.into();
        assert_eq!(e.kind(), ErrorKind::NotConverged);
        let e: FlowError = IntegrationError::InvalidInput {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::InvalidDomain);
    }

    #[test]
    fn test_from_brent_error() {
        let e: FlowError = BrentError::NotBracketed {
            a: 0.0,
            b: 1.0,
            fa: 1.0,
            fb: 2.0,
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::NoSolution);
        let e: FlowError = BrentError::MaxIterations {
            current_best: 0.5,
            f_value: 1e-3,
            iterations: 100,
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::NotConverged);
    }

    #[test]
    fn test_domain_checks() {
        assert!(check_gamma(1.4).is_ok());
        assert!(check_gamma(1.0).is_err());
        assert!(check_gamma(f64::NAN).is_err());
        assert!(check_supersonic(1.0).is_err());
        assert!(check_supersonic(1.0001).is_ok());
        assert!(check_mach(0.0).is_ok());
        assert!(check_mach(-0.1).is_err());
        assert!(check_angle("cone angle", -1.0).is_err());
    }
}
