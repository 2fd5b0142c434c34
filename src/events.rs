//! Event location during ODE integration
//!
//! An event function `g(x, y)` is monitored on every accepted step. When `g`
//! changes sign, the crossing is located with Brent's method on the cubic
//! Hermite interpolant of the step and integration stops there.
//!
//! In conical flow the event of interest is the cone surface itself: the ray
//! on which the tangential velocity component vanishes.

/// Event function trait
///
/// # Example
///
/// ```
/// use compflow::EventFunction;
///
/// // Zero where the second state component vanishes
/// struct SecondComponentZero;
///
/// impl EventFunction<2> for SecondComponentZero {
///     fn eval(&self, _x: f64, y: &[f64; 2]) -> f64 {
///         y[1]
///     }
/// }
/// ```
pub trait EventFunction<const N: usize> {
    /// Evaluate the event function at independent variable `x` and state `y`.
    ///
    /// The integrator stops where this function crosses zero in the
    /// configured [`EventDirection`].
    fn eval(&self, x: f64, y: &[f64; N]) -> f64;
}

/// Direction of zero-crossing to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDirection {
    /// g goes from negative to positive
    Rising,
    /// g goes from positive to negative
    Falling,
    /// Any zero crossing
    #[default]
    Any,
}

/// Configuration for an event
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Which direction of zero-crossing to detect
    pub direction: EventDirection,
    /// Tolerance for locating the crossing (default: 1e-13)
    pub root_tol: f64,
    /// Maximum iterations for locating the crossing (default: 100)
    pub max_iter: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            direction: EventDirection::Any,
            root_tol: 1e-13,
            max_iter: 100,
        }
    }
}

/// Result of event detection
#[derive(Debug, Clone)]
pub struct EventResult<const N: usize> {
    /// Independent variable at which the event occurred
    pub x: f64,
    /// State at the event
    pub y: [f64; N],
    /// Value of the event function at the event (should be ~0)
    pub g_value: f64,
    /// Number of root-finding iterations used
    pub iterations: usize,
}

/// Check if a sign change occurred in the specified direction
pub fn sign_change_detected(g_old: f64, g_new: f64, direction: EventDirection) -> bool {
    if g_old * g_new > 0.0 {
        return false;
    }
    if g_new == 0.0 {
        return true;
    }
    // Leaving an exact zero is not a new crossing
    if g_old == 0.0 {
        return false;
    }

    match direction {
        EventDirection::Rising => g_old < 0.0 && g_new > 0.0,
        EventDirection::Falling => g_old > 0.0 && g_new < 0.0,
        EventDirection::Any => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_change_detection() {
        assert!(sign_change_detected(-1.0, 1.0, EventDirection::Rising));
        assert!(!sign_change_detected(1.0, -1.0, EventDirection::Rising));
        assert!(sign_change_detected(1.0, -1.0, EventDirection::Falling));
        assert!(!sign_change_detected(-1.0, 1.0, EventDirection::Falling));
        assert!(sign_change_detected(-1.0, 1.0, EventDirection::Any));
        assert!(sign_change_detected(1.0, -1.0, EventDirection::Any));

        assert!(!sign_change_detected(1.0, 2.0, EventDirection::Any));
        assert!(!sign_change_detected(-1.0, -2.0, EventDirection::Any));
    }

    #[test]
    fn test_exact_zero_handling() {
        assert!(sign_change_detected(-0.5, 0.0, EventDirection::Rising));
        assert!(!sign_change_detected(0.0, 0.5, EventDirection::Any));
    }
}
