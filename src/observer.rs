//! Diagnostics hook for the cone solver
//!
//! The bow-shock branch is a defined special case, not an error, but its
//! results differ qualitatively from the attached branch. Callers that want
//! to know when it was taken install a [`ShockObserver`]; the default
//! [`LogObserver`] forwards to the `log` facade.

use log::debug;

/// Receives solver events. All methods default to doing nothing.
pub trait ShockObserver {
    /// A trial deflection (degrees) reached θ_max and the shock was treated
    /// as detached: wave angle 90°, normal-shock jump on the freestream.
    fn bow_shock(&self, mach: f64, deflection: f64, max_deflection: f64) {
        let _ = (mach, deflection, max_deflection);
    }

    /// An effective wedge angle was solved (not served from the cache).
    /// Angles in degrees.
    fn effective_angle_solved(
        &self,
        mach: f64,
        cone_angle: f64,
        effective_angle: f64,
        detached: bool,
    ) {
        let _ = (mach, cone_angle, effective_angle, detached);
    }
}

/// Forwards events to `log` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ShockObserver for LogObserver {
    fn bow_shock(&self, mach: f64, deflection: f64, max_deflection: f64) {
        debug!(
            "bow shock: M = {}, deflection {:.6}° >= max {:.6}°, using normal shock",
            mach, deflection, max_deflection
        );
    }

    fn effective_angle_solved(
        &self,
        mach: f64,
        cone_angle: f64,
        effective_angle: f64,
        detached: bool,
    ) {
        debug!(
            "cone {:.6}° at M = {}: effective wedge {:.6}°{}",
            cone_angle,
            mach,
            effective_angle,
            if detached { " (detached)" } else { "" }
        );
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl ShockObserver for SilentObserver {}
