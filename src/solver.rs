//! Dormand-Prince 5(4) Integrator
//!
//! A 7-stage embedded RK5(4) pair with adaptive step-size control and
//! optional event location. The conical-flow equations are integrated across
//! a span of a few tens of degrees of ray angle and only the endpoint is
//! needed, so no dense output is stored.
//!
//! Reference: Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//! Ordinary Differential Equations I: Nonstiff Problems". Springer, §II.5.

use crate::coefficients::{A, B, B_ERR, C, ORDER, STAGES};
use crate::events::{sign_change_detected, EventConfig, EventFunction, EventResult};
use crate::roots::BrentSolver;

/// System of ordinary differential equations: dy/dx = f(x, y)
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `x` - Independent variable
    /// * `y` - Current state vector
    /// * `dydx` - Output: derivative dy/dx
    fn rhs(&self, x: f64, y: &[f64; N], dydx: &mut [f64; N]);
}

/// Integration result from a single step
#[derive(Debug, Clone)]
pub struct StepResult<const N: usize> {
    /// New state after the step (5th order solution)
    pub y: [f64; N],
    /// New value of the independent variable
    pub x: f64,
    /// Normalized error estimate (≤ 1.0 for acceptance)
    pub error: f64,
    /// Suggested step size magnitude for the next step
    pub h_next: f64,
    /// Whether the step was accepted
    pub accepted: bool,
}

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total number of function evaluations
    pub fn_evals: u64,
    /// Number of accepted steps
    pub accepted_steps: u64,
    /// Number of rejected steps
    pub rejected_steps: u64,
}

/// Step-size controller using an I-controller
///
/// h_new = safety * h * error^(-1/(q+1)), q = 4 for the embedded solution
#[derive(Debug, Clone)]
pub struct StepController {
    /// Safety factor
    pub safety: f64,
    /// Maximum growth factor per step
    pub max_factor: f64,
    /// Minimum reduction factor per step
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 10.0,
            min_factor: 0.2,
            exponent: 1.0 / ORDER as f64,
        }
    }
}

impl StepController {
    /// Compute the step size adjustment factor
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        let factor = self.safety * error.powf(-self.exponent);
        factor.clamp(self.min_factor, self.max_factor)
    }
}

/// Tolerance specification for error control
///
/// Error is computed as: |y5 - y4| / (atol + rtol * |y5|)
#[derive(Debug, Clone)]
pub struct Tolerances<const N: usize> {
    /// Absolute tolerance per component
    pub atol: [f64; N],
    /// Relative tolerance per component
    pub rtol: [f64; N],
}

impl<const N: usize> Tolerances<N> {
    /// Create tolerances with uniform values
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self {
            atol: [atol; N],
            rtol: [rtol; N],
        }
    }

    /// Create tolerances with per-component values
    pub fn with_components(atol: [f64; N], rtol: [f64; N]) -> Self {
        Self { atol, rtol }
    }
}

/// Dormand-Prince 5(4) integrator
///
/// # Example
/// ```
/// use compflow::{Dopri5, OdeSystem, Tolerances};
///
/// struct HarmonicOscillator { omega: f64 }
///
/// impl OdeSystem<2> for HarmonicOscillator {
///     fn rhs(&self, _x: f64, y: &[f64; 2], dydx: &mut [f64; 2]) {
///         dydx[0] = y[1];
///         dydx[1] = -self.omega * self.omega * y[0];
///     }
/// }
///
/// let mut solver = Dopri5::new(Tolerances::new(1e-12, 1e-12));
/// let sys = HarmonicOscillator { omega: 1.0 };
/// let (xf, yf) = solver.integrate(&sys, 0.0, &[1.0, 0.0], 1.0, 0.1).unwrap();
/// assert!((yf[0] - xf.cos()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Dopri5<const N: usize> {
    tol: Tolerances<N>,
    controller: StepController,
    /// Minimum step size
    pub h_min: f64,
    /// Maximum step size
    pub h_max: f64,
    /// Maximum number of step attempts before error
    pub max_steps: u64,
    k: [[f64; N]; STAGES],
    /// Integration statistics
    pub stats: Stats,
}

impl<const N: usize> Dopri5<N> {
    /// Create a new solver with specified tolerances
    pub fn new(tol: Tolerances<N>) -> Self {
        Self {
            tol,
            controller: StepController::default(),
            h_min: 1e-14,
            h_max: f64::INFINITY,
            max_steps: 100_000,
            k: [[0.0; N]; STAGES],
            stats: Stats::default(),
        }
    }

    /// Set minimum and maximum step sizes
    pub fn set_step_limits(&mut self, h_min: f64, h_max: f64) {
        self.h_min = h_min;
        self.h_max = h_max;
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Perform a single integration step of signed size `h`
    pub fn step<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        x: f64,
        y: &[f64; N],
        h: f64,
    ) -> StepResult<N> {
        let h = h.signum() * h.abs().clamp(self.h_min, self.h_max);

        self.compute_stages(sys, x, y, h);
        let y5 = self.compute_solution(y, h);
        let error = self.compute_error(y, &y5, h);
        // NaN error rejects the step and shrinks h
        let accepted = error <= 1.0;

        let factor = if error.is_nan() {
            self.controller.min_factor
        } else {
            self.controller.compute_factor(error)
        };
        let h_next = (h.abs() * factor).clamp(self.h_min, self.h_max);

        self.stats.fn_evals += STAGES as u64;
        if accepted {
            self.stats.accepted_steps += 1;
        } else {
            self.stats.rejected_steps += 1;
        }

        StepResult {
            y: y5,
            x: x + h,
            error,
            h_next,
            accepted,
        }
    }

    /// Integrate from x0 to xf
    ///
    /// # Returns
    /// * `Ok((x_final, y_final))` on success
    /// * `Err(IntegrationError)` on failure
    pub fn integrate<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        x0: f64,
        y0: &[f64; N],
        xf: f64,
        h0: f64,
    ) -> Result<(f64, [f64; N]), IntegrationError> {
        if x0 == xf {
            return Ok((x0, *y0));
        }
        self.validate_inputs(x0, y0, xf, h0)?;

        let mut x = x0;
        let mut y = *y0;
        let mut h = h0;
        let direction = (xf - x0).signum();
        let mut step_count = 0u64;

        while (xf - x) * direction > self.h_min {
            if (x + h - xf) * direction > 0.0 {
                h = xf - x;
            }

            let result = self.step(sys, x, &y, h);
            if result.accepted {
                x = result.x;
                y = result.y;
                if !y.iter().all(|v| v.is_finite()) {
                    return Err(IntegrationError::NonFiniteState { x });
                }
            }
            h = result.h_next * direction;

            step_count += 1;
            if step_count > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded { x });
            }
            if !result.accepted
                && result.h_next <= self.h_min
                && (xf - x) * direction > self.h_min
            {
                return Err(IntegrationError::StepSizeTooSmall {
                    x,
                    h: result.h_next,
                });
            }
        }

        Ok((x, y))
    }

    /// Integrate until the event function crosses zero or `xf` is reached.
    ///
    /// The crossing is located on the cubic Hermite interpolant of the step
    /// in which it occurred, giving O(h⁴) accuracy in the event state.
    #[allow(clippy::too_many_arguments)]
    pub fn integrate_to_event<S, E>(
        &mut self,
        sys: &S,
        event: &E,
        config: &EventConfig,
        x0: f64,
        y0: &[f64; N],
        xf: f64,
        h0: f64,
    ) -> Result<IntegrationResult<N>, IntegrationError>
    where
        S: OdeSystem<N>,
        E: EventFunction<N>,
    {
        if x0 == xf {
            return Ok(IntegrationResult::Completed { x: x0, y: *y0 });
        }
        self.validate_inputs(x0, y0, xf, h0)?;

        let mut x = x0;
        let mut y = *y0;
        let mut h = h0;
        let direction = (xf - x0).signum();
        let mut g_prev = event.eval(x, &y);
        let mut step_count = 0u64;

        while (xf - x) * direction > self.h_min {
            if (x + h - xf) * direction > 0.0 {
                h = xf - x;
            }

            let result = self.step(sys, x, &y, h);
            if result.accepted {
                if !result.y.iter().all(|v| v.is_finite()) {
                    return Err(IntegrationError::NonFiniteState { x: result.x });
                }
                let g_new = event.eval(result.x, &result.y);
                if sign_change_detected(g_prev, g_new, config.direction) {
                    let event_result = self.find_event_root(
                        sys, event, x, &y, result.x, &result.y, g_prev, g_new, config,
                    )?;
                    return Ok(IntegrationResult::Event(event_result));
                }
                x = result.x;
                y = result.y;
                g_prev = g_new;
            }
            h = result.h_next * direction;

            step_count += 1;
            if step_count > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded { x });
            }
            if !result.accepted
                && result.h_next <= self.h_min
                && (xf - x) * direction > self.h_min
            {
                return Err(IntegrationError::StepSizeTooSmall {
                    x,
                    h: result.h_next,
                });
            }
        }

        Ok(IntegrationResult::Completed { x, y })
    }

    #[allow(clippy::needless_range_loop)]
    fn compute_stages<S: OdeSystem<N>>(&mut self, sys: &S, x: f64, y: &[f64; N], h: f64) {
        let mut y_temp = [0.0; N];

        sys.rhs(x, y, &mut self.k[0]);
        for i in 1..STAGES {
            for n in 0..N {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += A[i][j] * self.k[j][n];
                }
                y_temp[n] = y[n] + h * sum;
            }
            sys.rhs(x + C[i] * h, &y_temp, &mut self.k[i]);
        }
    }

    #[allow(clippy::needless_range_loop)]
    fn compute_solution(&self, y: &[f64; N], h: f64) -> [f64; N] {
        let mut y_new = [0.0; N];
        for n in 0..N {
            let mut sum = 0.0;
            for i in 0..STAGES {
                sum += B[i] * self.k[i][n];
            }
            y_new[n] = y[n] + h * sum;
        }
        y_new
    }

    /// Infinity norm of the scaled error, with the scale taken from the
    /// larger of the old and new state magnitudes
    #[allow(clippy::needless_range_loop)]
    fn compute_error(&self, y: &[f64; N], y5: &[f64; N], h: f64) -> f64 {
        let mut max_err: f64 = 0.0;
        for n in 0..N {
            let mut err_n = 0.0;
            for i in 0..STAGES {
                err_n += B_ERR[i] * self.k[i][n];
            }
            err_n *= h;

            let scale = self.tol.atol[n] + self.tol.rtol[n] * y[n].abs().max(y5[n].abs());
            let scaled_err = err_n.abs() / scale;
            if scaled_err.is_nan() {
                return f64::NAN;
            }
            max_err = max_err.max(scaled_err);
        }
        max_err
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    fn validate_inputs(
        &self,
        x0: f64,
        y0: &[f64; N],
        xf: f64,
        h0: f64,
    ) -> Result<(), IntegrationError> {
        if !x0.is_finite() || !xf.is_finite() || !h0.is_finite() {
            return Err(IntegrationError::InvalidInput {
                message: "x0, xf, and h0 must be finite".to_string(),
            });
        }
        if h0 == 0.0 {
            return Err(IntegrationError::InvalidInput {
                message: "h0 must be non-zero".to_string(),
            });
        }
        if h0.signum() != (xf - x0).signum() {
            return Err(IntegrationError::InvalidInput {
                message: "h0 sign must match integration direction (xf - x0)".to_string(),
            });
        }
        for (i, &val) in y0.iter().enumerate() {
            if !val.is_finite() {
                return Err(IntegrationError::InvalidInput {
                    message: format!("y0[{}] is not finite", i),
                });
            }
        }
        for (i, (&a, &r)) in self.tol.atol.iter().zip(self.tol.rtol.iter()).enumerate() {
            if !a.is_finite() || a <= 0.0 {
                return Err(IntegrationError::InvalidInput {
                    message: format!("atol[{}] must be positive and finite", i),
                });
            }
            if !r.is_finite() || r < 0.0 {
                return Err(IntegrationError::InvalidInput {
                    message: format!("rtol[{}] must be non-negative and finite", i),
                });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn find_event_root<S, E>(
        &mut self,
        sys: &S,
        event: &E,
        x_a: f64,
        y_a: &[f64; N],
        x_b: f64,
        y_b: &[f64; N],
        g_a: f64,
        g_b: f64,
        config: &EventConfig,
    ) -> Result<EventResult<N>, IntegrationError>
    where
        S: OdeSystem<N>,
        E: EventFunction<N>,
    {
        let solver = BrentSolver::new(config.root_tol, config.max_iter);

        let mut f_a = [0.0; N];
        let mut f_b = [0.0; N];
        sys.rhs(x_a, y_a, &mut f_a);
        sys.rhs(x_b, y_b, &mut f_b);
        self.stats.fn_evals += 2;

        let dx = x_b - x_a;
        let hermite_interp = |x: f64| -> [f64; N] {
            let s = (x - x_a) / dx;
            let s2 = s * s;
            let s3 = s2 * s;
            let h00 = 1.0 - 3.0 * s2 + 2.0 * s3;
            let h10 = s - 2.0 * s2 + s3;
            let h01 = 3.0 * s2 - 2.0 * s3;
            let h11 = s3 - s2;

            let mut y = [0.0; N];
            for i in 0..N {
                y[i] = h00 * y_a[i] + h10 * dx * f_a[i] + h01 * y_b[i] + h11 * dx * f_b[i];
            }
            y
        };
        let eval_g = |x: f64| event.eval(x, &hermite_interp(x));

        // An unconverged crossing is not an event location
        let root = solver
            .find_root(eval_g, x_a, x_b, Some(g_a), Some(g_b))
            .map_err(|e| IntegrationError::EventFindingFailed {
                message: e.to_string(),
            })?;
        Ok(EventResult {
            x: root.x,
            y: hermite_interp(root.x),
            g_value: root.f,
            iterations: root.iterations,
        })
    }
}

/// Result of integration with event detection
#[derive(Debug, Clone)]
pub enum IntegrationResult<const N: usize> {
    /// Integration reached the final value of the independent variable
    Completed {
        /// Final independent variable
        x: f64,
        /// Final state vector
        y: [f64; N],
    },
    /// Integration stopped at an event
    Event(EventResult<N>),
}

/// Errors that can occur during integration
#[derive(Debug, Clone)]
pub enum IntegrationError {
    /// Step size became too small
    StepSizeTooSmall {
        /// Position at which step size became too small
        x: f64,
        /// Step size that was too small
        h: f64,
    },
    /// Maximum number of steps exceeded
    MaxStepsExceeded {
        /// Position reached when the budget ran out
        x: f64,
    },
    /// Event finding failed
    EventFindingFailed {
        /// Description of the failure
        message: String,
    },
    /// Invalid input parameters
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },
    /// Non-finite state detected during integration
    NonFiniteState {
        /// Position at which the non-finite state was detected
        x: f64,
    },
}

impl std::fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationError::StepSizeTooSmall { x, h } => {
                write!(f, "Step size {} too small at x = {}", h, x)
            }
            IntegrationError::MaxStepsExceeded { x } => {
                write!(f, "Maximum number of integration steps exceeded at x = {}", x)
            }
            IntegrationError::EventFindingFailed { message } => {
                write!(f, "Event finding failed: {}", message)
            }
            IntegrationError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            IntegrationError::NonFiniteState { x } => {
                write!(f, "Non-finite state detected at x = {}", x)
            }
        }
    }
}

impl std::error::Error for IntegrationError {}
