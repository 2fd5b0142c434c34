//! Solver configuration
//!
//! Numerical defaults are plain values passed to the solvers that use them.
//! Nothing here is global or mutable.

/// Specific-heat ratio of air, the default working gas
pub const GAMMA_AIR: f64 = 1.4;

/// Tolerances and iteration budgets for the conical-flow solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Relative tolerance of the Taylor-Maccoll integration
    pub ode_rtol: f64,
    /// Absolute tolerance of the Taylor-Maccoll integration
    pub ode_atol: f64,
    /// Absolute tolerance on angles found by root finding (radians)
    pub root_tol: f64,
    /// Iteration budget of every root finder and minimizer
    pub max_iter: usize,
    /// Step budget of each ODE integration
    pub max_steps: u64,
    /// Lower end of the effective wedge angle bracket (degrees); the shooting
    /// residual has a removable singularity at zero deflection
    pub seed_deflection_deg: f64,
    /// Memoize effective wedge angles per (M, θ_c, γ)
    pub cache: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ode_rtol: 1e-10,
            ode_atol: 1e-12,
            root_tol: 1e-12,
            max_iter: 200,
            max_steps: 100_000,
            seed_deflection_deg: 1e-3,
            cache: true,
        }
    }
}

impl SolverConfig {
    /// Same configuration with memoization switched off
    pub fn uncached(mut self) -> Self {
        self.cache = false;
        self
    }
}
