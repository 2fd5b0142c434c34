//! Data-parallel sweeps of cone solutions
//!
//! Every point is an independent solve, so the sweeps fan out over rayon's
//! global pool. A shared [`ConeSolver`] memoizes across threads. Results come
//! back in input order, one `Result` per point: a failed point does not
//! abort the sweep.

use rayon::prelude::*;

use crate::cone::{ConeSolution, ConeSolver};
use crate::error::FlowError;

/// Solve a fixed cone over a range of freestream Mach numbers
pub fn cone_sweep_mach(
    solver: &ConeSolver,
    machs: &[f64],
    cone_angle: f64,
    gamma: f64,
) -> Vec<Result<ConeSolution, FlowError>> {
    machs
        .par_iter()
        .map(|&mach| solver.solution(mach, cone_angle, gamma))
        .collect()
}

/// Solve a range of cone half-angles at a fixed Mach number
pub fn cone_sweep_angle(
    solver: &ConeSolver,
    mach: f64,
    cone_angles: &[f64],
    gamma: f64,
) -> Vec<Result<ConeSolution, FlowError>> {
    cone_angles
        .par_iter()
        .map(|&cone| solver.solution(mach, cone, gamma))
        .collect()
}
