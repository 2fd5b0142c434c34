//! Derivative-free scalar solvers
//!
//! Both solvers follow Brent, R.P. (1973). "Algorithms for Minimization
//! without Derivatives". Prentice-Hall.
//!
//! - [`BrentSolver`] finds a zero of a function bracketed by a sign change,
//!   combining bisection, the secant rule and inverse quadratic interpolation.
//! - [`BrentMinimizer`] finds a local minimum on a bounded interval,
//!   combining golden-section search with successive parabolic interpolation.
//!
//! Every shock relation that is not closed-form (weak wave angle, maximum
//! deflection, inverse Prandtl-Meyer, inverse area ratio, effective wedge
//! angle) is built on one of these two.

/// A converged root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Abscissa of the root
    pub x: f64,
    /// Function value at `x` (should be ~0)
    pub f: f64,
    /// Number of iterations used
    pub iterations: usize,
}

/// A converged minimum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Abscissa of the minimum
    pub x: f64,
    /// Function value at `x`
    pub f: f64,
    /// Number of iterations used
    pub iterations: usize,
}

/// Brent's method for root finding
pub struct BrentSolver {
    /// Absolute tolerance on the root abscissa
    pub tol: f64,
    /// Maximum iterations
    pub max_iter: usize,
}

impl Default for BrentSolver {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            max_iter: 100,
        }
    }
}

impl BrentSolver {
    /// Create a new Brent solver with specified tolerance
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Find the root of f in the interval [a, b].
    ///
    /// `fa` and `fb` may be supplied when the caller has already evaluated the
    /// bracket endpoints (each evaluation can cost a full ODE integration).
    ///
    /// # Returns
    /// * `Ok(Root)` - The root, the function value there and the iteration count
    /// * `Err(BrentError::NotBracketed)` - f(a) and f(b) have the same sign
    /// * `Err(BrentError::MaxIterations)` - iteration budget exhausted
    pub fn find_root<F>(
        &self,
        mut f: F,
        a: f64,
        b: f64,
        fa: Option<f64>,
        fb: Option<f64>,
    ) -> Result<Root, BrentError>
    where
        F: FnMut(f64) -> f64,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = fa.unwrap_or_else(|| f(a));
        let mut fb = fb.unwrap_or_else(|| f(b));

        if !fa.is_finite() || !fb.is_finite() || fa * fb > 0.0 {
            return Err(BrentError::NotBracketed { a, b, fa, fb });
        }
        if fa == 0.0 {
            return Ok(Root {
                x: a,
                f: fa,
                iterations: 0,
            });
        }

        // c is the contrapoint: [b, c] always brackets the root
        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        for iter in 1..=self.max_iter {
            if fb * fc > 0.0 {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // Keep b as the best estimate
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * self.tol;
            let xm = 0.5 * (c - b);
            if xm.abs() <= tol1 || fb == 0.0 {
                return Ok(Root {
                    x: b,
                    f: fb,
                    iterations: iter,
                });
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                // Secant (a == c) or inverse quadratic interpolation
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                } else {
                    p = -p;
                }
                let min1 = 3.0 * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                // Bisection
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol1 {
                d
            } else {
                tol1.copysign(xm)
            };
            fb = f(b);
            if !fb.is_finite() {
                return Err(BrentError::NonFinite { x: b });
            }
        }

        Err(BrentError::MaxIterations {
            current_best: b,
            f_value: fb,
            iterations: self.max_iter,
        })
    }
}

/// Brent's method for bounded 1-D minimization
///
/// To maximize g, minimize -g.
pub struct BrentMinimizer {
    /// Relative tolerance on the abscissa (values below sqrt(eps) gain nothing)
    pub tol: f64,
    /// Maximum iterations
    pub max_iter: usize,
}

impl Default for BrentMinimizer {
    fn default() -> Self {
        Self {
            tol: 1.5e-8,
            max_iter: 200,
        }
    }
}

impl BrentMinimizer {
    /// Golden ratio complement, (3 - sqrt 5) / 2
    const CGOLD: f64 = 0.381_966_011_250_105_1;
    /// Absolute floor on the tolerance, for minima at x = 0
    const ZEPS: f64 = 1e-12;

    /// Create a new minimizer with specified tolerance
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Locate a minimum of f on [a, b].
    ///
    /// The function is assumed unimodal on the interval; otherwise some local
    /// minimum is returned.
    pub fn minimize<F>(&self, mut f: F, a: f64, b: f64) -> Result<Minimum, BrentError>
    where
        F: FnMut(f64) -> f64,
    {
        let (mut a, mut b) = (a.min(b), a.max(b));
        let mut x = a + Self::CGOLD * (b - a);
        let mut w = x;
        let mut v = x;
        let mut fx = f(x);
        if !fx.is_finite() {
            return Err(BrentError::NonFinite { x });
        }
        let mut fw = fx;
        let mut fv = fx;
        let mut d: f64 = 0.0;
        let mut e: f64 = 0.0;

        for iter in 1..=self.max_iter {
            let xm = 0.5 * (a + b);
            let tol1 = self.tol * x.abs() + Self::ZEPS;
            let tol2 = 2.0 * tol1;
            if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
                return Ok(Minimum {
                    x,
                    f: fx,
                    iterations: iter,
                });
            }

            let mut golden = true;
            if e.abs() > tol1 {
                // Trial parabolic fit through x, v, w
                let r = (x - w) * (fx - fv);
                let mut q = (x - v) * (fx - fw);
                let mut p = (x - v) * q - (x - w) * r;
                q = 2.0 * (q - r);
                if q > 0.0 {
                    p = -p;
                } else {
                    q = -q;
                }
                let etemp = e;
                e = d;
                if !(p.abs() >= (0.5 * q * etemp).abs() || p <= q * (a - x) || p >= q * (b - x)) {
                    golden = false;
                    d = p / q;
                    let u = x + d;
                    if u - a < tol2 || b - u < tol2 {
                        d = tol1.copysign(xm - x);
                    }
                }
            }
            if golden {
                e = if x >= xm { a - x } else { b - x };
                d = Self::CGOLD * e;
            }

            let u = if d.abs() >= tol1 {
                x + d
            } else {
                x + tol1.copysign(d)
            };
            let fu = f(u);
            if !fu.is_finite() {
                return Err(BrentError::NonFinite { x: u });
            }

            if fu <= fx {
                if u >= x {
                    a = x;
                } else {
                    b = x;
                }
                v = w;
                fv = fw;
                w = x;
                fw = fx;
                x = u;
                fx = fu;
            } else {
                if u < x {
                    a = u;
                } else {
                    b = u;
                }
                if fu <= fw || w == x {
                    v = w;
                    fv = fw;
                    w = u;
                    fw = fu;
                } else if fu <= fv || v == x || v == w {
                    v = u;
                    fv = fu;
                }
            }
        }

        Err(BrentError::MaxIterations {
            current_best: x,
            f_value: fx,
            iterations: self.max_iter,
        })
    }
}

/// Errors from Brent's methods
#[derive(Debug, Clone)]
pub enum BrentError {
    /// The root is not bracketed by the given interval
    NotBracketed {
        /// Left endpoint
        a: f64,
        /// Right endpoint
        b: f64,
        /// Function value at left endpoint
        fa: f64,
        /// Function value at right endpoint
        fb: f64,
    },
    /// Maximum iterations reached without convergence
    MaxIterations {
        /// Best estimate so far
        current_best: f64,
        /// Function value at best estimate
        f_value: f64,
        /// Number of iterations performed
        iterations: usize,
    },
    /// The function returned NaN or infinity
    NonFinite {
        /// Abscissa of the offending evaluation
        x: f64,
    },
}

impl std::fmt::Display for BrentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrentError::NotBracketed { a, b, fa, fb } => {
                write!(
                    f,
                    "Root not bracketed: f({}) = {}, f({}) = {} (same sign)",
                    a, fa, b, fb
                )
            }
            BrentError::MaxIterations {
                current_best,
                f_value,
                iterations,
            } => {
                write!(
                    f,
                    "Max iterations ({}) reached, best estimate: {}, f = {}",
                    iterations, current_best, f_value
                )
            }
            BrentError::NonFinite { x } => {
                write!(f, "Non-finite function value at x = {}", x)
            }
        }
    }
}

impl std::error::Error for BrentError {}
