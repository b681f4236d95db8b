//! Newton-Raphson root-finding algorithm with iteration trace.

use crate::error::{MathError, MathResult};
use crate::solvers::SolverConfig;

/// One evaluation of the Newton iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonStep {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Point evaluated.
    pub x: f64,
    /// Function value at `x`.
    pub fx: f64,
    /// Derivative at `x`.
    pub dfx: f64,
}

/// Outcome of a Newton-Raphson run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonOutcome {
    /// Final estimate.
    pub root: f64,
    /// Whether `|f(x)| < tol` or `|x_{k+1} - x_k| < tol` was reached.
    pub converged: bool,
    /// Iterations performed. When not converged this equals
    /// `max_iterations`, unless `f` or `f'` stopped being finite first, in
    /// which case it is the iteration that produced the non-finite value.
    pub iterations: u32,
    /// Function value at `root`.
    pub residual: f64,
    /// Every evaluated step, in order.
    pub trace: Vec<NewtonStep>,
}

/// Newton-Raphson root-finding algorithm that keeps a trace of every step.
///
/// Uses the iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)` and stops when
/// `|f(x_n)| < tolerance` (root is `x_n`) or `|x_{n+1} - x_n| < tolerance`
/// (root is `x_{n+1}`).
///
/// # Errors
///
/// Returns [`MathError::FlatDerivative`] when `|f'(x_n)| < tolerance` before
/// convergence. Exhausting `max_iterations`, or reaching a point where `f` or
/// `f'` is not finite, is reported through `converged == false`.
///
/// # Example
///
/// ```rust
/// use fincalc_math::solvers::{newton_raphson_traced, SolverConfig};
///
/// // Cube root of 27
/// let outcome = newton_raphson_traced(
///     |x: f64| x * x * x - 27.0,
///     |x: f64| 3.0 * x * x,
///     2.0,
///     &SolverConfig::default(),
/// )
/// .unwrap();
/// assert!((outcome.root - 3.0).abs() < 1e-10);
/// ```
pub fn newton_raphson_traced<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<NewtonOutcome>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut trace: Vec<NewtonStep> = Vec::with_capacity(config.max_iterations.min(1024) as usize);

    for iteration in 1..=config.max_iterations {
        let fx = f(x);
        let dfx = df(x);
        trace.push(NewtonStep {
            iteration,
            x,
            fx,
            dfx,
        });

        if !fx.is_finite() || !dfx.is_finite() {
            log::debug!("Newton iteration {iteration} left the finite domain at x = {x}");
            return Ok(NewtonOutcome {
                root: x,
                converged: false,
                iterations: iteration,
                residual: fx,
                trace,
            });
        }

        // Check for convergence
        if fx.abs() < config.tolerance {
            return Ok(NewtonOutcome {
                root: x,
                converged: true,
                iterations: iteration,
                residual: fx,
                trace,
            });
        }

        // Check for flat derivative
        if dfx.abs() < config.tolerance {
            return Err(MathError::flat_derivative(iteration, x, dfx));
        }

        let next = x - fx / dfx;

        // Check for step convergence
        if (next - x).abs() < config.tolerance {
            return Ok(NewtonOutcome {
                root: next,
                converged: true,
                iterations: iteration,
                residual: f(next),
                trace,
            });
        }

        x = next;
    }

    log::debug!(
        "Newton-Raphson did not converge in {} iterations (last x = {x})",
        config.max_iterations
    );
    Ok(NewtonOutcome {
        root: x,
        converged: false,
        iterations: config.max_iterations,
        residual: f(x),
        trace,
    })
}
