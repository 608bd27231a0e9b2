//! Newton's method over the plotted equation, one tangent step at a time.
//!
//! The solver is an iterator so a host can draw each tangent line as it is
//! produced and pause between steps.

use glam::DVec2;
use tracing::debug;

use infiniplot_stream::Equation;

/// Default number of Newton steps.
pub const DEFAULT_ITERATIONS: u32 = 100;

/// One Newton step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentStep {
    /// Point on the curve the tangent was taken at.
    pub from: DVec2,
    /// Where the tangent crosses `y = 0`; the next estimate.
    pub root_x: f64,
    /// `f(root_x)`, or `None` where the equation is undefined.
    pub next_y: Option<f64>,
}

impl TangentStep {
    /// Tangent line segment from the curve down to the x-axis.
    pub fn tangent_line(&self) -> (DVec2, DVec2) {
        (self.from, DVec2::new(self.root_x, 0.0))
    }
}

/// Iterator over Newton steps starting from `x0`.
///
/// Stops after `iterations` steps, when the derivative is NaN, or when the
/// tangent is flat and the next estimate is not finite. A step that lands
/// exactly on the previous estimate is yielded and then ends the iteration.
pub struct NewtonSteps<'a> {
    equation: &'a Equation,
    x: f64,
    remaining: u32,
}

impl<'a> NewtonSteps<'a> {
    pub fn new(equation: &'a Equation, x0: f64, iterations: u32) -> Self {
        Self {
            equation,
            x: x0,
            remaining: iterations,
        }
    }
}

impl Iterator for NewtonSteps<'_> {
    type Item = TangentStep;

    fn next(&mut self) -> Option<TangentStep> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let x = self.x;
        let y = self.equation.eval(x);
        let gradient = self.equation.slope(x);
        if gradient.is_nan() {
            self.remaining = 0;
            return None;
        }

        let root_x = (gradient * x - y) / gradient;
        if !root_x.is_finite() {
            self.remaining = 0;
            return None;
        }

        let next_y = self.equation.eval(root_x);
        if root_x == x {
            self.remaining = 0;
        }
        self.x = root_x;
        Some(TangentStep {
            from: DVec2::new(x, y),
            root_x,
            next_y: (!next_y.is_nan()).then_some(next_y),
        })
    }
}

/// Run Newton's method to the end and return the last estimate, if any step
/// was taken.
pub fn solve(equation: &Equation, x0: f64, iterations: u32) -> Option<f64> {
    let mut steps = 0u32;
    let root = NewtonSteps::new(equation, x0, iterations)
        .inspect(|_| steps += 1)
        .last()
        .map(|step| step.root_x);
    debug!(x0, steps, ?root, equation = equation.label(), "root solve finished");
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::preset;

    #[test]
    fn test_parabola_converges_to_sqrt_two() {
        let eq = preset("parabola").unwrap();
        let root = solve(&eq, 1.0, DEFAULT_ITERATIONS).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_negative_start_finds_negative_root() {
        let eq = preset("parabola").unwrap();
        let root = solve(&eq, -3.0, DEFAULT_ITERATIONS).unwrap();
        assert!((root + 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_first_step_geometry() {
        let eq = preset("parabola").unwrap();
        let step = NewtonSteps::new(&eq, 2.0, 1).next().unwrap();
        // f(2) = 2, f'(2) = 4, so the tangent hits zero at 1.5.
        assert_eq!(step.from, DVec2::new(2.0, 2.0));
        assert_eq!(step.root_x, 1.5);
        assert_eq!(step.next_y, Some(0.25));
        assert_eq!(step.tangent_line().1, DVec2::new(1.5, 0.0));
    }

    #[test]
    fn test_iteration_limit() {
        let eq = preset("sin").unwrap();
        assert_eq!(NewtonSteps::new(&eq, 0.5, 3).count(), 3);
        assert_eq!(NewtonSteps::new(&eq, 0.5, 0).count(), 0);
    }

    #[test]
    fn test_nan_gradient_stops() {
        let eq = Equation::new("x", |x| x);
        assert_eq!(NewtonSteps::new(&eq, 1.0, 10).count(), 0);
        assert_eq!(solve(&eq, 1.0, 10), None);
    }

    #[test]
    fn test_flat_tangent_stops() {
        let eq = preset("parabola").unwrap();
        // f'(0) = 0: the tangent never meets the axis.
        assert_eq!(NewtonSteps::new(&eq, 0.0, 10).count(), 0);
    }

    #[test]
    fn test_undefined_next_value_reported() {
        let eq = preset("sqrt").unwrap();
        // From x = 1 the tangent of sqrt crosses zero at -1.
        let step = NewtonSteps::new(&eq, 1.0, 1).next().unwrap();
        assert_eq!(step.root_x, -1.0);
        assert_eq!(step.next_y, None);
    }

    #[test]
    fn test_fixed_point_ends_iteration() {
        let eq = Equation::new("x", |x| x).with_derivative(|_| 1.0);
        let steps: Vec<_> = NewtonSteps::new(&eq, 5.0, 10).collect();
        // Linear: the first step lands on the root, the second confirms it.
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].root_x, 0.0);
    }
}
