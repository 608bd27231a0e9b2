use std::fmt;
use std::sync::Arc;

type RealFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// The function being plotted, as handed over by the expression evaluator.
///
/// `f(x)` may return NaN where the function is undefined; the renderer skips
/// such samples. An optional derivative is carried along for tools that need
/// slopes, such as the root solver. Cloning is cheap.
#[derive(Clone)]
pub struct Equation {
    label: String,
    f: RealFn,
    derivative: Option<RealFn>,
}

impl Equation {
    /// Wrap an evaluation function.
    pub fn new(label: impl Into<String>, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            f: Arc::new(f),
            derivative: None,
        }
    }

    /// Attach the derivative `f'(x)`.
    pub fn with_derivative(mut self, df: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.derivative = Some(Arc::new(df));
        self
    }

    /// An equation that is undefined everywhere; renders nothing.
    pub fn undefined() -> Self {
        Self::new("undefined", |_| f64::NAN)
    }

    /// Evaluate `f(x)`.
    pub fn eval(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    /// Evaluate `f'(x)`, or NaN when no derivative was supplied.
    pub fn slope(&self, x: f64) -> f64 {
        self.derivative.as_ref().map_or(f64::NAN, |df| df(x))
    }

    /// Whether a derivative is available.
    pub fn has_derivative(&self) -> bool {
        self.derivative.is_some()
    }

    /// Human-readable source of the equation.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equation")
            .field("label", &self.label)
            .field("has_derivative", &self.has_derivative())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_and_slope() {
        let eq = Equation::new("x^2", |x| x * x).with_derivative(|x| 2.0 * x);
        assert_eq!(eq.eval(3.0), 9.0);
        assert_eq!(eq.slope(3.0), 6.0);
        assert_eq!(eq.label(), "x^2");
    }

    #[test]
    fn test_missing_derivative_is_nan() {
        let eq = Equation::new("x", |x| x);
        assert!(eq.slope(1.0).is_nan());
        assert!(!eq.has_derivative());
    }

    #[test]
    fn test_undefined() {
        assert!(Equation::undefined().eval(0.0).is_nan());
    }
}
