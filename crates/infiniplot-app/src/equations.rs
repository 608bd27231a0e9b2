//! Built-in equations for the demo driver, each with its derivative.

use infiniplot_stream::Equation;

/// Names accepted by [`preset`].
pub const PRESET_NAMES: &[&str] = &["sin", "cos", "parabola", "cubic", "hyperbola", "tan", "sqrt"];

/// Look up a built-in equation by name.
pub fn preset(name: &str) -> Option<Equation> {
    let equation = match name {
        "sin" => Equation::new("sin(x)", f64::sin).with_derivative(f64::cos),
        "cos" => Equation::new("cos(x)", f64::cos).with_derivative(|x| -x.sin()),
        "parabola" => Equation::new("x^2 - 2", |x| x * x - 2.0).with_derivative(|x| 2.0 * x),
        "cubic" => Equation::new("x^3 - x", |x| x * x * x - x).with_derivative(|x| 3.0 * x * x - 1.0),
        "hyperbola" => Equation::new("1/x", |x| 1.0 / x).with_derivative(|x| -1.0 / (x * x)),
        "tan" => Equation::new("tan(x)", f64::tan).with_derivative(|x| {
            let c = x.cos();
            1.0 / (c * c)
        }),
        // NaN below zero, exercising undefined samples.
        "sqrt" => Equation::new("sqrt(x)", f64::sqrt).with_derivative(|x| 0.5 / x.sqrt()),
        _ => return None,
    };
    Some(equation)
}
