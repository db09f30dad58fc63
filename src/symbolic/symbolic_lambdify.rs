//! LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions
//!
//! Turns an `Expr` tree into a boxed Rust closure once, so it can be called
//! thousands of times while sampling a plot without re-walking the tree.
//! `eval_expression` is the one-shot alternative for single evaluations.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use std::f64::consts::PI;

impl Expr {
    /// Compiles the expression into a closure over an ordered variable list.
    ///
    /// Variable positions are resolved against `vars` while the closure is
    /// built; evaluation itself is pure slice indexing and arithmetic.
    ///
    /// # Panics
    /// If the expression mentions a variable that is not listed in `vars`.
    pub fn lambdify(&self, vars: &[&str]) -> Box<dyn Fn(&[f64]) -> f64 + Send + Sync> {
        match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|&v| v == name).unwrap_or_else(|| {
                    panic!(
                        "variable '{}' is not among the lambdify arguments {:?}",
                        name, vars
                    )
                });
                Box::new(move |args| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(base, exp) => {
                let bf = base.lambdify(vars);
                let ef = exp.lambdify(vars);
                Box::new(move |args| bf(args).powf(ef(args)))
            }
            Expr::Exp(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).ln())
            }
            Expr::sin(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).cos())
            }
            Expr::tg(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).tan())
            }
            Expr::ctg(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| 1.0 / f(args).tan())
            }
            Expr::arcsin(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).asin())
            }
            Expr::arccos(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).acos())
            }
            Expr::arctg(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).atan())
            }
            Expr::arcctg(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| (PI / 2.0) - f(args).atan())
            }
        }
    } // end of lambdify

    /// Converts a single-variable expression into an executable closure.
    ///
    /// The variable is detected automatically. Constant expressions are
    /// accepted too and ignore their argument.
    ///
    /// # Panics
    /// If the expression contains more than one distinct variable.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2");
    /// let func = f.lambdify1D();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64> {
        let vars = self.all_arguments_are_variables();
        if vars.len() == 1 {
            let compiled = self.lambdify(&[vars[0].as_str()]);
            Box::new(move |x| compiled(&[x]))
        } else if vars.is_empty() {
            let compiled = self.lambdify(&[]);
            Box::new(move |_| compiled(&[]))
        } else {
            panic!(
                "lambdify1D can only be used with expressions containing exactly one variable, found: {:?}",
                vars
            );
        }
    } // end of lambdify1D

    /// Converts a two-variable expression into a closure of two arguments.
    ///
    /// The caller fixes the argument order by naming both variables, so
    /// z = f(x, y) keeps x and y straight regardless of alphabetical order.
    ///
    /// # Panics
    /// If the expression mentions a variable other than `var1` or `var2`.
    pub fn lambdify2D(&self, var1: &str, var2: &str) -> Box<dyn Fn(f64, f64) -> f64> {
        let compiled = self.lambdify(&[var1, var2]);
        Box::new(move |x, y| compiled(&[x, y]))
    }

    //___________________________________________________________________________________________________________________
    //                    DIRECT EXPRESSION EVALUATION
    // _________________________________________________________________________________________________________________

    /// Evaluates the expression recursively without building a closure.
    ///
    /// Cheaper than lambdification when a value is needed once.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching the values slice
    /// * `values` - Numerical value for each variable
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|&v| v == name).unwrap_or_else(|| {
                    panic!("variable '{}' has no value among {:?}", name, vars)
                });
                values[index]
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars, values) + rhs.eval_expression(vars, values)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars, values) - rhs.eval_expression(vars, values)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars, values) * rhs.eval_expression(vars, values)
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars, values) / rhs.eval_expression(vars, values)
            }
            Expr::Pow(base, exp) => base
                .eval_expression(vars, values)
                .powf(exp.eval_expression(vars, values)),
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values).tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values).asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values).acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values).atan(),
            Expr::arcctg(expr) => PI / 2.0 - expr.eval_expression(vars, values).atan(),
        }
    } // end of eval_expression

    //___________________________________________________________________________________________________________________
    //                    1D FUNCTION PROCESSING - Single Variable Functions y = f(x)
    // _________________________________________________________________________________________________________________

    /// Evaluates a 1D function over a vector of input values.
    ///
    /// The closure is compiled once and reused for every sample.
    pub fn calc_vector_lambdified1D(&self, xs: &[f64]) -> Vec<f64> {
        let f = self.lambdify1D();
        xs.iter().map(|x| f(*x)).collect()
    }

    /// Evaluates a 1D function over a linearly spaced domain.
    ///
    /// Convenience wrapper combining linspace generation with vectorized
    /// evaluation, used by the plotting front end.
    pub fn lambdify1D_from_linspace(&self, start: f64, end: f64, num_values: usize) -> Vec<f64> {
        let xs = linspace(start, end, num_values);
        self.calc_vector_lambdified1D(&xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify1d_square() {
        let f = Expr::parse_expression("x^2");
        let func = f.lambdify1D();
        assert_relative_eq!(func(3.0), 9.0, max_relative = 1e-12);
        assert_relative_eq!(func(-2.0), 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_lambdify1d_constant_expression() {
        let f = Expr::Const(7.0);
        let func = f.lambdify1D();
        assert_relative_eq!(func(123.0), 7.0, max_relative = 1e-12);
    }

    #[test]
    #[should_panic(expected = "exactly one variable")]
    fn test_lambdify1d_rejects_two_variables() {
        let f = Expr::parse_expression("x^2 + y^2");
        let _ = f.lambdify1D();
    }

    #[test]
    fn test_lambdify2d_respects_argument_order() {
        let f = Expr::parse_expression("x - 2*y");
        let func = f.lambdify2D("x", "y");
        assert_relative_eq!(func(5.0, 1.0), 3.0, max_relative = 1e-12);
        let swapped = f.lambdify2D("y", "x");
        assert_relative_eq!(swapped(5.0, 1.0), -9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_lambdify2d_ignores_missing_variable() {
        // a surface that only depends on x is still a valid f(x, y)
        let f = Expr::parse_expression("x^2");
        let func = f.lambdify2D("x", "y");
        assert_relative_eq!(func(4.0, 77.0), 16.0, max_relative = 1e-12);
    }

    #[test]
    #[should_panic(expected = "not among the lambdify arguments")]
    fn test_lambdify_unknown_variable_panics() {
        let f = Expr::parse_expression("x + z");
        let _ = f.lambdify(&["x", "y"]);
    }

    #[test]
    fn test_eval_expression_two_variables() {
        let f = Expr::parse_expression("x^2 + y^2 - 2*x - 4*y");
        assert_relative_eq!(
            f.eval_expression(&["x", "y"], &[1.0, 2.0]),
            -5.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_trig_and_inverse_trig_evaluation() {
        let cases = [
            ("sin(x)", 0.5_f64, 0.5_f64.sin()),
            ("cos(x)", 0.5, 0.5_f64.cos()),
            ("tg(x)", 0.5, 0.5_f64.tan()),
            ("ctg(x)", 0.5, 1.0 / 0.5_f64.tan()),
            ("arcsin(x)", 0.5, 0.5_f64.asin()),
            ("arccos(x)", 0.5, 0.5_f64.acos()),
            ("arctg(x)", 0.5, 0.5_f64.atan()),
            ("arcctg(x)", 0.5, PI / 2.0 - 0.5_f64.atan()),
        ];
        for (src, x, expected) in cases {
            let f = Expr::parse_expression(src).lambdify1D();
            assert_relative_eq!(f(x), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_calc_vector_lambdified1d() {
        let f = Expr::parse_expression("2*x + 1");
        let ys = f.calc_vector_lambdified1D(&[0.0, 1.0, 2.0]);
        assert_eq!(ys, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_lambdify1d_from_linspace() {
        let f = Expr::parse_expression("x^2");
        let ys = f.lambdify1D_from_linspace(0.0, 2.0, 5);
        assert_eq!(ys.len(), 5);
        assert_relative_eq!(ys[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ys[2], 1.0, max_relative = 1e-12);
        assert_relative_eq!(ys[4], 4.0, max_relative = 1e-12);
    }
}
