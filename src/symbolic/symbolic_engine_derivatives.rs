//! Analytical differentiation of symbolic expressions.
//!
//! Implements the textbook rules as a recursive walk over the expression
//! tree: linearity for sums, the product and quotient rules, the chain rule
//! for every nested function, and the three flavours of the power rule
//! (constant exponent, constant base, both sides variable). The result is a
//! raw derivative tree; callers normally pipe it through `simplify_` before
//! showing it to anyone.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Computes the analytical derivative with respect to `var`.
    ///
    /// Differentiation rules covered:
    /// - linearity: (f ± g)' = f' ± g'
    /// - product rule: (f*g)' = f'*g + f*g'
    /// - quotient rule: (f/g)' = (f'*g - g'*f) / g^2
    /// - power rule with constant exponent: (u^c)' = c*u^(c-1)*u'
    /// - exponential with constant base: (a^v)' = a^v * ln(a) * v'
    /// - general power: (u^v)' = u^v * (v'*ln(u) + v*u'/u)
    /// - chain rule through exp, ln and the trigonometric family
    ///
    /// Variables other than `var` are treated as constants, so the same
    /// method yields partial derivatives for two-variable expressions.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0));
    /// let df = f.diff("x").simplify_(); // 2 * x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => lhs.diff(var) + rhs.diff(var),
            Expr::Sub(lhs, rhs) => lhs.diff(var) - rhs.diff(var),
            Expr::Mul(lhs, rhs) => {
                let dl = lhs.diff(var);
                let dr = rhs.diff(var);
                dl * (**rhs).clone() + (**lhs).clone() * dr
            }
            Expr::Div(lhs, rhs) => {
                let dl = lhs.diff(var);
                let dr = rhs.diff(var);
                let numerator = dl * (**rhs).clone() - dr * (**lhs).clone();
                let denominator = (**rhs).clone() * (**rhs).clone();
                numerator / denominator
            }
            Expr::Pow(base, exp) => {
                let base_depends = base.contains_variable(var);
                let exp_depends = exp.contains_variable(var);
                if exp_depends && !base_depends {
                    // a^v: a^v * ln(a) * v'
                    Expr::Pow(base.clone(), exp.clone())
                        * Expr::Ln(base.clone())
                        * exp.diff(var)
                } else if base_depends && exp_depends {
                    // u^v: u^v * (v' * ln(u) + v * u' / u)
                    let inner = exp.diff(var) * Expr::Ln(base.clone())
                        + (**exp).clone() * base.diff(var) / (**base).clone();
                    Expr::Pow(base.clone(), exp.clone()) * inner
                } else {
                    // u^c: c * u^(c-1) * u'
                    let stepped_down =
                        Expr::Pow(base.clone(), ((**exp).clone() - Expr::Const(1.0)).boxed());
                    (**exp).clone() * stepped_down * base.diff(var)
                }
            }
            Expr::Exp(expr) => Expr::Exp(expr.clone()) * expr.diff(var),
            Expr::Ln(expr) => expr.diff(var) / (**expr).clone(),
            Expr::sin(expr) => Expr::cos(expr.clone()) * expr.diff(var),
            Expr::cos(expr) => Expr::Const(-1.0) * Expr::sin(expr.clone()) * expr.diff(var),
            Expr::tg(expr) => {
                let sec_squared = Expr::Const(1.0)
                    / Expr::cos(expr.clone()).pow(Expr::Const(2.0));
                sec_squared * expr.diff(var)
            }
            Expr::ctg(expr) => {
                let csc_squared = Expr::Const(-1.0)
                    / Expr::sin(expr.clone()).pow(Expr::Const(2.0));
                csc_squared * expr.diff(var)
            }
            Expr::arcsin(expr) => {
                let root = (Expr::Const(1.0)
                    - (**expr).clone().pow(Expr::Const(2.0)))
                .pow(Expr::Const(0.5));
                expr.diff(var) / root
            }
            Expr::arccos(expr) => {
                let root = (Expr::Const(1.0)
                    - (**expr).clone().pow(Expr::Const(2.0)))
                .pow(Expr::Const(0.5));
                Expr::Const(-1.0) * expr.diff(var) / root
            }
            Expr::arctg(expr) => {
                expr.diff(var)
                    / (Expr::Const(1.0) + (**expr).clone().pow(Expr::Const(2.0)))
            }
            Expr::arcctg(expr) => {
                Expr::Const(-1.0) * expr.diff(var)
                    / (Expr::Const(1.0) + (**expr).clone().pow(Expr::Const(2.0)))
            }
        }
    }

    /// Gradient: partial derivatives with respect to every variable in the
    /// expression, in the (sorted) order of `all_arguments_are_variables`.
    pub fn diff_multi(&self) -> Vec<Expr> {
        self.all_arguments_are_variables()
            .iter()
            .map(|var| self.diff(var).simplify_())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sampled_equal(lhs: &Expr, rhs: &Expr, points: &[f64]) {
        let f = lhs.lambdify1D();
        let g = rhs.lambdify1D();
        for &x in points {
            assert_relative_eq!(f(x), g(x), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_diff_constant_and_var() {
        assert_eq!(Expr::Const(5.0).diff("x"), Expr::Const(0.0));
        assert_eq!(Expr::Var("x".to_string()).diff("x"), Expr::Const(1.0));
        assert_eq!(Expr::Var("y".to_string()).diff("x"), Expr::Const(0.0));
    }

    #[test]
    fn test_diff_power_rule() {
        let x = Expr::Var("x".to_string());
        let f = x.pow(Expr::Const(3.0));
        let expected = Expr::parse_expression("3*x^2");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[-2.0, -0.5, 1.0, 4.0]);
    }

    #[test]
    fn test_diff_binomial_square() {
        // ((x - 3)^2)' = 2x - 6
        let f = Expr::parse_expression("(x - 3)^2");
        let expected = Expr::parse_expression("2*x - 6");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[-1.0, 0.0, 3.0, 10.0]);
    }

    #[test]
    fn test_diff_product_rule() {
        let f = Expr::parse_expression("x^2 * sin(x)");
        let expected = Expr::parse_expression("2*x*sin(x) + x^2*cos(x)");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[-1.3, 0.4, 2.0]);
    }

    #[test]
    fn test_diff_quotient_rule() {
        let f = Expr::parse_expression("x / (x + 1)");
        // 1 / (x + 1)^2
        let expected = Expr::parse_expression("1 / ((x + 1)^2)");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[0.0, 0.5, 3.0]);
    }

    #[test]
    fn test_diff_chain_rule_through_exp() {
        let f = Expr::parse_expression("exp(x^2)");
        let expected = Expr::parse_expression("2*x*exp(x^2)");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[-1.0, 0.3, 1.2]);
    }

    #[test]
    fn test_diff_ln() {
        let f = Expr::parse_expression("ln(x)");
        let expected = Expr::parse_expression("1/x");
        sampled_equal(&f.diff("x").simplify_(), &expected, &[0.1, 1.0, 7.0]);
    }

    #[test]
    fn test_diff_constant_base_exponential() {
        // (2^x)' = 2^x * ln(2)
        let f = Expr::parse_expression("2^x");
        let df = f.diff("x").simplify_().lambdify1D();
        for x in [-1.0, 0.0, 1.5] {
            assert_relative_eq!(
                df(x),
                2.0f64.powf(x) * 2.0f64.ln(),
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_diff_general_power() {
        // (x^x)' = x^x * (ln(x) + 1)
        let f = Expr::parse_expression("x^x");
        let df = f.diff("x").simplify_().lambdify1D();
        for x in [0.5, 1.0, 2.0] {
            assert_relative_eq!(
                df(x),
                x.powf(x) * (x.ln() + 1.0),
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_diff_trig_family() {
        let f = Expr::parse_expression("sin(x)");
        sampled_equal(
            &f.diff("x").simplify_(),
            &Expr::parse_expression("cos(x)"),
            &[-1.0, 0.0, 1.0],
        );
        let g = Expr::parse_expression("cos(x)");
        let dg = g.diff("x").simplify_().lambdify1D();
        assert_relative_eq!(dg(0.5), -(0.5f64.sin()), max_relative = 1e-12);
    }

    #[test]
    fn test_partial_derivatives() {
        let f = Expr::parse_expression("x^2 + y^2 - 2*x - 4*y");
        let fx = f.diff("x").simplify_();
        let fy = f.diff("y").simplify_();
        assert_relative_eq!(
            fx.eval_expression(&["x", "y"], &[3.0, 0.0]),
            4.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            fy.eval_expression(&["x", "y"], &[0.0, 3.0]),
            2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_diff_multi_orders_by_sorted_vars() {
        let f = Expr::parse_expression("x*y");
        let grads = f.diff_multi();
        assert_eq!(grads.len(), 2);
        // d/dx = y, d/dy = x
        assert_eq!(grads[0], Expr::Var("y".to_string()));
        assert_eq!(grads[1], Expr::Var("x".to_string()));
    }
}
