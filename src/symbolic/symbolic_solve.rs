//! SYMBOLIC SOLVING - Critical Points of Algebraic Functions
//!
//! The derivative of the studied function is brought into polynomial form in
//! the target variable and solved in closed form: linear and quadratic
//! equations symbolically (numeric coefficients collapse to numbers, free
//! parameters stay symbolic), cubics numerically through Cardano's formula
//! over `Complex64`. Anything outside that, variable under a function, in a
//! denominator or at degree four and above, is reported as a `SolveError`
//! instead of guessing with a numeric fallback.

use crate::symbolic::symbolic_engine::Expr;
use chrono::Local;
use itertools::Itertools;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::collections::HashMap;
use std::fs::File;
use thiserror::Error;

/// roots with |Im| below this (relative to the magnitude) count as real
const REAL_ROOT_TOL: f64 = 1e-9;
/// real roots closer than this (relative) collapse into one
const ROOT_DEDUP_TOL: f64 = 1e-8;

/// Why solving an equation in closed form failed.
#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    /// the equation is not a polynomial in the target variable
    #[error("equation is not polynomial in '{var}': {reason}")]
    NotPolynomial { var: String, reason: String },
    /// polynomial degree without a closed-form branch
    #[error("no closed-form solution implemented for degree {0}")]
    DegreeTooHigh(usize),
    /// cubics are only solved with numeric coefficients
    #[error("degree {degree} equation keeps symbolic coefficients, closed form not emitted")]
    SymbolicCoefficients { degree: usize },
    #[error("gradient is not a linear system in the surface variables")]
    NotLinearSystem,
    #[error("stationary-point system is degenerate, no unique solution")]
    DegenerateSystem,
}

impl Expr {
    /// Collects the expression as polynomial coefficients in `var`.
    ///
    /// The expression is expanded into a sum of products first. The result
    /// vector is indexed by degree (`coeffs[k]` multiplies `var^k`), has no
    /// trailing zero entries and always holds at least the constant term.
    /// Coefficients may stay symbolic in other variables.
    pub fn polynomial_coefficients(&self, var: &str) -> Result<Vec<Expr>, SolveError> {
        let expanded = self.expand().simplify_();
        let mut terms = Vec::new();
        collect_additive_terms(&expanded, 1.0, &mut terms);

        let mut coeffs: Vec<Expr> = Vec::new();
        for (sign, term) in terms {
            let (degree, coeff) = split_power_factor(&term, var)?;
            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, Expr::Const(0.0));
            }
            let signed = if sign < 0.0 {
                Expr::Const(-1.0) * coeff
            } else {
                coeff
            };
            coeffs[degree] = (coeffs[degree].clone() + signed).simplify_();
        }
        while coeffs.len() > 1 && coeffs.last().map(|c| c.is_zero()).unwrap_or(false) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(Expr::Const(0.0));
        }
        Ok(coeffs)
    }

    /// Solves `self = 0` for `var` in closed form.
    ///
    /// Returns every real solution found, numeric roots sorted ascending.
    /// A constant equation gives an empty set, both for `0 = 0` (every
    /// point solves it, none is singled out) and for `c = 0` with c != 0.
    /// A quadratic with a negative discriminant logs its complex pair via
    /// `warn!` and also comes back empty.
    pub fn solve(&self, var: &str) -> Result<Vec<Expr>, SolveError> {
        let coeffs = self.polynomial_coefficients(var)?;
        let degree = coeffs.len() - 1;
        match degree {
            0 => Ok(Vec::new()),
            1 => Ok(solve_linear(&coeffs)),
            2 => Ok(solve_quadratic(&coeffs)),
            3 => solve_cubic(&coeffs),
            higher => Err(SolveError::DegreeTooHigh(higher)),
        }
    }
}

/// Flattens nested Add/Sub into signed top-level terms.
fn collect_additive_terms(expr: &Expr, sign: f64, out: &mut Vec<(f64, Expr)>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            collect_additive_terms(lhs, sign, out);
            collect_additive_terms(rhs, sign, out);
        }
        Expr::Sub(lhs, rhs) => {
            collect_additive_terms(lhs, sign, out);
            collect_additive_terms(rhs, -sign, out);
        }
        other => out.push((sign, other.clone())),
    }
}

/// Splits one product term into (degree in `var`, var-free coefficient).
fn split_power_factor(term: &Expr, var: &str) -> Result<(usize, Expr), SolveError> {
    match term {
        Expr::Var(name) if name == var => Ok((1, Expr::Const(1.0))),
        Expr::Pow(base, exp) => match (base.as_ref(), exp.as_ref()) {
            (Expr::Var(name), Expr::Const(power)) if name == var => {
                if power.fract() == 0.0 && *power >= 0.0 {
                    Ok((*power as usize, Expr::Const(1.0)))
                } else {
                    Err(SolveError::NotPolynomial {
                        var: var.to_string(),
                        reason: format!("'{}' is raised to the power {}", var, power),
                    })
                }
            }
            _ if term.contains_variable(var) => Err(SolveError::NotPolynomial {
                var: var.to_string(),
                reason: format!("'{}' appears inside a non-polynomial power", var),
            }),
            _ => Ok((0, term.clone())),
        },
        Expr::Mul(lhs, rhs) => {
            let (left_degree, left_coeff) = split_power_factor(lhs, var)?;
            let (right_degree, right_coeff) = split_power_factor(rhs, var)?;
            Ok((
                left_degree + right_degree,
                (left_coeff * right_coeff).simplify_(),
            ))
        }
        Expr::Div(lhs, rhs) => {
            if rhs.contains_variable(var) {
                Err(SolveError::NotPolynomial {
                    var: var.to_string(),
                    reason: format!("'{}' appears in a denominator", var),
                })
            } else {
                let (degree, coeff) = split_power_factor(lhs, var)?;
                Ok((degree, (coeff / rhs.as_ref().clone()).simplify_()))
            }
        }
        other => {
            if other.contains_variable(var) {
                Err(SolveError::NotPolynomial {
                    var: var.to_string(),
                    reason: format!("'{}' appears under a non-polynomial function", var),
                })
            } else {
                Ok((0, other.clone()))
            }
        }
    }
}

// coeffs[0] + coeffs[1] * x = 0
fn solve_linear(coeffs: &[Expr]) -> Vec<Expr> {
    let root = (Expr::Const(-1.0) * coeffs[0].clone() / coeffs[1].clone()).simplify_();
    vec![root]
}

// coeffs[0] + coeffs[1] * x + coeffs[2] * x^2 = 0
fn solve_quadratic(coeffs: &[Expr]) -> Vec<Expr> {
    let (c, b, a) = (&coeffs[0], &coeffs[1], &coeffs[2]);
    if let (Some(a_num), Some(b_num), Some(c_num)) = (a.as_const(), b.as_const(), c.as_const()) {
        let discriminant = b_num * b_num - 4.0 * a_num * c_num;
        if discriminant > 0.0 {
            let sqrt_d = discriminant.sqrt();
            let mut roots = [
                (-b_num - sqrt_d) / (2.0 * a_num),
                (-b_num + sqrt_d) / (2.0 * a_num),
            ];
            roots.sort_by(|l, r| l.total_cmp(r));
            roots.iter().map(|r| Expr::Const(*r)).collect()
        } else if discriminant == 0.0 {
            vec![Expr::Const(-b_num / (2.0 * a_num))]
        } else {
            let re = -b_num / (2.0 * a_num);
            let im = (-discriminant).sqrt() / (2.0 * a_num);
            let pair = (Complex64::new(re, -im), Complex64::new(re, im));
            warn!(
                "quadratic roots form a complex conjugate pair: {} and {}; no real critical points",
                pair.0, pair.1
            );
            Vec::new()
        }
    } else {
        // radical closed form (-b +- (b^2 - 4ac)^0.5) / (2a)
        let discriminant =
            (b.clone() * b.clone() - Expr::Const(4.0) * a.clone() * c.clone()).simplify_();
        let sqrt_disc = discriminant.pow(Expr::Const(0.5));
        let two_a = (Expr::Const(2.0) * a.clone()).simplify_();
        let minus_b = (Expr::Const(-1.0) * b.clone()).simplify_();
        let first = ((minus_b.clone() - sqrt_disc.clone()) / two_a.clone()).simplify_();
        let second = ((minus_b + sqrt_disc) / two_a).simplify_();
        vec![first, second]
    }
}

// coeffs[0] + coeffs[1] * x + coeffs[2] * x^2 + coeffs[3] * x^3 = 0
fn solve_cubic(coeffs: &[Expr]) -> Result<Vec<Expr>, SolveError> {
    let numeric: Option<Vec<f64>> = coeffs.iter().map(|c| c.as_const()).collect();
    let numeric = match numeric {
        Some(values) => values,
        None => return Err(SolveError::SymbolicCoefficients { degree: 3 }),
    };
    let roots = cubic_real_roots(numeric[3], numeric[2], numeric[1], numeric[0]);
    Ok(roots.into_iter().map(Expr::Const).collect())
}

/// Real roots of a*x^3 + b*x^2 + c*x + d = 0, sorted ascending.
///
/// Cardano over the depressed cubic t^3 + p*t + q (x = t - b/(3a)): take
/// u as a cube root of -q/2 + sqrt(q^2/4 + p^3/27), then the three roots
/// are u*w^k - p/(3*u*w^k) with w the primitive cube root of unity. All
/// arithmetic runs in `Complex64`; roots with a vanishing imaginary part
/// are kept and near-coincident roots merged.
fn cubic_real_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let shift = -b / (3.0 * a);
    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    let q = (2.0 * b.powi(3) - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a.powi(3));

    let sqrt_disc = Complex64::new(q * q / 4.0 + p.powi(3) / 27.0, 0.0).sqrt();
    let minus_half_q = Complex64::new(-q / 2.0, 0.0);
    let mut u = (minus_half_q + sqrt_disc).cbrt();
    if u.norm() < 1e-14 {
        // the other branch, unless p = q = 0 and the root is triple
        u = (minus_half_q - sqrt_disc).cbrt();
    }

    let omega = Complex64::new(-0.5, 3.0_f64.sqrt() / 2.0);
    let p_complex = Complex64::new(p, 0.0);
    let mut real_roots = Vec::new();
    let mut rotation = Complex64::new(1.0, 0.0);
    for _ in 0..3 {
        let uw = u * rotation;
        let t = if uw.norm() < 1e-14 {
            uw
        } else {
            uw - p_complex / (uw * 3.0)
        };
        let x = t + shift;
        if x.im.abs() <= REAL_ROOT_TOL * (1.0 + x.re.abs()) {
            real_roots.push(x.re);
        }
        rotation *= omega;
    }
    real_roots.sort_by(|l, r| l.total_cmp(r));
    real_roots.dedup_by(|l, r| (*l - *r).abs() <= ROOT_DEDUP_TOL * (1.0 + r.abs()));
    real_roots
}

/// Differentiates the expression and solves derivative = 0 for `variable`.
///
/// Returns the simplified derivative together with all critical points the
/// closed-form solver finds. The solver's own failure and empty-result
/// behavior passes through unchanged.
pub fn solve_critical_points(
    expression: &Expr,
    variable: &str,
) -> Result<(Expr, Vec<Expr>), SolveError> {
    let derivative = expression.diff(variable).simplify_();
    info!("d/d{} [{}] = {}", variable, expression, derivative);
    let critical_points = derivative.solve(variable)?;
    info!(
        "critical points of {}: [{}]",
        expression,
        critical_points.iter().join(", ")
    );
    Ok((derivative, critical_points))
}

/// Wrapper around [`solve_critical_points`] that wires up logging first.
///
/// `loglevel` accepts "debug", "info", "warn" or "error"; "off" or "none"
/// skips logger setup entirely. With `save_log` the output is duplicated
/// into a timestamped `log_*.txt` next to the binary.
pub fn solve_critical_points_logged(
    expression: &Expr,
    variable: &str,
    loglevel: Option<String>,
    save_log: bool,
) -> Result<(Expr, Vec<Expr>), SolveError> {
    let is_logging_disabled = loglevel
        .as_ref()
        .map(|level| level == "off" || level == "none")
        .unwrap_or(false);

    if is_logging_disabled {
        solve_critical_points(expression, variable)
    } else {
        let log_option = if let Some(level) = loglevel {
            match level.as_str() {
                "debug" => LevelFilter::Info,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                _ => panic!("loglevel must be debug, info, warn or error"),
            }
        } else {
            LevelFilter::Info
        };
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            log_option,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if save_log {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            let name = format!("log_{}.txt", date_and_time);
            loggers.push(WriteLogger::new(
                log_option,
                Config::default(),
                File::create(name).unwrap(),
            ));
        }
        match CombinedLogger::init(loggers) {
            Ok(()) => {
                info!(" \n \n critical point search started");
                let res = solve_critical_points(expression, variable);
                info!(" \n \n critical point search ended");
                res
            }
            Err(_) => solve_critical_points(expression, variable),
        }
    }
}

/// Stationary point of a two-variable function with a linear gradient.
///
/// Both partial derivatives must be linear in (`var1`, `var2`) with numeric
/// coefficients; the resulting 2x2 system is solved by LU decomposition.
/// The returned map feeds the 3D plotting front end directly.
pub fn solve_stationary_2d(
    f: &Expr,
    var1: &str,
    var2: &str,
) -> Result<HashMap<String, f64>, SolveError> {
    let vars = [var1, var2];
    let gradient: Vec<Expr> = vars.iter().map(|v| f.diff(v).simplify_()).collect();
    let zero_map: HashMap<String, f64> = vars.iter().map(|v| (v.to_string(), 0.0)).collect();

    let mut a = DMatrix::zeros(2, 2);
    let mut b = DVector::zeros(2);
    for (i, grad_i) in gradient.iter().enumerate() {
        for (j, var_j) in vars.iter().enumerate() {
            let coeff = grad_i.diff(var_j).simplify_();
            match coeff.as_const() {
                Some(value) => a[(i, j)] = value,
                None => return Err(SolveError::NotLinearSystem),
            }
        }
        let intercept = grad_i.set_variable_from_map(&zero_map).simplify_();
        match intercept.as_const() {
            Some(value) => b[i] = -value,
            None => return Err(SolveError::NotLinearSystem),
        }
    }
    info!("stationary linear system: A = {} b = {}", a, b);

    let solution = a.lu().solve(&b).ok_or(SolveError::DegenerateSystem)?;
    let mut point = HashMap::new();
    point.insert(var1.to_string(), solution[0]);
    point.insert(var2.to_string(), solution[1]);
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn numeric_roots(roots: &[Expr]) -> Vec<f64> {
        roots.iter().map(|r| r.as_const().unwrap()).collect()
    }

    #[test]
    fn test_critical_point_of_shifted_square() {
        let f = Expr::parse_expression("(x - 3)^2");
        let (derivative, points) = solve_critical_points(&f, "x").unwrap();
        // derivative is algebraically 2x - 6
        let expected = Expr::parse_expression("2*x - 6").lambdify1D();
        let actual = derivative.lambdify1D();
        for x in [-1.0, 0.0, 3.0, 10.0] {
            assert_relative_eq!(actual(x), expected(x), max_relative = 1e-10);
        }
        assert_eq!(points, vec![Expr::Const(3.0)]);
    }

    #[test]
    fn test_convex_quadratic_critical_point_is_minimum() {
        let f = Expr::parse_expression("x^2 - 4*x + 7");
        let (_, points) = solve_critical_points(&f, "x").unwrap();
        let root = points[0].as_const().unwrap();
        assert_relative_eq!(root, 2.0, max_relative = 1e-12);
        let func = f.lambdify1D();
        for offset in [-2.0, -0.5, 0.5, 2.0] {
            assert!(func(root + offset) > func(root));
        }
    }

    #[test]
    fn test_polynomial_coefficients_collect_across_terms() {
        let f = Expr::parse_expression("x^2 + 2*x + 1 + x^2");
        let coeffs = f.polynomial_coefficients("x").unwrap();
        assert_eq!(coeffs.len(), 3);
        let values: Vec<f64> = coeffs.iter().map(|c| c.as_const().unwrap()).collect();
        assert_eq!(values, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_constant_equations_have_empty_solution_set() {
        // 0 = 0 is a tautology, 5 = 0 a contradiction; neither yields points
        assert_eq!(Expr::Const(0.0).solve("x").unwrap(), Vec::<Expr>::new());
        assert_eq!(Expr::Const(5.0).solve("x").unwrap(), Vec::<Expr>::new());
    }

    #[test]
    fn test_solve_linear_parametric_root() {
        let equation = Expr::parse_expression("2*x - 2*a");
        let roots = equation.solve("x").unwrap();
        assert_eq!(roots, vec![Expr::Var("a".to_string())]);
    }

    #[test]
    fn test_solve_quadratic_two_roots_sorted() {
        let equation = Expr::parse_expression("x^2 - 1");
        let roots = numeric_roots(&equation.solve("x").unwrap());
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -1.0, max_relative = 1e-12);
        assert_relative_eq!(roots[1], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_solve_quadratic_double_root() {
        let equation = Expr::parse_expression("x^2 - 2*x + 1");
        let roots = numeric_roots(&equation.solve("x").unwrap());
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_solve_quadratic_complex_pair_is_empty() {
        let equation = Expr::parse_expression("x^2 + 1");
        assert_eq!(equation.solve("x").unwrap(), Vec::<Expr>::new());
    }

    #[test]
    fn test_solve_symbolic_quadratic_radical_form() {
        let equation = Expr::parse_expression("a*x^2 + b*x + c");
        let roots = equation.solve("x").unwrap();
        assert_eq!(roots.len(), 2);
        // at a=1, b=0, c=-4 the radicals evaluate to -2 and +2
        let vars = ["a", "b", "c"];
        let values = [1.0, 0.0, -4.0];
        assert_relative_eq!(
            roots[0].eval_expression(&vars, &values),
            -2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            roots[1].eval_expression(&vars, &values),
            2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_solve_cubic_three_rational_roots() {
        let equation = Expr::parse_expression("x^3 - 6*x^2 + 11*x - 6");
        let roots = numeric_roots(&equation.solve("x").unwrap());
        assert_eq!(roots.len(), 3);
        assert_relative_eq!(roots[0], 1.0, max_relative = 1e-8);
        assert_relative_eq!(roots[1], 2.0, max_relative = 1e-8);
        assert_relative_eq!(roots[2], 3.0, max_relative = 1e-8);
    }

    #[test]
    fn test_solve_cubic_single_real_root() {
        let equation = Expr::parse_expression("x^3 + x");
        let roots = numeric_roots(&equation.solve("x").unwrap());
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_cubic_triple_root_collapses() {
        let equation = Expr::parse_expression("x^3");
        let roots = numeric_roots(&equation.solve("x").unwrap());
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_symbolic_cubic_is_rejected() {
        let equation = Expr::parse_expression("a*x^3 - 1");
        assert_eq!(
            equation.solve("x"),
            Err(SolveError::SymbolicCoefficients { degree: 3 })
        );
    }

    #[test]
    fn test_solve_quartic_is_rejected() {
        let equation = Expr::parse_expression("x^4 - 1");
        assert_eq!(equation.solve("x"), Err(SolveError::DegreeTooHigh(4)));
    }

    #[test]
    fn test_solve_rejects_trigonometric_equation() {
        let equation = Expr::parse_expression("sin(x)");
        assert!(matches!(
            equation.solve("x"),
            Err(SolveError::NotPolynomial { .. })
        ));
    }

    #[test]
    fn test_solve_rejects_variable_in_denominator() {
        let equation = Expr::parse_expression("1 / x + 2");
        assert!(matches!(
            equation.solve("x"),
            Err(SolveError::NotPolynomial { .. })
        ));
    }

    #[test]
    fn test_linear_function_has_no_critical_points() {
        let f = Expr::parse_expression("5*x + 1");
        let (derivative, points) = solve_critical_points(&f, "x").unwrap();
        assert_eq!(derivative, Expr::Const(5.0));
        assert!(points.is_empty());
    }

    #[test]
    fn test_logged_entry_with_logging_off_matches_plain_call() {
        let f = Expr::parse_expression("(x - 3)^2");
        let logged =
            solve_critical_points_logged(&f, "x", Some("off".to_string()), false).unwrap();
        let plain = solve_critical_points(&f, "x").unwrap();
        assert_eq!(logged, plain);
    }

    #[test]
    #[should_panic(expected = "loglevel must be debug, info, warn or error")]
    fn test_logged_entry_rejects_unknown_loglevel() {
        let f = Expr::parse_expression("x^2");
        let _ = solve_critical_points_logged(&f, "x", Some("verbose".to_string()), false);
    }

    #[test]
    fn test_stationary_point_of_quadratic_bowl() {
        let f = Expr::parse_expression("x^2 + y^2 - 2*x - 4*y");
        let point = solve_stationary_2d(&f, "x", "y").unwrap();
        assert_relative_eq!(point["x"], 1.0, max_relative = 1e-12);
        assert_relative_eq!(point["y"], 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_stationary_rejects_nonlinear_gradient() {
        let f = Expr::parse_expression("x^4 + y^2");
        assert_eq!(
            solve_stationary_2d(&f, "x", "y"),
            Err(SolveError::NotLinearSystem)
        );
    }

    #[test]
    fn test_stationary_rejects_degenerate_system() {
        let f = Expr::parse_expression("(x + y)^2");
        assert_eq!(
            solve_stationary_2d(&f, "x", "y"),
            Err(SolveError::DegenerateSystem)
        );
    }
}
