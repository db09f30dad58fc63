//! # Symbolic Engine Module
//!
//! Core expression type for the RustedCalc crate. A mathematical formula is
//! stored as a recursive tree of `Expr` nodes: named variables, numerical
//! constants, the four arithmetic operations, powers, and the analytic
//! functions needed for classroom calculus (exp, ln and the trigonometric
//! family with their inverses).
//!
//! What lives here:
//! - the `Expr` enum itself and its `Display` rendering
//! - `std::ops` overloads so expressions can be written as `x + y * z`
//! - constructors (`Symbols`, `pow`, `exp`, `ln`, ...)
//! - variable bookkeeping: substitution, renaming to constants,
//!   `all_arguments_are_variables`
//!
//! Differentiation, simplification, lambdification, parsing and equation
//! solving are implemented in the sibling modules of `symbolic`, all as
//! methods on `Expr`.
//!
//! Function names follow mathematical notation (tg, ctg, arctg) rather than
//! programming convention (tan, cot, atan), hence the crate-level
//! `allow(non_camel_case_types)`.

#![allow(non_camel_case_types)]

use std::collections::HashMap;
use std::fmt;

/// Symbolic expression tree. `Box<Expr>` in every compound variant keeps the
/// type finite while allowing arbitrarily deep formulas.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Named symbolic variable, e.g. "x" or "y"
    Var(String),
    /// Numerical constant
    Const(f64),
    /// left + right
    Add(Box<Expr>, Box<Expr>),
    /// left - right
    Sub(Box<Expr>, Box<Expr>),
    /// left * right
    Mul(Box<Expr>, Box<Expr>),
    /// left / right
    Div(Box<Expr>, Box<Expr>),
    /// base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// e^x
    Exp(Box<Expr>),
    /// natural logarithm
    Ln(Box<Expr>),
    /// sine
    sin(Box<Expr>),
    /// cosine
    cos(Box<Expr>),
    /// tangent (mathematical notation 'tg')
    tg(Box<Expr>),
    /// cotangent (mathematical notation 'ctg')
    ctg(Box<Expr>),
    /// inverse sine
    arcsin(Box<Expr>),
    /// inverse cosine
    arccos(Box<Expr>),
    /// inverse tangent (mathematical notation 'arctg')
    arctg(Box<Expr>),
    /// inverse cotangent (mathematical notation 'arcctg')
    arcctg(Box<Expr>),
}

/// Pretty printing in parenthesized infix notation, suitable for chart
/// captions and log lines.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Creates symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y");
    /// assert_eq!(vars.len(), 2);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Wraps the expression in a `Box` for building compound variants.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// e^(self)
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// ln(self)
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// self^rhs
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// true if the expression is exactly the constant 0.0
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Returns the numerical value if the expression is a plain constant.
    ///
    /// Symbolic trees (even ones that would fold to a number) return `None`;
    /// run `simplify_` first when that matters.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Replaces every occurrence of a variable with another expression.
    pub fn substitute_variable(&self, var: &str, replacement: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => replacement.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.substitute_variable(var, replacement)),
                Box::new(exp.substitute_variable(var, replacement)),
            ),
            Expr::Exp(expr) => Expr::Exp(Box::new(expr.substitute_variable(var, replacement))),
            Expr::Ln(expr) => Expr::Ln(Box::new(expr.substitute_variable(var, replacement))),
            Expr::sin(expr) => Expr::sin(Box::new(expr.substitute_variable(var, replacement))),
            Expr::cos(expr) => Expr::cos(Box::new(expr.substitute_variable(var, replacement))),
            Expr::tg(expr) => Expr::tg(Box::new(expr.substitute_variable(var, replacement))),
            Expr::ctg(expr) => Expr::ctg(Box::new(expr.substitute_variable(var, replacement))),
            Expr::arcsin(expr) => {
                Expr::arcsin(Box::new(expr.substitute_variable(var, replacement)))
            }
            Expr::arccos(expr) => {
                Expr::arccos(Box::new(expr.substitute_variable(var, replacement)))
            }
            Expr::arctg(expr) => Expr::arctg(Box::new(expr.substitute_variable(var, replacement))),
            Expr::arcctg(expr) => {
                Expr::arcctg(Box::new(expr.substitute_variable(var, replacement)))
            }
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Substitutes several variables at once; variables absent from the map
    /// are left untouched.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, f64>) -> Expr {
        var_map.iter().fold(self.clone(), |expr, (var, value)| {
            expr.set_variable(var, *value)
        })
    }

    /// true if the given variable occurs anywhere in the expression
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// Collects every variable name used in the expression, sorted and
    /// deduplicated.
    ///
    /// The arity checks in lambdification and the axis setup of the 3D
    /// plotter rely on this.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.collect_variables(vars),
        }
    }
}
