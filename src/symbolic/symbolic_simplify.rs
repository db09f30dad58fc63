//! Algebraic simplification and polynomial expansion.
//!
//! `simplify_` performs one bottom-up sweep over the tree: constant folding
//! plus the classic identity rules (x + 0, x * 1, x * 0, x - x, x / x,
//! power collapsing, gathering of nested constant factors). `simplify`
//! re-runs the sweep until the tree stops changing, since one rule often
//! uncovers another.
//!
//! `expand` rewrites products of sums into sums of products and unrolls
//! small integer powers of sums. The critical-point solver relies on it to
//! bring derivatives into a flat polynomial form before collecting
//! coefficients.

use crate::symbolic::symbolic_engine::Expr;

/// Integer powers of sums larger than this are left unexpanded.
const MAX_EXPAND_POWER: f64 = 32.0;

/// Fixpoint guard for `simplify`.
const MAX_SIMPLIFY_SWEEPS: usize = 16;

impl Expr {
    /// One bottom-up simplification sweep.
    ///
    /// Children are simplified first, then the node itself is rewritten if a
    /// rule applies. Constants fold eagerly; the analytic functions only fold
    /// at their textbook special points (exp(0), ln(1), sin(0), ...) and stay
    /// symbolic everywhere else.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(0.0), _) => rhs,
                    (_, Expr::Const(0.0)) => lhs,
                    _ => Expr::Add(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(0.0)) => lhs,
                    (Expr::Const(0.0), _) => Expr::Const(-1.0) * rhs,
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ => Expr::Sub(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(0.0), _) | (_, Expr::Const(0.0)) => Expr::Const(0.0),
                    (Expr::Const(1.0), _) => rhs,
                    (_, Expr::Const(1.0)) => lhs,
                    // gather nested constant factors: a * (b * e) = (a*b) * e
                    (Expr::Const(a), Expr::Mul(inner_lhs, inner_rhs)) => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(b), _) => {
                                Expr::Mul(Box::new(Expr::Const(a * b)), inner_rhs.clone())
                                    .simplify_()
                            }
                            (_, Expr::Const(b)) => {
                                Expr::Mul(Box::new(Expr::Const(a * b)), inner_lhs.clone())
                                    .simplify_()
                            }
                            _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(a)) => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(b), _) => {
                                Expr::Mul(Box::new(Expr::Const(a * b)), inner_rhs.clone())
                                    .simplify_()
                            }
                            (_, Expr::Const(b)) => {
                                Expr::Mul(Box::new(Expr::Const(a * b)), inner_lhs.clone())
                                    .simplify_()
                            }
                            _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    (Expr::Var(v1), Expr::Var(v2)) if v1 == v2 => {
                        Expr::Pow(Box::new(lhs.clone()), Box::new(Expr::Const(2.0)))
                    }
                    _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(0.0), _) => Expr::Const(0.0),
                    (_, Expr::Const(1.0)) => lhs,
                    _ if lhs == rhs => Expr::Const(1.0),
                    // (c1 * e) / c2 = (c1/c2) * e
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(c)) if *c != 0.0 => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(c1), _) => {
                                Expr::Mul(Box::new(Expr::Const(c1 / c)), inner_rhs.clone())
                                    .simplify_()
                            }
                            (_, Expr::Const(c1)) => {
                                Expr::Mul(Box::new(Expr::Const(c1 / c)), inner_lhs.clone())
                                    .simplify_()
                            }
                            _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify_();
                let exp = exp.simplify_();
                match (&base, &exp) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.powf(*b)),
                    (_, Expr::Const(0.0)) => Expr::Const(1.0),
                    (_, Expr::Const(1.0)) => base,
                    (Expr::Const(0.0), _) => Expr::Const(0.0),
                    (Expr::Const(1.0), _) => Expr::Const(1.0),
                    // (x^a)^b = x^(a*b)
                    (Expr::Pow(inner_base, inner_exp), _) => {
                        let merged = Expr::Mul(inner_exp.clone(), Box::new(exp)).simplify_();
                        Expr::Pow(inner_base.clone(), Box::new(merged))
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            Expr::Exp(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    _ => Expr::Exp(Box::new(expr)),
                }
            }
            Expr::Ln(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    _ => Expr::Ln(Box::new(expr)),
                }
            }
            Expr::sin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::sin(Box::new(expr)),
                }
            }
            Expr::cos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    _ => Expr::cos(Box::new(expr)),
                }
            }
            Expr::tg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::tg(Box::new(expr)),
                }
            }
            Expr::ctg(expr) => Expr::ctg(Box::new(expr.simplify_())),
            Expr::arcsin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arcsin(Box::new(expr)),
                }
            }
            Expr::arccos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    _ => Expr::arccos(Box::new(expr)),
                }
            }
            Expr::arctg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arctg(Box::new(expr)),
                }
            }
            Expr::arcctg(expr) => Expr::arcctg(Box::new(expr.simplify_())),
        }
    }

    /// Repeats `simplify_` until the expression stops changing.
    pub fn simplify(&self) -> Expr {
        let mut current = self.simplify_();
        for _ in 0..MAX_SIMPLIFY_SWEEPS {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Rewrites the expression as a sum of products.
    ///
    /// Distributes multiplication over addition and subtraction, pushes
    /// division by a var-free denominator into each term of a sum, and
    /// unrolls `(sum)^n` for small non-negative integer n by repeated
    /// multiplication. Anything that cannot be expanded (fractional powers,
    /// functions) is kept in place with expanded children.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.expand()), Box::new(rhs.expand())),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.expand()), Box::new(rhs.expand())),
            Expr::Mul(lhs, rhs) => distribute_product(&lhs.expand(), &rhs.expand()),
            Expr::Div(lhs, rhs) => distribute_quotient(&lhs.expand(), &rhs.expand()),
            Expr::Pow(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();
                match &exp {
                    Expr::Const(n)
                        if n.fract() == 0.0 && *n >= 0.0 && *n <= MAX_EXPAND_POWER =>
                    {
                        let n = *n as usize;
                        match n {
                            0 => Expr::Const(1.0),
                            1 => base,
                            _ => {
                                let mut product = base.clone();
                                for _ in 1..n {
                                    product = distribute_product(&product, &base);
                                }
                                product
                            }
                        }
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            Expr::Exp(expr) => Expr::Exp(Box::new(expr.expand())),
            Expr::Ln(expr) => Expr::Ln(Box::new(expr.expand())),
            Expr::sin(expr) => Expr::sin(Box::new(expr.expand())),
            Expr::cos(expr) => Expr::cos(Box::new(expr.expand())),
            Expr::tg(expr) => Expr::tg(Box::new(expr.expand())),
            Expr::ctg(expr) => Expr::ctg(Box::new(expr.expand())),
            Expr::arcsin(expr) => Expr::arcsin(Box::new(expr.expand())),
            Expr::arccos(expr) => Expr::arccos(Box::new(expr.expand())),
            Expr::arctg(expr) => Expr::arctg(Box::new(expr.expand())),
            Expr::arcctg(expr) => Expr::arcctg(Box::new(expr.expand())),
        }
    }
}

/// l * r with multiplication distributed over any top-level Add/Sub on
/// either side, recursively.
fn distribute_product(l: &Expr, r: &Expr) -> Expr {
    match (l, r) {
        (Expr::Add(a, b), _) => Expr::Add(
            Box::new(distribute_product(a, r)),
            Box::new(distribute_product(b, r)),
        ),
        (Expr::Sub(a, b), _) => Expr::Sub(
            Box::new(distribute_product(a, r)),
            Box::new(distribute_product(b, r)),
        ),
        (_, Expr::Add(a, b)) => Expr::Add(
            Box::new(distribute_product(l, a)),
            Box::new(distribute_product(l, b)),
        ),
        (_, Expr::Sub(a, b)) => Expr::Sub(
            Box::new(distribute_product(l, a)),
            Box::new(distribute_product(l, b)),
        ),
        _ => Expr::Mul(Box::new(l.clone()), Box::new(r.clone())),
    }
}

/// l / r with the division pushed into each term of a top-level sum in l.
fn distribute_quotient(l: &Expr, r: &Expr) -> Expr {
    match l {
        Expr::Add(a, b) => Expr::Add(
            Box::new(distribute_quotient(a, r)),
            Box::new(distribute_quotient(b, r)),
        ),
        Expr::Sub(a, b) => Expr::Sub(
            Box::new(distribute_quotient(a, r)),
            Box::new(distribute_quotient(b, r)),
        ),
        _ => Expr::Div(Box::new(l.clone()), Box::new(r.clone())),
    }
}
