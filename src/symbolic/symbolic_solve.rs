//! # Symbolic Equation Solving Module
//!
//! Root finding for the equations the economic models produce: curve
//! inversion (`Q = 50 - P/2` solved for `P` gives the inverse demand
//! `100 - 2Q`), market clearing (`P_d = P_s`), profit maximization
//! (`MR = MC`). These are polynomial equations of low degree whose
//! coefficients may contain the other market variables, so the solver
//! extracts symbolic coefficients, applies the linear or quadratic closed
//! form, and reports anything of higher degree as unsolvable rather than
//! approximating.
//!
//! Curves live in the positive quadrant, so the workhorse entry point is
//! [`Equation::solve_unique_positive`]: it discards roots that are
//! provably non-positive and demands exactly one candidate remain.

use crate::symbolic::symbolic_engine::{Equation, Expr};
use crate::symbolic::symbolic_simplify::TermSum;
use num::rational::Rational64;
use num_traits::{Signed, Zero};

/// Coefficients of `expr` as a polynomial in `var`, ascending by degree.
/// Coefficients are themselves expressions and may contain other
/// variables. Negative powers of `var` are cleared by multiplying through
/// (valid on the positive domain). Returns None when `var` appears inside
/// a non-polynomial shape (logs, symbolic exponents, polynomial
/// denominators).
pub(crate) fn polynomial_in(expr: &Expr, var: &str) -> Option<Vec<Expr>> {
    let mut sum = TermSum::from_expr(expr);

    // exponent of `var` in a term, and the rest of the term as an Expr
    let split_term =
        |term: &crate::symbolic::symbolic_simplify::Term| -> Option<(Rational64, Expr)> {
            let mut exponent = Rational64::zero();
            let mut rest = Expr::Const(term.coeff);
            for (_, (atom, exp)) in &term.factors {
                match atom {
                    Expr::Var(name) if name == var => exponent = *exp,
                    other if !other.contains_variable(var) => {
                        rest = rest * Expr::Pow(other.clone().boxed(), Expr::Const(*exp).boxed());
                    }
                    _ => return None,
                }
            }
            Some((exponent, rest))
        };

    let mut min_exponent = Rational64::zero();
    for term in &sum.terms {
        let (exp, _) = split_term(term)?;
        if exp < min_exponent {
            min_exponent = exp;
        }
    }
    if min_exponent.is_negative() {
        let clear = Expr::Pow(
            Expr::Var(var.to_owned()).boxed(),
            Expr::Const(-min_exponent).boxed(),
        );
        sum = TermSum::from_expr(&(sum.to_expr() * clear));
    }

    let mut coeffs: Vec<Expr> = Vec::new();
    for term in &sum.terms {
        let (exp, rest) = split_term(term)?;
        if !exp.is_integer() || exp.is_negative() {
            return None;
        }
        let degree = usize::try_from(*exp.numer()).ok()?;
        if coeffs.len() <= degree {
            coeffs.resize(degree + 1, Expr::num(0));
        }
        let updated = coeffs[degree].clone() + rest;
        coeffs[degree] = updated;
    }
    let mut coeffs: Vec<Expr> = coeffs.into_iter().map(|c| c.simplify_()).collect();
    while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::is_zero) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(Expr::num(0));
    }
    Some(coeffs)
}

impl Expr {
    /// Real roots of `self = 0` in `var`, simplified. Numeric roots come
    /// back sorted ascending; symbolic roots keep construction order.
    pub fn solve_for_zero(&self, var: &str) -> Result<Vec<Expr>, String> {
        let residual = self.simplify_();
        let coeffs = polynomial_in(&residual, var)
            .ok_or_else(|| format!("'{}' is not polynomial in {}", residual, var))?;
        let mut roots = match coeffs.as_slice() {
            [c0] => {
                if c0.is_zero() {
                    return Err(format!("equation holds for every value of {}", var));
                }
                Vec::new()
            }
            [c0, c1] => vec![(-c0.clone() / c1.clone()).simplify_()],
            [c0, c1, c2] => {
                // (-b +/- sqrt(b^2 - 4ac)) / 2a
                let discriminant = (c1.clone() * c1.clone()
                    - Expr::num(4) * c2.clone() * c0.clone())
                .simplify_();
                if discriminant.as_const().is_some_and(|d| d.is_negative()) {
                    Vec::new()
                } else if discriminant.is_zero() {
                    vec![(-c1.clone() / (Expr::num(2) * c2.clone())).simplify_()]
                } else {
                    let root_disc = discriminant.sqrt();
                    let two_a = Expr::num(2) * c2.clone();
                    let lo = ((-c1.clone() - root_disc.clone()) / two_a.clone()).simplify_();
                    let hi = ((-c1.clone() + root_disc) / two_a).simplify_();
                    vec![lo, hi]
                }
            }
            _ => {
                return Err(format!(
                    "cannot solve a degree {} equation for {}",
                    coeffs.len() - 1,
                    var
                ));
            }
        };
        roots.sort_by(|a, b| {
            let a = a.eval_numeric().unwrap_or(f64::NAN);
            let b = b.eval_numeric().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(roots)
    }
}

impl Equation {
    /// All real solutions of the equation in `var`.
    pub fn solve_for(&self, var: &str) -> Result<Vec<Expr>, String> {
        self.residual().solve_for_zero(var)
    }

    /// The single admissible solution in `var` on the positive domain.
    /// Numeric roots must be strictly positive; symbolic roots are kept
    /// unless provably non-positive. Zero or several candidates is an
    /// error, which in the models signals a curve without economic
    /// meaning on the positive quadrant.
    pub fn solve_unique_positive(&self, var: &str) -> Result<Expr, String> {
        let roots = self.solve_for(var)?;
        let admissible: Vec<Expr> = roots
            .into_iter()
            .filter(|root| match root.eval_numeric() {
                Ok(value) => value > 0.0,
                Err(_) => !matches!(root.known_sign(), Some(-1) | Some(0)),
            })
            .collect();
        match admissible.len() {
            1 => Ok(admissible.into_iter().next().unwrap_or(Expr::num(0))),
            n => Err(format!(
                "expected exactly one positive solution for {}, found {}",
                var, n
            )),
        }
    }
}

/// Solves a pair of equations linear in `x` and `y` by Cramer's rule.
/// Errors on non-linear systems and on singular coefficient matrices.
pub fn solve_linear_system(
    equations: (&Equation, &Equation),
    x: &str,
    y: &str,
) -> Result<(Expr, Expr), String> {
    fn linear_parts(eq: &Equation, x: &str, y: &str) -> Result<[Rational64; 3], String> {
        let residual = eq.residual().simplify_();
        let sum = TermSum::from_expr(&residual);
        let mut parts = [Rational64::zero(); 3];
        for term in &sum.terms {
            match term.factors.len() {
                0 => parts[2] += term.coeff,
                1 => {
                    let (atom, exp) = term
                        .factors
                        .values()
                        .next()
                        .map(|(a, e)| (a, *e))
                        .ok_or_else(|| "empty factor map".to_string())?;
                    if exp != Rational64::from_integer(1) {
                        return Err(format!("'{}' is not linear in {} and {}", residual, x, y));
                    }
                    match atom {
                        Expr::Var(name) if name == x => parts[0] += term.coeff,
                        Expr::Var(name) if name == y => parts[1] += term.coeff,
                        _ => {
                            return Err(format!(
                                "'{}' contains a variable other than {} and {}",
                                residual, x, y
                            ));
                        }
                    }
                }
                _ => return Err(format!("'{}' is not linear in {} and {}", residual, x, y)),
            }
        }
        Ok(parts)
    }

    // a1 x + b1 y = -c1, a2 x + b2 y = -c2
    let [a1, b1, c1] = linear_parts(equations.0, x, y)?;
    let [a2, b2, c2] = linear_parts(equations.1, x, y)?;
    let determinant = a1 * b2 - a2 * b1;
    if determinant.is_zero() {
        return Err(format!("the system is singular in {} and {}", x, y));
    }
    let x_value = (-c1 * b2 + c2 * b1) / determinant;
    let y_value = (-a1 * c2 + a2 * c1) / determinant;
    Ok((Expr::Const(x_value), Expr::Const(y_value)))
}
