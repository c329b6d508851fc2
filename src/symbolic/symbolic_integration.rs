//! # Symbolic Integration Module
//!
//! Welfare analysis is area measurement: consumer surplus, producer
//! surplus and deadweight loss are definite integrals of inverse demand
//! and supply curves between quantity bounds. The integrator works
//! term-by-term on the flattened form, which covers the polynomial (and
//! occasional log or exponential) curves the models produce; anything
//! fancier is reported as unsupported instead of silently approximated.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::{Term, TermSum};
use num::rational::Rational64;
use num_traits::{One, Zero};

fn integrate_term(term: &Term, var: &str) -> Result<Expr, String> {
    let mut var_exponent = Rational64::zero();
    let mut constant_part = Expr::Const(term.coeff);
    let mut transcendental: Option<Expr> = None;
    for (_, (atom, exp)) in &term.factors {
        if !atom.contains_variable(var) {
            constant_part = constant_part
                * Expr::Pow(atom.clone().boxed(), Expr::Const(*exp).boxed());
        } else if *atom == Expr::Var(var.to_owned()) {
            var_exponent = *exp;
        } else if exp.is_one() && transcendental.is_none() {
            transcendental = Some(atom.clone());
        } else {
            return Err(format!("cannot integrate '{}' over {}", atom, var));
        }
    }

    let body = match transcendental {
        None => {
            if var_exponent == -Rational64::one() {
                // c / x -> c * ln(x)
                Expr::Var(var.to_owned()).ln()
            } else {
                let next = var_exponent + Rational64::one();
                Expr::Pow(
                    Expr::Var(var.to_owned()).boxed(),
                    Expr::Const(next).boxed(),
                ) / Expr::Const(next)
            }
        }
        Some(atom) if var_exponent.is_zero() => match &atom {
            Expr::Exp(inner) => {
                // exp(a x + b) -> exp(a x + b) / a
                let slope = inner.diff(var).simplify_();
                if slope.contains_variable(var) || slope.is_zero() {
                    return Err(format!("cannot integrate '{}' over {}", atom, var));
                }
                atom.clone() / slope
            }
            Expr::Ln(inner) if **inner == Expr::Var(var.to_owned()) => {
                // ln(x) -> x ln(x) - x
                let x = Expr::Var(var.to_owned());
                x.clone() * atom.clone() - x
            }
            _ => return Err(format!("cannot integrate '{}' over {}", atom, var)),
        },
        Some(atom) => {
            return Err(format!(
                "cannot integrate '{} * {}^{}' over {}",
                atom, var, var_exponent, var
            ));
        }
    };
    Ok(constant_part * body)
}

impl Expr {
    /// Antiderivative with respect to `var` (no integration constant).
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        let sum = TermSum::from_expr(self);
        let mut result = Expr::num(0);
        for term in &sum.terms {
            result = result + integrate_term(term, var)?;
        }
        Ok(result.simplify_())
    }

    /// Definite integral of `self` over `var` from `lower` to `upper`.
    /// Bounds may be symbolic expressions.
    pub fn definite_integrate(
        &self,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String> {
        let antiderivative = self.integrate(var)?;
        let at_upper = antiderivative.substitute_variable(var, upper);
        let at_lower = antiderivative.substitute_variable(var, lower);
        Ok((at_upper - at_lower).simplify_())
    }
}
