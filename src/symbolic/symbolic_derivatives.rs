//! # Symbolic Differentiation and Numeric Evaluation Module
//!
//! Differentiation drives most of the marginal analysis: marginal cost and
//! marginal revenue are `d/dQ`, marginal product is `d/dL`, point
//! elasticity needs `dQ/dP`. Numeric evaluation (`eval_expression`,
//! `lambdify1D`) backs the plot renderers, which sample curves on dense
//! grids of `f64` points.

use crate::symbolic::symbolic_engine::Expr;
use num::rational::Rational64;
use num_traits::ToPrimitive;
use std::collections::HashMap;

impl Expr {
    /// Symbolic derivative with respect to `var_name`. The result is not
    /// simplified; follow with [`Expr::simplify_`] for display.
    pub fn diff(&self, var_name: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var_name {
                    Expr::num(1)
                } else {
                    Expr::num(0)
                }
            }
            Expr::Const(_) => Expr::num(0),
            Expr::Add(lhs, rhs) => lhs.diff(var_name) + rhs.diff(var_name),
            Expr::Sub(lhs, rhs) => lhs.diff(var_name) - rhs.diff(var_name),
            Expr::Mul(lhs, rhs) => {
                lhs.diff(var_name) * *rhs.clone() + *lhs.clone() * rhs.diff(var_name)
            }
            Expr::Div(lhs, rhs) => {
                let numerator =
                    lhs.diff(var_name) * *rhs.clone() - *lhs.clone() * rhs.diff(var_name);
                numerator / (*rhs.clone() * *rhs.clone())
            }
            Expr::Pow(base, exp) => {
                if !exp.contains_variable(var_name) {
                    // power rule: d(b^k) = k * b^(k-1) * b'
                    *exp.clone()
                        * Expr::Pow(base.clone(), (*exp.clone() - Expr::num(1)).boxed())
                        * base.diff(var_name)
                } else if !base.contains_variable(var_name) {
                    // exponential rule: d(a^g) = a^g * ln(a) * g'
                    self.clone() * Expr::Ln(base.clone()) * exp.diff(var_name)
                } else {
                    // general rule via f^g = exp(g * ln(f))
                    self.clone()
                        * (exp.diff(var_name) * Expr::Ln(base.clone())
                            + *exp.clone() * base.diff(var_name) / *base.clone())
                }
            }
            Expr::Exp(inner) => Expr::Exp(inner.clone()) * inner.diff(var_name),
            Expr::Ln(inner) => inner.diff(var_name) / *inner.clone(),
        }
    }

    /// n-th derivative in one variable, simplified between steps to keep
    /// intermediate trees small.
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut result = self.clone();
        for _ in 0..n {
            result = result.diff(var_name).simplify_();
        }
        result
    }

    /// Evaluates with the given variable bindings. Errors on unbound
    /// variables and on domain faults (log of a non-positive number,
    /// division by zero).
    pub fn eval_expression(&self, values: &HashMap<String, f64>) -> Result<f64, String> {
        match self {
            Expr::Var(name) => values
                .get(name)
                .copied()
                .ok_or_else(|| format!("no value bound for variable '{}'", name)),
            Expr::Const(c) => c
                .to_f64()
                .ok_or_else(|| format!("constant {} does not fit in f64", c)),
            Expr::Add(lhs, rhs) => {
                Ok(lhs.eval_expression(values)? + rhs.eval_expression(values)?)
            }
            Expr::Sub(lhs, rhs) => {
                Ok(lhs.eval_expression(values)? - rhs.eval_expression(values)?)
            }
            Expr::Mul(lhs, rhs) => {
                Ok(lhs.eval_expression(values)? * rhs.eval_expression(values)?)
            }
            Expr::Div(lhs, rhs) => {
                let denominator = rhs.eval_expression(values)?;
                if denominator == 0.0 {
                    return Err(format!("division by zero in {}", self));
                }
                Ok(lhs.eval_expression(values)? / denominator)
            }
            Expr::Pow(base, exp) => {
                let base = base.eval_expression(values)?;
                let exp = exp.eval_expression(values)?;
                let value = base.powf(exp);
                if value.is_nan() {
                    return Err(format!("{}^{} is not a real number", base, exp));
                }
                Ok(value)
            }
            Expr::Exp(inner) => Ok(inner.eval_expression(values)?.exp()),
            Expr::Ln(inner) => {
                let inner = inner.eval_expression(values)?;
                if inner <= 0.0 {
                    return Err(format!("ln of non-positive value {}", inner));
                }
                Ok(inner.ln())
            }
        }
    }

    /// Evaluates a closed-form expression (no free variables) to f64.
    pub fn eval_numeric(&self) -> Result<f64, String> {
        self.eval_expression(&HashMap::new())
    }

    /// Turns a one-variable expression into a plain numeric closure for
    /// plotting grids. Domain faults map to NaN, which the plot layer
    /// filters out.
    pub fn lambdify1D(&self, var_name: &str) -> Box<dyn Fn(f64) -> f64 + '_> {
        let var_name = var_name.to_owned();
        let expr = self.clone();
        Box::new(move |x| {
            let mut values = HashMap::with_capacity(1);
            values.insert(var_name.clone(), x);
            expr.eval_expression(&values).unwrap_or(f64::NAN)
        })
    }

    /// Rational value of a closed-form expression, when every operation
    /// stays exact.
    pub fn eval_rational(&self) -> Option<Rational64> {
        crate::symbolic::symbolic_simplify::TermSum::from_expr(self).as_const()
    }
}
