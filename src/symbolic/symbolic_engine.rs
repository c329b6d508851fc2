//! # Symbolic Engine Module
//!
//! Core symbolic mathematics engine for creating, manipulating and evaluating
//! the expressions that microeconomic models are written in: demand and supply
//! curves, cost and production functions, payoff entries.
//!
//! ## Purpose
//!
//! The engine allows the model layer to:
//! - Parse user-entered strings into symbolic expressions and equations
//! - Perform analytical differentiation and definite integration
//! - Solve linear/quadratic equations and 2x2 curve systems in closed form
//! - Simplify results so they print the way a textbook writes them
//! - Convert symbolic expressions to LaTeX and to executable Rust closures
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! The symbolic expression type:
//! - **Variables**: `Var(String)` - symbolic variables like "P", "Q_d", "L"
//! - **Constants**: `Const(Rational64)` - exact rational constants, so that
//!   surpluses and equilibria come out as fractions, not rounded floats
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln` - for log-linear and Cobb-Douglas style forms
//!
//! ### `Equation`
//! A `lhs = rhs` pair as entered by a user (`Q = 50 - P/2`); `residual()`
//! gives `lhs - rhs`, which is the form the solver works on.
//!
//! Operator overloading (`std::ops`) gives natural syntax `p.clone() * q`,
//! and the `symbols!` macro creates several variables at once.

use num::rational::Rational64;
use num_traits::Zero;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Core symbolic expression enum representing economic formulas as an
/// abstract syntax tree. Uses Box<Expr> for recursive structures.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "P", "Q_d", "L")
    Var(String),
    /// Exact rational constant
    Const(Rational64),
    /// Addition: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
}

/// Pretty printing in infix notation with explicit parentheses.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => {
                if val.is_integer() {
                    write!(f, "{}", val.numer())
                } else {
                    write!(f, "{}/{}", val.numer(), val.denom())
                }
            }
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
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

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Add(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Expr::Sub(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Mul(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = Expr::Div(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::num(-1)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("P, Q");
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

    /// Integer constant.
    pub fn num(n: i64) -> Expr {
        Expr::Const(Rational64::from_integer(n))
    }

    /// Exact rational constant n/d. Panics if d == 0, so only call with
    /// literal denominators.
    pub fn rational(n: i64, d: i64) -> Expr {
        Expr::Const(Rational64::new(n, d))
    }

    /// Variable constructor shorthand.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Square root as a rational power, the way the solver writes
    /// discriminants: self^(1/2).
    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), Expr::rational(1, 2).boxed())
    }

    /// Checks if expression is exactly the constant zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if val.is_zero())
    }

    /// Returns the rational value if the expression is a plain constant.
    pub fn as_const(&self) -> Option<Rational64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Substitutes a variable with a numeric value throughout the expression.
    pub fn set_variable(&self, var: &str, value: Rational64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Substitutes multiple variables with numeric values using a map.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, Rational64>) -> Expr {
        let mut result = self.clone();
        for (var, value) in var_map {
            result = result.set_variable(var, *value);
        }
        result
    }

    /// Renames a variable throughout the expression.
    pub fn rename_variable(&self, old_var: &str, new_var: &str) -> Expr {
        self.substitute_variable(old_var, &Expr::Var(new_var.to_string()))
    }

    /// Substitutes a variable with an arbitrary expression.
    ///
    /// This is the workhorse of comparative statics: taxing shifts a demand
    /// curve by substituting `P -> P + t`, a monopoly price is found by
    /// substituting the optimum quantity back into inverse demand.
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
            Expr::Exp(inner) => Expr::Exp(Box::new(inner.substitute_variable(var, replacement))),
            Expr::Ln(inner) => Expr::Ln(Box::new(inner.substitute_variable(var, replacement))),
        }
    }

    /// Checks if the expression contains a variable.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(inner) | Expr::Ln(inner) => inner.contains_variable(var_name),
        }
    }

    /// Extracts all variable names, sorted and deduplicated.
    pub fn extract_variables(&self) -> Vec<String> {
        fn walk(expr: &Expr, acc: &mut BTreeSet<String>) {
            match expr {
                Expr::Var(name) => {
                    acc.insert(name.clone());
                }
                Expr::Const(_) => {}
                Expr::Add(l, r)
                | Expr::Sub(l, r)
                | Expr::Mul(l, r)
                | Expr::Div(l, r)
                | Expr::Pow(l, r) => {
                    walk(l, acc);
                    walk(r, acc);
                }
                Expr::Exp(inner) | Expr::Ln(inner) => walk(inner, acc),
            }
        }
        let mut set = BTreeSet::new();
        walk(self, &mut set);
        set.into_iter().collect()
    }

    /// True when the expression holds no free variables.
    pub fn is_numeric(&self) -> bool {
        self.extract_variables().is_empty()
    }
}

/// A user-entered relation such as `Q = 50 - P/2`.
///
/// The two sides stay separate for display; solving works on the residual
/// `lhs - rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// lhs - rhs, the zero-form the solver works on.
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    /// Substitutes a variable with an expression on both sides.
    pub fn substitute_variable(&self, var: &str, replacement: &Expr) -> Equation {
        Equation {
            lhs: self.lhs.substitute_variable(var, replacement),
            rhs: self.rhs.substitute_variable(var, replacement),
        }
    }

    /// All variables appearing on either side.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut vars: BTreeSet<String> = self.lhs.extract_variables().into_iter().collect();
        vars.extend(self.rhs.extract_variables());
        vars.into_iter().collect()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(P, Q) -> creates variables P, Q
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
