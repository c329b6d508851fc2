//! # LaTeX Rendering Module
//!
//! Every derived quantity ends up on screen as LaTeX, so this module turns
//! expression trees into the notation textbooks use: `\frac` for ratios,
//! `\sqrt` for half powers, subscripted symbols (`Q_d`), Greek letters for
//! elasticities. [`Expr::latex_approx`] additionally appends or substitutes
//! a decimal approximation according to the user's display settings.

use crate::settings::Approx;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use num::rational::Rational64;
use num_traits::Signed;

/// Greek symbol names get a backslash so `pi` renders as the letter.
const GREEK: [&str; 8] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "pi", "lambda",
];

fn latex_symbol(name: &str) -> String {
    let (base, subscript) = match name.split_once('_') {
        Some((base, subscript)) => (base, Some(subscript)),
        None => (name, None),
    };
    let base = if GREEK.contains(&base) {
        format!("\\{}", base)
    } else {
        base.to_owned()
    };
    match subscript {
        Some(subscript) => format!("{}_{{{}}}", base, subscript),
        None => base,
    }
}

/// True when the rendering of `expr` needs parentheses inside a product or
/// as the base of a power.
fn needs_parens(expr: &Expr, as_power_base: bool) -> bool {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => true,
        Expr::Const(c) => c.is_negative() || (as_power_base && !c.is_integer()),
        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Pow(_, _) => as_power_base,
        _ => false,
    }
}

fn latex_of(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) => latex_symbol(name),
        Expr::Const(c) => {
            if c.is_integer() {
                c.numer().to_string()
            } else if c.is_negative() {
                format!("- \\frac{{{}}}{{{}}}", c.numer().abs(), c.denom())
            } else {
                format!("\\frac{{{}}}{{{}}}", c.numer(), c.denom())
            }
        }
        Expr::Add(lhs, rhs) => format!("{} + {}", latex_of(lhs), latex_of(rhs)),
        Expr::Sub(lhs, rhs) => {
            let rhs_tex = if matches!(rhs.as_ref(), Expr::Add(_, _) | Expr::Sub(_, _)) {
                format!("\\left({}\\right)", latex_of(rhs))
            } else {
                latex_of(rhs)
            };
            format!("{} - {}", latex_of(lhs), rhs_tex)
        }
        Expr::Mul(lhs, rhs) => {
            // fold a leading -1 into a sign
            if let Expr::Const(c) = lhs.as_ref() {
                if *c == num::rational::Rational64::from_integer(-1) {
                    return format!("- {}", latex_factor(rhs));
                }
            }
            format!("{} {}", latex_factor(lhs), latex_factor(rhs))
        }
        Expr::Div(lhs, rhs) => {
            format!("\\frac{{{}}}{{{}}}", latex_of(lhs), latex_of(rhs))
        }
        Expr::Pow(base, exp) => {
            if let Expr::Const(e) = exp.as_ref() {
                if *e == num::rational::Rational64::new(1, 2) {
                    return format!("\\sqrt{{{}}}", latex_of(base));
                }
            }
            let base_tex = if needs_parens(base, true) {
                format!("\\left({}\\right)", latex_of(base))
            } else {
                latex_of(base)
            };
            format!("{}^{{{}}}", base_tex, latex_of(exp))
        }
        Expr::Exp(inner) => format!("e^{{{}}}", latex_of(inner)),
        Expr::Ln(inner) => format!("\\ln\\left({}\\right)", latex_of(inner)),
    }
}

fn latex_factor(expr: &Expr) -> String {
    if needs_parens(expr, false) {
        format!("\\left({}\\right)", latex_of(expr))
    } else {
        latex_of(expr)
    }
}

/// Reads a plain decimal such as `0.5` or `-36.25` back into an exact
/// rational. Returns None on overflow or a stray character.
fn parse_decimal(text: &str) -> Option<Rational64> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1, text),
    };
    let (int_part, frac_part) = digits.split_once('.')?;
    let mut numer: i64 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = c.to_digit(10)? as i64;
        numer = numer.checked_mul(10)?.checked_add(digit)?;
    }
    let denom = 10i64.checked_pow(frac_part.len() as u32)?;
    Some(Rational64::new(sign * numer, denom))
}

/// Formats `value` with at most `digits` significant digits, trailing
/// zeros trimmed but at least one decimal place kept.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0.0".to_owned();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).clamp(0, 17) as usize;
    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.push('0');
        }
    } else {
        text.push_str(".0");
    }
    text
}

impl Expr {
    /// Plain LaTeX for the expression tree, without rearranging it. Pass
    /// expressions through [`Expr::simplify_`] first for textbook shape.
    pub fn to_latex(&self) -> String {
        latex_of(self)
    }

    /// LaTeX with an optional decimal approximation. Values whose decimal
    /// rendering is already exact at the configured precision, integers
    /// included, never get one; for the rest the `approx` setting decides
    /// whether the decimal is hidden, replaces the exact form, or is
    /// appended after `\approx`.
    pub fn latex_approx(&self, digits: usize, approx: Approx) -> String {
        let exact = self.to_latex();
        if approx == Approx::Hide {
            return exact;
        }
        let rational = self.eval_rational();
        if rational.is_some_and(|r| r.is_integer()) {
            return exact;
        }
        let value = match self.eval_numeric() {
            Ok(value) => value,
            // free variables: nothing to approximate
            Err(_) => return exact,
        };
        let decimal = format_significant(value, digits);
        // a decimal that reproduces the exact value is no approximation
        if rational.is_some() && rational == parse_decimal(&decimal) {
            return exact;
        }
        match approx {
            Approx::Hide => exact,
            Approx::Replace => decimal,
            Approx::Append => format!("{} \\approx {}", exact, decimal),
        }
    }
}

impl Equation {
    pub fn to_latex(&self) -> String {
        format!("{} = {}", self.lhs.to_latex(), self.rhs.to_latex())
    }
}
