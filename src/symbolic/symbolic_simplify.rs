//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification for the economic-model pipeline. Every derived
//! quantity (inverse curve, marginal anything, surplus integral) passes
//! through `simplify_()` before it is shown, so the machinery here decides
//! whether results look like `190/3 - 2*Q` or like a tangle of nested
//! parentheses.
//!
//! ## Strategy
//!
//! Expressions are flattened into a sum of *terms*; each term is an exact
//! rational coefficient times a product of *atoms* raised to rational
//! exponents. Atoms are variables or irreducible subtrees (`ln(..)`,
//! `exp(..)`, powers with symbolic exponents, divisions by polynomials).
//! In that form the classic rules are bookkeeping:
//!
//! 1. **Constant folding** happens in the coefficient arithmetic (exact
//!    rationals, including perfect rational roots of `^ (p/q)` powers)
//! 2. **Identities** (`x+0`, `x*1`, `0*x`, `x^0`, `x^1`, `x/1`) disappear
//!    during flattening
//! 3. **Like terms** merge because equal factor maps share one key
//! 4. **Rebuilding** orders terms by degree, splits negative exponents into
//!    denominators and folds signs into `-`, which is the textbook shape
//!
//! `simplify_()` is idempotent on its own output: a rebuilt expression
//! flattens back to the same term set.

use crate::symbolic::symbolic_engine::Expr;
use num::rational::Rational64;
use num_traits::{One, Signed, Zero};
use std::collections::BTreeMap;

/// coefficient * product of atom^exponent
#[derive(Clone, Debug)]
pub(crate) struct Term {
    pub(crate) coeff: Rational64,
    /// canonical display key -> (atom expression, rational exponent)
    pub(crate) factors: BTreeMap<String, (Expr, Rational64)>,
}

impl Term {
    fn constant(c: Rational64) -> Term {
        Term {
            coeff: c,
            factors: BTreeMap::new(),
        }
    }

    fn one() -> Term {
        Term::constant(Rational64::one())
    }

    fn atom(expr: Expr, exp: Rational64) -> Term {
        if exp.is_zero() {
            return Term::one();
        }
        match expr {
            // collapse nested constant powers: (b^m)^k -> b^(m*k)
            Expr::Pow(base, power) => {
                if let Expr::Const(m) = power.as_ref() {
                    return Term::atom(*base, exp * *m);
                }
                let rebuilt = Expr::Pow(base, power);
                let mut factors = BTreeMap::new();
                factors.insert(rebuilt.to_string(), (rebuilt, exp));
                Term {
                    coeff: Rational64::one(),
                    factors,
                }
            }
            Expr::Const(c) => match rational_pow(c, exp) {
                Some(value) => Term::constant(value),
                None => {
                    let rebuilt = Expr::Const(c);
                    let mut factors = BTreeMap::new();
                    factors.insert(rebuilt.to_string(), (rebuilt, exp));
                    Term {
                        coeff: Rational64::one(),
                        factors,
                    }
                }
            },
            other => {
                let mut factors = BTreeMap::new();
                factors.insert(other.to_string(), (other, exp));
                Term {
                    coeff: Rational64::one(),
                    factors,
                }
            }
        }
    }

    fn mul(&self, other: &Term) -> Term {
        let coeff = self.coeff * other.coeff;
        if coeff.is_zero() {
            return Term::constant(Rational64::zero());
        }
        let mut factors = self.factors.clone();
        for (key, (atom, exp)) in &other.factors {
            match factors.get_mut(key) {
                Some(entry) => {
                    entry.1 += *exp;
                }
                None => {
                    factors.insert(key.clone(), (atom.clone(), *exp));
                }
            }
        }
        factors.retain(|_, (_, exp)| !exp.is_zero());
        Term { coeff, factors }
    }

    fn invert(&self) -> Option<Term> {
        if self.coeff.is_zero() {
            return None;
        }
        let factors = self
            .factors
            .iter()
            .map(|(key, (atom, exp))| (key.clone(), (atom.clone(), -*exp)))
            .collect();
        Some(Term {
            coeff: self.coeff.recip(),
            factors,
        })
    }

    /// Raises the term to a rational power; fails when the coefficient has
    /// no exact rational root.
    fn pow_rational(&self, k: Rational64) -> Option<Term> {
        if k.is_zero() {
            return Some(Term::one());
        }
        let coeff = rational_pow(self.coeff, k)?;
        let factors = self
            .factors
            .iter()
            .map(|(_, (atom, exp))| Term::atom(atom.clone(), *exp * k))
            .collect::<Vec<_>>();
        let mut result = Term::constant(coeff);
        for t in factors {
            result = result.mul(&t);
        }
        Some(result)
    }

    /// Key under which like terms merge: the factor map without the
    /// coefficient.
    fn merge_key(&self) -> String {
        let mut key = String::new();
        for (factor_key, (_, exp)) in &self.factors {
            key.push_str(factor_key);
            key.push('^');
            key.push_str(&exp.to_string());
            key.push('*');
        }
        key
    }

    fn total_degree(&self) -> Rational64 {
        self.factors
            .values()
            .map(|(_, exp)| *exp)
            .fold(Rational64::zero(), |a, b| a + b)
    }
}

/// A flattened sum of terms.
#[derive(Clone, Debug)]
pub(crate) struct TermSum {
    pub(crate) terms: Vec<Term>,
}

impl TermSum {
    fn from_term(term: Term) -> TermSum {
        TermSum { terms: vec![term] }.combined()
    }

    fn zero() -> TermSum {
        TermSum { terms: Vec::new() }
    }

    fn one() -> TermSum {
        TermSum::from_term(Term::one())
    }

    fn add(mut self, other: TermSum) -> TermSum {
        self.terms.extend(other.terms);
        self.combined()
    }

    fn neg(mut self) -> TermSum {
        for term in &mut self.terms {
            term.coeff = -term.coeff;
        }
        self
    }

    fn mul(&self, other: &TermSum) -> TermSum {
        let mut terms = Vec::new();
        for a in &self.terms {
            for b in &other.terms {
                terms.push(a.mul(b));
            }
        }
        TermSum { terms }.combined()
    }

    fn combined(self) -> TermSum {
        let mut merged: BTreeMap<String, Term> = BTreeMap::new();
        for term in self.terms {
            if term.coeff.is_zero() {
                continue;
            }
            let key = term.merge_key();
            match merged.get_mut(&key) {
                Some(existing) => existing.coeff += term.coeff,
                None => {
                    merged.insert(key, term);
                }
            }
        }
        let terms = merged
            .into_values()
            .filter(|t| !t.coeff.is_zero())
            .collect();
        TermSum { terms }
    }

    fn single_term(&self) -> Option<&Term> {
        if self.terms.len() == 1 {
            Some(&self.terms[0])
        } else {
            None
        }
    }

    pub(crate) fn as_const(&self) -> Option<Rational64> {
        match self.terms.len() {
            0 => Some(Rational64::zero()),
            1 if self.terms[0].factors.is_empty() => Some(self.terms[0].coeff),
            _ => None,
        }
    }

    /// Flattens an expression into a combined term sum.
    pub(crate) fn from_expr(expr: &Expr) -> TermSum {
        match expr {
            Expr::Const(c) => TermSum::from_term(Term::constant(*c)),
            Expr::Var(name) => {
                TermSum::from_term(Term::atom(Expr::Var(name.clone()), Rational64::one()))
            }
            Expr::Add(lhs, rhs) => TermSum::from_expr(lhs).add(TermSum::from_expr(rhs)),
            Expr::Sub(lhs, rhs) => TermSum::from_expr(lhs).add(TermSum::from_expr(rhs).neg()),
            Expr::Mul(lhs, rhs) => TermSum::from_expr(lhs).mul(&TermSum::from_expr(rhs)),
            Expr::Div(lhs, rhs) => {
                let denominator = TermSum::from_expr(rhs);
                match denominator.single_term().and_then(Term::invert) {
                    Some(inverse) => TermSum::from_expr(lhs).mul(&TermSum::from_term(inverse)),
                    None => {
                        // polynomial denominator stays an opaque atom with
                        // exponent -1
                        let atom =
                            Term::atom(denominator.to_expr(), -Rational64::one());
                        TermSum::from_expr(lhs).mul(&TermSum::from_term(atom))
                    }
                }
            }
            Expr::Pow(base, exp) => {
                let exponent = TermSum::from_expr(exp);
                match exponent.as_const() {
                    Some(k) => {
                        let base_sum = TermSum::from_expr(base);
                        if let Some(c) = base_sum.as_const() {
                            if let Some(folded) = rational_pow(c, k) {
                                return TermSum::from_term(Term::constant(folded));
                            }
                        }
                        if let Some(term) = base_sum.single_term() {
                            if let Some(raised) = term.pow_rational(k) {
                                return TermSum::from_term(raised);
                            }
                        }
                        if k.is_integer() && !k.is_negative() && *k.numer() <= 6 {
                            let mut acc = TermSum::one();
                            for _ in 0..*k.numer() {
                                acc = acc.mul(&base_sum);
                            }
                            return acc;
                        }
                        TermSum::from_term(Term::atom(
                            Expr::Pow(base_sum.to_expr().boxed(), Expr::Const(k).boxed()),
                            Rational64::one(),
                        ))
                    }
                    None => TermSum::from_term(Term::atom(
                        Expr::Pow(
                            TermSum::from_expr(base).to_expr().boxed(),
                            exponent.to_expr().boxed(),
                        ),
                        Rational64::one(),
                    )),
                }
            }
            Expr::Exp(inner) => {
                let inner = TermSum::from_expr(inner).to_expr();
                if inner.is_zero() {
                    return TermSum::one();
                }
                TermSum::from_term(Term::atom(Expr::Exp(inner.boxed()), Rational64::one()))
            }
            Expr::Ln(inner) => {
                let inner = TermSum::from_expr(inner).to_expr();
                if inner == Expr::num(1) {
                    return TermSum::zero();
                }
                TermSum::from_term(Term::atom(Expr::Ln(inner.boxed()), Rational64::one()))
            }
        }
    }

    /// Rebuilds a plain expression, ordered by total degree descending with
    /// a positive term moved to the front when possible.
    pub(crate) fn to_expr(&self) -> Expr {
        if self.terms.is_empty() {
            return Expr::num(0);
        }
        let mut ordered: Vec<&Term> = self.terms.iter().collect();
        ordered.sort_by(|a, b| {
            b.total_degree()
                .cmp(&a.total_degree())
                .then_with(|| a.merge_key().cmp(&b.merge_key()))
        });
        if ordered[0].coeff.is_negative() {
            if let Some(pos) = ordered.iter().position(|t| !t.coeff.is_negative()) {
                let lead = ordered.remove(pos);
                ordered.insert(0, lead);
            }
        }
        let mut result = build_signed_monomial(ordered[0]);
        for term in &ordered[1..] {
            let monomial = build_monomial_abs(term);
            if term.coeff.is_negative() {
                result = result - monomial;
            } else {
                result = result + monomial;
            }
        }
        result
    }
}

/// Builds |coeff| * factors, separating negative exponents into a
/// denominator, so `1/2 * L^(-1/2)` prints as `1 / (2 * L^(1/2))`.
fn build_monomial_abs(term: &Term) -> Expr {
    let coeff = term.coeff.abs();
    let mut numerator: Option<Expr> = None;
    let mut denominator: Option<Expr> = None;
    let push = |slot: &mut Option<Expr>, factor: Expr| {
        *slot = Some(match slot.take() {
            Some(existing) => existing * factor,
            None => factor,
        });
    };
    for (_, (atom, exp)) in &term.factors {
        if exp.is_negative() {
            push(&mut denominator, build_factor(atom, -*exp));
        } else {
            push(&mut numerator, build_factor(atom, *exp));
        }
    }
    let numer_coeff = Rational64::from_integer(*coeff.numer());
    let denom_coeff = Rational64::from_integer(*coeff.denom());
    let mut numerator = match numerator {
        Some(expr) if numer_coeff.is_one() => expr,
        Some(expr) => Expr::Const(numer_coeff) * expr,
        None => Expr::Const(numer_coeff),
    };
    if !denom_coeff.is_one() {
        let denom_expr = Expr::Const(denom_coeff);
        push(&mut denominator, denom_expr);
    }
    if let Some(denominator) = denominator {
        numerator = numerator / denominator;
    }
    numerator
}

fn build_signed_monomial(term: &Term) -> Expr {
    let body = build_monomial_abs(term);
    if term.coeff.is_negative() {
        -body
    } else {
        body
    }
}

fn build_factor(atom: &Expr, exp: Rational64) -> Expr {
    if exp.is_one() {
        atom.clone()
    } else {
        Expr::Pow(atom.clone().boxed(), Expr::Const(exp).boxed())
    }
}

/// Exact rational power c^k, or None when no exact value exists
/// (negative base with fractional exponent, imperfect roots, huge powers).
pub(crate) fn rational_pow(c: Rational64, k: Rational64) -> Option<Rational64> {
    if k.is_zero() {
        return Some(Rational64::one());
    }
    if k.is_integer() {
        let n = *k.numer();
        if n.unsigned_abs() > 64 {
            return None;
        }
        if c.is_zero() {
            return if n > 0 { Some(c) } else { None };
        }
        let mut result = Rational64::one();
        for _ in 0..n.unsigned_abs() {
            result = checked_mul(result, c)?;
        }
        return if n < 0 { Some(result.recip()) } else { Some(result) };
    }
    if c.is_negative() {
        return None;
    }
    let q = *k.denom() as u32;
    let root = Rational64::new(integer_root(*c.numer(), q)?, integer_root(*c.denom(), q)?);
    rational_pow(root, Rational64::from_integer(*k.numer()))
}

fn checked_mul(a: Rational64, b: Rational64) -> Option<Rational64> {
    let numer = a.numer().checked_mul(*b.numer())?;
    let denom = a.denom().checked_mul(*b.denom())?;
    Some(Rational64::new(numer, denom))
}

/// Exact integer q-th root, if one exists.
fn integer_root(value: i64, q: u32) -> Option<i64> {
    if value < 0 {
        return None;
    }
    let guess = (value as f64).powf(1.0 / q as f64).round() as i64;
    for candidate in guess.saturating_sub(1)..=guess.saturating_add(1) {
        if candidate >= 0 && candidate.checked_pow(q) == Some(value) {
            return Some(candidate);
        }
    }
    None
}

impl Expr {
    /// Algebraic simplification: constant folding, identity elimination and
    /// like-term collection. Idempotent on its own output.
    pub fn simplify_(&self) -> Expr {
        TermSum::from_expr(self).to_expr()
    }

    /// Sign of the expression when every variable ranges over positive
    /// values, the standing assumption for prices and quantities.
    /// Returns -1, 0 or 1, or None when the sign is not provable
    /// term-by-term.
    pub fn known_sign(&self) -> Option<i32> {
        fn atom_is_positive(atom: &Expr) -> bool {
            match atom {
                Expr::Var(_) | Expr::Exp(_) => true,
                Expr::Const(c) => c.is_positive(),
                Expr::Pow(base, _) => atom_is_positive(base),
                _ => false,
            }
        }
        let sum = TermSum::from_expr(self);
        if sum.terms.is_empty() {
            return Some(0);
        }
        let mut sign = 0i32;
        for term in &sum.terms {
            if !term.factors.values().all(|(atom, _)| atom_is_positive(atom)) {
                return None;
            }
            let term_sign = if term.coeff.is_positive() { 1 } else { -1 };
            if sign == 0 {
                sign = term_sign;
            } else if sign != term_sign {
                return None;
            }
        }
        Some(sign)
    }
}
