#![allow(non_snake_case)]
/// # Symbolic engine
/// a module
/// 1) turns a String expression or equation into a symbolic expression
/// 2) computes analytical derivatives, closed-form solutions and definite integrals
/// 3) turns a symbolic expression into LaTeX and into a regular Rust function
///# Example#
/// ```
/// use EconEssentials::symbolic::symbolic_engine::Expr;
/// // parse a demand curve entered by a user and differentiate it
/// let demand = Expr::parse_expression("50 - P/2").unwrap();
/// let dQ_dP = demand.diff("P").simplify_();
/// println!("dQ/dP = {}", dQ_dP);
/// let q = demand.lambdify1D("P")(10.0);
/// assert_eq!(q, 45.0);
/// ```
pub mod symbolic_engine;
/// turns a String expression into a symbolic expression; entry points are
/// `Expr::parse_expression` and `Equation::parse_equation`.
/// Implicit multiplication is understood the way students type it: `2Q`,
/// `K^(1/2)L^(1/2)`, `(Q+1)(Q+2)`.
pub mod parse_expr;
/// analytical differentiation and numeric evaluation (lambdified closures)
pub mod symbolic_derivatives;
/// definite and indefinite integration of the polynomial/exp/log subset
pub mod symbolic_integration;
/// LaTeX rendering with optional numeric approximation of rational results
pub mod symbolic_latex;
/// closed-form solving: linear and quadratic equations, 2x2 curve systems
pub mod symbolic_solve;
/// algebraic simplification: constant folding over exact rationals and
/// like-term collection, so derived quantities print in textbook shape
pub mod symbolic_simplify;

#[cfg(test)]
mod symbolic_engine_tests;
