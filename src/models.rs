//! # Economic Model Calculators
//!
//! One module per textbook topic. Each calculator is a pure function of
//! the user-entered strings: parse the curves, derive the quantities of
//! interest through the symbolic engine (solve, differentiate, integrate)
//! and return simplified expressions together with LaTeX report lines.
//! Malformed input surfaces as [`errors::ModelError`], never a panic.

pub mod demand_supply;
pub mod elasticity;
pub mod equilibrium_and_welfare;
pub mod errors;
pub mod externalities;
pub mod monopoly;
pub mod oligopoly;
pub mod production_and_costs;
pub mod taxes_and_subsidies;
pub mod trade_and_ppf;
