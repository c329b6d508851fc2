//! Production and cost analysis. A production function `q(L)` yields the
//! marginal product and its curvature (diminishing, constant or
//! increasing); scaling every input by a common factor classifies returns
//! to scale. An entered total cost `TC(Q)` expands into the whole cost
//! family: fixed, variable, marginal and the three averages.

use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use num::rational::Rational64;
use std::collections::HashMap;

pub const DEFAULT_PRODUCTION: &str = "K^(1/2)L^(1/2)";
pub const DEFAULT_TOTAL_COST: &str = "300 + 10Q + Q^2/2";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Curvature {
    Diminishing,
    Constant,
    Increasing,
    Ambiguous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum ReturnsToScale {
    Decreasing,
    Constant,
    Increasing,
    Ambiguous,
}

#[derive(Clone, Debug)]
pub struct ProductionAnalysis {
    /// q as a function of labor with other inputs held fixed
    pub production: Expr,
    /// MP = dq/dL
    pub marginal_product: Expr,
    /// MP' = d^2 q / dL^2
    pub marginal_product_slope: Expr,
}

impl ProductionAnalysis {
    pub fn from_input(production: &str) -> Result<ProductionAnalysis, ModelError> {
        let production = Expr::parse_expression(production)
            .map_err(|reason| ModelError::parse(production, reason))?;
        let marginal_product = production.diff("L").simplify_();
        let marginal_product_slope = production.n_th_derivative1D("L", 2);
        debug!("MP = {}, MP' = {}", marginal_product, marginal_product_slope);
        Ok(ProductionAnalysis {
            production,
            marginal_product,
            marginal_product_slope,
        })
    }

    /// Classification of MP' by provable sign on the positive domain.
    pub fn marginal_product_curvature(&self) -> Curvature {
        match self.marginal_product_slope.known_sign() {
            Some(-1) => Curvature::Diminishing,
            Some(0) => Curvature::Constant,
            Some(1) => Curvature::Increasing,
            _ => Curvature::Ambiguous,
        }
    }

    /// Returns to scale: scale every input by a common factor and compare
    /// `q(scaled inputs)` against the scaled output, sampled numerically
    /// at a handful of scale factors and base points.
    pub fn returns_to_scale(&self) -> Result<ReturnsToScale, ModelError> {
        let inputs = self.production.extract_variables();
        if inputs.is_empty() {
            return Ok(ReturnsToScale::Constant);
        }
        let mut verdict: Option<ReturnsToScale> = None;
        for factor in [2.0, 3.0] {
            for base in [1.0, 2.5, 4.0] {
                let mut plain = HashMap::new();
                let mut scaled = HashMap::new();
                for input in &inputs {
                    plain.insert(input.clone(), base);
                    scaled.insert(input.clone(), base * factor);
                }
                let q = self
                    .production
                    .eval_expression(&plain)
                    .map_err(ModelError::Symbolic)?;
                let q_scaled = self
                    .production
                    .eval_expression(&scaled)
                    .map_err(ModelError::Symbolic)?;
                let sample = {
                    let diff = q_scaled - factor * q;
                    if diff.abs() < 1e-9 {
                        ReturnsToScale::Constant
                    } else if diff > 0.0 {
                        ReturnsToScale::Increasing
                    } else {
                        ReturnsToScale::Decreasing
                    }
                };
                match verdict {
                    None => verdict = Some(sample),
                    Some(v) if v == sample => {}
                    Some(_) => return Ok(ReturnsToScale::Ambiguous),
                }
            }
        }
        Ok(verdict.unwrap_or(ReturnsToScale::Constant))
    }

    /// `MP' = ... \le 0` style line; the inequality is attached only when
    /// the sign is provable.
    pub fn marginal_product_slope_line(&self) -> String {
        let relation = match self.marginal_product_slope.known_sign() {
            Some(1) => " \\ge 0",
            Some(-1) => " \\le 0",
            _ => "",
        };
        format!(
            "MP' = \\frac{{\\Delta MP}}{{\\Delta L}} = {}{}",
            self.marginal_product_slope.to_latex(),
            relation
        )
    }
}

/// The cost-curve family derived from a total cost function TC(Q).
#[derive(Clone, Debug)]
pub struct CostFamily {
    pub total_cost: Expr,
    /// FC = TC(0)
    pub fixed_cost: Expr,
    /// VC = TC - FC
    pub variable_cost: Expr,
    /// MC = dTC/dQ
    pub marginal_cost: Expr,
    /// ATC = TC/Q
    pub average_total_cost: Expr,
    /// AVC = VC/Q
    pub average_variable_cost: Expr,
    /// AFC = FC/Q
    pub average_fixed_cost: Expr,
}

impl CostFamily {
    pub fn from_input(total_cost: &str) -> Result<CostFamily, ModelError> {
        let total_cost = Expr::parse_expression(total_cost)
            .map_err(|reason| ModelError::parse(total_cost, reason))?;
        Ok(CostFamily::from_total_cost(total_cost))
    }

    pub fn from_total_cost(total_cost: Expr) -> CostFamily {
        let total_cost = total_cost.simplify_();
        let fixed_cost = total_cost
            .set_variable("Q", Rational64::from_integer(0))
            .simplify_();
        let variable_cost = (total_cost.clone() - fixed_cost.clone()).simplify_();
        let marginal_cost = total_cost.diff("Q").simplify_();
        let q = Expr::var("Q");
        let average_total_cost = (total_cost.clone() / q.clone()).simplify_();
        let average_variable_cost = (variable_cost.clone() / q.clone()).simplify_();
        let average_fixed_cost = (fixed_cost.clone() / q).simplify_();
        CostFamily {
            total_cost,
            fixed_cost,
            variable_cost,
            marginal_cost,
            average_total_cost,
            average_variable_cost,
            average_fixed_cost,
        }
    }

    pub fn report(&self, settings: &Settings) -> Vec<String> {
        let line = |name: &str, expr: &Expr| {
            format!(
                "{} = {}",
                name,
                expr.latex_approx(settings.precision, settings.approx)
            )
        };
        vec![
            line("TC", &self.total_cost),
            line("FC", &self.fixed_cost),
            line("VC", &self.variable_cost),
            line("MC", &self.marginal_cost),
            line("ATC", &self.average_total_cost),
            line("AVC", &self.average_variable_cost),
            line("AFC", &self.average_fixed_cost),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cobb_douglas_has_diminishing_marginal_product() {
        let analysis = ProductionAnalysis::from_input(DEFAULT_PRODUCTION).expect("valid");
        assert_eq!(analysis.marginal_product_curvature(), Curvature::Diminishing);
        assert!(analysis.marginal_product_slope_line().ends_with("\\le 0"));
    }

    #[test]
    fn cobb_douglas_with_unit_exponent_sum_has_constant_returns() {
        let analysis = ProductionAnalysis::from_input(DEFAULT_PRODUCTION).expect("valid");
        assert_eq!(
            analysis.returns_to_scale().expect("samples"),
            ReturnsToScale::Constant
        );
    }

    #[test]
    fn quadratic_production_has_increasing_returns() {
        let analysis = ProductionAnalysis::from_input("L^2").expect("valid");
        assert_eq!(analysis.marginal_product_curvature(), Curvature::Increasing);
        assert_eq!(
            analysis.returns_to_scale().expect("samples"),
            ReturnsToScale::Increasing
        );
    }

    #[test]
    fn concave_production_has_decreasing_returns() {
        let analysis = ProductionAnalysis::from_input("L^(1/2)").expect("valid");
        assert_eq!(
            analysis.returns_to_scale().expect("samples"),
            ReturnsToScale::Decreasing
        );
    }

    #[test]
    fn cost_family_of_the_default_total_cost() {
        let costs = CostFamily::from_input(DEFAULT_TOTAL_COST).expect("valid");
        assert_eq!(costs.fixed_cost, Expr::num(300));
        assert_eq!(
            costs.marginal_cost,
            Expr::var("Q") + Expr::num(10)
        );
        let mut at_seventy = HashMap::new();
        at_seventy.insert("Q".to_owned(), 70.0);
        let atc = costs
            .average_total_cost
            .eval_expression(&at_seventy)
            .expect("evaluates");
        // ATC(70) = 345/7
        approx::assert_relative_eq!(atc, 345.0 / 7.0, max_relative = 1e-12);
    }

    #[test]
    fn variable_cost_excludes_the_fixed_block() {
        let costs = CostFamily::from_input(DEFAULT_TOTAL_COST).expect("valid");
        let zero = costs
            .variable_cost
            .set_variable("Q", Rational64::from_integer(0))
            .simplify_();
        assert_eq!(zero, Expr::num(0));
    }
}
