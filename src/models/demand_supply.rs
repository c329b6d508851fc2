//! Demand and supply curve input shared by several topics: equilibrium
//! and welfare, taxes, externalities. Curves are entered as equations in
//! `P` and `Q` (for example `Q = 50 - P/2`) and inverted into `P_d(Q)`
//! and `P_s(Q)`.

use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use log::debug;

pub const DEFAULT_DEMAND: &str = "Q = 50 - P/2";
pub const DEFAULT_SUPPLY: &str = "Q = P - 5";

#[derive(Clone, Debug)]
pub struct MarketCurves {
    pub demand: Equation,
    pub supply: Equation,
    /// inverse demand P_d(Q)
    pub inverse_demand: Expr,
    /// inverse supply P_s(Q)
    pub inverse_supply: Expr,
}

fn invert(equation: &Equation, label: &str) -> Result<Expr, ModelError> {
    equation
        .solve_unique_positive("P")
        .map(|p| p.simplify_())
        .map_err(|reason| ModelError::no_unique(label, reason))
}

impl MarketCurves {
    pub fn from_input(demand: &str, supply: &str) -> Result<MarketCurves, ModelError> {
        let demand = Equation::parse_equation(demand)
            .map_err(|reason| ModelError::parse(demand, reason))?;
        let supply = Equation::parse_equation(supply)
            .map_err(|reason| ModelError::parse(supply, reason))?;
        let inverse_demand = invert(&demand, "inverse demand")?;
        let inverse_supply = invert(&supply, "inverse supply")?;
        debug!(
            "market curves: P_d = {}, P_s = {}",
            inverse_demand, inverse_supply
        );
        Ok(MarketCurves {
            demand,
            supply,
            inverse_demand,
            inverse_supply,
        })
    }

    pub fn inverse_demand_line(&self, settings: &Settings) -> String {
        format!(
            "P_d = {}",
            self.inverse_demand
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn inverse_supply_line(&self, settings: &Settings) -> String {
        format!(
            "P_s = {}",
            self.inverse_supply
                .latex_approx(settings.precision, settings.approx)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_the_default_curves() {
        let curves = MarketCurves::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).expect("valid");
        assert_eq!(
            curves.inverse_demand,
            Expr::num(100) - Expr::num(2) * Expr::var("Q")
        );
        assert_eq!(curves.inverse_supply, Expr::var("Q") + Expr::num(5));
    }

    #[test]
    fn reports_inverse_curves_in_latex() {
        let curves = MarketCurves::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).expect("valid");
        let settings = Settings::default();
        assert_eq!(curves.inverse_demand_line(&settings), "P_d = 100 - 2 Q");
    }

    #[test]
    fn rejects_malformed_curves() {
        assert!(matches!(
            MarketCurves::from_input("Q = 50 - P/", DEFAULT_SUPPLY),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_curves_that_do_not_pin_down_a_price() {
        // no P at all, nothing to invert
        assert!(matches!(
            MarketCurves::from_input("Q = 10", DEFAULT_SUPPLY),
            Err(ModelError::NoUniqueSolution { .. })
        ));
    }
}
