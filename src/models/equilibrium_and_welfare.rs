//! Market equilibrium and welfare analysis: market-clearing price and
//! quantity, then consumer, producer and total surplus as areas between
//! the inverse curves and the price line.

use crate::models::demand_supply::MarketCurves;
use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use crate::symbolic::symbolic_solve::solve_linear_system;
use log::info;

#[derive(Clone, Debug)]
pub struct Equilibrium {
    pub curves: MarketCurves,
    /// market-clearing price P*
    pub price: Expr,
    /// market-clearing quantity Q*
    pub quantity: Expr,
    pub consumer_surplus: Expr,
    pub producer_surplus: Expr,
    pub total_surplus: Expr,
}

/// Market-clearing `(P, Q)` of a pair of curve equations. Linear curves go
/// through the 2x2 system solve; anything else falls back to clearing
/// `P_d(Q) = P_s(Q)` in `Q` alone.
pub(crate) fn clear_market(
    demand: &Equation,
    supply: &Equation,
    inverse_demand: &Expr,
    inverse_supply: &Expr,
) -> Result<(Expr, Expr), ModelError> {
    let (price, quantity) = match solve_linear_system((demand, supply), "P", "Q") {
        Ok(solution) => solution,
        Err(_) => {
            let clearing = Equation::new(inverse_demand.clone(), inverse_supply.clone());
            let quantity = clearing
                .solve_unique_positive("Q")
                .map_err(|reason| ModelError::no_unique("market equilibrium", reason))?;
            let price = inverse_demand
                .substitute_variable("Q", &quantity)
                .simplify_();
            (price, quantity)
        }
    };
    for (label, value) in [("P", &price), ("Q", &quantity)] {
        if value.eval_numeric().map(|v| v <= 0.0).unwrap_or(false) {
            return Err(ModelError::NonPositive {
                what: format!("equilibrium {}", label),
                value: value.to_string(),
            });
        }
    }
    Ok((price.simplify_(), quantity.simplify_()))
}

impl Equilibrium {
    pub fn from_input(demand: &str, supply: &str) -> Result<Equilibrium, ModelError> {
        let curves = MarketCurves::from_input(demand, supply)?;
        Equilibrium::from_curves(curves)
    }

    pub fn from_curves(curves: MarketCurves) -> Result<Equilibrium, ModelError> {
        let (price, quantity) = clear_market(
            &curves.demand,
            &curves.supply,
            &curves.inverse_demand,
            &curves.inverse_supply,
        )?;
        let zero = Expr::num(0);
        let consumer_surplus = (curves.inverse_demand.clone() - price.clone())
            .definite_integrate("Q", &zero, &quantity)
            .map_err(ModelError::Symbolic)?;
        let producer_surplus = (price.clone() - curves.inverse_supply.clone())
            .definite_integrate("Q", &zero, &quantity)
            .map_err(ModelError::Symbolic)?;
        let total_surplus = (consumer_surplus.clone() + producer_surplus.clone()).simplify_();
        info!("equilibrium P* = {}, Q* = {}", price, quantity);
        Ok(Equilibrium {
            curves,
            price,
            quantity,
            consumer_surplus,
            producer_surplus,
            total_surplus,
        })
    }

    /// The `cases` block showing both curves clearing into `(P*, Q*)`.
    pub fn equilibrium_block(&self, settings: &Settings) -> String {
        format!(
            "\\begin{{cases}}{}\\\\{}\\end{{cases}} \\implies \\begin{{cases}}P^* = {}\\\\Q^* = {}\\end{{cases}}",
            self.curves.demand.to_latex(),
            self.curves.supply.to_latex(),
            self.price.latex_approx(settings.precision, settings.approx),
            self.quantity.latex_approx(settings.precision, settings.approx),
        )
    }

    pub fn consumer_surplus_line(&self, settings: &Settings) -> String {
        format!(
            "CS = \\int_{{0}}^{{Q^*}}P_d - P^*\\,dQ = {}",
            self.consumer_surplus
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn producer_surplus_line(&self, settings: &Settings) -> String {
        format!(
            "PS = \\int_{{0}}^{{Q^*}}P^* - P_s\\,dQ = {}",
            self.producer_surplus
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn total_surplus_line(&self, settings: &Settings) -> String {
        format!(
            "TS = CS + PS = {}",
            self.total_surplus
                .latex_approx(settings.precision, settings.approx)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demand_supply::{DEFAULT_DEMAND, DEFAULT_SUPPLY};
    use num::rational::Rational64;

    fn rational(n: i64, d: i64) -> Expr {
        Expr::Const(Rational64::new(n, d))
    }

    #[test]
    fn default_market_clears_exactly() {
        let eq = Equilibrium::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).expect("clears");
        assert_eq!(eq.price, rational(110, 3));
        assert_eq!(eq.quantity, rational(95, 3));
    }

    #[test]
    fn welfare_areas_match_hand_computation() {
        let eq = Equilibrium::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).expect("clears");
        assert_eq!(eq.consumer_surplus, rational(9025, 9));
        assert_eq!(eq.producer_surplus, rational(9025, 18));
        assert_eq!(eq.total_surplus, rational(9025, 6));
    }

    #[test]
    fn nonlinear_curves_clear_by_substitution() {
        // P_d = 100/Q, P_s = Q: equilibrium at Q = 10, P = 10
        let eq = Equilibrium::from_input("Q = 100/P", "Q = P").expect("clears");
        assert_eq!(eq.price, Expr::num(10));
        assert_eq!(eq.quantity, Expr::num(10));
    }

    #[test]
    fn rejects_demand_curves_without_positive_prices() {
        // inverse demand is negative on the whole positive quadrant
        let result = Equilibrium::from_input("Q = -10 - P", "Q = P");
        assert!(result.is_err());
    }
}
