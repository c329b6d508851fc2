//! Monopoly pricing. From the entered demand equation and total cost
//! function the calculator derives total and marginal revenue, the cost
//! family, the profit-maximizing quantity where `MR = MC`, the monopoly
//! price and profit, and the welfare triangle lost relative to the
//! competitive outcome where `P_d = MC`.

use crate::models::errors::ModelError;
use crate::models::production_and_costs::CostFamily;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use log::info;

pub const DEFAULT_DEMAND: &str = "P = 360 - 2Q";
pub const DEFAULT_TOTAL_COST: &str = "300 + 10Q + Q^2/2";

#[derive(Clone, Debug)]
pub struct MonopolyMarket {
    /// P_d(Q) from the entered demand equation
    pub inverse_demand: Expr,
    /// TR = P_d * Q
    pub total_revenue: Expr,
    /// MR = dTR/dQ
    pub marginal_revenue: Expr,
    pub costs: CostFamily,
    /// profit-maximizing quantity Q^m
    pub quantity: Expr,
    /// P^m = P_d(Q^m)
    pub price: Expr,
    /// ATC evaluated at Q^m
    pub average_total_cost: Expr,
    /// profit = (P^m - ATC^m) Q^m
    pub profit: Expr,
    pub consumer_surplus: Expr,
    pub producer_surplus: Expr,
    /// competitive quantity Q* where P_d = MC
    pub competitive_quantity: Expr,
    pub deadweight_loss: Expr,
}

impl MonopolyMarket {
    pub fn from_input(demand: &str, total_cost: &str) -> Result<MonopolyMarket, ModelError> {
        let demand = Equation::parse_equation(demand)
            .map_err(|reason| ModelError::parse(demand, reason))?;
        let inverse_demand = demand
            .solve_unique_positive("P")
            .map_err(|reason| ModelError::no_unique("inverse demand", reason))?;
        let costs = CostFamily::from_input(total_cost)?;

        let total_revenue = (inverse_demand.clone() * Expr::var("Q")).simplify_();
        let marginal_revenue = total_revenue.diff("Q").simplify_();

        let quantity = Equation::new(marginal_revenue.clone(), costs.marginal_cost.clone())
            .solve_unique_positive("Q")
            .map_err(|reason| ModelError::no_unique("monopoly quantity", reason))?;
        let price = inverse_demand
            .substitute_variable("Q", &quantity)
            .simplify_();
        let average_total_cost = costs
            .average_total_cost
            .substitute_variable("Q", &quantity)
            .simplify_();
        let profit =
            ((price.clone() - average_total_cost.clone()) * quantity.clone()).simplify_();

        let zero = Expr::num(0);
        let consumer_surplus = (inverse_demand.clone() - price.clone())
            .definite_integrate("Q", &zero, &quantity)
            .map_err(ModelError::Symbolic)?;
        let producer_surplus = (price.clone() - costs.marginal_cost.clone())
            .definite_integrate("Q", &zero, &quantity)
            .map_err(ModelError::Symbolic)?;

        let competitive_quantity =
            Equation::new(inverse_demand.clone(), costs.marginal_cost.clone())
                .solve_unique_positive("Q")
                .map_err(|reason| ModelError::no_unique("competitive quantity", reason))?;
        let deadweight_loss = (inverse_demand.clone() - costs.marginal_cost.clone())
            .definite_integrate("Q", &quantity, &competitive_quantity)
            .map_err(ModelError::Symbolic)?;
        info!(
            "monopoly: Q^m = {}, P^m = {}, profit = {}",
            quantity, price, profit
        );

        Ok(MonopolyMarket {
            inverse_demand,
            total_revenue,
            marginal_revenue,
            costs,
            quantity,
            price,
            average_total_cost,
            profit,
            consumer_surplus,
            producer_surplus,
            competitive_quantity,
            deadweight_loss,
        })
    }

    /// The `MR = MC` optimum as a display block.
    pub fn optimum_block(&self, settings: &Settings) -> String {
        format!(
            "{} = {} \\implies \\begin{{cases}}P^m = {}\\\\Q^m = {}\\end{{cases}}",
            self.marginal_revenue.to_latex(),
            self.costs.marginal_cost.to_latex(),
            self.price.latex_approx(settings.precision, settings.approx),
            self.quantity
                .latex_approx(settings.precision, settings.approx),
        )
    }

    pub fn profit_line(&self, settings: &Settings) -> String {
        format!(
            "\\pi = (P^m - ATC^m)Q^m = {}",
            self.profit.latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn deadweight_loss_line(&self, settings: &Settings) -> String {
        format!(
            "DWL = \\int_{{Q^m}}^{{Q^*}}P_d - MC\\,dQ = {}",
            self.deadweight_loss
                .latex_approx(settings.precision, settings.approx)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::rational::Rational64;

    fn default_market() -> MonopolyMarket {
        MonopolyMarket::from_input(DEFAULT_DEMAND, DEFAULT_TOTAL_COST).expect("valid")
    }

    fn rational(n: i64, d: i64) -> Expr {
        Expr::Const(Rational64::new(n, d))
    }

    #[test]
    fn marginal_revenue_falls_twice_as_fast_as_demand() {
        let market = default_market();
        assert_eq!(
            market.marginal_revenue,
            Expr::num(360) - Expr::num(4) * Expr::var("Q")
        );
    }

    #[test]
    fn monopoly_optimum_and_profit() {
        let market = default_market();
        assert_eq!(market.quantity, Expr::num(70));
        assert_eq!(market.price, Expr::num(220));
        assert_eq!(market.average_total_cost, rational(345, 7));
        assert_eq!(market.profit, Expr::num(11950));
    }

    #[test]
    fn welfare_under_monopoly() {
        let market = default_market();
        assert_eq!(market.consumer_surplus, Expr::num(4900));
        assert_eq!(market.competitive_quantity, rational(350, 3));
        assert_eq!(market.deadweight_loss, rational(9800, 3));
    }

    #[test]
    fn rejects_total_cost_that_never_crosses_marginal_revenue() {
        // MC = 360 + Q stays above MR everywhere on the positive domain
        let result = MonopolyMarket::from_input(DEFAULT_DEMAND, "360Q + Q^2/2");
        assert!(matches!(
            result,
            Err(ModelError::NoUniqueSolution { .. })
        ));
    }
}
