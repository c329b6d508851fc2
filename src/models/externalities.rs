//! External costs and benefits. The entered demand and supply curves act
//! as marginal private benefit (MPB) and marginal private cost (MPC);
//! adding the marginal external benefit (MEB) and cost (MEC) gives the
//! social curves MSB and MSC. The market clears where `MPB = MPC`, society
//! would prefer `MSB = MSC`, and the deadweight loss is the area between
//! the social curves over the gap between the two quantities.

use crate::models::demand_supply::MarketCurves;
use crate::models::equilibrium_and_welfare::clear_market;
use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use log::info;

pub const DEFAULT_MEB: &str = "Q / 2";
pub const DEFAULT_MEC: &str = "0";

#[derive(Clone, Debug)]
pub struct ExternalitiesMarket {
    pub curves: MarketCurves,
    pub marginal_external_benefit: Expr,
    pub marginal_external_cost: Expr,
    /// MSB = MPB + MEB
    pub marginal_social_benefit: Expr,
    /// MSC = MPC + MEC
    pub marginal_social_cost: Expr,
    /// market equilibrium (P^m, Q^m) from MPB = MPC
    pub market_price: Expr,
    pub market_quantity: Expr,
    /// socially optimal (P*, Q*) from MSB = MSC
    pub optimal_price: Expr,
    pub optimal_quantity: Expr,
    pub deadweight_loss: Expr,
}

fn parse_marginal(input: &str) -> Result<Expr, ModelError> {
    Expr::parse_expression(input).map_err(|reason| ModelError::parse(input, reason))
}

impl ExternalitiesMarket {
    pub fn from_input(
        demand: &str,
        supply: &str,
        marginal_external_benefit: &str,
        marginal_external_cost: &str,
    ) -> Result<ExternalitiesMarket, ModelError> {
        let curves = MarketCurves::from_input(demand, supply)?;
        let marginal_external_benefit = parse_marginal(marginal_external_benefit)?;
        let marginal_external_cost = parse_marginal(marginal_external_cost)?;

        let marginal_social_benefit =
            (curves.inverse_demand.clone() + marginal_external_benefit.clone()).simplify_();
        let marginal_social_cost =
            (curves.inverse_supply.clone() + marginal_external_cost.clone()).simplify_();

        let (market_price, market_quantity) = clear_market(
            &curves.demand,
            &curves.supply,
            &curves.inverse_demand,
            &curves.inverse_supply,
        )?;

        let social_clearing = Equation::new(
            marginal_social_benefit.clone(),
            marginal_social_cost.clone(),
        );
        let optimal_quantity = social_clearing
            .solve_unique_positive("Q")
            .map_err(|reason| ModelError::no_unique("socially optimal quantity", reason))?;
        let optimal_price = marginal_social_benefit
            .substitute_variable("Q", &optimal_quantity)
            .simplify_();

        let deadweight_loss = (marginal_social_benefit.clone() - marginal_social_cost.clone())
            .definite_integrate("Q", &market_quantity, &optimal_quantity)
            .map_err(ModelError::Symbolic)?;
        info!(
            "externalities: Q^m = {}, Q^* = {}, DWL = {}",
            market_quantity, optimal_quantity, deadweight_loss
        );

        Ok(ExternalitiesMarket {
            curves,
            marginal_external_benefit,
            marginal_external_cost,
            marginal_social_benefit,
            marginal_social_cost,
            market_price,
            market_quantity,
            optimal_price,
            optimal_quantity,
            deadweight_loss,
        })
    }

    pub fn social_benefit_line(&self, settings: &Settings) -> String {
        format!(
            "MSB = MPB + MEB = {}",
            self.marginal_social_benefit
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn social_cost_line(&self, settings: &Settings) -> String {
        format!(
            "MSC = MPC + MEC = {}",
            self.marginal_social_cost
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn market_equilibrium_block(&self, settings: &Settings) -> String {
        format!(
            "\\begin{{cases}}{}\\\\{}\\end{{cases}} \\implies \\begin{{cases}}P^m = {}\\\\Q^m = {}\\end{{cases}}",
            self.curves.demand.to_latex(),
            self.curves.supply.to_latex(),
            self.market_price
                .latex_approx(settings.precision, settings.approx),
            self.market_quantity
                .latex_approx(settings.precision, settings.approx),
        )
    }

    pub fn optimal_equilibrium_block(&self, settings: &Settings) -> String {
        format!(
            "\\begin{{cases}}P = {}\\\\P = {}\\end{{cases}} \\implies \\begin{{cases}}P^* = {}\\\\Q^* = {}\\end{{cases}}",
            self.marginal_social_benefit.to_latex(),
            self.marginal_social_cost.to_latex(),
            self.optimal_price
                .latex_approx(settings.precision, settings.approx),
            self.optimal_quantity
                .latex_approx(settings.precision, settings.approx),
        )
    }

    /// The integral is written with its bounds ordered low to high so the
    /// displayed formula matches the (non-negative) computed area.
    pub fn deadweight_loss_line(&self, settings: &Settings) -> String {
        let market = self.market_quantity.eval_numeric().unwrap_or(f64::NAN);
        let optimal = self.optimal_quantity.eval_numeric().unwrap_or(f64::NAN);
        let formula = if optimal < market {
            "\\int_{Q^*}^{Q^m}MSC - MSB\\,dQ"
        } else {
            "\\int_{Q^m}^{Q^*}MSB - MSC\\,dQ"
        };
        format!(
            "DWL = {} = {}",
            formula,
            self.deadweight_loss
                .latex_approx(settings.precision, settings.approx)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demand_supply::{DEFAULT_DEMAND, DEFAULT_SUPPLY};
    use num::rational::Rational64;

    fn default_market() -> ExternalitiesMarket {
        ExternalitiesMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, DEFAULT_MEB, DEFAULT_MEC)
            .expect("valid")
    }

    #[test]
    fn social_curves_add_the_external_margins() {
        let market = default_market();
        assert_eq!(
            market.marginal_social_benefit,
            Expr::num(100) - Expr::num(3) * Expr::var("Q") / Expr::num(2)
        );
        assert_eq!(
            market.marginal_social_cost,
            Expr::var("Q") + Expr::num(5)
        );
    }

    #[test]
    fn positive_externality_moves_the_optimum_above_the_market() {
        let market = default_market();
        assert_eq!(market.market_quantity, Expr::Const(Rational64::new(95, 3)));
        assert_eq!(market.optimal_quantity, Expr::num(38));
        assert_eq!(market.optimal_price, Expr::num(43));
    }

    #[test]
    fn deadweight_loss_of_underprovision() {
        let market = default_market();
        assert_eq!(
            market.deadweight_loss,
            Expr::Const(Rational64::new(1805, 36))
        );
        let line = market.deadweight_loss_line(&Settings::default());
        assert!(line.starts_with("DWL = \\int_{Q^m}^{Q^*}MSB - MSC"));
    }

    #[test]
    fn no_externalities_means_no_loss() {
        let market =
            ExternalitiesMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "0", "0")
                .expect("valid");
        assert_eq!(market.optimal_quantity, market.market_quantity);
        assert_eq!(market.deadweight_loss, Expr::num(0));
    }
}
