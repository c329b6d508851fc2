//! Per-unit taxes on consumption and production. A consumer tax `t_c`
//! shifts the demand curve through `P -> P + t_c`, a producer tax `t_p`
//! shifts supply through `P -> P - t_p`; negative values model subsidies.
//! The calculator derives the taxed equilibrium, the price wedge between
//! consumers and producers, government revenue and the deadweight loss,
//! plus an incidence narrative separating who legally pays the tax from
//! who actually bears it.

use crate::models::demand_supply::MarketCurves;
use crate::models::equilibrium_and_welfare::clear_market;
use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use log::info;

#[derive(Clone, Debug)]
pub struct TaxedMarket {
    pub curves: MarketCurves,
    pub consumer_tax: Expr,
    pub producer_tax: Expr,
    pub taxed_demand: Equation,
    pub taxed_supply: Equation,
    pub taxed_inverse_demand: Expr,
    pub taxed_inverse_supply: Expr,
    /// untaxed equilibrium (P*, Q*)
    pub price: Expr,
    pub quantity: Expr,
    /// quantity traded under taxes Q^t
    pub taxed_quantity: Expr,
    /// P_c^t = P_d(Q^t)
    pub consumer_price: Expr,
    /// P_p^t = P_s(Q^t)
    pub producer_price: Expr,
    pub government_revenue: Expr,
    pub deadweight_loss: Expr,
}

fn parse_tax(input: &str) -> Result<Expr, ModelError> {
    Expr::parse_expression(input).map_err(|reason| ModelError::parse(input, reason))
}

impl TaxedMarket {
    pub fn from_input(
        demand: &str,
        supply: &str,
        consumer_tax: &str,
        producer_tax: &str,
    ) -> Result<TaxedMarket, ModelError> {
        let curves = MarketCurves::from_input(demand, supply)?;
        let consumer_tax = parse_tax(consumer_tax)?;
        let producer_tax = parse_tax(producer_tax)?;

        let shifted_demand = Expr::var("P") + consumer_tax.clone();
        let shifted_supply = Expr::var("P") - producer_tax.clone();
        let taxed_demand = curves.demand.substitute_variable("P", &shifted_demand);
        let taxed_supply = curves.supply.substitute_variable("P", &shifted_supply);

        let taxed_inverse_demand = taxed_demand
            .solve_unique_positive("P")
            .map_err(|reason| ModelError::no_unique("taxed inverse demand", reason))?;
        let taxed_inverse_supply = taxed_supply
            .solve_unique_positive("P")
            .map_err(|reason| ModelError::no_unique("taxed inverse supply", reason))?;

        let (price, quantity) = clear_market(
            &curves.demand,
            &curves.supply,
            &curves.inverse_demand,
            &curves.inverse_supply,
        )?;
        let (_, taxed_quantity) = clear_market(
            &taxed_demand,
            &taxed_supply,
            &taxed_inverse_demand,
            &taxed_inverse_supply,
        )?;

        let consumer_price = curves
            .inverse_demand
            .substitute_variable("Q", &taxed_quantity)
            .simplify_();
        let producer_price = curves
            .inverse_supply
            .substitute_variable("Q", &taxed_quantity)
            .simplify_();
        let government_revenue =
            ((consumer_tax.clone() + producer_tax.clone()) * taxed_quantity.clone()).simplify_();
        let deadweight_loss = (curves.inverse_demand.clone() - curves.inverse_supply.clone())
            .definite_integrate("Q", &taxed_quantity, &quantity)
            .map_err(ModelError::Symbolic)?;
        info!(
            "taxed market: Q^t = {}, P_c^t = {}, P_p^t = {}",
            taxed_quantity, consumer_price, producer_price
        );

        Ok(TaxedMarket {
            curves,
            consumer_tax,
            producer_tax,
            taxed_demand,
            taxed_supply,
            taxed_inverse_demand,
            taxed_inverse_supply,
            price,
            quantity,
            taxed_quantity,
            consumer_price,
            producer_price,
            government_revenue,
            deadweight_loss,
        })
    }

    pub fn consumer_tax_burden(&self) -> Expr {
        (self.consumer_price.clone() - self.price.clone()).simplify_()
    }

    pub fn producer_tax_burden(&self) -> Expr {
        (self.price.clone() - self.producer_price.clone()).simplify_()
    }

    pub fn taxed_equilibrium_block(&self, settings: &Settings) -> String {
        format!(
            "\\begin{{cases}}{}\\\\{}\\end{{cases}} \\implies Q^t = {}",
            self.taxed_demand.to_latex(),
            self.taxed_supply.to_latex(),
            self.taxed_quantity
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn government_revenue_line(&self, settings: &Settings) -> String {
        format!(
            "GR = (t_c + t_p)Q^t = {}",
            self.government_revenue
                .latex_approx(settings.precision, settings.approx)
        )
    }

    pub fn deadweight_loss_line(&self, settings: &Settings) -> String {
        format!(
            "DWL = \\int_{{Q^t}}^{{Q^*}}P_d - P_s\\,dQ = {}",
            self.deadweight_loss
                .latex_approx(settings.precision, settings.approx)
        )
    }

    /// Legal versus economic incidence, ported line by line from the
    /// classroom narration.
    pub fn incidence_text(&self, settings: &Settings) -> String {
        let approx =
            |expr: &Expr| -> String { expr.latex_approx(settings.precision, settings.approx) };
        let consumer_taxed = !self.consumer_tax.is_zero();
        let producer_taxed = !self.producer_tax.is_zero();
        if !consumer_taxed && !producer_taxed {
            return "No tax is imposed. Neither the consumer nor the producer bears the legal \
                    or economic incidence of the tax."
                .to_owned();
        }

        let mut text = String::from("The government imposes a tax of ");
        if consumer_taxed {
            text.push_str(&format!(
                "\\(t_c = {}\\) on consumers",
                approx(&self.consumer_tax)
            ));
            if producer_taxed {
                text.push_str(&format!(
                    " and a tax of \\(t_p = {}\\) on producers",
                    approx(&self.producer_tax)
                ));
            }
        } else {
            text.push_str(&format!(
                "\\(t_p = {}\\) on producers",
                approx(&self.producer_tax)
            ));
        }
        text.push_str(". The legal incidence of the tax is on ");
        text.push_str(match (consumer_taxed, producer_taxed) {
            (true, true) => "both consumers and producers. ",
            (true, false) => "consumers. ",
            _ => "producers. ",
        });

        text.push_str(&format!(
            "\\begin{{align*}}P_c^t &= P_d(Q^t) = {}\\\\P_p^t &= P_s(Q^t) = {}\\end{{align*}}",
            approx(&self.consumer_price),
            approx(&self.producer_price)
        ));

        let consumer_burden = self.consumer_tax_burden();
        let producer_burden = self.producer_tax_burden();
        if !consumer_burden.is_zero() {
            text.push_str(&format!(
                "Consumers pay an extra \\(P_c^t - P^* = {}\\) per unit",
                approx(&consumer_burden)
            ));
            if !producer_burden.is_zero() {
                text.push_str(&format!(
                    " and producers receive \\(P^* - P_p^t = {}\\) less per unit",
                    approx(&producer_burden)
                ));
            }
            text.push_str(". ");
        } else if !producer_burden.is_zero() {
            text.push_str(&format!(
                "Producers receive \\(P^* - P_p^t = {}\\) less per unit. ",
                approx(&producer_burden)
            ));
        }

        text.push_str("The economic incidence of the tax is on ");
        text.push_str(
            match (!consumer_burden.is_zero(), !producer_burden.is_zero()) {
                (true, true) => "both consumers and producers.",
                (true, false) => "consumers.",
                _ => "producers.",
            },
        );
        text
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

    fn default_market() -> TaxedMarket {
        TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "5", "5").expect("valid")
    }

    #[test]
    fn taxes_shift_the_inverse_curves() {
        let market = default_market();
        assert_eq!(
            market.taxed_inverse_demand,
            Expr::num(95) - Expr::num(2) * Expr::var("Q")
        );
        assert_eq!(
            market.taxed_inverse_supply,
            Expr::var("Q") + Expr::num(10)
        );
    }

    #[test]
    fn taxed_equilibrium_and_price_wedge() {
        let market = default_market();
        assert_eq!(market.taxed_quantity, rational(85, 3));
        assert_eq!(market.consumer_price, rational(130, 3));
        assert_eq!(market.producer_price, rational(100, 3));
    }

    #[test]
    fn revenue_and_deadweight_loss() {
        let market = default_market();
        assert_eq!(market.government_revenue, rational(850, 3));
        assert_eq!(market.deadweight_loss, rational(50, 3));
    }

    #[test]
    fn burdens_split_the_wedge() {
        let market = default_market();
        assert_eq!(market.consumer_tax_burden(), rational(20, 3));
        assert_eq!(market.producer_tax_burden(), rational(10, 3));
        let text = market.incidence_text(&Settings::default());
        assert!(text.contains("both consumers and producers."));
    }

    #[test]
    fn zero_taxes_leave_the_market_untouched() {
        let market =
            TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "0", "0").expect("valid");
        assert_eq!(market.taxed_quantity, market.quantity);
        assert_eq!(market.government_revenue, Expr::num(0));
        assert_eq!(market.deadweight_loss, Expr::num(0));
        assert!(market
            .incidence_text(&Settings::default())
            .starts_with("No tax is imposed."));
    }

    #[test]
    fn a_subsidy_raises_the_traded_quantity() {
        let market =
            TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "-5", "0").expect("valid");
        let subsidized = market.taxed_quantity.eval_numeric().expect("numeric");
        let untaxed = market.quantity.eval_numeric().expect("numeric");
        assert!(subsidized > untaxed);
    }
}
