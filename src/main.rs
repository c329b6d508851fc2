//MIT License
#![allow(non_snake_case)]
pub mod Utils;
pub mod models;
pub mod settings;
pub mod symbolic;

use crate::Utils::logger::init_logging;
use crate::Utils::plots;
use crate::models::demand_supply::{DEFAULT_DEMAND, DEFAULT_SUPPLY, MarketCurves};
use crate::models::elasticity::{DEMAND_INFO, ElasticityAnalysis};
use crate::models::equilibrium_and_welfare::Equilibrium;
use crate::models::externalities::{DEFAULT_MEB, DEFAULT_MEC, ExternalitiesMarket};
use crate::models::monopoly;
use crate::models::monopoly::MonopolyMarket;
use crate::models::oligopoly::PayoffMatrix;
use crate::models::production_and_costs::{
    CostFamily, DEFAULT_PRODUCTION, DEFAULT_TOTAL_COST, ProductionAnalysis,
};
use crate::models::taxes_and_subsidies::TaxedMarket;
use crate::models::trade_and_ppf::TradeScenario;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::Expr;

fn main() {
    let settings = Settings::default();
    init_logging(&settings).unwrap();
    let example = 1;
    match example {
        0 => {
            // SYMBOLIC ENGINE
            // parse a demand curve, differentiate, solve and integrate it
            let input = "100 - 2*Q";
            let parsed_expression = Expr::parse_expression(input).unwrap();
            println!("parsed expression {}", parsed_expression);
            let simplified = parsed_expression.simplify_();
            println!("simplified {}", simplified);
            println!("LaTeX: {}", simplified.to_latex());

            let slope = simplified.diff("Q");
            println!("d/dQ = {}", slope);

            let equation = crate::symbolic::symbolic_engine::Equation::new(
                simplified.clone(),
                Expr::num(40),
            );
            let roots = equation.solve_for("Q").unwrap();
            println!("100 - 2Q = 40 at Q = {:?}", roots);

            let area = simplified
                .definite_integrate("Q", &Expr::num(0), &Expr::num(30))
                .unwrap();
            println!("integral over [0, 30] = {}", area);
        }
        1 => {
            // EQUILIBRIUM AND WELFARE
            let equilibrium = Equilibrium::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).unwrap();
            println!("{}", equilibrium.equilibrium_block(&settings));
            println!("{}", equilibrium.consumer_surplus_line(&settings));
            println!("{}", equilibrium.producer_surplus_line(&settings));
            println!("{}", equilibrium.total_surplus_line(&settings));
            plots::plot_equilibrium(&equilibrium, &settings, "equilibrium.png").unwrap();
        }
        2 => {
            // ELASTICITY
            let analysis = ElasticityAnalysis::analyze(
                &DEMAND_INFO,
                DEMAND_INFO.default_equation,
                DEMAND_INFO.default_point,
            )
            .unwrap();
            println!("{}", analysis.elasticity_line());
            println!("{}", analysis.interpretation_table());
        }
        3 => {
            // TAXES AND SUBSIDIES
            let market = TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "10", "0").unwrap();
            println!("{}", market.taxed_equilibrium_block(&settings));
            println!("{}", market.government_revenue_line(&settings));
            println!("{}", market.deadweight_loss_line(&settings));
            println!("{}", market.incidence_text(&settings));
            plots::plot_tax_wedge(&market, &settings, "taxes.png").unwrap();
        }
        4 => {
            // EXTERNALITIES
            let market =
                ExternalitiesMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, DEFAULT_MEB, DEFAULT_MEC)
                    .unwrap();
            println!("{}", market.social_benefit_line(&settings));
            println!("{}", market.social_cost_line(&settings));
            println!("{}", market.market_equilibrium_block(&settings));
            println!("{}", market.optimal_equilibrium_block(&settings));
            println!("{}", market.deadweight_loss_line(&settings));
            plots::plot_externalities(&market, &settings, "externalities.png").unwrap();
        }
        5 => {
            // PRODUCTION AND COSTS
            let production = ProductionAnalysis::from_input(DEFAULT_PRODUCTION).unwrap();
            println!("{}", production.marginal_product_slope_line());
            println!("returns to scale: {}", production.returns_to_scale().unwrap());

            let costs = CostFamily::from_input(DEFAULT_TOTAL_COST).unwrap();
            for line in costs.report(&settings) {
                println!("{}", line);
            }
        }
        6 => {
            // MONOPOLY
            let market =
                MonopolyMarket::from_input(monopoly::DEFAULT_DEMAND, monopoly::DEFAULT_TOTAL_COST)
                    .unwrap();
            println!("{}", market.optimum_block(&settings));
            println!("{}", market.profit_line(&settings));
            println!("{}", market.deadweight_loss_line(&settings));
            plots::plot_monopoly(&market, &settings, "monopoly.png").unwrap();
        }
        7 => {
            // OLIGOPOLY
            let matrix = PayoffMatrix::price_war();
            println!("{}", matrix.render(&settings));
            match matrix.prisoners_dilemma_error() {
                None => println!("{}", matrix.dilemma_text()),
                Some(hint) => println!("not a prisoner's dilemma: {}", hint),
            }
        }
        8 => {
            // TRADE AND THE PPF
            let scenario = TradeScenario::default_example();
            println!("{}", scenario.opportunity_cost_table(&settings));
            println!("{}", scenario.absolute_advantage_text());
            println!("{}", scenario.comparative_advantage_text());
            plots::plot_ppf(&scenario, &settings, "ppf.png").unwrap();
        }
        _ => {
            println!("no such example");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // walkthrough of the default market from curves to welfare numbers
    #[test]
    fn default_market_walkthrough() {
        let settings = Settings::default();
        let curves = MarketCurves::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).unwrap();
        let equilibrium = Equilibrium::from_curves(curves).unwrap();
        assert_eq!(
            equilibrium.total_surplus_line(&settings),
            format!(
                "TS = CS + PS = {}",
                equilibrium.total_surplus.latex_approx(settings.precision, settings.approx)
            )
        );
        let taxed = TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "10", "0").unwrap();
        let burden = (taxed.consumer_tax_burden() + taxed.producer_tax_burden()).simplify_();
        assert_eq!(burden, Expr::num(10));
    }
}
