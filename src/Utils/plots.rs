//! Bitmap renderers for the standard diagrams. Each function samples the
//! symbolic curves through `lambdify1D`, draws with plotters and writes a
//! PNG to the given path. Quantities run along the x axis and prices along
//! the y axis; domains span `[0, 2 Q]` around the quantity of interest.

use crate::models::errors::ModelError;
use crate::models::externalities::ExternalitiesMarket;
use crate::models::monopoly::MonopolyMarket;
use crate::models::taxes_and_subsidies::TaxedMarket;
use crate::models::equilibrium_and_welfare::Equilibrium;
use crate::models::trade_and_ppf::TradeScenario;
use crate::settings::{PlotTheme, Settings};
use crate::symbolic::symbolic_engine::Expr;
use plotters::prelude::*;

const SAMPLES: usize = 200;

fn plot_err<E: std::fmt::Display>(error: E) -> ModelError {
    ModelError::Plot(error.to_string())
}

fn numeric(expr: &Expr) -> Result<f64, ModelError> {
    expr.eval_numeric().map_err(ModelError::Symbolic)
}

fn background(theme: PlotTheme) -> RGBColor {
    match theme {
        PlotTheme::Light => WHITE,
        PlotTheme::Dark => RGBColor(30, 30, 30),
    }
}

fn foreground(theme: PlotTheme) -> RGBColor {
    match theme {
        PlotTheme::Light => BLACK,
        PlotTheme::Dark => WHITE,
    }
}

fn sample_curve(expr: &Expr, var: &str, from: f64, to: f64) -> Vec<(f64, f64)> {
    let f = expr.lambdify1D(var);
    (0..=SAMPLES)
        .map(|i| {
            let x = from + (to - from) * i as f64 / SAMPLES as f64;
            (x, f(x))
        })
        .filter(|(_, y)| y.is_finite())
        .collect()
}

/// Closed region between two curves on `[from, to]`, upper edge forward
/// and lower edge back.
fn region_between(upper: &Expr, lower: &Expr, var: &str, from: f64, to: f64) -> Vec<(f64, f64)> {
    let mut points = sample_curve(upper, var, from, to);
    let mut back = sample_curve(lower, var, from, to);
    back.reverse();
    points.extend(back);
    points
}

fn y_ceiling(series: &[&[(f64, f64)]]) -> f64 {
    let y_max = series
        .iter()
        .flat_map(|s| s.iter())
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);
    y_max * 1.05
}

/// Demand and supply with the consumer and producer surplus triangles
/// shaded above and below the equilibrium price.
pub fn plot_equilibrium(
    equilibrium: &Equilibrium,
    settings: &Settings,
    filename: &str,
) -> Result<(), ModelError> {
    let q_star = numeric(&equilibrium.quantity)?;
    let p_star = numeric(&equilibrium.price)?;
    let demand = sample_curve(&equilibrium.curves.inverse_demand, "Q", 0.0, 2.0 * q_star);
    let supply = sample_curve(&equilibrium.curves.inverse_supply, "Q", 0.0, 2.0 * q_star);

    let bg = background(settings.theme);
    let fg = foreground(settings.theme);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&bg).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Market equilibrium", ("sans-serif", 40).into_font().color(&fg))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..2.0 * q_star, 0.0..y_ceiling(&[&demand, &supply]))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Q")
        .y_desc("P")
        .axis_style(&fg)
        .label_style(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(AreaSeries::new(
            sample_curve(&equilibrium.curves.inverse_demand, "Q", 0.0, q_star),
            p_star,
            BLUE.mix(0.25),
        ))
        .map_err(plot_err)?
        .label(" CS")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.25).filled()));
    chart
        .draw_series(AreaSeries::new(
            sample_curve(&equilibrium.curves.inverse_supply, "Q", 0.0, q_star),
            p_star,
            RED.mix(0.25),
        ))
        .map_err(plot_err)?
        .label(" PS")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.mix(0.25).filled()));

    chart
        .draw_series(LineSeries::new(demand, &BLUE))
        .map_err(plot_err)?
        .label(" Demand")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(LineSeries::new(supply, &RED))
        .map_err(plot_err)?
        .label(" Supply")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, p_star), (q_star, p_star), (q_star, 0.0)],
            fg.mix(0.5),
        )))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(&bg.mix(0.8))
        .border_style(&fg)
        .label_font(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;
    root_area.present().map_err(plot_err)?;
    Ok(())
}

/// Untaxed and taxed curves with the government revenue rectangle between
/// the consumer and producer prices and the deadweight loss triangle
/// between the taxed and untaxed quantities.
pub fn plot_tax_wedge(
    market: &TaxedMarket,
    settings: &Settings,
    filename: &str,
) -> Result<(), ModelError> {
    let q_star = numeric(&market.quantity)?;
    let q_taxed = numeric(&market.taxed_quantity)?;
    let p_consumer = numeric(&market.consumer_price)?;
    let p_producer = numeric(&market.producer_price)?;
    let hi = 2.0 * q_star.max(q_taxed);
    let demand = sample_curve(&market.curves.inverse_demand, "Q", 0.0, hi);
    let supply = sample_curve(&market.curves.inverse_supply, "Q", 0.0, hi);
    let taxed_demand = sample_curve(&market.taxed_inverse_demand, "Q", 0.0, hi);
    let taxed_supply = sample_curve(&market.taxed_inverse_supply, "Q", 0.0, hi);

    let bg = background(settings.theme);
    let fg = foreground(settings.theme);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&bg).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Tax incidence", ("sans-serif", 40).into_font().color(&fg))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..hi, 0.0..y_ceiling(&[&demand, &supply, &taxed_demand, &taxed_supply]))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Q")
        .y_desc("P")
        .axis_style(&fg)
        .label_style(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.0, p_producer), (q_taxed, p_consumer)],
            GREEN.mix(0.25).filled(),
        )))
        .map_err(plot_err)?
        .label(" GR")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], GREEN.mix(0.25).filled()));
    let (lo, hi_q) = (q_star.min(q_taxed), q_star.max(q_taxed));
    chart
        .draw_series(std::iter::once(Polygon::new(
            region_between(
                &market.curves.inverse_demand,
                &market.curves.inverse_supply,
                "Q",
                lo,
                hi_q,
            ),
            MAGENTA.mix(0.25),
        )))
        .map_err(plot_err)?
        .label(" DWL")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], MAGENTA.mix(0.25).filled()));

    for (series, label, color) in [
        (demand, " Demand", BLUE),
        (supply, " Supply", RED),
    ] {
        chart
            .draw_series(LineSeries::new(series, &color))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    for (series, label, color) in [
        (taxed_demand, " Taxed demand", BLUE),
        (taxed_supply, " Taxed supply", RED),
    ] {
        chart
            .draw_series(LineSeries::new(series, color.mix(0.5)))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.mix(0.5)));
    }
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(q_taxed, 0.0), (q_taxed, p_consumer)],
            fg.mix(0.5),
        )))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(&bg.mix(0.8))
        .border_style(&fg)
        .label_font(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;
    root_area.present().map_err(plot_err)?;
    Ok(())
}

/// Marginal social benefit and cost, the private curves when they differ,
/// and the welfare loss between the market and socially optimal
/// quantities.
pub fn plot_externalities(
    market: &ExternalitiesMarket,
    settings: &Settings,
    filename: &str,
) -> Result<(), ModelError> {
    let q_market = numeric(&market.market_quantity)?;
    let q_optimal = numeric(&market.optimal_quantity)?;
    let hi = 2.0 * q_market.max(q_optimal);
    let msb = sample_curve(&market.marginal_social_benefit, "Q", 0.0, hi);
    let msc = sample_curve(&market.marginal_social_cost, "Q", 0.0, hi);
    let has_benefit = !market.marginal_external_benefit.is_zero();
    let has_cost = !market.marginal_external_cost.is_zero();

    let bg = background(settings.theme);
    let fg = foreground(settings.theme);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&bg).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Externalities", ("sans-serif", 40).into_font().color(&fg))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..hi, 0.0..y_ceiling(&[&msb, &msc]))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Q")
        .y_desc("P")
        .axis_style(&fg)
        .label_style(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;

    if q_market != q_optimal {
        let (lo, hi_q) = (q_market.min(q_optimal), q_market.max(q_optimal));
        chart
            .draw_series(std::iter::once(Polygon::new(
                region_between(
                    &market.marginal_social_benefit,
                    &market.marginal_social_cost,
                    "Q",
                    lo,
                    hi_q,
                ),
                MAGENTA.mix(0.25),
            )))
            .map_err(plot_err)?
            .label(" DWL")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], MAGENTA.mix(0.25).filled())
            });
    }

    chart
        .draw_series(LineSeries::new(msb, &BLUE))
        .map_err(plot_err)?
        .label(" MSB")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(LineSeries::new(msc, &RED))
        .map_err(plot_err)?
        .label(" MSC")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    if has_benefit {
        chart
            .draw_series(LineSeries::new(
                sample_curve(&market.curves.inverse_demand, "Q", 0.0, hi),
                BLUE.mix(0.5),
            ))
            .map_err(plot_err)?
            .label(" MPB")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.mix(0.5)));
    }
    if has_cost {
        chart
            .draw_series(LineSeries::new(
                sample_curve(&market.curves.inverse_supply, "Q", 0.0, hi),
                RED.mix(0.5),
            ))
            .map_err(plot_err)?
            .label(" MPC")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.mix(0.5)));
    }
    for q in [q_market, q_optimal] {
        let top = market
            .marginal_social_benefit
            .lambdify1D("Q")(q)
            .max(market.marginal_social_cost.lambdify1D("Q")(q));
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(q, 0.0), (q, top)],
                fg.mix(0.5),
            )))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(&bg.mix(0.8))
        .border_style(&fg)
        .label_font(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;
    root_area.present().map_err(plot_err)?;
    Ok(())
}

/// Demand, marginal revenue, marginal and average total cost, with the
/// profit rectangle between price and average cost at the chosen output.
pub fn plot_monopoly(
    market: &MonopolyMarket,
    settings: &Settings,
    filename: &str,
) -> Result<(), ModelError> {
    let q_m = numeric(&market.quantity)?;
    let p_m = numeric(&market.price)?;
    let atc_m = numeric(&market.average_total_cost)?;
    let q_star = numeric(&market.competitive_quantity)?;
    let hi = 1.5 * q_m.max(q_star);
    let demand = sample_curve(&market.inverse_demand, "Q", 0.0, hi);
    let marginal_revenue = sample_curve(&market.marginal_revenue, "Q", 0.0, hi);
    let marginal_cost = sample_curve(&market.costs.marginal_cost, "Q", 0.0, hi);
    let average_cost = sample_curve(&market.costs.average_total_cost, "Q", hi / SAMPLES as f64, hi);

    let bg = background(settings.theme);
    let fg = foreground(settings.theme);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&bg).map_err(plot_err)?;

    // ATC explodes near Q = 0, so the price axis follows demand alone
    let mut chart = ChartBuilder::on(&root_area)
        .caption("Monopoly", ("sans-serif", 40).into_font().color(&fg))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..hi, 0.0..y_ceiling(&[&demand]))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Q")
        .y_desc("P")
        .axis_style(&fg)
        .label_style(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.0, atc_m), (q_m, p_m)],
            GREEN.mix(0.25).filled(),
        )))
        .map_err(plot_err)?
        .label(" Profit")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], GREEN.mix(0.25).filled()));

    for (series, label, color) in [
        (demand, " Demand", BLUE),
        (marginal_revenue, " MR", CYAN),
        (marginal_cost, " MC", RED),
        (average_cost, " ATC", MAGENTA),
    ] {
        chart
            .draw_series(LineSeries::new(series, &color))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, p_m), (q_m, p_m), (q_m, 0.0)],
            fg.mix(0.5),
        )))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(&bg.mix(0.8))
        .border_style(&fg)
        .label_font(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;
    root_area.present().map_err(plot_err)?;
    Ok(())
}

/// Both parties' production possibility frontiers and the joint frontier,
/// with the kink marked when comparative advantages differ.
pub fn plot_ppf(
    scenario: &TradeScenario,
    settings: &Settings,
    filename: &str,
) -> Result<(), ModelError> {
    let joint = scenario.joint_ppf()?;
    let max_a_a = numeric(&scenario.max_a.0)?;
    let max_a_b = numeric(&scenario.max_a.1)?;
    let max_b_a = numeric(&scenario.max_b.0)?;
    let max_b_b = numeric(&scenario.max_b.1)?;

    let bg = background(settings.theme);
    let fg = foreground(settings.theme);
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&bg).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Production possibility frontiers", ("sans-serif", 40).into_font().color(&fg))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..joint.total_b * 1.05, 0.0..joint.total_a * 1.05)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(scenario.good_b.as_str())
        .y_desc(scenario.good_a.as_str())
        .axis_style(&fg)
        .label_style(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;

    for (frontier, label, color) in [
        (vec![(0.0, max_a_a), (max_a_b, 0.0)], scenario.party_a.clone(), BLUE),
        (vec![(0.0, max_b_a), (max_b_b, 0.0)], scenario.party_b.clone(), RED),
    ] {
        chart
            .draw_series(LineSeries::new(frontier, &color))
            .map_err(plot_err)?
            .label(format!(" {}", label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart
        .draw_series(LineSeries::new(
            vec![(0.0, joint.total_a), joint.mid, (joint.total_b, 0.0)],
            GREEN.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(" Joint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));
    if joint.kinked {
        chart
            .draw_series(std::iter::once(Circle::new(joint.mid, 4, GREEN.filled())))
            .map_err(plot_err)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, joint.mid.1), joint.mid, (joint.mid.0, 0.0)],
                fg.mix(0.5),
            )))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(&bg.mix(0.8))
        .border_style(&fg)
        .label_font(("sans-serif", 15).into_font().color(&fg))
        .draw()
        .map_err(plot_err)?;
    root_area.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demand_supply::{DEFAULT_DEMAND, DEFAULT_SUPPLY};
    use crate::models::externalities::{DEFAULT_MEB, DEFAULT_MEC};
    use tempfile::tempdir;

    fn written(path: &std::path::Path) -> bool {
        std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
    }

    #[test]
    fn renders_the_equilibrium_diagram() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("equilibrium.png");
        let equilibrium = Equilibrium::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY).expect("model");
        plot_equilibrium(&equilibrium, &Settings::default(), path.to_str().expect("utf8 path"))
            .expect("render");
        assert!(written(&path));
    }

    #[test]
    fn renders_the_tax_wedge_on_a_dark_background() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("taxes.png");
        let market =
            TaxedMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, "10", "0").expect("model");
        let settings = Settings {
            theme: PlotTheme::Dark,
            ..Settings::default()
        };
        plot_tax_wedge(&market, &settings, path.to_str().expect("utf8 path")).expect("render");
        assert!(written(&path));
    }

    #[test]
    fn renders_the_externalities_diagram() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("externalities.png");
        let market =
            ExternalitiesMarket::from_input(DEFAULT_DEMAND, DEFAULT_SUPPLY, DEFAULT_MEB, DEFAULT_MEC)
                .expect("model");
        plot_externalities(&market, &Settings::default(), path.to_str().expect("utf8 path"))
            .expect("render");
        assert!(written(&path));
    }

    #[test]
    fn renders_the_monopoly_diagram() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("monopoly.png");
        let market = MonopolyMarket::from_input(
            crate::models::monopoly::DEFAULT_DEMAND,
            crate::models::monopoly::DEFAULT_TOTAL_COST,
        )
        .expect("model");
        plot_monopoly(&market, &Settings::default(), path.to_str().expect("utf8 path"))
            .expect("render");
        assert!(written(&path));
    }

    #[test]
    fn renders_the_joint_frontier() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("ppf.png");
        let scenario = TradeScenario::default_example();
        plot_ppf(&scenario, &Settings::default(), path.to_str().expect("utf8 path"))
            .expect("render");
        assert!(written(&path));
    }
}
