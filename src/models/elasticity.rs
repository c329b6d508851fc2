//! Point elasticity for four applications: own-price elasticity of demand
//! and supply, cross-price elasticity, income elasticity. Each application
//! carries its own symbols, default curve and point, and interpretation
//! table; the calculator produces `epsilon = dy/dx * x/y`, the curve-
//! substituted form `epsilon(x)`, and the elasticity at a user-chosen
//! point classified against the table.

use crate::models::errors::ModelError;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use log::debug;
use tabled::builder::Builder;
use tabled::settings::Style;

/// One row of an interpretation table: where the elasticity falls and
/// what that says about the good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpsilonBand {
    /// the point elasticity diverges
    PerfectlyElastic,
    LessThan(i64),
    Equal(i64),
    Between {
        lo: i64,
        hi: i64,
        include_hi: bool,
    },
    GreaterThan(i64),
}

impl EpsilonBand {
    fn matches(&self, value: f64) -> bool {
        match *self {
            EpsilonBand::PerfectlyElastic => value.is_infinite(),
            EpsilonBand::LessThan(bound) => value < bound as f64,
            EpsilonBand::Equal(bound) => value == bound as f64,
            EpsilonBand::Between { lo, hi, include_hi } => {
                value > lo as f64 && (value < hi as f64 || (include_hi && value == hi as f64))
            }
            EpsilonBand::GreaterThan(bound) => value.is_finite() && value > bound as f64,
        }
    }

    fn latex(&self, symbol: &str) -> String {
        let symbol = Expr::var(symbol).to_latex();
        match *self {
            EpsilonBand::PerfectlyElastic => format!("{} = \\pm\\infty", symbol),
            EpsilonBand::LessThan(bound) => format!("{} < {}", symbol, bound),
            EpsilonBand::Equal(bound) => format!("{} = {}", symbol, bound),
            EpsilonBand::Between { lo, hi, include_hi } => {
                let hi_rel = if include_hi { "\\le" } else { "<" };
                format!("{} < {} {} {}", lo, symbol, hi_rel, hi)
            }
            EpsilonBand::GreaterThan(bound) => format!("{} > {}", symbol, bound),
        }
    }
}

/// Static description of one elasticity application.
pub struct ApplicationInfo {
    pub name: &'static str,
    /// LaTeX-facing symbol of the elasticity, e.g. `varepsilon_d`
    pub epsilon_symbol: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub default_equation: &'static str,
    pub default_point: &'static str,
    pub label_header: &'static str,
    pub note_header: &'static str,
    pub rows: &'static [(EpsilonBand, &'static str, &'static str)],
}

pub const DEMAND_INFO: ApplicationInfo = ApplicationInfo {
    name: "Elasticity of demand",
    epsilon_symbol: "varepsilon_d",
    x: "P",
    y: "Q_d",
    default_equation: "Q_d = 100 - P",
    default_point: "Q_d = 90",
    label_header: "How elastic",
    note_header: "Responsiveness",
    rows: &[
        (EpsilonBand::PerfectlyElastic, "perfectly elastic", "extremely"),
        (EpsilonBand::LessThan(-1), "elastic", "very"),
        (EpsilonBand::Equal(-1), "unit elastic", "fairly"),
        (
            EpsilonBand::Between {
                lo: -1,
                hi: 0,
                include_hi: false,
            },
            "inelastic",
            "not very",
        ),
        (EpsilonBand::Equal(0), "perfectly inelastic", "not at all"),
    ],
};

pub const SUPPLY_INFO: ApplicationInfo = ApplicationInfo {
    name: "Elasticity of supply",
    epsilon_symbol: "varepsilon_s",
    x: "P",
    y: "Q_s",
    default_equation: "Q_s = P - 5",
    default_point: "P = 10",
    label_header: "How elastic",
    note_header: "Responsiveness",
    rows: &[
        (EpsilonBand::Equal(0), "perfectly inelastic", "not at all"),
        (
            EpsilonBand::Between {
                lo: 0,
                hi: 1,
                include_hi: false,
            },
            "inelastic",
            "not very",
        ),
        (EpsilonBand::Equal(1), "unit elastic", "fairly"),
        (EpsilonBand::GreaterThan(1), "elastic", "very"),
        (EpsilonBand::PerfectlyElastic, "perfectly elastic", "extremely"),
    ],
};

pub const CROSS_PRICE_INFO: ApplicationInfo = ApplicationInfo {
    name: "Cross-price elasticity",
    epsilon_symbol: "varepsilon_AB",
    x: "P_B",
    y: "Q_A",
    default_equation: "Q_A = 10",
    default_point: "P_B = 1",
    label_header: "Relationship",
    note_header: "Example",
    rows: &[
        (EpsilonBand::LessThan(0), "complements", "bacon and eggs"),
        (EpsilonBand::Equal(0), "independent", "ice cream and chainsaws"),
        (EpsilonBand::GreaterThan(0), "substitutes", "tea and coffee"),
    ],
};

pub const INCOME_INFO: ApplicationInfo = ApplicationInfo {
    name: "Income elasticity",
    epsilon_symbol: "eta",
    x: "Y",
    y: "Q",
    default_equation: "Q = Y",
    default_point: "Y = 10",
    label_header: "Type of good",
    note_header: "Example",
    rows: &[
        (EpsilonBand::LessThan(0), "inferior", "instant noodles and frozen food"),
        (EpsilonBand::Equal(0), "neutral", ""),
        (
            EpsilonBand::Between {
                lo: 0,
                hi: 1,
                include_hi: true,
            },
            "normal",
            "food and clothes in general",
        ),
        (EpsilonBand::GreaterThan(1), "luxury", "jewelry and high-end watches"),
    ],
};

pub const APPLICATIONS: [&ApplicationInfo; 4] =
    [&DEMAND_INFO, &SUPPLY_INFO, &CROSS_PRICE_INFO, &INCOME_INFO];

/// Elasticity at the chosen point. Diverging values (a point on the
/// quantity axis, say) classify as perfectly elastic.
#[derive(Clone, Debug, PartialEq)]
pub enum PointElasticity {
    Finite(Expr),
    Infinite,
}

pub struct ElasticityAnalysis {
    pub info: &'static ApplicationInfo,
    /// y solved from the entered curve, as a function of x
    pub y_of_x: Expr,
    /// dy/dx * x/y, in both x and y
    pub epsilon: Expr,
    /// epsilon with y substituted out, simplified
    pub epsilon_x: Expr,
    pub point_x: Expr,
    pub point_y: Expr,
    pub point_elasticity: PointElasticity,
}

impl ElasticityAnalysis {
    pub fn analyze(
        info: &'static ApplicationInfo,
        equation: &str,
        point: &str,
    ) -> Result<ElasticityAnalysis, ModelError> {
        let relation = Equation::parse_equation(equation)
            .map_err(|reason| ModelError::parse(equation, reason))?;
        let y_of_x = relation
            .solve_unique_positive(info.y)
            .map_err(|reason| ModelError::no_unique(info.y, reason))?;

        let epsilon = y_of_x.diff(info.x).simplify_() * Expr::var(info.x) / Expr::var(info.y);
        let epsilon_x = epsilon
            .substitute_variable(info.y, &y_of_x)
            .simplify_();

        // the point input is itself an equation in x or y, solved jointly
        // with the curve
        let point_eq = Equation::parse_equation(point)
            .map_err(|reason| ModelError::parse(point, reason))?;
        let point_in_x = point_eq.substitute_variable(info.y, &y_of_x);
        let point_x = point_in_x
            .solve_for(info.x)
            .map_err(|reason| ModelError::no_unique("point", reason))
            .and_then(|roots| {
                roots
                    .into_iter()
                    .find(|r| r.eval_numeric().map(|v| v >= 0.0).unwrap_or(false))
                    .ok_or_else(|| ModelError::no_unique("point", "no admissible value for x"))
            })?;
        let point_y = y_of_x.substitute_variable(info.x, &point_x).simplify_();
        debug!(
            "{}: point ({} = {}, {} = {})",
            info.name, info.x, point_x, info.y, point_y
        );

        let at_point = epsilon
            .substitute_variable(info.x, &point_x)
            .substitute_variable(info.y, &point_y)
            .simplify_();
        let point_elasticity = match at_point.eval_numeric() {
            Ok(value) if value.is_finite() => PointElasticity::Finite(at_point),
            _ => PointElasticity::Infinite,
        };

        Ok(ElasticityAnalysis {
            info,
            y_of_x,
            epsilon,
            epsilon_x,
            point_x,
            point_y,
            point_elasticity,
        })
    }

    /// Index of the interpretation row the point elasticity falls in.
    pub fn classify(&self) -> Option<usize> {
        let value = match &self.point_elasticity {
            PointElasticity::Finite(expr) => expr.eval_numeric().ok()?,
            PointElasticity::Infinite => f64::INFINITY,
        };
        self.info
            .rows
            .iter()
            .position(|(band, _, _)| band.matches(value))
    }

    /// The point-method definition line with the computed elasticity.
    pub fn elasticity_line(&self) -> String {
        let eps = Expr::var(self.info.epsilon_symbol).to_latex();
        let x = Expr::var(self.info.x).to_latex();
        let y = Expr::var(self.info.y).to_latex();
        let mut line = format!(
            "{} = \\frac{{d{}}}{{d{}}} \\cdot \\frac{{{}}}{{{}}} = {}",
            eps,
            y,
            x,
            x,
            y,
            self.epsilon.to_latex()
        );
        if self.epsilon_x != self.epsilon {
            line.push_str(&format!(" = {}", self.epsilon_x.to_latex()));
        }
        line
    }

    /// Console interpretation table; the matching row is marked.
    pub fn interpretation_table(&self) -> String {
        let matched = self.classify();
        let mut builder = Builder::default();
        builder.push_record([self.info.name, self.info.label_header, self.info.note_header]);
        for (i, (band, label, note)) in self.info.rows.iter().enumerate() {
            let condition = band.latex(self.info.epsilon_symbol);
            let condition = if matched == Some(i) {
                format!("* {}", condition)
            } else {
                condition
            };
            builder.push_record([condition.as_str(), label, note]);
        }
        builder.build().with(Style::modern_rounded()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::rational::Rational64;

    #[test]
    fn default_demand_point_is_inelastic() {
        let analysis = ElasticityAnalysis::analyze(
            &DEMAND_INFO,
            DEMAND_INFO.default_equation,
            DEMAND_INFO.default_point,
        )
        .expect("analyzes");
        assert_eq!(analysis.point_x, Expr::num(10));
        assert_eq!(analysis.point_y, Expr::num(90));
        assert_eq!(
            analysis.point_elasticity,
            PointElasticity::Finite(Expr::Const(Rational64::new(-1, 9)))
        );
        // -1 < -1/9 < 0: inelastic
        assert_eq!(analysis.classify(), Some(3));
    }

    #[test]
    fn default_supply_point_is_elastic() {
        let analysis = ElasticityAnalysis::analyze(
            &SUPPLY_INFO,
            SUPPLY_INFO.default_equation,
            SUPPLY_INFO.default_point,
        )
        .expect("analyzes");
        assert_eq!(analysis.point_x, Expr::num(10));
        assert_eq!(analysis.point_y, Expr::num(5));
        assert_eq!(
            analysis.point_elasticity,
            PointElasticity::Finite(Expr::num(2))
        );
        assert_eq!(analysis.classify(), Some(3));
    }

    #[test]
    fn constant_demand_is_independent_of_the_other_price() {
        let analysis = ElasticityAnalysis::analyze(
            &CROSS_PRICE_INFO,
            CROSS_PRICE_INFO.default_equation,
            CROSS_PRICE_INFO.default_point,
        )
        .expect("analyzes");
        assert_eq!(
            analysis.point_elasticity,
            PointElasticity::Finite(Expr::num(0))
        );
        assert_eq!(analysis.classify(), Some(1));
    }

    #[test]
    fn point_on_the_quantity_axis_is_perfectly_elastic() {
        let analysis = ElasticityAnalysis::analyze(&DEMAND_INFO, "Q_d = 100 - P", "Q_d = 0")
            .expect("analyzes");
        assert_eq!(analysis.point_elasticity, PointElasticity::Infinite);
        assert_eq!(analysis.classify(), Some(0));
    }

    #[test]
    fn interpretation_table_marks_the_matching_row() {
        let analysis = ElasticityAnalysis::analyze(
            &DEMAND_INFO,
            DEMAND_INFO.default_equation,
            DEMAND_INFO.default_point,
        )
        .expect("analyzes");
        let table = analysis.interpretation_table();
        assert!(table.contains("* -1 < \\varepsilon_{d} < 0"));
        assert!(table.contains("unit elastic"));
    }

    #[test]
    fn rejects_curves_that_do_not_determine_y() {
        let result = ElasticityAnalysis::analyze(&DEMAND_INFO, "P = 10", "Q_d = 90");
        assert!(matches!(result, Err(ModelError::NoUniqueSolution { .. })));
    }
}
