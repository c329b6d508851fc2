//! Absolute and comparative advantage between two parties producing two
//! goods, plus their individual and joint production possibility
//! frontiers. Maximum outputs are entered as expressions and must be
//! positive; opportunity costs are exact ratios, and the joint PPF kinks
//! at the point where production switches to the party with the higher
//! opportunity cost.

use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use tabled::builder::Builder;
use tabled::settings::Style;

pub const DEFAULT_GOOD_A: &str = "Pepper mills";
pub const DEFAULT_GOOD_B: &str = "Salt shakers";
pub const DEFAULT_PARTY_A: &str = "Broderick";
pub const DEFAULT_PARTY_B: &str = "Christopher";
pub const DEFAULT_MAXIMA_A: (&str, &str) = ("8", "8");
pub const DEFAULT_MAXIMA_B: (&str, &str) = ("2", "4");

#[derive(Clone, Debug)]
pub struct TradeScenario {
    pub good_a: String,
    pub good_b: String,
    pub party_a: String,
    pub party_b: String,
    /// maximum output of (good_a, good_b) when each party spends all its
    /// time on that one good
    pub max_a: (Expr, Expr),
    pub max_b: (Expr, Expr),
}

/// The joint frontier with good_b output on the x axis and good_a output
/// on the y axis, as the plots draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct JointPpf {
    /// (x, y) of the kink between the two specialization segments
    pub mid: (f64, f64),
    /// x intercept: both parties produce only good_b
    pub total_b: f64,
    /// y intercept: both parties produce only good_a
    pub total_a: f64,
    /// false when opportunity costs tie and the frontier is a straight
    /// line
    pub kinked: bool,
}

fn parse_positive(input: &str, what: &str) -> Result<Expr, ModelError> {
    let value =
        Expr::parse_expression(input).map_err(|reason| ModelError::parse(input, reason))?;
    match value.eval_numeric() {
        Ok(v) if v > 0.0 => Ok(value.simplify_()),
        _ => Err(ModelError::NonPositive {
            what: what.to_owned(),
            value: input.to_owned(),
        }),
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Prose for who holds the advantage in each good; `None` means a tie.
fn advantage_text(
    kind: &str,
    good_a: &str,
    good_b: &str,
    winner_a: Option<&str>,
    winner_b: Option<&str>,
) -> String {
    if winner_a == winner_b {
        let winner = winner_a.map(capitalized).unwrap_or_else(|| "Neither".to_owned());
        return format!(
            "{} has the {} advantage in the production of both {} and {}.",
            winner, kind, good_a, good_b
        );
    }
    let sentence = |winner: Option<&str>, good: &str| {
        format!(
            "{} has the {} advantage in the production of {}.",
            winner.map(capitalized).unwrap_or_else(|| "Neither".to_owned()),
            kind,
            good
        )
    };
    format!(
        "{} {}",
        sentence(winner_a, good_a),
        sentence(winner_b, good_b)
    )
}

impl TradeScenario {
    #[allow(clippy::too_many_arguments)]
    pub fn from_input(
        good_a: &str,
        good_b: &str,
        party_a: &str,
        max_a: (&str, &str),
        party_b: &str,
        max_b: (&str, &str),
    ) -> Result<TradeScenario, ModelError> {
        let max_a = (
            parse_positive(max_a.0, &format!("{}'s maximum output of {}", party_a, good_a))?,
            parse_positive(max_a.1, &format!("{}'s maximum output of {}", party_a, good_b))?,
        );
        let max_b = (
            parse_positive(max_b.0, &format!("{}'s maximum output of {}", party_b, good_a))?,
            parse_positive(max_b.1, &format!("{}'s maximum output of {}", party_b, good_b))?,
        );
        Ok(TradeScenario {
            good_a: good_a.to_owned(),
            good_b: good_b.to_owned(),
            party_a: party_a.to_owned(),
            party_b: party_b.to_owned(),
            max_a,
            max_b,
        })
    }

    pub fn default_example() -> TradeScenario {
        TradeScenario::from_input(
            DEFAULT_GOOD_A,
            DEFAULT_GOOD_B,
            DEFAULT_PARTY_A,
            DEFAULT_MAXIMA_A,
            DEFAULT_PARTY_B,
            DEFAULT_MAXIMA_B,
        )
        .unwrap_or_else(|_| unreachable!("default inputs are valid"))
    }

    /// Opportunity cost of one unit of `good_a` for party A, in units of
    /// good_b forgone; and so on for the other three combinations.
    pub fn opportunity_costs(&self) -> [[Expr; 2]; 2] {
        let cost = |forgone: &Expr, produced: &Expr| {
            (forgone.clone() / produced.clone()).simplify_()
        };
        [
            [cost(&self.max_a.1, &self.max_a.0), cost(&self.max_a.0, &self.max_a.1)],
            [cost(&self.max_b.1, &self.max_b.0), cost(&self.max_b.0, &self.max_b.1)],
        ]
    }

    fn winner<'a>(&'a self, a_value: f64, b_value: f64, prefer_lower: bool) -> Option<&'a str> {
        if a_value == b_value {
            return None;
        }
        let a_wins = if prefer_lower {
            a_value < b_value
        } else {
            a_value > b_value
        };
        Some(if a_wins { &self.party_a } else { &self.party_b })
    }

    /// Whoever can produce more of a good holds the absolute advantage.
    pub fn absolute_advantage_text(&self) -> String {
        let winner_a = self.winner(
            self.max_a.0.eval_numeric().unwrap_or(f64::NAN),
            self.max_b.0.eval_numeric().unwrap_or(f64::NAN),
            false,
        );
        let winner_b = self.winner(
            self.max_a.1.eval_numeric().unwrap_or(f64::NAN),
            self.max_b.1.eval_numeric().unwrap_or(f64::NAN),
            false,
        );
        advantage_text("absolute", &self.good_a, &self.good_b, winner_a, winner_b)
    }

    /// Whoever forgoes less of the other good holds the comparative
    /// advantage.
    pub fn comparative_advantage_text(&self) -> String {
        let costs = self.opportunity_costs();
        let winner_a = self.winner(
            costs[0][0].eval_numeric().unwrap_or(f64::NAN),
            costs[1][0].eval_numeric().unwrap_or(f64::NAN),
            true,
        );
        let winner_b = self.winner(
            costs[0][1].eval_numeric().unwrap_or(f64::NAN),
            costs[1][1].eval_numeric().unwrap_or(f64::NAN),
            true,
        );
        advantage_text("comparative", &self.good_a, &self.good_b, winner_a, winner_b)
    }

    pub fn opportunity_cost_table(&self, settings: &Settings) -> String {
        let costs = self.opportunity_costs();
        let mut builder = Builder::default();
        builder.push_record(["", self.good_a.as_str(), self.good_b.as_str()]);
        for (party, row) in [(&self.party_a, &costs[0]), (&self.party_b, &costs[1])] {
            builder.push_record([
                party.clone(),
                row[0].latex_approx(settings.precision, settings.approx),
                row[1].latex_approx(settings.precision, settings.approx),
            ]);
        }
        builder.build().with(Style::modern_rounded()).to_string()
    }

    /// The joint frontier: specialize the low-cost party into good_a
    /// first, which puts the kink at its full output.
    pub fn joint_ppf(&self) -> Result<JointPpf, ModelError> {
        let numeric = |expr: &Expr| expr.eval_numeric().map_err(ModelError::Symbolic);
        let max_a_a = numeric(&self.max_a.0)?;
        let max_a_b = numeric(&self.max_a.1)?;
        let max_b_a = numeric(&self.max_b.0)?;
        let max_b_b = numeric(&self.max_b.1)?;
        let cost_a_a = max_a_b / max_a_a;
        let cost_b_a = max_b_b / max_b_a;

        let (mid_a, mid_b, kinked) = if cost_a_a < cost_b_a {
            (max_a_a, max_b_b, true)
        } else if cost_a_a == cost_b_a {
            (max_a_a, max_b_b, false)
        } else {
            (max_b_a, max_a_b, true)
        };
        let ppf = JointPpf {
            mid: (mid_b, mid_a),
            total_b: max_a_b + max_b_b,
            total_a: max_a_a + max_b_a,
            kinked,
        };
        debug!("joint PPF: {:?}", ppf);
        Ok(ppf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::rational::Rational64;

    #[test]
    fn broderick_holds_both_absolute_advantages() {
        let scenario = TradeScenario::default_example();
        assert_eq!(
            scenario.absolute_advantage_text(),
            "Broderick has the absolute advantage in the production of both Pepper mills and \
             Salt shakers."
        );
    }

    #[test]
    fn comparative_advantage_follows_the_lower_opportunity_cost() {
        let scenario = TradeScenario::default_example();
        assert_eq!(
            scenario.comparative_advantage_text(),
            "Broderick has the comparative advantage in the production of Pepper mills. \
             Christopher has the comparative advantage in the production of Salt shakers."
        );
    }

    #[test]
    fn opportunity_costs_are_exact_ratios() {
        let scenario = TradeScenario::default_example();
        let costs = scenario.opportunity_costs();
        assert_eq!(costs[0][0], Expr::num(1));
        assert_eq!(costs[1][0], Expr::num(2));
        assert_eq!(costs[1][1], Expr::Const(Rational64::new(1, 2)));
    }

    #[test]
    fn joint_frontier_kinks_at_the_specialization_point() {
        let scenario = TradeScenario::default_example();
        let ppf = scenario.joint_ppf().expect("numeric");
        assert_eq!(
            ppf,
            JointPpf {
                mid: (4.0, 8.0),
                total_b: 12.0,
                total_a: 10.0,
                kinked: true,
            }
        );
    }

    #[test]
    fn equal_costs_give_a_straight_joint_frontier() {
        let scenario = TradeScenario::from_input(
            "Wine",
            "Cloth",
            "A",
            ("4", "4"),
            "B",
            ("2", "2"),
        )
        .expect("valid");
        assert!(!scenario.joint_ppf().expect("numeric").kinked);
    }

    #[test]
    fn ties_in_advantage_say_neither() {
        let scenario = TradeScenario::from_input(
            "Wine",
            "Cloth",
            "A",
            ("4", "8"),
            "B",
            ("4", "2"),
        )
        .expect("valid");
        let text = scenario.absolute_advantage_text();
        assert!(text.starts_with("Neither has the absolute advantage in the production of Wine."));
    }

    #[test]
    fn rejects_non_positive_maxima() {
        let result = TradeScenario::from_input(
            "Wine",
            "Cloth",
            "A",
            ("0", "4"),
            "B",
            ("2", "2"),
        );
        assert!(matches!(result, Err(ModelError::NonPositive { .. })));
    }
}
