//! Simultaneous move games between oligopolists. Payoff matrices are
//! entered cell by cell as expressions (sizes 2x2 up to 5x5); the 2x2
//! case is diagnosed as a prisoner's dilemma with hints explaining what
//! breaks when it is not one, and pure-strategy Nash equilibria are found
//! by a best-response scan.

use crate::models::errors::ModelError;
use crate::settings::Settings;
use crate::symbolic::symbolic_engine::Expr;
use itertools::iproduct;
use log::debug;
use tabled::builder::Builder;
use tabled::settings::Style;

pub const MAX_SIZE: usize = 5;

#[derive(Clone, Debug)]
pub struct PayoffMatrix {
    pub row_strategies: Vec<String>,
    pub column_strategies: Vec<String>,
    /// cells[row][column] = (row player's payoff, column player's payoff)
    pub cells: Vec<Vec<(Expr, Expr)>>,
}

impl PayoffMatrix {
    /// The classic price war: cooperate on a high price or defect to a
    /// low one.
    pub fn price_war() -> PayoffMatrix {
        let n = |v: i64| Expr::num(v);
        PayoffMatrix {
            row_strategies: vec!["High".to_owned(), "Low".to_owned()],
            column_strategies: vec!["High".to_owned(), "Low".to_owned()],
            cells: vec![
                vec![(n(4), n(4)), (n(1), n(5))],
                vec![(n(5), n(1)), (n(3), n(3))],
            ],
        }
    }

    pub fn from_input(
        row_strategies: &[&str],
        column_strategies: &[&str],
        payoffs: &[Vec<(&str, &str)>],
    ) -> Result<PayoffMatrix, ModelError> {
        let n_rows = row_strategies.len();
        let n_cols = column_strategies.len();
        if !(2..=MAX_SIZE).contains(&n_rows) || !(2..=MAX_SIZE).contains(&n_cols) {
            return Err(ModelError::no_unique(
                "payoff matrix",
                format!("size must be between 2x2 and {0}x{0}", MAX_SIZE),
            ));
        }
        if payoffs.len() != n_rows || payoffs.iter().any(|row| row.len() != n_cols) {
            return Err(ModelError::no_unique(
                "payoff matrix",
                "payoff cells do not match the strategy labels",
            ));
        }

        let parse_cell = |input: &str, side: &'static str, row: usize, column: usize| {
            Expr::parse_expression(input).map_err(|reason| ModelError::PayoffCell {
                side,
                row: row + 1,
                column: column + 1,
                reason,
            })
        };
        let mut cells = Vec::with_capacity(n_rows);
        for (i, row) in payoffs.iter().enumerate() {
            let mut parsed = Vec::with_capacity(n_cols);
            for (j, (left, right)) in row.iter().enumerate() {
                parsed.push((
                    parse_cell(left, "left", i, j)?,
                    parse_cell(right, "right", i, j)?,
                ));
            }
            cells.push(parsed);
        }
        Ok(PayoffMatrix {
            row_strategies: row_strategies.iter().map(|s| s.to_string()).collect(),
            column_strategies: column_strategies.iter().map(|s| s.to_string()).collect(),
            cells,
        })
    }

    fn numeric_cells(&self) -> Result<Vec<Vec<(f64, f64)>>, ModelError> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, (x, y))| {
                        let located = |side: &'static str| ModelError::PayoffCell {
                            side,
                            row: i + 1,
                            column: j + 1,
                            reason: "payoff must be numeric".to_owned(),
                        };
                        Ok((
                            x.eval_numeric().map_err(|_| located("left"))?,
                            y.eval_numeric().map_err(|_| located("right"))?,
                        ))
                    })
                    .collect()
            })
            .collect()
    }

    /// Pure-strategy Nash equilibria as `(row, column)` indices: cells
    /// where each player's payoff is a best response to the other's
    /// strategy. The first non-numeric payoff errors with its location.
    pub fn nash_equilibria(&self) -> Result<Vec<(usize, usize)>, ModelError> {
        let values = self.numeric_cells()?;
        let n_rows = values.len();
        let n_cols = values.first().map_or(0, Vec::len);
        let equilibria = iproduct!(0..n_rows, 0..n_cols)
            .filter(|&(i, j)| {
                let row_best = (0..n_rows).all(|k| values[i][j].0 >= values[k][j].0);
                let col_best = (0..n_cols).all(|l| values[i][j].1 >= values[i][l].1);
                row_best && col_best
            })
            .collect();
        debug!("nash equilibria: {:?}", equilibria);
        Ok(equilibria)
    }

    /// Why the 2x2 game fails to be a prisoner's dilemma, or None when it
    /// is one. The hints walk through strategy symmetry, payoff symmetry,
    /// and the two payoff orderings that make defection dominant.
    pub fn prisoners_dilemma_error(&self) -> Option<String> {
        if self.cells.len() != 2 || self.cells[0].len() != 2 {
            return Some("Prisoner's dilemma analysis needs a 2 by 2 game.".to_owned());
        }
        let c1 = self.column_strategies[0].to_lowercase();
        let c2 = self.column_strategies[1].to_lowercase();
        let i1 = self.row_strategies[0].to_lowercase();
        let i2 = self.row_strategies[1].to_lowercase();
        if c1 != i1 || c2 != i2 {
            return Some(
                "This is not a prisoner's dilemma. Player 1 and player 2 should have the same \
                 strategies."
                    .to_owned(),
            );
        }

        let values = match self.numeric_cells() {
            Ok(values) => values,
            Err(_) => {
                return Some(
                    "Payoffs must be numeric to diagnose a prisoner's dilemma.".to_owned(),
                );
            }
        };
        let [(r1, r2), (s1, t1)] = [values[0][0], values[0][1]];
        let [(t2, s2), (p1, p2)] = [values[1][0], values[1][1]];

        let mut hints = Vec::new();
        if r1 != r2 {
            hints.push(format!(
                "Player 1 and player 2 should have the same payoff if they both choose {}.",
                c1
            ));
        }
        if s1 != s2 {
            hints.push(format!(
                "Player 1 and player 2 should have the same payoff if they choose {} but their \
                 opponent chooses {}.",
                c1, c2
            ));
        }
        if t1 != t2 {
            hints.push(format!(
                "Player 1 and player 2 should have the same payoff if they choose {} but their \
                 opponent chooses {}.",
                c2, c1
            ));
        }
        if p1 != p2 {
            hints.push(format!(
                "Player 1 and player 2 should have the same payoff if they both choose {}.",
                c2
            ));
        }
        if !hints.is_empty() {
            return Some(format!(
                "This is not a prisoner's dilemma. {}",
                hints.join(" ")
            ));
        }

        let (r, s, t, p) = (r1, s1, t1, p1);
        let mut hints = Vec::new();
        if r <= p {
            hints.push("Mutual cooperation should be superior to mutual defection.".to_owned());
        }
        if t <= r || p <= s {
            hints.push("Defection should be the dominant strategy for both agents.".to_owned());
        }
        if !hints.is_empty() {
            return Some(format!(
                "This is not a prisoner's dilemma. {}",
                hints.join(" ")
            ));
        }
        None
    }

    /// Verdict text for the 2x2 diagnosis: either the failure hints or
    /// the dilemma summary contrasting the equilibrium with the
    /// industry's profit-maximizing outcome.
    pub fn dilemma_text(&self) -> String {
        if let Some(error) = self.prisoners_dilemma_error() {
            return error;
        }
        let cooperate = self.column_strategies[0].to_lowercase();
        let defect = self.column_strategies[1].to_lowercase();
        format!(
            "This is a prisoner's dilemma. The pure equilibrium is when both firms choose {}, \
             but the profit-maximizing strategy for the industry is that they both choose {}.",
            defect, cooperate
        )
    }

    /// Console rendering of the matrix; Nash equilibrium cells are
    /// marked with an asterisk.
    pub fn render(&self, settings: &Settings) -> String {
        let equilibria = self.nash_equilibria().unwrap_or_default();
        let mut builder = Builder::default();
        let mut header = vec![String::new()];
        header.extend(self.column_strategies.iter().cloned());
        builder.push_record(header);
        for (i, row) in self.cells.iter().enumerate() {
            let mut record = vec![self.row_strategies[i].clone()];
            for (j, (x, y)) in row.iter().enumerate() {
                let mark = if equilibria.contains(&(i, j)) { " *" } else { "" };
                record.push(format!(
                    "({}, {}){}",
                    x.latex_approx(settings.precision, settings.approx),
                    y.latex_approx(settings.precision, settings.approx),
                    mark
                ));
            }
            builder.push_record(record);
        }
        builder.build().with(Style::modern_rounded()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_war_is_a_prisoners_dilemma() {
        let game = PayoffMatrix::price_war();
        assert_eq!(game.prisoners_dilemma_error(), None);
        assert!(game.dilemma_text().starts_with("This is a prisoner's dilemma."));
        assert!(game.dilemma_text().contains("both firms choose low"));
    }

    #[test]
    fn price_war_equilibrium_is_mutual_defection() {
        let game = PayoffMatrix::price_war();
        assert_eq!(game.nash_equilibria().expect("numeric"), vec![(1, 1)]);
    }

    #[test]
    fn mismatched_strategy_labels_are_hinted() {
        let game = PayoffMatrix::from_input(
            &["High", "Low"],
            &["Up", "Down"],
            &[
                vec![("4", "4"), ("1", "5")],
                vec![("5", "1"), ("3", "3")],
            ],
        )
        .expect("parses");
        let error = game.prisoners_dilemma_error().expect("not a dilemma");
        assert!(error.contains("same strategies"));
    }

    #[test]
    fn asymmetric_payoffs_are_hinted_with_the_strategy_names() {
        let game = PayoffMatrix::from_input(
            &["High", "Low"],
            &["High", "Low"],
            &[
                vec![("4", "2"), ("1", "5")],
                vec![("5", "1"), ("3", "3")],
            ],
        )
        .expect("parses");
        let error = game.prisoners_dilemma_error().expect("not a dilemma");
        assert!(error.contains("if they both choose high"));
    }

    #[test]
    fn cooperation_must_beat_defection() {
        let game = PayoffMatrix::from_input(
            &["High", "Low"],
            &["High", "Low"],
            &[
                vec![("2", "2"), ("1", "5")],
                vec![("5", "1"), ("3", "3")],
            ],
        )
        .expect("parses");
        let error = game.prisoners_dilemma_error().expect("not a dilemma");
        assert!(error.contains("Mutual cooperation should be superior"));
    }

    #[test]
    fn malformed_cells_are_located() {
        let result = PayoffMatrix::from_input(
            &["High", "Low"],
            &["High", "Low"],
            &[
                vec![("4", "4"), ("1", "5 +")],
                vec![("5", "1"), ("3", "3")],
            ],
        );
        assert!(matches!(
            result,
            Err(ModelError::PayoffCell {
                side: "right",
                row: 1,
                column: 2,
                ..
            })
        ));
    }

    #[test]
    fn coordination_games_have_two_equilibria() {
        let game = PayoffMatrix::from_input(
            &["Opera", "Football"],
            &["Opera", "Football"],
            &[
                vec![("3", "2"), ("0", "0")],
                vec![("0", "0"), ("2", "3")],
            ],
        )
        .expect("parses");
        assert_eq!(
            game.nash_equilibria().expect("numeric"),
            vec![(0, 0), (1, 1)]
        );
    }

    #[test]
    fn non_numeric_payoffs_are_located() {
        let game = PayoffMatrix::from_input(
            &["High", "Low"],
            &["High", "Low"],
            &[
                vec![("4", "4"), ("1", "a")],
                vec![("5", "1"), ("3", "3")],
            ],
        )
        .expect("parses");
        assert!(matches!(
            game.nash_equilibria(),
            Err(ModelError::PayoffCell {
                side: "right",
                row: 1,
                column: 2,
                ..
            })
        ));
    }

    #[test]
    fn hand_built_empty_matrices_have_no_equilibria() {
        let game = PayoffMatrix {
            row_strategies: Vec::new(),
            column_strategies: Vec::new(),
            cells: Vec::new(),
        };
        assert!(game.nash_equilibria().expect("numeric").is_empty());
    }

    #[test]
    fn symbolic_payoffs_render_but_do_not_diagnose() {
        let game = PayoffMatrix::from_input(
            &["High", "Low"],
            &["High", "Low"],
            &[
                vec![("a", "a"), ("1", "5")],
                vec![("5", "1"), ("3", "3")],
            ],
        )
        .expect("parses");
        let error = game.prisoners_dilemma_error().expect("not diagnosable");
        assert!(error.contains("numeric"));
        let table = game.render(&Settings::default());
        assert!(table.contains("(a, 5)") || table.contains("(1, 5)"));
    }
}
