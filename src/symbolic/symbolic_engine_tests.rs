use crate::settings::Approx;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use crate::symbolic::symbolic_solve::solve_linear_system;
use approx::assert_relative_eq;
use num::rational::Rational64;
use std::collections::HashMap;

#[test]
fn collects_like_terms() {
    let expr = Expr::parse_expression("2Q + 3Q").expect("parses");
    assert_eq!(expr.simplify_(), Expr::num(5) * Expr::var("Q"));
}

#[test]
fn simplifies_into_textbook_shape() {
    // positive term leads, fractional coefficient becomes a quotient
    let expr = Expr::parse_expression("-P/2 + 50").expect("parses");
    assert_eq!(
        expr.simplify_(),
        Expr::num(50) - Expr::var("P") / Expr::num(2)
    );
}

#[test]
fn simplify_is_idempotent() {
    let expr = Expr::parse_expression("(Q + 1)^2 - Q^2").expect("parses");
    let once = expr.simplify_();
    assert_eq!(once.simplify_(), once);
    assert_eq!(once, Expr::num(2) * Expr::var("Q") + Expr::num(1));
}

#[test]
fn folds_perfect_rational_roots() {
    let expr = Expr::parse_expression("(9/4)^(1/2)").expect("parses");
    assert_eq!(expr.simplify_(), Expr::rational(3, 2));
}

#[test]
fn differentiates_marginal_revenue() {
    let total_revenue = Expr::parse_expression("360Q - 2Q^2").expect("parses");
    assert_eq!(
        total_revenue.diff("Q").simplify_(),
        Expr::num(360) - Expr::num(4) * Expr::var("Q")
    );
}

#[test]
fn differentiates_cobb_douglas_marginal_product() {
    let production = Expr::parse_expression("K^(1/2) L^(1/2)").expect("parses");
    let marginal_product = production.diff("L").simplify_();
    let mut values = HashMap::new();
    values.insert("K".to_owned(), 4.0);
    values.insert("L".to_owned(), 9.0);
    // MP_L = (1/2) sqrt(K/L) = 1/3 at K=4, L=9
    assert_relative_eq!(
        marginal_product.eval_expression(&values).expect("evaluates"),
        1.0 / 3.0,
        max_relative = 1e-12
    );
}

#[test]
fn second_derivative_sign_shows_diminishing_returns() {
    let production = Expr::parse_expression("K^(1/2) L^(1/2)").expect("parses");
    let curvature = production.n_th_derivative1D("L", 2);
    assert_eq!(curvature.known_sign(), Some(-1));
}

#[test]
fn known_sign_requires_agreement_across_terms() {
    assert_eq!(
        Expr::parse_expression("Q/2 + 3").unwrap().known_sign(),
        Some(1)
    );
    assert_eq!(
        Expr::parse_expression("-Q - 5").unwrap().known_sign(),
        Some(-1)
    );
    assert_eq!(Expr::parse_expression("Q - 5").unwrap().known_sign(), None);
}

#[test]
fn solves_linear_market_clearing() {
    let equation = Equation::parse_equation("50 - P/2 = P - 5").expect("parses");
    let price = equation.solve_unique_positive("P").expect("one positive root");
    assert_eq!(price, Expr::Const(Rational64::new(110, 3)));
}

#[test]
fn solves_factorable_quadratic() {
    let equation = Equation::parse_equation("Q^2 - 5Q + 6 = 0").expect("parses");
    let roots = equation.solve_for("Q").expect("solvable");
    assert_eq!(roots, vec![Expr::num(2), Expr::num(3)]);
}

#[test]
fn keeps_irrational_roots_symbolic() {
    let equation = Equation::parse_equation("Q^2 = 2").expect("parses");
    let roots = equation.solve_for("Q").expect("solvable");
    assert_eq!(roots.len(), 2);
    assert_relative_eq!(
        roots[1].eval_numeric().expect("numeric"),
        2.0_f64.sqrt(),
        max_relative = 1e-12
    );
}

#[test]
fn rejects_ambiguous_positive_solutions() {
    let equation = Equation::parse_equation("Q^2 - 5Q + 6 = 0").expect("parses");
    // both 2 and 3 are positive, so there is no unique answer
    assert!(equation.solve_unique_positive("Q").is_err());
}

#[test]
fn clears_negative_powers_before_solving() {
    // 90 = 100 / P  =>  P = 10/9
    let equation = Equation::parse_equation("90 = 100 / P").expect("parses");
    let price = equation.solve_unique_positive("P").expect("one positive root");
    assert_eq!(price, Expr::Const(Rational64::new(10, 9)));
}

#[test]
fn solves_two_by_two_linear_system() {
    let first = Equation::parse_equation("x + y = 10").expect("parses");
    let second = Equation::parse_equation("x - y = 4").expect("parses");
    let (x, y) = solve_linear_system((&first, &second), "x", "y").expect("regular system");
    assert_eq!(x, Expr::num(7));
    assert_eq!(y, Expr::num(3));
}

#[test]
fn integrates_inverse_demand_exactly() {
    let inverse_demand = Expr::parse_expression("100 - 2Q").expect("parses");
    let area = inverse_demand
        .definite_integrate("Q", &Expr::num(0), &Expr::num(10))
        .expect("integrable");
    assert_eq!(area, Expr::num(900));
}

#[test]
fn integrates_reciprocal_and_exponential_terms() {
    let expr = Expr::parse_expression("1/Q").expect("parses");
    let antiderivative = expr.integrate("Q").expect("integrable");
    assert_eq!(antiderivative, Expr::var("Q").ln());

    let expr = Expr::parse_expression("exp(2Q)").expect("parses");
    let area = expr
        .definite_integrate("Q", &Expr::num(0), &Expr::num(1))
        .expect("integrable");
    assert_relative_eq!(
        area.eval_numeric().expect("numeric"),
        (2.0_f64.exp() - 1.0) / 2.0,
        max_relative = 1e-12
    );
}

#[test]
fn reports_unsupported_integrands() {
    let expr = Expr::parse_expression("ln(Q + 1)").expect("parses");
    assert!(expr.integrate("Q").is_err());
}

#[test]
fn substitution_and_variable_listing() {
    let expr = Expr::parse_expression("P Q_d + t_c").expect("parses");
    assert_eq!(expr.extract_variables(), vec!["P", "Q_d", "t_c"]);
    let shifted = expr.substitute_variable("P", &(Expr::var("P") + Expr::var("t_c")));
    assert!(shifted.contains_variable("t_c"));
    let bound = expr
        .set_variable("P", Rational64::from_integer(2))
        .set_variable("Q_d", Rational64::from_integer(3))
        .set_variable("t_c", Rational64::from_integer(4))
        .simplify_();
    assert_eq!(bound, Expr::num(10));
}

#[test]
fn renders_fractions_subscripts_and_roots_in_latex() {
    assert_eq!(Expr::rational(110, 3).to_latex(), "\\frac{110}{3}");
    assert_eq!(Expr::var("Q_d").to_latex(), "Q_{d}");
    assert_eq!(Expr::var("varepsilon").to_latex(), "\\varepsilon");
    assert_eq!(Expr::var("L").sqrt().to_latex(), "\\sqrt{L}");
    let curve = Expr::parse_expression("50 - P/2").expect("parses").simplify_();
    assert_eq!(curve.to_latex(), "50 - \\frac{P}{2}");
}

#[test]
fn latex_approx_modes() {
    let exact = Expr::rational(110, 3);
    assert_eq!(exact.latex_approx(15, Approx::Hide), "\\frac{110}{3}");
    assert_eq!(exact.latex_approx(15, Approx::Replace), "36.6666666666667");
    assert_eq!(
        exact.latex_approx(15, Approx::Append),
        "\\frac{110}{3} \\approx 36.6666666666667"
    );
    // integers stay exact in every mode
    assert_eq!(Expr::num(70).latex_approx(15, Approx::Append), "70");
}

#[test]
fn terminating_decimals_need_no_approximation() {
    // 1/2 is already exact as 0.5, so nothing is appended or replaced
    let half = Expr::rational(1, 2);
    assert_eq!(half.latex_approx(15, Approx::Append), "\\frac{1}{2}");
    assert_eq!(half.latex_approx(15, Approx::Replace), "\\frac{1}{2}");
    assert_eq!(
        Expr::rational(-145, 4).latex_approx(15, Approx::Append),
        "- \\frac{145}{4}"
    );
    // 1/4 does not terminate within one significant digit
    assert_eq!(
        Expr::rational(1, 4).latex_approx(1, Approx::Append),
        "\\frac{1}{4} \\approx 0.2"
    );
}

#[test]
fn lambdified_curve_samples_like_the_tree() {
    let demand = Expr::parse_expression("50 - P/2").expect("parses");
    let f = demand.lambdify1D("P");
    assert_relative_eq!(f(10.0), 45.0);
    assert_relative_eq!(f(0.0), 50.0);
}
