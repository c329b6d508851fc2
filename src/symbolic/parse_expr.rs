use crate::symbolic::symbolic_engine::{Equation, Expr};
use num::rational::Rational64;

/// a module turns a String expression into a symbolic expression
///
/// Students type curves the way the textbook prints them, so the grammar
/// accepts implicit multiplication (`2Q`, `K^(1/2)L^(1/2)`, `(Q+1)(Q+2)`),
/// decimal constants (kept exact as rationals), `^` powers and the function
/// names `exp`, `ln`, `log` and `sqrt`. A maximal alphanumeric word that is
/// not a function name is split into variables: one letter, optionally with
/// trailing digits or a `_subscript`, so `PQ` means `P*Q` while `Q_d` and
/// `t_c` stay single symbols.
///
/// Malformed input comes back as `Err`, never a panic; the page just cancels
/// the dependent outputs.
///
///# Example
/// ```
/// use EconEssentials::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("360 - 2Q").unwrap();
/// println!("parsed: {}", parsed_expression);
/// assert!(Expr::parse_expression("360 - ").is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(Rational64),
    Var(String),
    Func(Func),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Equals,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Func {
    Exp,
    Ln,
    Sqrt,
}

fn describe(token: &Token) -> String {
    match token {
        Token::Num(n) => format!("number `{}`", n),
        Token::Var(v) => format!("variable `{}`", v),
        Token::Func(Func::Exp) => "function `exp`".to_string(),
        Token::Func(Func::Ln) => "function `ln`".to_string(),
        Token::Func(Func::Sqrt) => "function `sqrt`".to_string(),
        Token::Plus => "`+`".to_string(),
        Token::Minus => "`-`".to_string(),
        Token::Star => "`*`".to_string(),
        Token::Slash => "`/`".to_string(),
        Token::Caret => "`^`".to_string(),
        Token::LParen => "`(`".to_string(),
        Token::RParen => "`)`".to_string(),
        Token::Equals => "`=`".to_string(),
    }
}

/// Parses a digit run with optional fractional part into an exact rational.
fn lex_number(chars: &[char], mut i: usize) -> Result<(Rational64, usize), String> {
    let start = i;
    let mut int_part: i64 = 0;
    let mut frac_part: i64 = 0;
    let mut frac_len: u32 = 0;
    let mut seen_digit = false;
    while i < chars.len() && chars[i].is_ascii_digit() {
        int_part = int_part
            .checked_mul(10)
            .and_then(|v| v.checked_add((chars[i] as u8 - b'0') as i64))
            .ok_or_else(|| format!("number starting at position {} is too large", start))?;
        seen_digit = true;
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            frac_part = frac_part
                .checked_mul(10)
                .and_then(|v| v.checked_add((chars[i] as u8 - b'0') as i64))
                .ok_or_else(|| format!("number starting at position {} is too precise", start))?;
            frac_len += 1;
            seen_digit = true;
            i += 1;
        }
        if frac_len > 15 {
            return Err(format!("number starting at position {} is too precise", start));
        }
    }
    if !seen_digit {
        return Err(format!("expected digits at position {}", start));
    }
    let denom = 10i64.pow(frac_len);
    let value = Rational64::new(
        int_part
            .checked_mul(denom)
            .and_then(|v| v.checked_add(frac_part))
            .ok_or_else(|| format!("number starting at position {} is too large", start))?,
        denom,
    );
    Ok((value, i))
}

/// Splits a maximal identifier word into variable tokens: a letter, its
/// trailing digits, and an optional `_subscript` form one variable.
fn split_word(word: &str, out: &mut Vec<Token>) -> Result<(), String> {
    match word {
        "exp" => {
            out.push(Token::Func(Func::Exp));
            return Ok(());
        }
        "ln" | "log" => {
            out.push(Token::Func(Func::Ln));
            return Ok(());
        }
        "sqrt" => {
            out.push(Token::Func(Func::Sqrt));
            return Ok(());
        }
        _ => {}
    }
    let chars: Vec<char> = word.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_alphabetic() {
            return Err(format!("unexpected `{}` inside name `{}`", chars[i], word));
        }
        let mut name = String::new();
        name.push(chars[i]);
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            name.push(chars[i]);
            i += 1;
        }
        if i < chars.len() && chars[i] == '_' {
            name.push('_');
            i += 1;
            while i < chars.len() && (chars[i].is_alphanumeric()) {
                name.push(chars[i]);
                i += 1;
            }
            if name.ends_with('_') {
                return Err(format!("dangling `_` in name `{}`", word));
            }
        }
        out.push(Token::Var(name));
    }
    Ok(())
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Equals);
                i += 1;
            }
            '0'..='9' | '.' => {
                let (value, next) = lex_number(&chars, i)?;
                tokens.push(Token::Num(value));
                i = next;
            }
            c if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                split_word(&word, &mut tokens)?;
            }
            other => {
                return Err(format!("unexpected character `{}` at position {}", other, i));
            }
        }
    }
    Ok(tokens)
}

/// True when a token can begin a primary expression, which is where implicit
/// multiplication kicks in after a finished operand.
fn starts_operand(token: &Token) -> bool {
    matches!(
        token,
        Token::Num(_) | Token::Var(_) | Token::Func(_) | Token::LParen
    )
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

// binding powers: +,- = (1,2); *,/ and implicit multiplication = (3,4);
// unary minus operand = 3; ^ = (7,6) so powers are right-associative and
// bind tighter than a leading minus.
impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect_rparen(&mut self) -> Result<(), String> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            Some(t) => Err(format!("expected `)` but found {}", describe(&t))),
            None => Err("missing closing `)`".to_string()),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Num(n)) => Ok(Expr::Const(n)),
            Some(Token::Var(name)) => Ok(Expr::Var(name)),
            Some(Token::Func(func)) => {
                match self.next() {
                    Some(Token::LParen) => {}
                    _ => return Err("function name must be followed by `(`".to_string()),
                }
                let arg = self.parse_bp(0)?;
                self.expect_rparen()?;
                Ok(match func {
                    Func::Exp => Expr::Exp(arg.boxed()),
                    Func::Ln => Expr::Ln(arg.boxed()),
                    Func::Sqrt => arg.sqrt(),
                })
            }
            Some(Token::LParen) => {
                let inner = self.parse_bp(0)?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some(Token::Minus) => {
                let operand = self.parse_bp(3)?;
                Ok(-operand)
            }
            Some(t) => Err(format!("expression cannot start with {}", describe(&t))),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn parse_bp(&mut self, min_bp: u8) -> Result<Expr, String> {
        let mut lhs = self.parse_primary()?;
        loop {
            let (l_bp, r_bp, op) = match self.peek() {
                Some(Token::Plus) => (1, 2, Token::Plus),
                Some(Token::Minus) => (1, 2, Token::Minus),
                Some(Token::Star) => (3, 4, Token::Star),
                Some(Token::Slash) => (3, 4, Token::Slash),
                Some(Token::Caret) => (7, 6, Token::Caret),
                // juxtaposition binds like `*`
                Some(t) if starts_operand(t) => (3, 4, Token::Star),
                _ => break,
            };
            if l_bp < min_bp {
                break;
            }
            // explicit operators are consumed; implicit multiplication is not
            match self.peek() {
                Some(t) if starts_operand(t) => {}
                _ => {
                    self.next();
                }
            }
            let rhs = self.parse_bp(r_bp)?;
            lhs = match op {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                Token::Slash => lhs / rhs,
                Token::Caret => lhs.pow(rhs),
                _ => unreachable!(),
            };
        }
        Ok(lhs)
    }
}

pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty input".to_string());
    }
    let tokens = tokenize(input)?;
    if tokens.contains(&Token::Equals) {
        return Err("expected an expression, found `=` (enter an equation here?)".to_string());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_bp(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(t) => Err(format!("trailing {} after complete expression", describe(t))),
    }
}

impl Expr {
    /// Parses a bare expression; `=` signs are rejected.
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}

impl Equation {
    /// Parses a relation with exactly one `=`, such as `Q = 50 - P/2`.
    pub fn parse_equation(input: &str) -> Result<Equation, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("empty input".to_string());
        }
        let sides: Vec<&str> = input.split('=').collect();
        match sides.as_slice() {
            [lhs, rhs] => Ok(Equation::new(
                parse_expression_func(lhs)?,
                parse_expression_func(rhs)?,
            )),
            [_] => Err("expected an equation containing `=`".to_string()),
            _ => Err("an equation must contain exactly one `=`".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_implicit_multiplication() {
        let expr = Expr::parse_expression("360 - 2Q").unwrap();
        let expected = Expr::num(360) - Expr::num(2) * Expr::var("Q");
        assert_eq!(expr, expected);
    }

    #[test]
    fn parses_cobb_douglas_juxtaposition() {
        let expr = Expr::parse_expression("K^(1/2)L^(1/2)").unwrap();
        let half = || Expr::num(1) / Expr::num(2);
        let expected = Expr::var("K").pow(half()) * Expr::var("L").pow(half());
        assert_eq!(expr, expected);
    }

    #[test]
    fn splits_adjacent_symbols_but_keeps_subscripts() {
        let expr = Expr::parse_expression("PQ_d").unwrap();
        let expected = Expr::var("P") * Expr::var("Q_d");
        assert_eq!(expr, expected);
    }

    #[test]
    fn decimals_stay_exact() {
        let expr = Expr::parse_expression("0.5Q").unwrap();
        let expected = Expr::rational(1, 2) * Expr::var("Q");
        assert_eq!(expr, expected);
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        let expr = Expr::parse_expression("-Q^2").unwrap();
        let expected = -(Expr::var("Q").pow(Expr::num(2)));
        assert_eq!(expr, expected);
    }

    #[test]
    fn parses_equation_sides() {
        let eq = Equation::parse_equation("Q = 50 - P/2").unwrap();
        assert_eq!(eq.lhs, Expr::var("Q"));
        assert_eq!(eq.rhs, Expr::num(50) - Expr::var("P") / Expr::num(2));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Expr::parse_expression("").is_err());
        assert!(Expr::parse_expression("50 - ").is_err());
        assert!(Expr::parse_expression("(Q + 1").is_err());
        assert!(Expr::parse_expression("Q + # P").is_err());
        assert!(Expr::parse_expression("Q = 1").is_err());
        assert!(Equation::parse_equation("Q = 1 = 2").is_err());
        assert!(Equation::parse_equation("Q + 1").is_err());
    }

    #[test]
    fn function_calls_and_sqrt() {
        let expr = Expr::parse_expression("ln(Q) + sqrt(Q)").unwrap();
        let expected = Expr::var("Q").ln() + Expr::var("Q").sqrt();
        assert_eq!(expr, expected);
        assert_eq!(
            Expr::parse_expression("log(Q)").unwrap(),
            Expr::var("Q").ln()
        );
    }
}
