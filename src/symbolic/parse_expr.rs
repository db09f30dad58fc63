//! Turns a string expression into a symbolic expression.
//!
//! The input is tokenized first, then parsed by recursive descent with the
//! usual precedence: `+`/`-` < `*`/`/` < unary minus < `^` (right
//! associative). Binary chains at the same level associate to the left, so
//! `8 / x / 2` means `(8 / x) / 2`.
//!
//! # Example
//! ```rust, ignore
//! use RustedCalc::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^2.3 * log(x + y)");
//! println!("parsed expression {}", parsed_expression);
//! ```

use crate::symbolic::symbolic_engine::Expr;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// Splits the input into tokens. Number literals take an optional fraction
/// and an optional scientific exponent; the exponent is only consumed when
/// digits follow, so `2e - 3` stays a subtraction.
fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
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
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number literal '{}'", text))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => return Err(format!("unexpected character '{}' at position {}", c, i)),
        }
    }
    Ok(tokens)
}

/// Maps a function name (with the aliases accepted on input) to the
/// matching Expr constructor.
fn function_from_name(name: &str, arg: Expr) -> Result<Expr, String> {
    let arg = Box::new(arg);
    match name {
        "exp" => Ok(Expr::Exp(arg)),
        "ln" | "log" => Ok(Expr::Ln(arg)),
        "sin" => Ok(Expr::sin(arg)),
        "cos" => Ok(Expr::cos(arg)),
        "tg" | "tan" => Ok(Expr::tg(arg)),
        "ctg" | "cot" => Ok(Expr::ctg(arg)),
        "arcsin" | "asin" => Ok(Expr::arcsin(arg)),
        "arccos" | "acos" => Ok(Expr::arccos(arg)),
        "arctg" | "arctan" | "atan" => Ok(Expr::arctg(arg)),
        "arcctg" | "acot" => Ok(Expr::arcctg(arg)),
        _ => Err(format!("unknown function '{}'", name)),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expression := term (('+' | '-') term)*
    fn parse_expression(&mut self) -> Result<Expr, String> {
        let mut expr = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.parse_term()?;
                    expr = Expr::Add(Box::new(expr), Box::new(rhs));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.parse_term()?;
                    expr = Expr::Sub(Box::new(expr), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    // term := unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut expr = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    expr = Expr::Mul(Box::new(expr), Box::new(rhs));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    expr = Expr::Div(Box::new(expr), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    // unary := '-' unary | power
    //
    // A negated literal folds into the constant; anything else becomes
    // multiplication by -1, so '-x^2' reads as -(x^2).
    fn parse_unary(&mut self) -> Result<Expr, String> {
        if let Some(Token::Minus) = self.peek() {
            self.pos += 1;
            let inner = self.parse_unary()?;
            return Ok(match inner {
                Expr::Const(value) => Expr::Const(-value),
                other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
            });
        }
        self.parse_power()
    }

    // power := atom ('^' unary)?
    //
    // The exponent goes back through unary, which makes '^' right
    // associative and lets 'x^-2' parse without extra brackets.
    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    // atom := number | ident | ident '(' expression ')' | '(' expression ')'
    fn parse_atom(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Num(value)) => Ok(Expr::Const(value)),
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let inner = self.parse_expression()?;
                    match self.next() {
                        Some(Token::RParen) => function_from_name(&name, inner),
                        _ => Err(format!("missing ')' after argument of '{}'", name)),
                    }
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("unmatched '(' in expression".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of input".to_string()),
        }
    }
}

/// Parses a string into a symbolic expression.
///
/// Recognized functions: exp, ln (alias log), sin, cos, tg (alias tan),
/// ctg (alias cot), arcsin/asin, arccos/acos, arctg/arctan/atan,
/// arcctg/acot. Everything else alphabetic is a variable name.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!(
            "unexpected trailing input near {:?}",
            parser.tokens[parser.pos]
        ));
    }
    Ok(expr)
}

impl Expr {
    /// Parses a string into an `Expr`, panicking on malformed input.
    ///
    /// The fallible variant is [`parse_expression_func`].
    pub fn parse_expression(input: &str) -> Expr {
        match parse_expression_func(input) {
            Ok(expr) => expr,
            Err(err) => panic!("failed to parse expression '{}': {}", input, err),
        }
    }
}
