use std::{
    collections::BTreeSet,
    fmt::{Debug, Display},
    str::FromStr,
};

use yap::{IntoTokens, TokenLocation, Tokens};

/// A binary connective. All of them are left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::And => '&',
            BinaryOp::Or => '|',
            BinaryOp::Xor => '^',
        }
    }

    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinaryOp::And => lhs && rhs,
            BinaryOp::Or => lhs || rhs,
            BinaryOp::Xor => lhs != rhs,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
            BinaryOp::Xor => write!(f, "XOR"),
        }
    }
}

/// An operator tree over named variables.
///
/// Every node exclusively owns its children, so a tree is finite and acyclic by construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Var(String),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn xor(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Xor, lhs, rhs)
    }

    /// Evaluates the tree, looking up the value of each variable with `value`.
    pub fn eval(&self, value: &impl Fn(&str) -> bool) -> bool {
        match self {
            Expr::Var(name) => value(name),
            Expr::Not(expr) => !expr.eval(value),
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.eval(value), rhs.eval(value)),
        }
    }

    /// Names of all variables in the tree, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.visit_variables(&mut |name| {
            if !names.contains(name) {
                names.insert(name.to_owned());
            }
        });
        names
    }

    fn visit_variables(&self, f: &mut impl FnMut(&str)) {
        match self {
            Expr::Var(name) => f(name),
            Expr::Not(expr) => expr.visit_variables(f),
            Expr::Binary(_, lhs, rhs) => {
                lhs.visit_variables(f);
                rhs.visit_variables(f);
            }
        }
    }

    /// Number of operator levels between the root and the deepest variable.
    pub fn height(&self) -> usize {
        match self {
            Expr::Var(_) => 0,
            Expr::Not(expr) => expr.height() + 1,
            Expr::Binary(_, lhs, rhs) => lhs.height().max(rhs.height()) + 1,
        }
    }

    pub fn contains_not(&self) -> bool {
        match self {
            Expr::Var(_) => false,
            Expr::Not(_) => true,
            Expr::Binary(_, lhs, rhs) => lhs.contains_not() || rhs.contains_not(),
        }
    }

    pub fn operator_count(&self) -> usize {
        match self {
            Expr::Var(_) => 0,
            Expr::Not(expr) => expr.operator_count() + 1,
            Expr::Binary(_, lhs, rhs) => lhs.operator_count() + rhs.operator_count() + 1,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Not(expr) => write!(f, "!{expr}"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expr({self})")
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    Empty,
    UnexpectedChar(char),
    UnbalancedParen,
    MissingOperand,
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl ParseError {
    fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ParseErrorKind::Empty => write!(f, "empty expression"),
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?} at offset {}", self.offset),
            ParseErrorKind::UnbalancedParen => write!(f, "unbalanced parenthesis at offset {}", self.offset),
            ParseErrorKind::MissingOperand => write!(f, "missing operand at offset {}", self.offset),
            ParseErrorKind::TrailingInput => write!(f, "unexpected trailing input at offset {}", self.offset),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Var(String),
    Binary(BinaryOp),
    Not,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    lexeme: Lexeme,
    offset: usize,
}

fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut toks = text.into_tokens();
    let mut tokens = Vec::new();
    loop {
        let offset = toks.location().offset();
        let Some(c) = toks.peek() else { break };
        let lexeme = match c {
            c if c.is_whitespace() => {
                toks.next();
                continue;
            }
            c if c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(c) = toks.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    toks.next();
                }
                tokens.push(Token { lexeme: Lexeme::Var(name), offset });
                continue;
            }
            '&' | '*' => Lexeme::Binary(BinaryOp::And),
            '|' | '+' => Lexeme::Binary(BinaryOp::Or),
            '^' => Lexeme::Binary(BinaryOp::Xor),
            '!' => Lexeme::Not,
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            c => return Err(ParseError::new(ParseErrorKind::UnexpectedChar(c), offset)),
        };
        toks.next();
        tokens.push(Token { lexeme, offset });
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.tokens.get(self.position).map(|token| &token.lexeme)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.position).map(|token| token.offset).unwrap_or(self.end)
    }

    fn eat_binary(&mut self, op: BinaryOp) -> bool {
        if self.peek() == Some(&Lexeme::Binary(op)) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn parse_level(&mut self, op: BinaryOp) -> Result<Expr, ParseError> {
        let operand = |parser: &mut Self| match op {
            BinaryOp::Or => parser.parse_level(BinaryOp::And),
            BinaryOp::And => parser.parse_level(BinaryOp::Xor),
            BinaryOp::Xor => parser.parse_atom(),
        };
        let mut lhs = operand(self)?;
        while self.eat_binary(op) {
            let rhs = operand(self)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        let Some(token) = self.tokens.get(self.position) else {
            return Err(ParseError::new(ParseErrorKind::MissingOperand, offset));
        };
        match token.lexeme.clone() {
            Lexeme::Var(name) => {
                self.position += 1;
                Ok(Expr::Var(name))
            }
            Lexeme::Not => {
                self.position += 1;
                Ok(Expr::not(self.parse_atom()?))
            }
            Lexeme::LParen => {
                self.position += 1;
                let expr = self.parse_level(BinaryOp::Or)?;
                if self.peek() != Some(&Lexeme::RParen) {
                    return Err(ParseError::new(ParseErrorKind::UnbalancedParen, offset));
                }
                self.position += 1;
                Ok(expr)
            }
            Lexeme::RParen | Lexeme::Binary(_) => Err(ParseError::new(ParseErrorKind::MissingOperand, offset)),
        }
    }
}

/// Parses a boolean equation.
///
/// Accepted connectives are `&`/`*` (AND), `|`/`+` (OR), `^` (XOR) and prefix `!` (NOT). Binding
/// strength grows from OR to AND to XOR to NOT; parentheses group.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, 0));
    }
    let mut parser = Parser { tokens, position: 0, end: text.len() };
    let expr = parser.parse_level(BinaryOp::Or)?;
    match parser.peek() {
        None => Ok(expr),
        Some(Lexeme::RParen) => Err(ParseError::new(ParseErrorKind::UnbalancedParen, parser.offset())),
        Some(_) => Err(ParseError::new(ParseErrorKind::TrailingInput, parser.offset())),
    }
}

/// Collects the variable names of an equation without checking its grammar.
pub fn variables(text: &str) -> Result<BTreeSet<String>, ParseError> {
    Ok(tokenize(text)?
        .into_iter()
        .filter_map(|token| match token.lexeme {
            Lexeme::Var(name) => Some(name),
            _ => None,
        })
        .collect())
}
