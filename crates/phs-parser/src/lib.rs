use phs_lexer::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal, kept as written
    Number(String),
    Ident(String),
    Unary(UnOp, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// Bracketed list `[a, b, ...]`
    List(Vec<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum UnOp {
    Plus,
    Minus,
}

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 256;

#[derive(Clone)]
struct TokenInfo {
    token: Token,
    lexeme: String,
    position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
    pub found_token: Option<String>,
    pub expected: Option<String>,
}

/// Parse a single expression. The whole input must be consumed.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    use phs_lexer::tokenize_detailed;

    let toks = tokenize_detailed(input);
    let mut tokens = Vec::with_capacity(toks.len());

    for t in toks {
        if matches!(t.token, Token::Error) {
            return Err(ParseError {
                message: format!("invalid character '{}'", t.lexeme),
                position: t.start,
                found_token: Some(t.lexeme),
                expected: None,
            });
        }
        tokens.push(TokenInfo {
            token: t.token,
            lexeme: t.lexeme,
            position: t.start,
        });
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        input_len: input.len(),
    };
    parser.parse_input()
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at position {}: {}",
            self.position, self.message
        )?;
        if let Some(found) = &self.found_token {
            write!(f, " (found: '{found}')")?;
        }
        if let Some(expected) = &self.expected {
            write!(f, " (expected: {expected})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

struct Parser {
    tokens: Vec<TokenInfo>,
    pos: usize,
    // Conservative bound on the depth of the tree under construction
    depth: usize,
    input_len: usize,
}

impl Parser {
    fn parse_input(&mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }
        let expr = self.parse_expr()?;
        if self.pos < self.tokens.len() {
            return Err(self.error_with_expected(
                "unexpected trailing input",
                "operator or end of input",
            ));
        }
        Ok(expr)
    }

    fn error(&self, message: &str) -> ParseError {
        let (position, found_token) = if let Some(token_info) = self.tokens.get(self.pos) {
            (token_info.position, Some(token_info.lexeme.clone()))
        } else {
            (self.input_len, None)
        };

        ParseError {
            message: message.to_string(),
            position,
            found_token,
            expected: None,
        }
    }

    fn error_with_expected(&self, message: &str, expected: &str) -> ParseError {
        ParseError {
            expected: Some(expected.to_string()),
            ..self.error(message)
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_add_sub()
    }

    /// Each operator in a left-associative chain adds a level to the tree
    fn parse_chain(
        &mut self,
        op_for: fn(&Token) -> Option<BinOp>,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let entry_depth = self.depth;
        let mut node = operand(self)?;
        while let Some(op) = self.peek_token().and_then(op_for) {
            self.pos += 1; // consume op
            self.descend()?;
            let rhs = operand(self)?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        self.depth = entry_depth;
        Ok(node)
    }

    fn parse_add_sub(&mut self) -> Result<Expr, ParseError> {
        self.parse_chain(
            |t| match t {
                Token::Plus => Some(BinOp::Add),
                Token::Minus => Some(BinOp::Sub),
                _ => None,
            },
            Self::parse_mul_div,
        )
    }

    fn parse_mul_div(&mut self) -> Result<Expr, ParseError> {
        self.parse_chain(
            |t| match t {
                Token::Star => Some(BinOp::Mul),
                Token::Slash => Some(BinOp::Div),
                _ => None,
            },
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = self.parse_unary_inner();
        self.depth -= 1;
        expr
    }

    // Unary minus binds looser than power: -x**2 is -(x**2)
    fn parse_unary_inner(&mut self) -> Result<Expr, ParseError> {
        if self.consume(&Token::Plus) {
            Ok(Expr::Unary(UnOp::Plus, Box::new(self.parse_unary()?)))
        } else if self.consume(&Token::Minus) {
            Ok(Expr::Unary(UnOp::Minus, Box::new(self.parse_unary()?)))
        } else {
            self.parse_pow()
        }
    }

    fn parse_pow(&mut self) -> Result<Expr, ParseError> {
        let node = self.parse_primary()?;
        if matches!(self.peek_token(), Some(Token::DoubleStar | Token::Caret)) {
            self.pos += 1; // consume
            let rhs = self.parse_unary()?; // right associative, allows x**-1
            Ok(Expr::Binary(Box::new(node), BinOp::Pow, Box::new(rhs)))
        } else {
            Ok(node)
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(info) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error("unexpected end of input, expected expression"));
        };
        match info.token {
            Token::Integer | Token::Float => {
                self.pos += 1;
                Ok(Expr::Number(info.lexeme))
            }
            Token::Ident => {
                self.pos += 1;
                if self.consume(&Token::LParen) {
                    let args = self.parse_sequence(&Token::RParen, "')' after arguments")?;
                    Ok(Expr::Call(info.lexeme, args))
                } else {
                    Ok(Expr::Ident(info.lexeme))
                }
            }
            Token::LParen => {
                self.pos += 1;
                let expr = self.parse_expr()?;
                if !self.consume(&Token::RParen) {
                    return Err(
                        self.error_with_expected("unclosed parenthesis", "')' to close '('")
                    );
                }
                Ok(expr)
            }
            Token::LBracket => {
                self.pos += 1;
                let items = self.parse_sequence(&Token::RBracket, "']' to close list")?;
                Ok(Expr::List(items))
            }
            other => Err(self.error(&format!(
                "unexpected {} in expression context",
                other.describe()
            ))),
        }
    }

    /// Comma separated expressions up to `close`, trailing comma allowed.
    fn parse_sequence(&mut self, close: &Token, expected: &str) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.consume(close) {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            if self.consume(&Token::Comma) {
                continue;
            }
            if self.consume(close) {
                return Ok(items);
            }
            return Err(self.error_with_expected("unterminated sequence", expected));
        }
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn consume(&mut self, t: &Token) -> bool {
        if self.peek_token() == Some(t) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}
