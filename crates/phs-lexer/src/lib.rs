use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Identifiers and literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Integer,

    // `**` must win over two consecutive `*`
    #[token("**")]
    DoubleStar,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,

    Error,
}

impl Token {
    /// Short description used in parser diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Ident => "identifier",
            Token::Float | Token::Integer => "number",
            Token::DoubleStar | Token::Caret => "power operator",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::Comma => "','",
            Token::Error => "invalid character",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub lexeme: String,
    pub start: usize,
    pub end: usize,
}

pub fn tokenize(input: &str) -> Vec<Token> {
    tokenize_detailed(input)
        .into_iter()
        .map(|t| t.token)
        .collect()
}

pub fn tokenize_detailed(input: &str) -> Vec<SpannedToken> {
    let mut lex = Token::lexer(input);
    let mut out: Vec<SpannedToken> = Vec::new();
    while let Some(res) = lex.next() {
        let span = lex.span();
        match res {
            Ok(tok) => out.push(SpannedToken {
                token: tok,
                lexeme: lex.slice().to_string(),
                start: span.start,
                end: span.end,
            }),
            Err(_) => {
                // Emit one Error token per offending character so the parser
                // can point at the exact position.
                for (offset, ch) in lex.slice().char_indices() {
                    if ch.is_whitespace() {
                        continue;
                    }
                    let start = span.start + offset;
                    out.push(SpannedToken {
                        token: Token::Error,
                        lexeme: ch.to_string(),
                        start,
                        end: start + ch.len_utf8(),
                    });
                }
            }
        }
    }
    out
}
