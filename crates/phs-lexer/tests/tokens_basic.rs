use phs_lexer::{tokenize, tokenize_detailed, Token};

#[test]
fn identifiers_and_numbers() {
    let src = "x1 123 4.56 _q";
    assert_eq!(
        tokenize(src),
        vec![Token::Ident, Token::Integer, Token::Float, Token::Ident]
    );
}

#[test]
fn float_forms() {
    let src = "1. .5 1e-3 2.5E4";
    assert_eq!(
        tokenize(src),
        vec![Token::Float, Token::Float, Token::Float, Token::Float]
    );
}

#[test]
fn nested_list_delimiters() {
    let src = "[[1, 0], [0, 1]]";
    assert_eq!(
        tokenize(src),
        vec![
            Token::LBracket,
            Token::LBracket,
            Token::Integer,
            Token::Comma,
            Token::Integer,
            Token::RBracket,
            Token::Comma,
            Token::LBracket,
            Token::Integer,
            Token::Comma,
            Token::Integer,
            Token::RBracket,
            Token::RBracket,
        ]
    );
}

#[test]
fn function_call_tokens() {
    assert_eq!(
        tokenize("sin(x)"),
        vec![Token::Ident, Token::LParen, Token::Ident, Token::RParen]
    );
}

#[test]
fn spans_track_byte_offsets() {
    let toks = tokenize_detailed("  ab + 3");
    assert_eq!(toks.len(), 3);
    assert_eq!((toks[0].start, toks[0].end), (2, 4));
    assert_eq!(toks[0].lexeme, "ab");
    assert_eq!((toks[2].start, toks[2].end), (7, 8));
}

#[test]
fn unknown_characters_become_error_tokens() {
    let toks = tokenize_detailed("x $ y");
    assert_eq!(
        toks.iter().map(|t| t.token).collect::<Vec<_>>(),
        vec![Token::Ident, Token::Error, Token::Ident]
    );
    assert_eq!(toks[1].lexeme, "$");
    assert_eq!(toks[1].start, 2);
}
