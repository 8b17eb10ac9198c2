use logos::Logos;

use crate::error::LexicalError;

use std::ops::Range;


/// A token paired with its byte span in the source.
pub type Spanned = (Token, Range<usize>);

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")] // Ignore this regex pattern between tokens
#[logos(error = LexicalError)]
pub enum Token {
    // A number takes digits and at most one decimal point. A second point
    // inside the same token is a hard lexical error, not two tokens.
    #[regex(r"[0-9]+\.?[0-9]*", |lex| lex.slice().parse::<f64>().unwrap())]
    #[regex(r"[0-9]+\.[0-9]*\.", invalid_number)]
    Number(f64),

    #[token("let")]
    KeywordLet,

    #[token("if")]
    KeywordIf,

    #[token("else")]
    KeywordElse,

    #[token("while")]
    KeywordWhile,

    #[token("function")]
    KeywordFunction,

    #[token("return")]
    KeywordReturn,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token(">")]
    Greater,

    #[token("<")]
    Less,

    #[token("=")]
    Assign,

    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("!")]
    Not,
}

fn invalid_number(_: &mut logos::Lexer<Token>) -> Result<f64, LexicalError> {
    Err(LexicalError::InvalidNumber)
}

/// Tokenizes the whole input eagerly. Unrecognized characters are dropped
/// silently, exactly like whitespace; a malformed number aborts the call
/// with its span.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, (LexicalError, Range<usize>)> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(LexicalError::UnknownCharacter) => {}
            Err(err) => return Err((err, span)),
        }
    }
    Ok(tokens)
}
