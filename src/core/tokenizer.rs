//! Tokenizer for console command lines.
//!
//! Splits a line into a target name and up to [`MAX_TOKENS`] typed tokens.
//! Tokens are separated by single spaces (runs of spaces collapse), quoted
//! spans (`'...'` or `"..."`) join several words into one string token, and
//! bare `true`/`false` and numbers are classified once here.

use super::ConVarValue;
use super::TokenizeError;

/// Longest accepted input line, in bytes, checked before any processing.
pub const MAX_INPUT_LEN: usize = 255;

/// Maximum number of argument tokens kept; anything after is dropped.
pub const MAX_TOKENS: usize = 16;

/// Classification of a token, fixed at tokenization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain or quoted text.
    String,
    /// Digits only.
    Integer,
    /// Digits with exactly one `.`.
    Decimal,
    /// Bare `true`, stored as `"1"`.
    BoolTrue,
    /// Bare `false`, stored as `"0"`.
    BoolFalse,
}

/// One argument of a parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /// Create a token with an explicit kind.
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The token text. Booleans read `"1"` or `"0"`, quotes are stripped.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Whether the token was classified as a number.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TokenKind::Integer | TokenKind::Decimal)
    }

    /// Interpret the token as an integer. Decimals truncate toward zero.
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Decimal => self.text.parse::<f64>().ok().map(|v| v.trunc() as i64),
            _ => self.text.parse().ok(),
        }
    }

    /// Interpret the token as a floating point number.
    pub fn as_float(&self) -> Option<f64> {
        self.text.parse().ok()
    }

    /// Interpret the token as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            TokenKind::BoolTrue => Some(true),
            TokenKind::BoolFalse => Some(false),
            TokenKind::Integer | TokenKind::Decimal => self.as_float().map(|v| v != 0.0),
            TokenKind::String => <bool as ConVarValue>::parse(&self.text),
        }
    }
}

/// A tokenized line: target name, arguments and the text a command hands back.
///
/// Created fresh for every dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    target: String,
    tokens: Vec<Token>,
    /// Output written by a command handler.
    pub return_text: String,
}

impl ParsedCommand {
    /// Build a command from already classified tokens.
    pub fn new(target: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            target: target.into(),
            tokens,
            return_text: String::new(),
        }
    }

    /// The variable or command name (first word of the line).
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of argument tokens.
    #[inline]
    pub fn argc(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Join the text of all tokens with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.tokens
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Replace the text returned to the caller.
    pub fn set_return(&mut self, text: impl Into<String>) {
        self.return_text = text.into();
    }
}

/// Check whether `text` is a number: digits with at most one `.`.
///
/// Returns the numeric kind, or `None` for anything else (including empty text).
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::{numeric_kind, TokenKind};
///
/// assert_eq!(numeric_kind("42"), Some(TokenKind::Integer));
/// assert_eq!(numeric_kind("4.2"), Some(TokenKind::Decimal));
/// assert_eq!(numeric_kind("4.2.1"), None);
/// assert_eq!(numeric_kind("-4"), None);
/// ```
pub fn numeric_kind(text: &str) -> Option<TokenKind> {
    if text.is_empty() {
        return None;
    }

    let mut has_period = false;
    for byte in text.bytes() {
        match byte {
            b'.' if has_period => return None,
            b'.' => has_period = true,
            b'0'..=b'9' => {}
            _ => return None,
        }
    }

    Some(if has_period {
        TokenKind::Decimal
    } else {
        TokenKind::Integer
    })
}

/// An open quoted span collecting words until its closing quote.
struct QuotedSpan {
    quote: char,
    position: usize,
    text: String,
}

fn opening_quote(word: &str) -> Option<char> {
    match word.chars().next() {
        Some(quote @ ('\'' | '"')) => Some(quote),
        _ => None,
    }
}

/// Tokenize a console line.
///
/// # Syntax
///
/// - The first word is the target and is never classified
/// - Words are split on spaces; tabs and other whitespace are only trimmed at the ends
/// - `'...'` and `"..."` join words into one string token, closed by the same quote
/// - Bare `true`/`false` become boolean tokens with text `1`/`0`
/// - Digits (with at most one `.`) become numeric tokens, everything else is a string
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::{tokenize, TokenKind};
///
/// let cmd = tokenize("add 10 20 30").unwrap();
/// assert_eq!(cmd.target(), "add");
/// assert_eq!(cmd.argc(), 3);
/// assert_eq!(cmd.tokens()[0].kind(), TokenKind::Integer);
///
/// let cmd = tokenize("name 'this is a string'").unwrap();
/// assert_eq!(cmd.argc(), 1);
/// assert_eq!(cmd.tokens()[0].text(), "this is a string");
/// ```
pub fn tokenize(input: &str) -> Result<ParsedCommand, TokenizeError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(TokenizeError::InputTooLong {
            len: input.len(),
            max: MAX_INPUT_LEN,
        });
    }

    let mut words = input.trim().split(' ').filter(|word| !word.is_empty());
    let target = words.next().ok_or(TokenizeError::EmptyInput)?;

    let mut tokens = Vec::new();
    let mut open: Option<QuotedSpan> = None;

    for (index, word) in words.enumerate() {
        if let Some(mut span) = open.take() {
            match word.strip_suffix(span.quote) {
                Some(inner) => {
                    span.text.push_str(inner);
                    tokens.push(Token::new(span.text, TokenKind::String));
                }
                None => {
                    span.text.push_str(word);
                    span.text.push(' ');
                    open = Some(span);
                }
            }
        } else if word == "true" {
            tokens.push(Token::new("1", TokenKind::BoolTrue));
        } else if word == "false" {
            tokens.push(Token::new("0", TokenKind::BoolFalse));
        } else if let Some(quote) = opening_quote(word) {
            let rest = &word[quote.len_utf8()..];
            match rest.strip_suffix(quote) {
                // Quoted single word, e.g. 'hello'
                Some(inner) => tokens.push(Token::new(inner, TokenKind::String)),
                None => {
                    open = Some(QuotedSpan {
                        quote,
                        position: index,
                        text: format!("{} ", rest),
                    });
                }
            }
        } else {
            let kind = numeric_kind(word).unwrap_or(TokenKind::String);
            tokens.push(Token::new(word, kind));
        }

        if tokens.len() >= MAX_TOKENS {
            break;
        }
    }

    if let Some(span) = open {
        return Err(TokenizeError::UnterminatedString {
            position: span.position,
        });
    }

    Ok(ParsedCommand::new(target, tokens))
}
