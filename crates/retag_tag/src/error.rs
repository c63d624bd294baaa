use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// UnquoteError

/// Errors while decoding a quoted string literal.
///
/// Offsets are byte offsets into the literal body (without the opening quote).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnquoteError {
    #[error("string literal is not enclosed in double quotes")]
    Unterminated,

    #[error("string literal contains a raw newline")]
    Newline,

    #[error("unescaped quote at byte {at}")]
    UnescapedQuote { at: usize },

    #[error("invalid escape sequence at byte {at}")]
    InvalidEscape { at: usize },

    #[error("decoded string is not valid UTF-8")]
    InvalidUtf8,
}

// -----------------------------------------------------------------------------
// TagError

/// Errors produced while parsing a tag or scanning an option list.
///
/// Most variants carry the remaining raw text at the point of failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagError {
    #[error("unpaired key: input has no paired value, rest = {rest}")]
    UnpairedKey { rest: String },

    #[error("unpaired key: name = {key} has no paired value, rest = {rest}")]
    UnterminatedValue { key: String, rest: String },

    #[error("malformed value for key {key}: {source}")]
    InvalidValue { key: String, source: UnquoteError },

    #[error("invalid key: {key:?}")]
    InvalidKey { key: String },

    #[error("malformed option, {value}")]
    MalformedOption { value: String },

    #[error("unexpected end of option list")]
    UnexpectedEnd,

    #[error("invalid character: {rest}")]
    InvalidOptionStart { rest: String },

    #[error("invalid escaped string: single-quoted string missing terminating single-quote: {rest}")]
    UnterminatedEscape { rest: String },

    #[error("invalid escaped string: string must be escaped by single quotes, input = {rest}")]
    InvalidEscape { rest: String },
}
