use std::fmt;
use std::process::ExitCode;

use thiserror::Error;

/// Characters of a raw HTTP body kept in error messages and logs.
pub const BODY_PREVIEW_CHARS: usize = 2000;

/// Characters of generated text kept when reporting a parse failure.
pub const TEXT_TAIL_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("contract violation: {0}")]
    Contract(String),

    #[error("refusing to write outside allowed roots: {0}")]
    Security(String),

    #[error("nothing to publish: {0}")]
    NoOp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Contract,
    Security,
    NoOp,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Contract => "contract",
            ErrorKind::Security => "security",
            ErrorKind::NoOp => "no-op",
            ErrorKind::Io => "io",
        };
        write!(f, "{label}")
    }
}

impl ForgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForgeError::Configuration(_) => ErrorKind::Configuration,
            ForgeError::Transport(_) => ErrorKind::Transport,
            ForgeError::Contract(_) => ErrorKind::Contract,
            ForgeError::Security(_) => ErrorKind::Security,
            ForgeError::NoOp(_) => ErrorKind::NoOp,
            ForgeError::Io(_) => ErrorKind::Io,
        }
    }
}

impl ErrorKind {
    pub fn exit_code(self) -> ExitCode {
        let code = match self {
            ErrorKind::Io => 1,
            ErrorKind::Configuration => 2,
            ErrorKind::Transport => 3,
            ErrorKind::Contract => 4,
            ErrorKind::Security => 5,
            ErrorKind::NoOp => 6,
        };
        ExitCode::from(code)
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview_head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Last `max_chars` characters of `text`, never splitting a code point.
pub fn preview_tail(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_preview_respects_char_boundaries() {
        assert_eq!(preview_head("héllo", 2), "hé");
        assert_eq!(preview_head("abc", 10), "abc");
        assert_eq!(preview_head("", 3), "");
    }

    #[test]
    fn tail_preview_keeps_the_end() {
        assert_eq!(preview_tail("abcdef", 3), "def");
        assert_eq!(preview_tail("añb", 2), "ñb");
        assert_eq!(preview_tail("ab", 5), "ab");
    }

    #[test]
    fn kinds_map_to_distinct_exit_codes() {
        let errors = [
            ForgeError::Configuration("x".into()),
            ForgeError::Transport("x".into()),
            ForgeError::Contract("x".into()),
            ForgeError::Security("x".into()),
            ForgeError::NoOp("x".into()),
        ];
        let kinds: Vec<ErrorKind> = errors.iter().map(ForgeError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::Configuration,
                ErrorKind::Transport,
                ErrorKind::Contract,
                ErrorKind::Security,
                ErrorKind::NoOp,
            ]
        );
        assert_eq!(kinds[3].to_string(), "security");
    }
}
