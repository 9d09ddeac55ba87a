//! Lexical units produced by tokenization.

use serde::Serialize;

/// Classification of a token, decided without schema knowledge.
///
/// The tokenizer only looks at prefix characters, `=` signs, and quoting;
/// deciding whether a bare word names a sub-command, or whether `-abc` is
/// one multi-character name rather than a cluster, is the parser's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A prefixed argument name, e.g. `--output` or `-v`.
    ArgName,
    /// A single prefix followed by several characters, e.g. `-abc`; the
    /// parser either matches it as one multi-character name or expands it
    /// into single-character names.
    ArgNameList,
    /// A prefixed name with an attached value, e.g. `--level=3`; split at
    /// the first `=` via [`Token::split_assignment`].
    ArgNameWithValue,
    /// A bare word: a raw value or, as the parser may decide, a
    /// sub-command name.
    Value,
    /// A bare word the parser matched as a sub-command name. Never emitted
    /// by the tokenizer.
    SubCommandName,
    /// A quoted segment; prefix and whitespace rules were suspended inside
    /// it, so it is always treated as a raw value.
    Literal,
}

/// One immutable lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The token text with quotes and escapes already resolved. For
    /// [`TokenKind::ArgNameWithValue`] this is the whole `name=value`
    /// spelling including the prefix.
    pub text: String,
    /// Absolute byte offset into the raw input. Arg-vector input is
    /// assigned offsets as if its elements were joined by single spaces.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Splits an [`TokenKind::ArgNameWithValue`] token into its name part
    /// (prefix included) and value part at the first `=`.
    pub fn split_assignment(&self) -> Option<(&str, &str)> {
        if self.kind != TokenKind::ArgNameWithValue {
            return None;
        }
        self.text.split_once('=')
    }

    /// Whether the token spells an argument name of some form.
    pub fn is_name_like(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::ArgName | TokenKind::ArgNameList | TokenKind::ArgNameWithValue
        )
    }
}
