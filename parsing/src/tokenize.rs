//! Raw input to token stream.
//!
//! Both input forms (a pre-split arg vector or a single line) normalize to
//! the same stream of positioned [`Token`]s. The tokenizer is
//! schema-agnostic: it is configured with the prefix characters the schema
//! declares (a pre-pass fed by the caller), but never looks up names, so
//! `-abc` is always emitted as a name list and bare words always as
//! values; the parser resolves both against the schema.

use tracing::{debug, warn};

use crate::error::{TokenizeError, TokenizeErrorKind};
use crate::token::{Token, TokenKind};

/// Raw input to a parse invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// A pre-split argument vector, e.g. from `std::env::args`.
    Args(Vec<String>),
    /// A single command line, split on unescaped whitespace honoring
    /// quotes.
    Line(String),
}

impl RawInput {
    pub fn args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Args(args.into_iter().map(Into::into).collect())
    }

    pub fn line(line: impl Into<String>) -> Self {
        Self::Line(line.into())
    }
}

impl From<&str> for RawInput {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<Vec<String>> for RawInput {
    fn from(args: Vec<String>) -> Self {
        Self::Args(args)
    }
}

/// A whitespace-delimited word with its input offset, before
/// classification.
#[derive(Debug)]
struct Word {
    text: String,
    position: usize,
    quoted: bool,
}

/// Splits raw input into classified tokens.
pub struct Tokenizer {
    prefixes: Vec<char>,
}

impl Tokenizer {
    /// `prefixes` is the set of prefix characters declared by the schema's
    /// arguments; defaults to `-` when empty.
    pub fn new(prefixes: &[char]) -> Self {
        let prefixes = if prefixes.is_empty() {
            vec!['-']
        } else {
            prefixes.to_vec()
        };
        Self { prefixes }
    }

    /// Tokenizes the input, recovering past malformed spans: errors are
    /// collected and the rest of a malformed token is kept as literal
    /// text.
    pub fn tokenize(&self, input: &RawInput) -> (Vec<Token>, Vec<TokenizeError>) {
        let mut errors = Vec::new();
        let words = match input {
            RawInput::Args(args) => split_args(args),
            RawInput::Line(line) => split_line(line, &mut errors),
        };

        let tokens: Vec<Token> = words.into_iter().map(|word| self.classify(word)).collect();
        debug!(tokens = tokens.len(), errors = errors.len(), "tokenized input");
        (tokens, errors)
    }

    fn classify(&self, word: Word) -> Token {
        if word.quoted {
            return Token::new(TokenKind::Literal, word.text, word.position);
        }

        let mut chars = word.text.chars();
        let kind = match chars.next() {
            Some(first) if self.prefixes.contains(&first) => {
                let rest = &word.text[first.len_utf8()..];
                let doubled = rest.starts_with(first);
                let name = if doubled { &rest[first.len_utf8()..] } else { rest };

                if name.is_empty() {
                    // a bare "-" or "--" is a plain value
                    TokenKind::Value
                } else if name.contains('=') {
                    TokenKind::ArgNameWithValue
                } else if doubled || name.chars().count() == 1 {
                    TokenKind::ArgName
                } else {
                    TokenKind::ArgNameList
                }
            }
            _ => TokenKind::Value,
        };

        Token::new(kind, word.text, word.position)
    }
}

/// Assigns byte offsets to pre-split args as if they were joined by
/// single spaces, so both input forms share one position space.
fn split_args(args: &[String]) -> Vec<Word> {
    let mut words = Vec::with_capacity(args.len());
    let mut position = 0;
    for arg in args {
        words.push(Word {
            text: arg.clone(),
            position,
            quoted: false,
        });
        position += arg.len() + 1;
    }
    words
}

fn split_line(line: &str, errors: &mut Vec<TokenizeError>) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut start: Option<usize> = None;
    let mut quoted = false;
    // the active quote character and the offset where it opened
    let mut quote: Option<(char, usize)> = None;

    let mut chars = line.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => {
                start.get_or_insert(offset);
                match chars.next() {
                    Some((_, escaped)) if matches!(escaped, '\\' | '"' | '\'' | ' ') => {
                        current.push(escaped);
                    }
                    Some((_, escaped)) => {
                        warn!(position = offset, escape = %escaped, "unknown escape, keeping text literally");
                        errors.push(TokenizeError {
                            kind: TokenizeErrorKind::UnknownEscape(escaped),
                            position: offset,
                        });
                        current.push('\\');
                        current.push(escaped);
                    }
                    None => current.push('\\'),
                }
            }
            '"' | '\'' => match quote {
                Some((open, _)) if open == ch => quote = None,
                Some(_) => current.push(ch),
                None => {
                    // only a quote opening the word makes the token a
                    // literal; a mid-word quote (--msg="a b") just
                    // suspends splitting
                    if start.is_none() {
                        quoted = true;
                    }
                    start.get_or_insert(offset);
                    quote = Some((ch, offset));
                }
            },
            c if c.is_whitespace() && quote.is_none() => {
                flush(&mut words, &mut current, &mut start, &mut quoted);
            }
            c => {
                start.get_or_insert(offset);
                current.push(c);
            }
        }
    }

    if let Some((_, open_offset)) = quote {
        // recovery: the rest of the malformed token was accumulated as
        // literal text already
        warn!(position = open_offset, "unterminated quote");
        errors.push(TokenizeError {
            kind: TokenizeErrorKind::UnterminatedQuote,
            position: open_offset,
        });
    }
    flush(&mut words, &mut current, &mut start, &mut quoted);

    words
}

fn flush(words: &mut Vec<Word>, current: &mut String, start: &mut Option<usize>, quoted: &mut bool) {
    if let Some(position) = start.take() {
        words.push(Word {
            text: std::mem::take(current),
            position,
            quoted: std::mem::take(quoted),
        });
    } else {
        current.clear();
        *quoted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(line: &str) -> (Vec<Token>, Vec<TokenizeError>) {
        Tokenizer::new(&['-']).tokenize(&RawInput::line(line))
    }

    #[test]
    fn test_classifies_name_forms() {
        let (tokens, errors) = tokenize("--out file -v -abc --level=3 -n=5 plain");
        assert!(errors.is_empty());
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ArgName,
                TokenKind::Value,
                TokenKind::ArgName,
                TokenKind::ArgNameList,
                TokenKind::ArgNameWithValue,
                TokenKind::ArgNameWithValue,
                TokenKind::Value,
            ]
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let (tokens, _) = tokenize("--a bb c");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[2].position, 7);
    }

    #[test]
    fn test_quoted_segment_is_one_literal() {
        let (tokens, errors) = tokenize(r#"--msg "hello -world" tail"#);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Literal);
        assert_eq!(tokens[1].text, "hello -world");
        assert_eq!(tokens[1].position, 6);
    }

    #[test]
    fn test_escaped_space_joins_word() {
        let (tokens, errors) = tokenize(r"one\ word two");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].text, "one word");
        assert_eq!(tokens[1].text, "two");
    }

    #[test]
    fn test_unterminated_quote_recovers_as_literal() {
        let (tokens, errors) = tokenize(r#"ok "broken rest"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, TokenizeErrorKind::UnterminatedQuote);
        assert_eq!(errors[0].position, 3);
        // tokenization continued past the error
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Literal);
        assert_eq!(tokens[1].text, "broken rest");
    }

    #[test]
    fn test_unknown_escape_reports_and_keeps_text() {
        let (tokens, errors) = tokenize(r"a\qb");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, TokenizeErrorKind::UnknownEscape('q'));
        assert_eq!(tokens[0].text, r"a\qb");
    }

    #[test]
    fn test_args_input_shares_position_space() {
        let input = RawInput::args(["--a", "bb", "c"]);
        let (tokens, errors) = Tokenizer::new(&['-']).tokenize(&input);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[2].position, 7);
    }

    #[test]
    fn test_mid_word_quote_keeps_assignment_kind() {
        let (tokens, errors) = tokenize(r#"--msg="a b""#);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::ArgNameWithValue);
        assert_eq!(tokens[0].text, "--msg=a b");
    }

    #[test]
    fn test_bare_dashes_are_values() {
        let (tokens, _) = tokenize("- --");
        assert_eq!(tokens[0].kind, TokenKind::Value);
        assert_eq!(tokens[1].kind, TokenKind::Value);
    }
}
