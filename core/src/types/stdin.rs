//! Standard-input argument type.

use std::fmt;
use std::io::{self, Read};

use crate::coerce::{Coercer, CoercionSink};
use crate::range::Range;
use crate::value::ArgValue;

/// Drains a byte source (standard input by default) into a text value.
///
/// Consumes no raw values: naming the argument triggers the read. The
/// standard-input lock is acquired and released within the coercion call;
/// an injected reader lives as long as the coercer and survives resets.
/// Tests inject a reader through [`StdinCoercer::with_source`] instead of
/// a terminal.
pub struct StdinCoercer {
    source: Option<Box<dyn Read>>,
    text: Option<String>,
}

impl StdinCoercer {
    pub fn new() -> Self {
        Self {
            source: None,
            text: None,
        }
    }

    pub fn with_source(source: impl Read + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            text: None,
        }
    }
}

impl Default for StdinCoercer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdinCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdinCoercer")
            .field("injected_source", &self.source.is_some())
            .field("text", &self.text)
            .finish()
    }
}

impl Coercer for StdinCoercer {
    fn arity(&self) -> Range {
        Range::NONE
    }

    fn coerce(&mut self, _values: &[String], sink: &mut CoercionSink) {
        let mut text = String::new();
        // the injected reader is kept, not consumed, so a schema reused
        // across parses never falls back to the terminal
        let result = match self.source.as_mut() {
            Some(reader) => reader.read_to_string(&mut text),
            None => io::stdin().lock().read_to_string(&mut text),
        };

        match result {
            Ok(_) => self.text = Some(text),
            Err(err) => sink.error(format!("cannot read standard input: {err}"), None),
        }
    }

    fn value(&self) -> Option<ArgValue> {
        self.text.clone().map(ArgValue::Text)
    }

    fn reset(&mut self) {
        self.text = None;
    }

    fn representation(&self) -> &'static str {
        "stdin"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_drains_injected_source() {
        let mut coercer = StdinCoercer::with_source(Cursor::new("line one\nline two\n"));
        let mut sink = CoercionSink::new(0);
        coercer.coerce(&[], &mut sink);

        assert!(sink.is_empty());
        assert_eq!(coercer.value(), Some(ArgValue::Text("line one\nline two\n".into())));
    }

    #[test]
    fn test_injected_source_survives_reset() {
        let mut coercer = StdinCoercer::with_source(Cursor::new("first"));
        let mut sink = CoercionSink::new(0);
        coercer.coerce(&[], &mut sink);
        assert_eq!(coercer.value(), Some(ArgValue::Text("first".into())));

        coercer.reset();
        let mut sink = CoercionSink::new(0);
        coercer.coerce(&[], &mut sink);
        // the exhausted reader yields empty text instead of reaching for
        // the terminal
        assert!(sink.is_empty());
        assert_eq!(coercer.value(), Some(ArgValue::Text(String::new())));
    }

    #[test]
    fn test_read_failure_blames_whole_invocation() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("pipe closed"))
            }
        }

        let mut coercer = StdinCoercer::with_source(Broken);
        let mut sink = CoercionSink::new(0);
        coercer.coerce(&[], &mut sink);

        let issues = sink.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].value_index, None);
    }
}
