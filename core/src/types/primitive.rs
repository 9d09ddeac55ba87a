//! Primitive coercers: bool, integer, counter, string.

use crate::coerce::{Coercer, CoercionSink};
use crate::range::Range;
use crate::value::ArgValue;

/// Presence flag. Consumes no values; being named at all sets it to `true`.
#[derive(Debug, Default)]
pub struct BoolCoercer {
    value: Option<bool>,
}

impl Coercer for BoolCoercer {
    fn arity(&self) -> Range {
        Range::NONE
    }

    fn coerce(&mut self, _values: &[String], _sink: &mut CoercionSink) {
        self.value = Some(true);
    }

    fn value(&self) -> Option<ArgValue> {
        self.value.map(ArgValue::Bool)
    }

    fn initial_value(&self) -> Option<ArgValue> {
        Some(ArgValue::Bool(false))
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn representation(&self) -> &'static str {
        "bool"
    }
}

/// Signed 64-bit integer parsed from a single raw value.
#[derive(Debug, Default)]
pub struct IntCoercer {
    value: Option<i64>,
}

impl Coercer for IntCoercer {
    fn coerce(&mut self, values: &[String], sink: &mut CoercionSink) {
        let Some(raw) = values.first() else { return };
        match raw.parse::<i64>() {
            Ok(parsed) => self.value = Some(parsed),
            Err(_) => sink.error(format!("invalid integer value: '{raw}'"), Some(0)),
        }
    }

    fn value(&self) -> Option<ArgValue> {
        self.value.map(ArgValue::Int)
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn representation(&self) -> &'static str {
        "int"
    }
}

/// Occurrence counter. Consumes no values; each invocation increments.
///
/// The usage arity is open-ended by default so `-vvv` style repetition
/// works; narrow it with [`CounterCoercer::with_usage_arity`].
#[derive(Debug)]
pub struct CounterCoercer {
    count: u32,
    usage: Range,
}

impl CounterCoercer {
    pub fn new() -> Self {
        Self {
            count: 0,
            usage: Range::ANY,
        }
    }

    pub fn with_usage_arity(mut self, usage: Range) -> Self {
        self.usage = usage;
        self
    }
}

impl Default for CounterCoercer {
    fn default() -> Self {
        Self::new()
    }
}

impl Coercer for CounterCoercer {
    fn arity(&self) -> Range {
        Range::NONE
    }

    fn usage_arity(&self) -> Range {
        self.usage
    }

    fn coerce(&mut self, _values: &[String], _sink: &mut CoercionSink) {
        self.count += 1;
    }

    fn value(&self) -> Option<ArgValue> {
        (self.count > 0).then_some(ArgValue::Count(self.count))
    }

    fn initial_value(&self) -> Option<ArgValue> {
        Some(ArgValue::Count(0))
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn representation(&self) -> &'static str {
        "counter"
    }
}

/// Verbatim single string value.
#[derive(Debug, Default)]
pub struct StringCoercer {
    value: Option<String>,
}

impl Coercer for StringCoercer {
    fn coerce(&mut self, values: &[String], _sink: &mut CoercionSink) {
        if let Some(raw) = values.first() {
            self.value = Some(raw.clone());
        }
    }

    fn value(&self) -> Option<ArgValue> {
        self.value.clone().map(ArgValue::Str)
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn representation(&self) -> &'static str {
        "string"
    }
}
