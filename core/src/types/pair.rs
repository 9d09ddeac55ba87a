//! Two composed sub-coercers consuming one value each.

use crate::coerce::{Coercer, CoercionSink};
use crate::range::Range;
use crate::value::ArgValue;

/// Composes two single-value coercers into one unit consuming two values.
///
/// The first raw value goes to the first sub-unit, the second to the
/// second. Sub-unit errors are independent (one side may fail while the
/// other coerces) and are rebased onto the outer invocation's value
/// indices before being re-raised, so error positions always point at the
/// offending raw value.
#[derive(Debug)]
pub struct PairCoercer {
    first: Box<dyn Coercer>,
    second: Box<dyn Coercer>,
}

impl PairCoercer {
    pub fn new(first: impl Coercer + 'static, second: impl Coercer + 'static) -> Self {
        Self {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl Coercer for PairCoercer {
    fn arity(&self) -> Range {
        Range::exactly(2)
    }

    fn coerce(&mut self, values: &[String], sink: &mut CoercionSink) {
        let [first_raw, second_raw] = values else {
            return;
        };

        let mut first_sink = CoercionSink::new(1);
        self.first
            .coerce(std::slice::from_ref(first_raw), &mut first_sink);
        sink.absorb(first_sink, 0);

        let mut second_sink = CoercionSink::new(1);
        self.second
            .coerce(std::slice::from_ref(second_raw), &mut second_sink);
        sink.absorb(second_sink, 1);
    }

    fn value(&self) -> Option<ArgValue> {
        match (self.first.value(), self.second.value()) {
            (Some(first), Some(second)) => Some(ArgValue::Pair(Box::new(first), Box::new(second))),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn representation(&self) -> &'static str {
        "pair"
    }
}
