//! File-backed argument type.

use std::fs::File;
use std::io::Read;

use crate::coerce::{Coercer, CoercionSink};
use crate::value::ArgValue;

/// Reads the contents of the file named by the raw value.
///
/// The blocking read is a property of this adapter, not of the engine; the
/// file handle is scoped to the coercion call and closed on every exit
/// path. A missing or unreadable file is an ordinary coercion error
/// anchored at the path value.
#[derive(Debug, Default)]
pub struct FileCoercer {
    contents: Option<String>,
}

impl Coercer for FileCoercer {
    fn coerce(&mut self, values: &[String], sink: &mut CoercionSink) {
        let Some(path) = values.first() else { return };

        match read_file(path) {
            Ok(text) => self.contents = Some(text),
            Err(err) => sink.error(format!("cannot read file '{path}': {err}"), Some(0)),
        }
    }

    fn value(&self) -> Option<ArgValue> {
        self.contents.clone().map(ArgValue::Text)
    }

    fn reset(&mut self) {
        self.contents = None;
    }

    fn representation(&self) -> &'static str {
        "file"
    }
}

fn read_file(path: &str) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}
