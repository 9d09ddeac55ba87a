//! Parsing engine for `argonaut` command schemas.
//!
//! Takes raw input (an argv vector or a single command line), tokenizes it,
//! matches the tokens against an [`argonaut_core::Schema`], runs each
//! matched argument's coercer, and collects every diagnostic the run
//! produced into one position-ordered report.
//!
//! # Examples
//!
//! ```
//! use argonaut_core::{ArgSpec, CommandSpec};
//! use argonaut_core::types::IntCoercer;
//! use argonaut_parsing::parse_line;
//!
//! let mut schema = CommandSpec::new("greet")
//!     .with_arg(ArgSpec::new("times", IntCoercer::default()).with_name("t"))
//!     .with_arg(ArgSpec::flag("loud").with_name("l"))
//!     .build()?;
//!
//! let result = parse_line(&mut schema, "--times 3 -l");
//! assert!(!result.failed());
//! assert_eq!(
//!     result.value(&schema, "times").and_then(|v| v.as_int()),
//!     Some(3),
//! );
//! # Ok::<(), argonaut_core::SchemaError>(())
//! ```

use std::collections::HashMap;

use argonaut_core::{ArgId, ArgValue, CommandId, Schema};
use tracing::debug;

mod collect;
mod error;
mod output;
mod parse;
mod token;
mod tokenize;

pub use collect::Diagnostic;
pub use error::{ParseError, ParseErrorKind, TokenizeError, TokenizeErrorKind};
pub use output::{format_diagnostics, OutputFormat};
pub use token::{Token, TokenKind};
pub use tokenize::{RawInput, Tokenizer};

/// Outcome of one parse: final values, the invoked command chain, and the
/// ordered diagnostic report.
#[derive(Debug)]
pub struct ParseResult {
    values: HashMap<ArgId, Option<ArgValue>>,
    invoked: Vec<CommandId>,
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl ParseResult {
    /// Looks up an argument's final value by any of its names, searching
    /// the invoked command chain deepest first.
    pub fn value<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a ArgValue> {
        for &command in self.invoked.iter().rev() {
            for &arg in schema.command(command).arguments() {
                if schema.argument(arg).names().iter().any(|n| n == name) {
                    return self.values.get(&arg).and_then(|value| value.as_ref());
                }
            }
        }
        None
    }

    /// The final value of a specific argument, if it resolved to one.
    pub fn value_of(&self, arg: ArgId) -> Option<&ArgValue> {
        self.values.get(&arg).and_then(|value| value.as_ref())
    }

    /// The invoked command chain, root first.
    pub fn invoked(&self) -> &[CommandId] {
        &self.invoked
    }

    /// The deepest sub-command entered, if the input named one.
    pub fn subcommand(&self) -> Option<CommandId> {
        if self.invoked.len() > 1 {
            self.invoked.last().copied()
        } else {
            None
        }
    }

    /// Every reported diagnostic, ordered by input position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any diagnostic reached its command's exit threshold.
    pub fn failed(&self) -> bool {
        self.failed
    }
}

/// Parses raw input against a schema.
///
/// Resets the schema's per-run state first, so a schema can be reused
/// across calls. Caller-injected notes survive the reset; clear them with
/// [`Schema::clear_notes`] between runs if they should not.
pub fn parse(schema: &mut Schema, input: impl Into<RawInput>) -> ParseResult {
    let input = input.into();
    schema.reset();

    let prefixes = schema.prefix_chars();
    let (tokens, tokenize_errors) = Tokenizer::new(&prefixes).tokenize(&input);
    debug!(tokens = tokens.len(), "tokenized input");

    let run = parse::Parser::parse(schema, &tokens);
    let (diagnostics, failed) = collect::collect(schema, &run, &tokenize_errors);

    ParseResult {
        values: run.values,
        invoked: run.invoked,
        diagnostics,
        failed,
    }
}

/// Parses an argv-style vector, as handed over by the operating system.
pub fn parse_args(schema: &mut Schema, args: &[String]) -> ParseResult {
    parse(schema, RawInput::Args(args.to_vec()))
}

/// Parses a single command line, splitting it with quote and escape
/// handling first.
pub fn parse_line(schema: &mut Schema, line: &str) -> ParseResult {
    parse(schema, RawInput::Line(line.to_string()))
}
