//! Core schema types and value coercion for the argonaut argument parser.
//!
//! This crate defines the declarative side of the engine:
//!
//! - [`CommandSpec`], [`ArgSpec`], [`GroupSpec`] — chained builders for a
//!   command tree with typed arguments and exclusivity groups.
//! - [`Schema`] — the built tree: arena storage addressed by [`CommandId`],
//!   [`ArgId`], and [`GroupId`] handles, holding both the immutable
//!   structure and the per-parse runtime state.
//! - [`Coercer`] — the contract every argument type satisfies: declared
//!   arity and usage arity, raw-string coercion into an [`ArgValue`], and
//!   error reporting through a [`CoercionSink`].
//! - [`types`] — the built-in coercer library (bool, int, counter, string,
//!   file, stdin, pair).
//!
//! Every statically detectable schema-contract violation fails at
//! [`CommandSpec::build`] with a [`SchemaError`]; the parsing crate never
//! aborts on user input.
//!
//! # Example
//!
//! ```
//! use argonaut_core::{ArgSpec, CommandSpec};
//! use argonaut_core::types::{CounterCoercer, IntCoercer};
//!
//! let schema = CommandSpec::new("serve")
//!     .with_arg(ArgSpec::new("port", IntCoercer::default()).with_name("p").obligatory())
//!     .with_arg(ArgSpec::new("verbose", CounterCoercer::new()).with_name("v"))
//!     .build()
//!     .unwrap();
//!
//! let root = schema.root();
//! assert!(schema.find_argument(root, "--port").is_some());
//! assert!(schema.find_argument(root, "-p").is_some());
//! ```

mod build;
mod coerce;
mod level;
mod range;
mod schema;
pub mod types;
mod value;

pub use build::{ArgSpec, CommandSpec, GroupSpec, SchemaError};
pub use coerce::{Coercer, CoercionIssue, CoercionSink, Note};
pub use level::{ErrorLevel, ErrorThresholds};
pub use range::Range;
pub use schema::{ArgId, Argument, Command, CommandId, Group, GroupId, Schema};
pub use value::ArgValue;
