//! Built-in coercer library.
//!
//! Each type here is a self-contained unit satisfying only the
//! [`Coercer`](crate::Coercer) contract; the engine drives them without
//! knowing which concrete type sits behind an argument.

mod file;
mod pair;
mod primitive;
mod stdin;

pub use file::FileCoercer;
pub use pair::PairCoercer;
pub use primitive::{BoolCoercer, CounterCoercer, IntCoercer, StringCoercer};
pub use stdin::StdinCoercer;
