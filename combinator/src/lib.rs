//! An evaluator for the untyped lambda calculus with named combinators.
//!
//! Terms are written in the shortened notation (`λab.a`, or `\ab.a`) or in arrow notation
//! (`a => b => a`), reduced in normal order with a step bound, and printed back in the
//! shortened notation.

pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod prelude;
pub mod printer;
pub mod reducer;
pub mod report;
pub mod term;

pub use environment::Environment;
pub use error::{Error, Result};
pub use interpreter::{Interpreter, Outcome};
pub use reducer::{normalize, reduce, step, substitute, Reduction};
pub use term::{Term, TermRef};
