use thiserror::Error;

use crate::{prelude::*, term::Term};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Combinator `{0}` is not defined")]
    NotFound(Identifier),
    #[error("Combinator `{name}` is not closed: found free variables {}", join(.free))]
    NotClosed {
        name: Identifier,
        free: Vec<Identifier>,
    },
    #[error("Combinator `{0}` is already defined")]
    AlreadyDefined(Identifier),
    #[error("No normal form reached within {limit} steps, stopped at `{term}`")]
    StepLimitExceeded { limit: usize, term: Term },
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

fn join(names: &[Identifier]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
