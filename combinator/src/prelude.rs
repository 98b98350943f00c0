use std::rc::Rc;

pub type Identifier = Rc<String>;

pub type Span = std::ops::Range<usize>;
pub fn merge_span(lhs: &Span, rhs: &Span) -> Span {
    std::ops::Range {
        start: std::cmp::min(lhs.start, rhs.start),
        end: std::cmp::max(lhs.end, rhs.end),
    }
}

#[derive(derive_more::AsRef, Clone, PartialEq, Eq, derive_more::Display, Debug)]
#[display(bound = "T: std::fmt::Display")]
#[display(fmt = "{value}")]
pub struct Spanned<T> {
    pub span: Span,
    #[as_ref]
    pub value: T,
}
impl<T> Spanned<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Combinator names start with an upper-case letter (`K`, `KI`, `NOT`); everything else is an
/// ordinary variable.
pub fn is_combinator_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

pub use chumsky::error::Error as _;
/// A diagnostic with a span: parse errors, and semantic errors lifted with `Diagnostic::custom`.
pub type Diagnostic<I = String> = chumsky::error::Simple<I, Span>;
