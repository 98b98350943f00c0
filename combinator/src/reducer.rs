//! Normal-order β-reduction with capture-avoiding substitution.

use std::collections::BTreeSet;

use crate::{
    error::{Error, Result},
    prelude::*,
    term::{Term, TermRef},
};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Reduction {
    pub term: Term,
    pub steps: usize,
    /// False when the step bound or the depth guard stopped reduction while a redex was left.
    pub normal_form: bool,
}

/// Replaces free occurrences of `name` in `body` with `value`, renaming bound variables of
/// `body` that would capture a free variable of `value`.
pub fn substitute(body: &Term, name: &str, value: &Term) -> Term {
    substitute_avoiding(body, name, value, &value.free_variables())
        .unwrap_or_else(|| body.clone())
}

// Returns `None` when `name` does not occur free in `body`, so untouched subtrees keep being
// shared by their `Rc`.
fn substitute_avoiding(
    body: &Term,
    name: &str,
    value: &Term,
    value_free: &BTreeSet<Identifier>,
) -> Option<Term> {
    match body {
        Term::Var(x) => (x.as_str() == name).then(|| value.clone()),
        Term::Apply(lhs, rhs) => {
            let new_lhs = substitute_avoiding(lhs, name, value, value_free);
            let new_rhs = substitute_avoiding(rhs, name, value, value_free);
            if new_lhs.is_none() && new_rhs.is_none() {
                return None;
            }
            Some(Term::Apply(
                new_lhs.map_or_else(|| lhs.clone(), TermRef::new),
                new_rhs.map_or_else(|| rhs.clone(), TermRef::new),
            ))
        }
        Term::Abs(param, _) if param.as_str() == name => None,
        Term::Abs(param, inner) => {
            let substituted = substitute_avoiding(inner, name, value, value_free)?;
            if !value_free.contains(param) {
                return Some(Term::Abs(param.clone(), substituted.into()));
            }
            let mut avoid = inner.free_variables();
            avoid.extend(value_free.iter().cloned());
            avoid.insert(Identifier::new(name.to_string()));
            let fresh = fresh_name(param, &avoid);
            log::trace!("renaming `{param}` to `{fresh}` to avoid capture");
            let renamed = substitute(inner, param, &Term::Var(fresh.clone()));
            let body = substitute_avoiding(&renamed, name, value, value_free).unwrap_or(renamed);
            Some(Term::Abs(fresh, body.into()))
        }
    }
}

/// `b` becomes `b1`, `b2`, ... whichever is first not in `avoid`.
fn fresh_name(name: &str, avoid: &BTreeSet<Identifier>) -> Identifier {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let stem = if stem.is_empty() { "v" } else { stem };
    let mut suffix = 1usize;
    loop {
        let candidate = Identifier::new(format!("{stem}{suffix}"));
        if !avoid.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Contracts the leftmost-outermost redex, or returns `None` for a normal form.
pub fn step(term: &Term) -> Option<Term> {
    match term {
        Term::Var(_) => None,
        Term::Abs(param, body) => step(body).map(|body| Term::Abs(param.clone(), body.into())),
        Term::Apply(lhs, rhs) => {
            if let Term::Abs(param, body) = lhs.as_ref() {
                return Some(substitute(body, param, rhs));
            }
            if let Some(lhs) = step(lhs) {
                return Some(Term::Apply(lhs.into(), rhs.clone()));
            }
            step(rhs).map(|rhs| Term::Apply(lhs.clone(), rhs.into()))
        }
    }
}

/// Terms nested deeper than this stop the reduction. Substitution, printing and the other
/// passes recurse once per level, and a divergent term can grow a level on every step.
pub const MAX_DEPTH: usize = 1_000;

/// Reduces `term` for at most `max_steps` steps, or until it is nested deeper than
/// [`MAX_DEPTH`].
pub fn reduce(term: &Term, max_steps: usize) -> Reduction {
    let mut term = term.clone();
    let mut steps = 0;
    while steps < max_steps {
        if term.depth() > MAX_DEPTH {
            log::debug!("term nested deeper than {MAX_DEPTH} levels after {steps} steps");
            break;
        }
        match step(&term) {
            Some(next) => {
                steps += 1;
                log::trace!("step {steps}: {next}");
                term = next;
            }
            None => {
                log::debug!("normal form reached after {steps} steps");
                return Reduction {
                    term,
                    steps,
                    normal_form: true,
                };
            }
        }
    }
    let normal_form = term.is_normal_form();
    if !normal_form {
        log::debug!("gave up after {steps} steps");
    }
    Reduction {
        term,
        steps,
        normal_form,
    }
}

/// Like [`reduce`], but running out of steps is an error.
pub fn normalize(term: &Term, max_steps: usize) -> Result<Reduction> {
    let reduction = reduce(term, max_steps);
    if reduction.normal_form {
        Ok(reduction)
    } else {
        Err(Error::StepLimitExceeded {
            limit: reduction.steps,
            term: reduction.term,
        })
    }
}
