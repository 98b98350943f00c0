use std::{collections::BTreeSet, rc::Rc};

use crate::prelude::*;

pub type TermRef = Rc<Term>;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    /// `x`
    Var(Identifier),
    /// `λx.t`
    Abs(Identifier, TermRef),
    /// `t t`
    Apply(TermRef, TermRef),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Identifier::new(name.into()))
    }

    pub fn abs(param: impl Into<String>, body: impl Into<TermRef>) -> Self {
        Term::Abs(Identifier::new(param.into()), body.into())
    }

    pub fn apply(lhs: impl Into<TermRef>, rhs: impl Into<TermRef>) -> Self {
        Term::Apply(lhs.into(), rhs.into())
    }

    /// `λab.t`, i.e. `λa.λb.t`.
    pub fn lambda<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Term) -> Self {
        let params = params.into_iter().map(Into::into).collect::<Vec<_>>();
        params
            .into_iter()
            .rev()
            .fold(body, |body, param| Term::abs(param, body))
    }

    /// Left-associative application of `lhs` to every argument in turn.
    pub fn apply_all(lhs: Term, args: impl IntoIterator<Item = Term>) -> Self {
        args.into_iter().fold(lhs, |lhs, rhs| Term::apply(lhs, rhs))
    }

    pub fn free_variables(&self) -> BTreeSet<Identifier> {
        fn rec<'a>(
            term: &'a Term,
            bound: &mut Vec<&'a Identifier>,
            free: &mut BTreeSet<Identifier>,
        ) {
            match term {
                Term::Var(name) => {
                    if !bound.contains(&name) {
                        free.insert(name.clone());
                    }
                }
                Term::Abs(param, body) => {
                    bound.push(param);
                    rec(body, bound, free);
                    bound.pop();
                }
                Term::Apply(lhs, rhs) => {
                    rec(lhs, bound, free);
                    rec(rhs, bound, free);
                }
            }
        }
        let mut free = BTreeSet::new();
        rec(self, &mut vec![], &mut free);
        free
    }

    pub fn occurs_free(&self, name: &str) -> bool {
        match self {
            Term::Var(x) => x.as_str() == name,
            Term::Abs(param, body) => param.as_str() != name && body.occurs_free(name),
            Term::Apply(lhs, rhs) => lhs.occurs_free(name) || rhs.occurs_free(name),
        }
    }

    /// A combinator is a term without free variables.
    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }

    pub fn is_redex(&self) -> bool {
        matches!(self, Term::Apply(lhs, _) if matches!(lhs.as_ref(), Term::Abs(_, _)))
    }

    pub fn is_normal_form(&self) -> bool {
        match self {
            Term::Var(_) => true,
            Term::Abs(_, body) => body.is_normal_form(),
            Term::Apply(lhs, rhs) => {
                !self.is_redex() && lhs.is_normal_form() && rhs.is_normal_form()
            }
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Term::Var(_) => 1,
            Term::Abs(_, body) => 1 + body.size(),
            Term::Apply(lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    /// Length of the longest path from the root to a variable. Walks with an explicit stack, so
    /// it works on terms too deep for the recursive passes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((term, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match term {
                Term::Var(_) => {}
                Term::Abs(_, body) => pending.push((body.as_ref(), depth + 1)),
                Term::Apply(lhs, rhs) => {
                    pending.push((lhs.as_ref(), depth + 1));
                    pending.push((rhs.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Equality up to the names of bound variables.
    pub fn alpha_eq(&self, other: &Term) -> bool {
        fn rec<'a>(
            lhs: &'a Term,
            rhs: &'a Term,
            lhs_bound: &mut Vec<&'a Identifier>,
            rhs_bound: &mut Vec<&'a Identifier>,
        ) -> bool {
            match (lhs, rhs) {
                (Term::Var(x), Term::Var(y)) => {
                    let i = lhs_bound.iter().rposition(|b| *b == x);
                    let j = rhs_bound.iter().rposition(|b| *b == y);
                    match (i, j) {
                        (Some(i), Some(j)) => i == j,
                        (None, None) => x == y,
                        _ => false,
                    }
                }
                (Term::Abs(x, lbody), Term::Abs(y, rbody)) => {
                    lhs_bound.push(x);
                    rhs_bound.push(y);
                    let ret = rec(lbody, rbody, lhs_bound, rhs_bound);
                    lhs_bound.pop();
                    rhs_bound.pop();
                    ret
                }
                (Term::Apply(lf, la), Term::Apply(rf, ra)) => {
                    rec(lf, rf, lhs_bound, rhs_bound) && rec(la, ra, lhs_bound, rhs_bound)
                }
                _ => false,
            }
        }
        rec(self, other, &mut vec![], &mut vec![])
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::printer::print(self))
    }
}
