use rpds::HashTrieMap;

use crate::{
    error::{Error, Result},
    prelude::*,
    term::{Term, TermRef},
};

/// Named combinators. Bindings are never replaced once made, and the map is persistent, so
/// cloning an environment is cheap.
#[derive(Default, Clone, Debug)]
pub struct Environment {
    bindings: HashTrieMap<Identifier, TermRef>,
}

impl Environment {
    /// I, M, K, KI, C, the Church booleans and their operators, and Y.
    pub fn standard() -> Result<Self> {
        let v = Term::var;
        let mut env = Self::default();
        // Idiot: λa.a
        env.define("I", Term::abs("a", v("a")))?;
        // Mockingbird: λf.ff
        env.define("M", Term::abs("f", Term::apply(v("f"), v("f"))))?;
        // Kestrel: λab.a
        env.define("K", Term::lambda(["a", "b"], v("a")))?;
        // Kite: λab.b
        env.define("KI", Term::lambda(["a", "b"], v("b")))?;
        // Cardinal: λfab.fba
        env.define(
            "C",
            Term::lambda(["f", "a", "b"], Term::apply_all(v("f"), [v("b"), v("a")])),
        )?;

        env.define("T", env.expand(&v("K"))?)?;
        env.define("F", env.expand(&v("KI"))?)?;
        // λp.pFT
        env.define(
            "NOT",
            env.expand(&Term::abs("p", Term::apply_all(v("p"), [v("F"), v("T")])))?,
        )?;
        // λpq.pqp
        env.define(
            "AND",
            env.expand(&Term::lambda(["p", "q"], Term::apply_all(v("p"), [v("q"), v("p")])))?,
        )?;
        // λpq.ppq
        env.define(
            "OR",
            env.expand(&Term::lambda(["p", "q"], Term::apply_all(v("p"), [v("p"), v("q")])))?,
        )?;
        // λpq.pq(NOT q)
        env.define(
            "EQ",
            env.expand(&Term::lambda(
                ["p", "q"],
                Term::apply_all(v("p"), [v("q"), Term::apply(v("NOT"), v("q"))]),
            ))?,
        )?;
        // λf.(λx.f(xx))(λx.f(xx))
        let half = Term::abs("x", Term::apply(v("f"), Term::apply(v("x"), v("x"))));
        env.define("Y", Term::abs("f", Term::apply(half.clone(), half)))?;
        Ok(env)
    }

    pub fn define(&mut self, name: impl Into<String>, term: Term) -> Result<()> {
        let name = Identifier::new(name.into());
        if self.bindings.contains_key(&name) {
            return Err(Error::AlreadyDefined(name));
        }
        let free = term.free_variables();
        if !free.is_empty() {
            return Err(Error::NotClosed {
                name,
                free: free.into_iter().collect(),
            });
        }
        log::debug!("defined {name} := {term}");
        self.bindings = self.bindings.insert(name, term.into());
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<TermRef> {
        self.bindings
            .get(&Identifier::new(name.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(Identifier::new(name.to_string())))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(&Identifier::new(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bindings.size()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &TermRef)> {
        let mut entries = self.bindings.iter().collect::<Vec<_>>();
        entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        entries.into_iter()
    }

    /// Replaces every free combinator name in `term` by its definition. Free lower-case
    /// variables are kept as they are.
    pub fn expand(&self, term: &Term) -> Result<Term> {
        fn rec<'a>(
            env: &Environment,
            term: &'a Term,
            bound: &mut Vec<&'a Identifier>,
        ) -> Result<Term> {
            Ok(match term {
                Term::Var(name) if bound.contains(&name) || !is_combinator_name(name) => {
                    term.clone()
                }
                Term::Var(name) => env.resolve(name)?.as_ref().clone(),
                Term::Abs(param, body) => {
                    bound.push(param);
                    let body = rec(env, body, bound);
                    bound.pop();
                    Term::Abs(param.clone(), body?.into())
                }
                Term::Apply(lhs, rhs) => {
                    Term::Apply(rec(env, lhs, bound)?.into(), rec(env, rhs, bound)?.into())
                }
            })
        }
        rec(self, term, &mut vec![])
    }

    /// Names whose definitions equal `term` up to renaming of bound variables.
    pub fn names_of(&self, term: &Term) -> Vec<Identifier> {
        self.iter()
            .filter(|(_, defined)| defined.alpha_eq(term))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reducer::normalize;

    fn eval(env: &Environment, term: Term) -> Term {
        normalize(&env.expand(&term).unwrap(), 1000).unwrap().term
    }

    #[test]
    fn test_define_and_resolve() {
        let mut env = Environment::default();
        env.define("I", Term::abs("a", Term::var("a"))).unwrap();
        assert_eq!(
            env.resolve("I").unwrap().as_ref(),
            &Term::abs("a", Term::var("a"))
        );
        assert_eq!(
            env.resolve("K"),
            Err(Error::NotFound(Identifier::new("K".into())))
        );
        assert_eq!(
            env.define("I", Term::abs("b", Term::var("b"))),
            Err(Error::AlreadyDefined(Identifier::new("I".into())))
        );
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_define_rejects_open_terms() {
        let mut env = Environment::default();
        // λa.ab
        let open = Term::abs("a", Term::apply(Term::var("a"), Term::var("b")));
        assert_eq!(
            env.define("X", open),
            Err(Error::NotClosed {
                name: Identifier::new("X".into()),
                free: vec![Identifier::new("b".into())],
            })
        );
        assert!(!env.contains("X"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_expand() {
        let env = Environment::standard().unwrap();
        let term = Term::apply_all(Term::var("K"), [Term::var("a"), Term::var("b")]);
        assert_eq!(
            env.expand(&term).unwrap(),
            Term::apply_all(
                Term::lambda(["a", "b"], Term::var("a")),
                [Term::var("a"), Term::var("b")]
            )
        );
        assert_eq!(
            env.expand(&Term::var("NOPE")),
            Err(Error::NotFound(Identifier::new("NOPE".into())))
        );
    }

    #[test]
    fn test_standard_booleans() {
        let env = Environment::standard().unwrap();
        let v = Term::var;
        let t = env.resolve("T").unwrap();
        let f = env.resolve("F").unwrap();
        let cases = [
            (Term::apply(v("NOT"), v("T")), &f),
            (Term::apply(v("NOT"), v("F")), &t),
            (Term::apply_all(v("AND"), [v("T"), v("T")]), &t),
            (Term::apply_all(v("AND"), [v("T"), v("F")]), &f),
            (Term::apply_all(v("OR"), [v("F"), v("T")]), &t),
            (Term::apply_all(v("OR"), [v("F"), v("F")]), &f),
            (Term::apply_all(v("EQ"), [v("F"), v("F")]), &t),
            (Term::apply_all(v("EQ"), [v("T"), v("F")]), &f),
        ];
        for (term, expected) in cases {
            let result = eval(&env, term.clone());
            assert!(result.alpha_eq(expected), "{term} reduced to {result}");
        }
    }

    #[test]
    fn test_names_of() {
        let env = Environment::standard().unwrap();
        let names = env.names_of(&Term::lambda(["x", "y"], Term::var("y")));
        assert_eq!(
            names,
            vec![Identifier::new("F".into()), Identifier::new("KI".into())]
        );
        assert!(env.names_of(&Term::var("x")).is_empty());
    }
}
