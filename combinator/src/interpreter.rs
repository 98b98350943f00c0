use crate::{
    environment::Environment,
    error::{Error, Result},
    parser::{self, Command},
    prelude::*,
    reducer::{self, Reduction},
    term::{Term, TermRef},
};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Defined {
        name: Identifier,
        term: TermRef,
    },
    Evaluated {
        input: Term,
        reduction: Reduction,
        /// Known combinators equal to the result, e.g. `F` and `KI` for `λab.b`.
        aliases: Vec<Identifier>,
    },
    /// Reduction gave up before reaching a normal form. Always a
    /// [`StepLimitExceeded`](Error::StepLimitExceeded).
    Diverged { input: Term, error: Error },
}

impl Outcome {
    pub fn reached_normal_form(&self) -> bool {
        match self {
            Outcome::Defined { .. } | Outcome::Evaluated { .. } => true,
            Outcome::Diverged { .. } => false,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Defined { name, term } => write!(f, "{name} := {term}"),
            Outcome::Evaluated {
                input,
                reduction,
                aliases,
            } => {
                write!(f, "{input} => {}", reduction.term)?;
                let unit = if reduction.steps == 1 { "step" } else { "steps" };
                write!(f, "  ({} {unit})", reduction.steps)?;
                if !aliases.is_empty() {
                    let aliases = aliases
                        .iter()
                        .map(|alias| alias.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "  [{aliases}]")?;
                }
                Ok(())
            }
            Outcome::Diverged { input, error } => write!(f, "{input}: {error}"),
        }
    }
}

/// Runs definitions and terms against an environment.
#[derive(Clone, Debug)]
pub struct Interpreter {
    environment: Environment,
    max_steps: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Environment::default(), DEFAULT_MAX_STEPS)
    }
}

impl Interpreter {
    pub fn new(environment: Environment, max_steps: usize) -> Self {
        Self {
            environment,
            max_steps,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    /// Expands combinator names in `term` and reduces it.
    pub fn evaluate(&self, term: &Term) -> Result<Outcome> {
        let expanded = self.environment.expand(term)?;
        match reducer::normalize(&expanded, self.max_steps) {
            Ok(reduction) => Ok(Outcome::Evaluated {
                input: term.clone(),
                aliases: self.environment.names_of(&reduction.term),
                reduction,
            }),
            Err(error @ Error::StepLimitExceeded { .. }) => Ok(Outcome::Diverged {
                input: term.clone(),
                error,
            }),
            Err(e) => Err(e),
        }
    }

    /// Expands combinator names in `term` and binds the closed result to `name`.
    pub fn define(&mut self, name: &Identifier, term: &Term) -> Result<Outcome> {
        let expanded = match self.environment.expand(term) {
            Ok(expanded) => expanded,
            Err(Error::NotFound(missing)) if missing == *name => {
                // Self reference: a recursive definition needs an explicit fixed point.
                return Err(Error::NotClosed {
                    name: name.clone(),
                    free: vec![missing],
                });
            }
            Err(e) => return Err(e),
        };
        self.environment.define(name.as_str(), expanded)?;
        let term = self.environment.resolve(name)?;
        Ok(Outcome::Defined {
            name: name.clone(),
            term,
        })
    }

    pub fn execute(&mut self, command: &Command) -> Result<Outcome> {
        match command {
            Command::Define(name, term) => self.define(name.value(), term.value()),
            Command::Term(term) => self.evaluate(term.value()),
        }
    }

    /// Executes `commands` in order, handing each outcome to `emit`. Stops at the first
    /// failing command; its error is returned with the command's span.
    pub fn execute_all<'c>(
        &mut self,
        commands: impl IntoIterator<Item = &'c Command>,
        mut emit: impl FnMut(&Outcome),
    ) -> Result<(), Diagnostic> {
        for command in commands {
            let outcome = self
                .execute(command)
                .map_err(|e| Diagnostic::custom(command.span(), e.to_string()))?;
            emit(&outcome);
        }
        Ok(())
    }

    /// Parses and executes a script.
    pub fn run(&mut self, input: &str) -> Result<Vec<Outcome>, Vec<Diagnostic>> {
        let commands = parser::parse_commands(input)?;
        let mut outcomes = vec![];
        self.execute_all(&commands, |outcome| outcomes.push(outcome.clone()))
            .map_err(|e| vec![e])?;
        Ok(outcomes)
    }
}

#[cfg(test)]
mod test {
    use chumsky::error::SimpleReason;
    use pretty_assertions::assert_eq;

    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(Environment::standard().unwrap(), 1000)
    }

    fn run(interpreter: &mut Interpreter, input: &str) -> Vec<String> {
        interpreter
            .run(input)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_spec_examples() {
        let mut interpreter = interpreter();
        assert_eq!(
            run(
                &mut interpreter,
                "I x\nK a b\nKI a b\nC f a b\nNOT T\n((λa.a)λb.λc.b)(x)λe.f"
            ),
            vec![
                "Ix => x  (1 step)",
                "Kab => a  (2 steps)",
                "KIab => b  (2 steps)",
                "Cfab => fba  (3 steps)",
                "NOT T => λab.b  (3 steps)  [F, KI]",
                "(λa.a)(λbc.b)xλe.f => x  (3 steps)",
            ]
        );
    }

    #[test]
    fn test_definitions_build_on_each_other() {
        let mut interpreter = Interpreter::default();
        let lines = run(
            &mut interpreter,
            "I := a => a; K = λab.a\nKI := K I\nKI x y",
        );
        assert_eq!(
            lines,
            vec![
                "I := λa.a",
                "K := λab.a",
                "KI := (λab.a)λa.a",
                "KIxy => y  (3 steps)",
            ]
        );
    }

    #[test]
    fn test_step_limit_is_reported() {
        let mut interpreter = interpreter();
        let outcomes = interpreter.run("M M; I z").unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].reached_normal_form());
        assert_eq!(
            outcomes[0].to_string(),
            "M M: No normal form reached within 1000 steps, stopped at `(λf.ff)λf.ff`"
        );
        assert!(outcomes[1].reached_normal_form());

        interpreter.set_max_steps(5);
        let outcomes = interpreter.run("Y I").unwrap();
        assert!(!outcomes[0].reached_normal_form());
    }

    #[test]
    fn test_growing_term_is_reported_not_fatal() {
        let mut interpreter = interpreter();
        interpreter.set_max_steps(DEFAULT_MAX_STEPS);
        let outcomes = interpreter.run("(λx.xxx)λx.xxx\nK a b").unwrap();
        assert!(matches!(
            &outcomes[0],
            Outcome::Diverged {
                error: Error::StepLimitExceeded { .. },
                ..
            }
        ));
        assert_eq!(outcomes[1].to_string(), "Kab => a  (2 steps)");
    }

    #[test]
    fn test_errors_carry_spans() {
        let mut interpreter = interpreter();
        let errors = interpreter.run("I x\nX := λa.ab").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 4..14);
        assert!(matches!(
            errors[0].reason(),
            SimpleReason::Custom(msg) if msg.contains("not closed")
        ));

        let errors = interpreter.run("NOPE x").unwrap_err();
        assert_eq!(errors[0].span(), 0..6);

        let errors = interpreter.run("K :=").unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_redefinition_and_recursion_are_rejected() {
        let mut interpreter = interpreter();
        assert_eq!(
            interpreter.define(&Identifier::new("K".into()), &Term::var("I")),
            Err(Error::AlreadyDefined(Identifier::new("K".into())))
        );
        let loop_name = Identifier::new("LOOP".into());
        assert_eq!(
            interpreter.define(&loop_name, &Term::var("LOOP")),
            Err(Error::NotClosed {
                name: loop_name.clone(),
                free: vec![loop_name.clone()],
            })
        );
    }
}
