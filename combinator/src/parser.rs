use chumsky::prelude::*;

use crate::{prelude::*, term::Term};

pub trait SimpleParser<I: Clone + std::hash::Hash, O>:
    Parser<I, O, Error = Diagnostic<I>> + Clone
{
    #[allow(clippy::type_complexity)]
    fn spanned(self) -> chumsky::combinator::MapWithSpan<Self, fn(O, Span) -> Spanned<O>, O>
    where
        Self: Sized,
        I: std::cmp::Eq,
    {
        self.map_with_span(|value, span| Spanned { span, value })
    }
}
impl<I: Clone + std::hash::Hash, O, T> SimpleParser<I, O> for T where
    T: Parser<I, O, Error = Diagnostic<I>> + Clone
{
}

#[derive(PartialEq, Eq, Hash, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "λ")]
    Lambda,
    #[display(fmt = ".")]
    Dot,
    #[display(fmt = "=>")]
    Arrow,
    #[display(fmt = ":=")]
    Define,
    #[display(fmt = "=")]
    Equal,
    #[display(fmt = ";")]
    Semicolon,
    #[display(fmt = "newline")]
    Newline,

    /// `a`, `b`, `x1`: one lower-case letter and an optional numeric suffix.
    #[display(fmt = "{_0}")]
    Var(Identifier),
    /// `K`, `KI`, `NOT`
    #[display(fmt = "{_0}")]
    Name(Identifier),
}

pub fn lexer() -> impl SimpleParser<char, Vec<Spanned<Token>>> {
    let symbols = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('λ').or(just('\\')).to(Token::Lambda),
        just('.').to(Token::Dot),
        just("=>").to(Token::Arrow),
        just(":=").to(Token::Define),
        just('=').to(Token::Equal),
        just(';').to(Token::Semicolon),
        just('\n').to(Token::Newline),
    ));
    let var = filter(|c: &char| c.is_ascii_lowercase())
        .then(filter(|c: &char| c.is_ascii_digit()).repeated())
        .map(|(head, tail)| {
            let mut name = String::from(head);
            name.extend(tail);
            Token::Var(Identifier::new(name))
        });
    let name = filter(|c: &char| c.is_ascii_uppercase())
        .then(
            filter(|c: &char| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
                .repeated(),
        )
        .map(|(head, tail)| {
            let mut name = String::from(head);
            name.extend(tail);
            Token::Name(Identifier::new(name))
        });
    let token = choice((symbols, var, name));

    let comment = just("#")
        .or(just("//"))
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();
    let blank = filter(|c: &char| c.is_whitespace() && *c != '\n').ignored();
    let skipped = blank.or(comment).repeated();

    skipped
        .clone()
        .ignore_then(token.spanned().then_ignore(skipped).repeated())
        .then_ignore(end())
}

fn term_parser() -> impl SimpleParser<Token, Term> {
    recursive(|term: Recursive<_, Term, _>| {
        let var = select! { Token::Var(ident) => ident }.labelled("variable");
        let name = select! { Token::Name(ident) => ident }.labelled("combinator");

        let atom = choice((
            var.clone().map(Term::Var),
            name.map(Term::Var),
            term.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        ))
        .labelled("atom");

        // λab.t
        let lambda = just(Token::Lambda)
            .ignore_then(var.clone().repeated().at_least(1))
            .then_ignore(just(Token::Dot))
            .then(term.clone())
            .map(|(params, body)| {
                params
                    .into_iter()
                    .rev()
                    .fold(body, |body, param| Term::Abs(param, body.into()))
            })
            .labelled("abstraction");

        // a => t
        let arrow = var
            .then_ignore(just(Token::Arrow))
            .then(term)
            .map(|(param, body)| Term::Abs(param, body.into()))
            .labelled("arrow abstraction");

        // f a b λx.t, where a trailing abstraction takes the rest of the input
        let apply = atom
            .clone()
            .then(atom.repeated())
            .foldl(|lhs, rhs| Term::Apply(lhs.into(), rhs.into()))
            .then(lambda.clone().or_not())
            .map(|(lhs, tail)| match tail {
                Some(rhs) => Term::Apply(lhs.into(), rhs.into()),
                None => lhs,
            })
            .labelled("application");

        choice((lambda, arrow, apply))
    })
    .labelled("term")
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    /// `NAME := term` or `NAME = term`
    Define(Spanned<Identifier>, Spanned<Term>),
    Term(Spanned<Term>),
}

impl Command {
    pub fn span(&self) -> Span {
        match self {
            Command::Define(name, term) => merge_span(&name.span(), &term.span()),
            Command::Term(term) => term.span(),
        }
    }
}

fn command_parser() -> impl SimpleParser<Token, Command> {
    let name = select! { Token::Name(ident) => ident }.spanned();
    let define = name
        .then_ignore(just(Token::Define).or(just(Token::Equal)))
        .then(term_parser().spanned())
        .map(|(name, term)| Command::Define(name, term))
        .labelled("definition");
    choice((define, term_parser().spanned().map(Command::Term)))
}

fn commands_parser() -> impl SimpleParser<Token, Vec<Command>> {
    let separator = just(Token::Newline)
        .or(just(Token::Semicolon))
        .repeated()
        .at_least(1);
    separator
        .clone()
        .or_not()
        .ignore_then(command_parser().separated_by(separator).allow_trailing())
}

fn parse_full<T>(s: &str, parser: impl SimpleParser<Token, T>) -> Result<T, Vec<Diagnostic>> {
    let len = s.chars().count();
    let eoi = Span {
        start: len,
        end: len + 1,
    };
    let tokens = tokenize(s)?;
    let value = parser
        .then_ignore(end())
        .parse(chumsky::Stream::from_iter(
            eoi,
            tokens
                .into_iter()
                .map(|Spanned { span, value }| (value, span)),
        ))
        .map_err(|es| {
            es.into_iter()
                .map(|e| e.map(|e| e.to_string()))
                .collect::<Vec<_>>()
        })?;
    Ok(value)
}

pub fn tokenize(s: &str) -> Result<Vec<Spanned<Token>>, Vec<Diagnostic>> {
    lexer().parse(s).map_err(|es| {
        es.into_iter()
            .map(|e| e.map(|e| e.to_string()))
            .collect::<Vec<_>>()
    })
}

pub fn parse_term(s: &str) -> Result<Term, Vec<Diagnostic>> {
    parse_full(s, term_parser())
}

pub fn parse_commands(s: &str) -> Result<Vec<Command>, Vec<Diagnostic>> {
    parse_full(s, commands_parser())
}
