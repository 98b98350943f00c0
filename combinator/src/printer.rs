//! Renders terms in the shortened lambda notation: `λab.a` for `λa.λb.a`, `fba` for `((f b) a)`.

use crate::term::Term;

pub fn print(term: &Term) -> String {
    let mut out = String::new();
    write_term(term, true, &mut out);
    out
}

// `tail` is true when nothing follows the term in its enclosing context, which lets an
// abstraction body run to the end without parentheses.
fn write_term(term: &Term, tail: bool, out: &mut String) {
    match term {
        Term::Var(name) => out.push_str(name),
        Term::Abs(_, _) if tail => write_abs(term, out),
        Term::Abs(_, _) => {
            out.push('(');
            write_abs(term, out);
            out.push(')');
        }
        Term::Apply(lhs, rhs) => {
            write_term(lhs, false, out);
            let mut arg = String::new();
            if let Term::Apply(_, _) = rhs.as_ref() {
                arg.push('(');
                write_term(rhs, true, &mut arg);
                arg.push(')');
            } else {
                write_term(rhs, tail, &mut arg);
            }
            juxtapose(out, &arg);
        }
    }
}

fn write_abs(term: &Term, out: &mut String) {
    out.push('λ');
    let mut body = term;
    while let Term::Abs(param, inner) = body {
        juxtapose(out, param);
        body = inner.as_ref();
    }
    out.push('.');
    write_term(body, true, out);
}

fn juxtapose(out: &mut String, next: &str) {
    if needs_space(out.chars().last(), next.chars().next()) {
        out.push(' ');
    }
    out.push_str(next);
}

// Lower-case variables are a single letter, so `fba` reads back as `f b a`. Only a combinator
// name followed by another one (`K I`) would run together.
fn needs_space(prev: Option<char>, next: Option<char>) -> bool {
    match (prev, next) {
        (Some(prev), Some(next)) => {
            next.is_ascii_uppercase()
                && (prev.is_ascii_uppercase() || prev.is_ascii_digit() || prev == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn v(name: &str) -> Term {
        Term::var(name)
    }

    #[test]
    fn test_collapses_abstractions() {
        assert_eq!(print(&Term::lambda(["a", "b"], v("a"))), "λab.a");
        assert_eq!(print(&Term::lambda(["a", "b", "c"], v("b"))), "λabc.b");
        assert_eq!(
            print(&Term::lambda(
                ["f", "a", "b"],
                Term::apply_all(v("f"), [v("b"), v("a")])
            )),
            "λfab.fba"
        );
        assert_eq!(print(&Term::abs("f", Term::apply(v("f"), v("f")))), "λf.ff");
    }

    #[test]
    fn test_application_parentheses() {
        // f a b
        assert_eq!(print(&Term::apply_all(v("f"), [v("a"), v("b")])), "fab");
        // f (a b)
        assert_eq!(
            print(&Term::apply(v("f"), Term::apply(v("a"), v("b")))),
            "f(ab)"
        );
        // (λa.b) x
        assert_eq!(print(&Term::apply(Term::abs("a", v("b")), v("x"))), "(λa.b)x");
        // λa.(b x)
        assert_eq!(print(&Term::abs("a", Term::apply(v("b"), v("x")))), "λa.bx");
    }

    #[test]
    fn test_abstraction_extends_right() {
        // ((λa.a) (λb.λc.b)) x (λe.f)
        let term = Term::apply_all(
            Term::abs("a", v("a")),
            [Term::lambda(["b", "c"], v("b")), v("x"), Term::abs("e", v("f"))],
        );
        assert_eq!(print(&term), "(λa.a)(λbc.b)xλe.f");
        // λa.x (λb.a)
        assert_eq!(
            print(&Term::abs("a", Term::apply(v("x"), Term::abs("b", v("a"))))),
            "λa.xλb.a"
        );
        // f (g (λx.x)) y
        let term = Term::apply_all(
            v("f"),
            [Term::apply(v("g"), Term::abs("x", v("x"))), v("y")],
        );
        assert_eq!(print(&term), "f(gλx.x)y");
    }

    #[test]
    fn test_combinator_names() {
        assert_eq!(print(&Term::apply(v("K"), v("I"))), "K I");
        assert_eq!(print(&v("KI")), "KI");
        assert_eq!(print(&Term::apply_all(v("K"), [v("a"), v("b")])), "Kab");
        assert_eq!(print(&Term::apply(v("a"), v("K"))), "aK");
        assert_eq!(print(&Term::abs("x1", v("x1"))), "λx1.x1");
    }
}
