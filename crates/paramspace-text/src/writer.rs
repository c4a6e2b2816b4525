//! Serializer for the parameter-text dialect.
//!
//! The output parses back ([`parse_str`](crate::parse_str)) into a tree
//! deep-equal to the input. Consumption state is not identity and is
//! not persisted: range cursors and distribution RNG states are
//! omitted, matching the equality contract of those types.

use std::fmt::Write;

use paramspace_core::{
    Distribution, Parameter, ParameterRange, ParameterTree, Reference, Value,
};

/// Render a tree as parameter text.
pub fn to_text(tree: &ParameterTree) -> String {
    let mut out = String::new();
    write_tree(&mut out, tree, 0);
    out.push('\n');
    out
}

fn write_tree(out: &mut String, tree: &ParameterTree, indent: usize) {
    if tree.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (key, value) in tree.iter() {
        push_indent(out, indent + 1);
        write_str(out, key);
        out.push_str(": ");
        write_value(out, value, indent + 1);
        out.push_str(",\n");
    }
    push_indent(out, indent);
    out.push('}');
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Real(r) => write_real(out, *r),
        Value::Text(s) => write_str(out, s),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, indent);
            }
            out.push(']');
        }
        Value::Tree(t) => write_tree(out, t, indent),
        Value::Range(r) => write_range(out, r, indent),
        Value::Dist(d) => write_dist(out, d),
        Value::Ref(r) => write_ref(out, r, indent),
        Value::Param(p) => write_param(out, p),
    }
}

/// Reals must re-lex as reals, so the fallback format always carries a
/// decimal point or exponent; the non-finite values use the named
/// constants.
fn write_real(out: &mut String, r: f64) {
    if r.is_nan() {
        out.push_str("nan");
    } else if r == f64::INFINITY {
        out.push_str("inf");
    } else if r == f64::NEG_INFINITY {
        out.push_str("-inf");
    } else {
        let _ = write!(out, "{r:?}");
    }
}

fn write_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}

/// The candidate order is already final (any shuffle happened at
/// construction), so the list is written as-is with no shuffle seed.
fn write_range(out: &mut String, range: &ParameterRange, indent: usize) {
    out.push_str("range(");
    write_value(out, &Value::List(range.values().to_vec()), indent);
    if !range.name.is_empty() {
        out.push_str(", name=");
        write_str(out, &range.name);
    }
    if let Some(units) = &range.units {
        out.push_str(", units=");
        write_str(out, units);
    }
    out.push(')');
}

fn write_dist(out: &mut String, dist: &Distribution) {
    match dist {
        Distribution::Normal(d) => {
            out.push_str("normal(mean=");
            write_real(out, d.mean);
            out.push_str(", std=");
            write_real(out, d.std);
        }
        Distribution::Uniform(d) => {
            out.push_str("uniform(min=");
            write_real(out, d.min);
            out.push_str(", max=");
            write_real(out, d.max);
        }
        Distribution::Gamma(d) => {
            out.push_str("gamma(shape=");
            write_real(out, d.shape);
            out.push_str(", scale=");
            write_real(out, d.scale);
        }
    }
    out.push(')');
}

fn write_param(out: &mut String, p: &Parameter) {
    out.push_str("param(");
    write_real(out, p.value);
    if !p.name.is_empty() {
        out.push_str(", name=");
        write_str(out, &p.name);
    }
    if let Some(units) = &p.units {
        out.push_str(", units=");
        write_str(out, units);
    }
    out.push(')');
}

/// A reference chain is written fully parenthesized, innermost
/// operation first, so parsing re-folds it into the same chain.
fn write_ref(out: &mut String, r: &Reference, indent: usize) {
    let mut acc = String::from("ref(");
    write_str(&mut acc, r.path());
    acc.push(')');
    for operation in r.operations() {
        let mut operand = String::new();
        write_value(&mut operand, &operation.operand, indent);
        let mut next = String::with_capacity(acc.len() + operand.len() + 8);
        next.push('(');
        if operation.reversed {
            next.push_str(&operand);
            let _ = write!(next, " {} ", operation.op.symbol());
            next.push_str(&acc);
        } else {
            next.push_str(&acc);
            let _ = write!(next, " {} ", operation.op.symbol());
            next.push_str(&operand);
        }
        next.push(')');
        acc = next;
    }
    out.push_str(&acc);
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use paramspace_core::{GammaDist, Op};

    #[test]
    fn renders_nested_trees_with_stable_layout() {
        let mut t = ParameterTree::new();
        t.add("a", Value::Int(1)).unwrap();
        t.add("sub.b", Value::Real(2.5)).unwrap();
        t.add("sub.c", Value::Text("hi".into())).unwrap();
        assert_eq!(
            to_text(&t),
            "{\n  \"a\": 1,\n  \"sub\": {\n    \"b\": 2.5,\n    \"c\": \"hi\",\n  },\n}\n"
        );
    }

    #[test]
    fn non_finite_reals_use_named_constants() {
        let mut t = ParameterTree::new();
        t.add("a", Value::Real(f64::INFINITY)).unwrap();
        t.add("b", Value::Real(f64::NEG_INFINITY)).unwrap();
        t.add("c", Value::Real(f64::NAN)).unwrap();
        let text = to_text(&t);
        assert!(text.contains("\"a\": inf"));
        assert!(text.contains("\"b\": -inf"));
        assert!(text.contains("\"c\": nan"));

        let back = parse_str(&text).unwrap();
        assert_eq!(back.get("a").unwrap(), &Value::Real(f64::INFINITY));
        assert!(matches!(back.get("c").unwrap(), Value::Real(r) if r.is_nan()));
    }

    #[test]
    fn reference_chains_parenthesize_in_application_order() {
        let r = Reference::to("p1")
            .add(Value::Int(1))
            .with_operation(Op::Div, true, Value::Int(10));
        let mut out = String::new();
        write_ref(&mut out, &r, 0);
        assert_eq!(out, r#"(10 / (ref("p1") + 1))"#);
    }

    #[test]
    fn range_and_dist_round_trip_through_text() {
        let mut t = ParameterTree::new();
        t.add(
            "r",
            Value::Range(
                ParameterRange::new(vec![Value::Int(1), Value::Int(2)])
                    .with_name("r")
                    .with_units("mV"),
            ),
        )
        .unwrap();
        t.add(
            "g",
            Value::Dist(Distribution::Gamma(GammaDist::with_seed(16.0, 0.125, 1))),
        )
        .unwrap();
        let back = parse_str(&to_text(&t)).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn string_escapes_survive() {
        let mut t = ParameterTree::new();
        t.add("s", Value::Text("line\nquote \"x\" slash \\".into()))
            .unwrap();
        let back = parse_str(&to_text(&t)).unwrap();
        assert_eq!(back, t);
    }
}
