use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, PREC_ADDITIVE, PREC_POSTFIX, PREC_UNARY,
          Precedence, UnaryOperator},
    util::{
        num::{format_complex, format_real},
        stack::ensure_sufficient_stack,
    },
};

/// Renders an expression in canonical notation.
///
/// The output spaces every binary operator, spells implicit multiplication
/// as `*`, writes keywords in upper case and only keeps the parentheses that
/// precedence and associativity require. Parsing the output again yields the
/// same canonical text.
///
/// # Example
/// ```
/// use mathly::interpreter::{beautifier::beautify, lexer::tokenize, parser::core::parse};
///
/// let expr = parse(&tokenize("exp(-((x-m)^2)/(2*d^2))").unwrap()).unwrap();
/// assert_eq!(beautify(&expr), "exp(-((x - m) ^ 2) / (2 * d ^ 2))");
///
/// let expr = parse(&tokenize("vrai xor true").unwrap()).unwrap();
/// assert_eq!(beautify(&expr), "TRUE XOR TRUE");
/// ```
#[must_use]
pub fn beautify(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

/// Renders a lambda from its parts, as `{x, y}(body)`.
///
/// Closures print through this, since they keep their parameters and body
/// but not the node they were created from.
#[must_use]
pub fn beautify_lambda(params: &[String], body: &Expr) -> String {
    let mut out = String::new();
    write_lambda(&mut out, params, body);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    ensure_sufficient_stack(|| write_node(out, expr));
}

fn write_node(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal { value, .. } => write_literal(out, value),
        Expr::Identifier { name, .. } => out.push_str(name),
        Expr::UnaryOp { op, expr, .. } => {
            match op {
                UnaryOperator::Negate => out.push('-'),
                UnaryOperator::Not => out.push_str("NOT "),
            }
            write_operand(out, expr, unary_operand_needs_parens(expr));
        },
        Expr::BinaryOp { left, op, right, .. } => {
            write_operand(out, left, left_needs_parens(*op, left));
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(out, right, right_needs_parens(*op, right));
        },
        Expr::List { elements, .. } => {
            out.push('[');
            write_separated(out, elements);
            out.push(']');
        },
        Expr::Index { target, index, .. } => {
            write_operand(out, target, !takes_postfix(target));
            out.push('[');
            write_expr(out, index);
            out.push(']');
        },
        Expr::Call { callee, arguments, .. } => {
            write_operand(out, callee, !takes_postfix(callee));
            out.push('(');
            write_separated(out, arguments);
            out.push(')');
        },
        Expr::Lambda { params, body, .. } => write_lambda(out, params, body),
        Expr::Spread { expr, .. } => {
            out.push('*');
            write_expr(out, expr);
        },
    }
}

fn write_operand(out: &mut String, expr: &Expr, parenthesize: bool) {
    if parenthesize {
        out.push('(');
        write_expr(out, expr);
        out.push(')');
    } else {
        write_expr(out, expr);
    }
}

fn write_separated(out: &mut String, exprs: &[Expr]) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, expr);
    }
}

fn write_lambda(out: &mut String, params: &[String], body: &Expr) {
    out.push('{');
    out.push_str(&params.join(", "));
    out.push_str("}(");
    write_expr(out, body);
    out.push(')');
}

fn write_literal(out: &mut String, value: &LiteralValue) {
    match value {
        LiteralValue::Integer(n) => out.push_str(&n.to_string()),
        LiteralValue::Real(r) => out.push_str(&format_real(*r)),
        LiteralValue::Complex(c) => out.push_str(&format_complex(c.real, c.imaginary)),
        LiteralValue::Bool(true) => out.push_str("TRUE"),
        LiteralValue::Bool(false) => out.push_str("FALSE"),
        LiteralValue::Text(text) => {
            out.push('"');
            for c in text.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    c => out.push(c),
                }
            }
            out.push('"');
        },
    }
}

/// How tightly an expression holds together when printed bare.
const fn precedence(expr: &Expr) -> Precedence {
    match expr {
        Expr::BinaryOp { op, .. } => op.precedence(),
        Expr::UnaryOp { .. } => PREC_UNARY,
        _ => PREC_POSTFIX,
    }
}

/// A complex literal with both parts prints as a sum.
fn is_complex_pair(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal { value: LiteralValue::Complex(c), .. }
                   if c.real != 0.0 && c.imaginary != 0.0)
}

/// A literal that starts with a minus sign.
fn is_negative_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal { value: LiteralValue::Integer(n),
                        .. } => n.sign() == num_bigint::Sign::Minus,
        Expr::Literal { value: LiteralValue::Real(r),
                        .. } => *r < 0.0,
        Expr::Literal { value: LiteralValue::Complex(c),
                        .. } => c.real < 0.0 || (c.real == 0.0 && c.imaginary < 0.0),
        _ => false,
    }
}

/// Whether `expr` can be followed by `(...)` or `[...]` without changing its
/// meaning. Number literals never take postfixes.
const fn takes_postfix(expr: &Expr) -> bool {
    match expr {
        Expr::Literal { value, .. } => matches!(value, LiteralValue::Text(_) | LiteralValue::Bool(_)),
        Expr::Identifier { .. }
        | Expr::List { .. }
        | Expr::Index { .. }
        | Expr::Call { .. }
        | Expr::Lambda { .. } => true,
        Expr::UnaryOp { .. } | Expr::BinaryOp { .. } | Expr::Spread { .. } => false,
    }
}

fn unary_operand_needs_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::BinaryOp { .. }) || is_complex_pair(expr)
}

fn left_needs_parens(op: BinaryOperator, left: &Expr) -> bool {
    if op == BinaryOperator::Pow {
        return !takes_postfix(left) && !is_plain_number(left);
    }
    if is_complex_pair(left) {
        return op.precedence() >= PREC_ADDITIVE;
    }
    precedence(left) < op.precedence()
}

fn right_needs_parens(op: BinaryOperator, right: &Expr) -> bool {
    if is_complex_pair(right) {
        return op.precedence() >= PREC_ADDITIVE;
    }
    if op.is_right_associative() {
        return precedence(right) < PREC_UNARY;
    }
    precedence(right) <= op.precedence()
}

/// A number literal that prints as a single unsigned token, which can stand
/// as the base of `^`.
fn is_plain_number(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal { .. }) && !is_negative_literal(expr) && !is_complex_pair(expr)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn canonical(source: &str) -> String {
        beautify(&parse(&tokenize(source).unwrap()).unwrap())
    }

    #[test]
    fn operators_are_spaced() {
        assert_eq!(canonical("142        -9   "), "142 - 9");
        assert_eq!(canonical("4*2.5 + 8.5+1.5 / 3.0"), "4 * 2.5 + 8.5 + 1.5 / 3");
        assert_eq!(canonical("2+2>=1+1"), "2 + 2 >= 1 + 1");
    }

    #[test]
    fn unary_minus_edge_cases() {
        assert_eq!(canonical("-42"), "-42");
        assert_eq!(canonical("--5"), "--5");
        assert_eq!(canonical("0--5"), "0 - -5");
        assert_eq!(canonical("-[1,2,3]"), "-[1, 2, 3]");
        assert_eq!(canonical("-(1+2)"), "-(1 + 2)");
    }

    #[test]
    fn redundant_parentheses_are_dropped() {
        assert_eq!(canonical("(2+2)==4"), "2 + 2 == 4");
        assert_eq!(canonical("((a))*(b)"), "a * b");
        assert_eq!(canonical("(a*b)*c"), "a * b * c");
    }

    #[test]
    fn required_parentheses_are_kept() {
        assert_eq!(canonical("a-(b-c)"), "a - (b - c)");
        assert_eq!(canonical("a/(b*c)"), "a / (b * c)");
        assert_eq!(canonical("(a+b)*c"), "(a + b) * c");
        assert_eq!(canonical("2^3^4"), "2 ^ (3 ^ 4)");
        assert_eq!(canonical("(2^3)^4"), "(2 ^ 3) ^ 4");
        assert_eq!(canonical("2^-x"), "2 ^ -x");
        assert_eq!(canonical("-x^2"), "(-x) ^ 2");
        assert_eq!(canonical("(1+2)(3)"), "(1 + 2)(3)");
    }

    #[test]
    fn complex_literals_are_grouped() {
        assert_eq!(canonical("(2+3i)+(4+5i)"), "(2 + 3i) + (4 + 5i)");
        assert_eq!(canonical("(2+3i)^2"), "(2 + 3i) ^ 2");
        assert_eq!(canonical("im(8-9i)"), "im(8 - 9i)");
        assert_eq!(canonical("3i*2"), "3i * 2");
        assert_eq!(canonical("3i^2"), "3i ^ 2");
        assert_eq!(canonical("2^(2+3i)"), "2 ^ (2 + 3i)");
        assert_eq!(canonical("(2+3i)^(2-3i)"), "(2 + 3i) ^ (2 - 3i)");
        assert_eq!(canonical("2^3i"), "2 ^ 3i");
    }

    #[test]
    fn implicit_multiplication_is_spelled_out() {
        assert_eq!(canonical("deg(2pi)"), "deg(2 * pi)");
        assert_eq!(canonical("3sqrt(-4)"), "3 * sqrt(-4)");
        assert_eq!(canonical("{x}(2x^2+3x+4)(8+1e-5)"),
                   "{x}(2 * x ^ 2 + 3 * x + 4)(8 + 1e-5)");
    }

    #[test]
    fn keywords_and_literals() {
        assert_eq!(canonical("vrai xor true"), "TRUE XOR TRUE");
        assert_eq!(canonical("[1,2,3]&[2,3,4]"), "[1, 2, 3] AND [2, 3, 4]");
        assert_eq!(canonical("not faux"), "NOT FALSE");
        assert_eq!(canonical(r#""a\"b"+"c""#), r#""a\"b" + "c""#);
        assert_eq!(canonical("5e+99/2e45"), "5e99 / 2e45");
    }

    #[test]
    fn postfixes_and_spreads() {
        assert_eq!(canonical("gcd(*-[4584, 248])"), "gcd(*-[4584, 248])");
        assert_eq!(canonical("[8,5,42,96,31,84,35] [-4]"), "[8, 5, 42, 96, 31, 84, 35][-4]");
        assert_eq!(canonical("{n}({m}({n}(m*n))(n))(3)(4)"), "{n}({m}({n}(m * n))(n))(3)(4)");
        assert_eq!(canonical("{}(1)()"), "{}(1)()");
    }

    #[test]
    fn long_chains_print_without_overflow() {
        let source = format!("1{}", "+1".repeat(2_000));
        assert_eq!(canonical(&source), format!("1{}", " + 1".repeat(2_000)));
    }

    #[test]
    fn output_is_a_fixed_point() {
        let sources = ["exp(-((x-m)^2)/(2*d^2))",
                       "-x^2+-(2+3i)*NOT a",
                       "1/(d*sqrt(2pi))*exp(-((x-m)^2)/(2*d^2))",
                       "(-2)^2 - 2^-1^2",
                       "[42,{x,y,z}(x*abs({x, y}(x - y)(y, z))),38][1](4,3,5)",
                       "a == b == (c AND d) OR e",
                       "\"tab\\there\"[0]",
                       "2^(2+3i)*x"];
        for source in sources {
            let once = canonical(source);
            assert_eq!(canonical(&once), once, "{source}");
        }
    }
}
