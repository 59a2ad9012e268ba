use std::fs::{self};

use mathly::{
    EvalConfig, Evaluator, Value, beautify_source,
    error::{Error, EvalErrorKind, LexError, ParseError},
    evaluate,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for code in extract_mathly_blocks(&content) {
            for line in code.lines().filter(|line| !line.trim().is_empty()) {
                count += 1;
                match evaluate(line) {
                    Ok(result) if result.value == Value::Bool(true) => {},
                    Ok(result) => panic!("Example in {path:?} is not TRUE:\n{line}\nValue: {}",
                                         result.value),
                    Err(e) => panic!("Example in {path:?} failed:\n{line}\nError: {e}"),
                }
            }
        }
    }

    assert!(count > 0, "No mathly examples found in book/src");
}

fn extract_mathly_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```mathly") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

/// Evaluates `source` and checks both the value's display and the canonical
/// text.
fn assert_evaluates(source: &str, value: &str, canonical: &str) {
    let result = evaluate(source).unwrap_or_else(|e| panic!("{source:?} failed: {e}"));
    assert_eq!(result.value.to_string(), value, "value of {source:?}");
    assert_eq!(result.beautified, canonical, "canonical text of {source:?}");
}

fn assert_true(source: &str) {
    match evaluate(source) {
        Ok(result) => assert_eq!(result.value, Value::Bool(true), "{source}"),
        Err(e) => panic!("{source:?} failed: {e}"),
    }
}

fn eval_error(source: &str) -> EvalErrorKind {
    match evaluate(source) {
        Err(Error::Eval(e)) => e.kind,
        Err(e) => panic!("{source:?} failed before evaluation: {e}"),
        Ok(result) => panic!("{source:?} succeeded with {}", result.value),
    }
}

#[test]
fn basic_parsing_and_operators() {
    assert_evaluates("42", "42", "42");
    assert_evaluates("-42", "-42", "-42");
    assert_evaluates("2+2", "4", "2 + 2");
    assert_evaluates("3*3", "9", "3 * 3");
    assert_evaluates("142        -9   ", "133", "142 - 9");
    assert_evaluates(" 50/10", "5", "50 / 10");
    assert_evaluates("72+  15", "87", "72 + 15");
    assert_evaluates(" 12*  4", "48", "12 * 4");
    assert_evaluates("4*2.5 + 8.5+1.5 / 3.0", "19", "4 * 2.5 + 8.5 + 1.5 / 3");
    assert_evaluates(" 2-7", "-5", "2 - 7");
    assert_evaluates("2 -4 +6 -1 -1- 0 +8", "10", "2 - 4 + 6 - 1 - 1 - 0 + 8");
    assert_evaluates(" 2*3 - 4*5 + 6/3 ", "-12", "2 * 3 - 4 * 5 + 6 / 3");
    assert_evaluates("10/4", "2.5", "10 / 4");
}

#[test]
fn unary_edge_cases() {
    assert_evaluates("--5", "5", "--5");
    assert_evaluates("0--5", "5", "0 - -5");
    assert_evaluates("2^-1", "0.5", "2 ^ -1");
}

#[test]
fn basic_functions() {
    assert_evaluates("ceil(pi)", "4", "ceil(pi)");
    assert_evaluates("floor(e)", "2", "floor(e)");
    assert_evaluates("sqrt(49)", "7", "sqrt(49)");
    assert_evaluates("sign(-5)", "-1", "sign(-5)");
    assert_evaluates("binomial(3,2)", "3", "binomial(3, 2)");
    assert_evaluates("binomial(3 , 0)", "1", "binomial(3, 0)");
    assert_evaluates("average([12,82,74,36,14,94])", "52", "average([12, 82, 74, 36, 14, 94])");
    assert_evaluates("sum([1,8,9,6,24,54,354])", "456", "sum([1, 8, 9, 6, 24, 54, 354])");
    assert_evaluates("gcd(248,4584)", "8", "gcd(248, 4584)");
    assert_evaluates("lcm(904,1356)", "2712", "lcm(904, 1356)");
    assert_evaluates("round(asin(acos(atan(tan(cos(sin(0.5)))))),5)",
                     "0.5",
                     "round(asin(acos(atan(tan(cos(sin(0.5)))))), 5)");

    assert_true("sqrt(2)^2 == 2");
    assert_true("cos(0) == 1");
    assert_true("sin(pi) == 0");
    assert_true("deg(2pi) == 360");
    assert_true("harmonic_mean([2.5,3,10]) == 3.6");
    assert_true("5e+99/2e45 == 2.5e54");
}

#[test]
fn indexing_and_lambdas() {
    assert_evaluates("[8,5,42,96,31,84,35] [-4]", "96", "[8, 5, 42, 96, 31, 84, 35][-4]");
    assert_evaluates("[1,2,3,4][2]", "3", "[1, 2, 3, 4][2]");
    assert_evaluates("[42,{x,y,z}(x*abs({x, y}(x - y)(y, z))),38][1](4,3,5)",
                     "8",
                     "[42, {x, y, z}(x * abs({x, y}(x - y)(y, z))), 38][1](4, 3, 5)");
    assert_evaluates("{n}({m}({n}(m*n))(n))(3)(4)", "12", "{n}({m}({n}(m * n))(n))(3)(4)");
    assert_evaluates("{x}(2x^2+3x+4)(8)", "156", "{x}(2 * x ^ 2 + 3 * x + 4)(8)");
    assert_evaluates("{x}(x)", "{x}(x)", "{x}(x)");
}

#[test]
fn booleans_and_text() {
    assert_evaluates("(2+2)==4", "TRUE", "2 + 2 == 4");
    assert_evaluates("vrai xor true", "FALSE", "TRUE XOR TRUE");
    assert_evaluates("\"abc\"+\"def\"", "\"abcdef\"", "\"abc\" + \"def\"");
    assert_evaluates("2+2==4 and 3+3==6", "TRUE", "2 + 2 == 4 AND 3 + 3 == 6");
    assert_evaluates("2+2>=1+1", "TRUE", "2 + 2 >= 1 + 1");
    assert_evaluates("3+3<=12/2", "TRUE", "3 + 3 <= 12 / 2");
    assert_evaluates("non faux ou falso", "TRUE", "NOT FALSE OR FALSE");
}

#[test]
fn list_operators() {
    assert_evaluates("[1,2,3]+[3,4,5]", "[1, 2, 3, 3, 4, 5]", "[1, 2, 3] + [3, 4, 5]");
    assert_evaluates("[1,2,3]-[3,4,5]", "[1, 2]", "[1, 2, 3] - [3, 4, 5]");
    assert_evaluates("-[1,2,3]", "[3, 2, 1]", "-[1, 2, 3]");
    assert_evaluates("3*[1,2,3]", "[1, 2, 3, 1, 2, 3, 1, 2, 3]", "3 * [1, 2, 3]");
    assert_evaluates("[1,2,3]&[2,3,4]", "[2, 3]", "[1, 2, 3] AND [2, 3, 4]");
    assert_evaluates("[1,2,3]|[2,3,4]", "[1, 2, 3, 4]", "[1, 2, 3] OR [2, 3, 4]");
    assert_evaluates("[1,2,3]xor[3,4,5]", "[1, 2, 4, 5]", "[1, 2, 3] XOR [3, 4, 5]");
    assert_evaluates("slice([1,2,3,4,5,6,7,8],2,6)",
                     "[3, 4, 5, 6]",
                     "slice([1, 2, 3, 4, 5, 6, 7, 8], 2, 6)");
}

#[test]
fn higher_order_functions() {
    assert_evaluates("map({a}({a,b}(b*a)(2,a)),[1,2,3,4,5,6])",
                     "[2, 4, 6, 8, 10, 12]",
                     "map({a}({a, b}(b * a)(2, a)), [1, 2, 3, 4, 5, 6])");
    assert_evaluates("-filter({a}(a<0),[-2,-1,0,1,2])",
                     "[-1, -2]",
                     "-filter({a}(a < 0), [-2, -1, 0, 1, 2])");
    assert_evaluates("gcd(*-[4584, 248])", "8", "gcd(*-[4584, 248])");
}

#[test]
fn statistics() {
    assert_evaluates("round(variance([2.75,1.75,1.25,0.25,0.5,1.25,3.5]),2)",
                     "1.18",
                     "round(variance([2.75, 1.75, 1.25, 0.25, 0.5, 1.25, 3.5]), 2)");
    assert_evaluates("round(variance_sample([2.75,1.75,1.25,0.25,0.5,1.25,3.5]),2)",
                     "1.37",
                     "round(variance_sample([2.75, 1.75, 1.25, 0.25, 0.5, 1.25, 3.5]), 2)");
    assert_evaluates("median([7,1,4])", "4", "median([7, 1, 4])");
    assert_evaluates("mode([1,2,2,3,3])", "2", "mode([1, 2, 2, 3, 3])");
    assert_evaluates("max(3, 9, -1)", "9", "max(3, 9, -1)");
}

#[test]
fn complex_numbers() {
    assert_evaluates("3sqrt(-4)", "6i", "3 * sqrt(-4)");
    assert_evaluates("(2+3i)+(4+5i)", "6 + 8i", "(2 + 3i) + (4 + 5i)");
    assert_evaluates("(2+3i)*(4+5i)", "-7 + 22i", "(2 + 3i) * (4 + 5i)");
    assert_evaluates("(2+3i)^2", "-5 + 12i", "(2 + 3i) ^ 2");
    assert_evaluates("re(5+4i)", "5", "re(5 + 4i)");
    assert_evaluates("im(8-9i)", "-9", "im(8 - 9i)");
    assert_evaluates("conj(5+4i)", "5 - 4i", "conj(5 + 4i)");

    assert_true("arg(2+3i) == atan(3/2)");
    assert_true("asin(2) == pi/2 + i*ln(2+sqrt(3))");
    assert_true("rect(sqrt(2),rad(45)) == 1+i");
    assert_true("polar(1+i) == [sqrt(2), pi/4]");

    assert_evaluates("2^(2+3i)", "-1.947977671863125 + 3.493620327099486i", "2 ^ (2 + 3i)");
    for source in ["2^(2+3i)", "(2+3i)^(2-3i)", "(1-i)^(1+i)*2"] {
        let result = evaluate(source).unwrap();
        let again = evaluate(&result.beautified).unwrap();
        assert_eq!(again.value, result.value, "{source}");
    }
}

#[test]
fn combinatorics() {
    assert_evaluates("euler(10)", "50521", "euler(10)");
    assert_evaluates("fact(5)", "120", "fact(5)");
    assert_evaluates("gamma(6)", "120", "gamma(6)");
    assert_evaluates("fib(400)",
                     "176023680645013966468226945392411250770384383304492191886725992896575345044216019675",
                     "fib(400)");
    assert_true("beta(18,2)==1/342");
}

#[test]
fn calculus() {
    assert_true("gradient({x}(2x^2+3x+4),8) == 35");
    assert_true("{x}(2x^2+3x+4)(8+1e-5) == 156.0003500002");
    assert_evaluates("round(deriv(gamma)(5),4)", "36.1468", "round(deriv(gamma)(5), 4)");
    assert_true("integ({x}(4x^3-2x^2+3x-4),-7,4) == -2509.8 - 1/30");
    assert_true("integ(sin,0,pi) == 2");
    assert_evaluates("round(integ({x}(root(x,3)),-19,71),1)",
                     "239.5 + 32.9i",
                     "round(integ({x}(root(x, 3)), -19, 71), 1)");
    assert_true("map(derivative(ln),[1,2,4,8])==map({x}(1/x),[1,2,4,8])");
    assert_true("map(derivative(sin),[0,pi/2,pi])==map(cos,[0,pi/2,pi])");
}

#[test]
fn gaussian_density() {
    assert_evaluates("round({m,d,x}(1/(d*sqrt(2pi))*exp(-((x-m)^2)/(2*d^2)))(100,5.7,110),3)",
                     "0.015",
                     "round({m, d, x}(1 / (d * sqrt(2 * pi)) * exp(-((x - m) ^ 2) / (2 * d ^ \
                      2)))(100, 5.7, 110), 3)");
}

#[test]
fn canonical_text_is_a_fixed_point() {
    let sources = ["142        -9   ",
                   "deg(2pi)",
                   "5e+99/2e45",
                   "5e-99/2e-45",
                   "{x}(2x^2+3x+4)(8+1e-5)",
                   "exp(-((x-m)^2)/(2*d^2))",
                   "-x^2 + 2^3^4 - (a - b) - -(c + d)",
                   "NOT (a OR b) AND c == (d < e)",
                   "[*a, *[1, 2]][0]"];
    for source in sources {
        let once = beautify_source(source).unwrap();
        assert_eq!(beautify_source(&once).unwrap(), once, "{source}");
    }
    assert_eq!(beautify_source("5e-99/2e-45").unwrap(), "5e-99 / 2e-45");
}

#[test]
fn lexing_and_parsing_errors() {
    assert!(matches!(evaluate("1.2.3"), Err(Error::Lex(_))));
    assert!(matches!(evaluate("2 $ 3"), Err(Error::Lex(_))));
    assert!(matches!(evaluate("\"open"), Err(Error::Lex(_))));
    assert!(matches!(evaluate("(2 + 3"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("[1, 2"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("2 +"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("2 3)"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("{x, x}(x)"), Err(Error::Parse(_))));
    assert!(matches!(evaluate("1e400"), Err(Error::Lex(LexError::MalformedNumber { .. }))));
    assert!(matches!(evaluate("1e400 - 1e400"), Err(Error::Lex(_))));
}

#[test]
fn long_expressions_fail_without_crashing() {
    let sum = format!("1{}", "+1".repeat(100_000));
    assert!(matches!(evaluate(&sum), Err(Error::Parse(ParseError::NestingTooDeep { .. }))));
    assert!(matches!(beautify_source(&sum), Err(Error::Parse(_))));

    let negations = format!("{}1", "-".repeat(300_000));
    assert!(matches!(evaluate(&negations),
                     Err(Error::Parse(ParseError::NestingTooDeep { .. }))));

    let sum = format!("1{}", "+1".repeat(900));
    assert_eq!(evaluate(&sum).unwrap().value, Value::from(901));

    let sum = format!("1{}", "+1".repeat(1_500));
    let err = evaluate(&sum).unwrap_err();
    assert!(matches!(err, Error::Eval(ref e) if e.kind == EvalErrorKind::RecursionLimitExceeded));
}

#[test]
fn text_escapes() {
    assert_true(r#"len("a\tb") == 3"#);
    assert_true(r#"len("a\rb") == 4"#);
    assert_evaluates(r#""a\rb""#, r#""a\\rb""#, r#""a\\rb""#);
}

#[test]
fn huge_integer_quotients() {
    assert_true("(10^400 + 1) / 10^399 == 10");
    assert_eq!(eval_error("10^400 / 3"), EvalErrorKind::DomainError);
}

#[test]
fn error_offsets_point_into_the_source() {
    let err = evaluate("1 + foo").unwrap_err();
    assert_eq!(err.offset(), 4);
    assert!(matches!(err, Error::Eval(ref e) if e.kind == EvalErrorKind::UndefinedName));

    let err = evaluate("2 $ 3").unwrap_err();
    assert_eq!(err.offset(), 2);
}

#[test]
fn evaluation_errors() {
    assert_eq!(eval_error("x + 1"), EvalErrorKind::UndefinedName);
    assert_eq!(eval_error("{x}(x)(1, 2)"), EvalErrorKind::WrongArity);
    assert_eq!(eval_error("sin(1, 2)"), EvalErrorKind::WrongArity);
    assert_eq!(eval_error("sin(\"a\")"), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_error("[1, 2] * 0.5"), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_error("1 < 2i"), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_error("TRUE + 1"), EvalErrorKind::TypeMismatch);
    assert_eq!(eval_error("1 / 0"), EvalErrorKind::DomainError);
    assert_eq!(eval_error("ln(0)"), EvalErrorKind::DomainError);
    assert_eq!(eval_error("[1, 2][5]"), EvalErrorKind::DomainError);
    assert_eq!(eval_error("(1+2)(3)"), EvalErrorKind::NotCallable);
    assert_eq!(eval_error("[1, 2](0)"), EvalErrorKind::NotCallable);
}

#[test]
fn runaway_recursion_is_bounded() {
    let mut evaluator = Evaluator::with_config(EvalConfig { max_depth: 200,
                                                            ..EvalConfig::default() });
    let err = evaluator.evaluate("{f}(f(f))({f}(f(f)))").unwrap_err();
    assert!(matches!(err, Error::Eval(ref e) if e.kind == EvalErrorKind::RecursionLimitExceeded));
    assert_eq!(evaluator.beautified(), Some("{f}(f(f))({f}(f(f)))"));
}

#[test]
fn names_cannot_be_shadowed_outside_lambdas() {
    assert_true("{pi}(pi)(3) == 3");
    assert_true("{sin}(sin + 1)(1) == 2");
    assert_true("pi == 3.141592653589793");
}

#[test]
fn configured_tolerance_is_used() {
    let mut evaluator = Evaluator::new();
    assert_eq!(evaluator.evaluate("1 == 1.0000001").unwrap(), Value::Bool(false));

    let mut evaluator = Evaluator::with_config(EvalConfig { epsilon: 1e-3,
                                                            ..EvalConfig::default() });
    assert_eq!(evaluator.evaluate("1 == 1.0000001").unwrap(), Value::Bool(true));
    assert_eq!(evaluator.evaluate("[1, 2] == [1.0000001, 2]").unwrap(), Value::Bool(true));
}
