use phs_symbolic::{sympify, sympify_matrix, SymValue, SymbolicError};

fn canonical(text: &str) -> String {
    sympify(text).unwrap().to_string()
}

#[test]
fn automatic_simplification() {
    assert_eq!(canonical("x + x"), "2*x");
    assert_eq!(canonical("x*x"), "x**2");
    assert_eq!(canonical("2*(x + y)"), "2*x + 2*y");
    assert_eq!(canonical("x**1"), "x");
    assert_eq!(canonical("0*x"), "0");
    assert_eq!(canonical("(x**2)**3"), "x**6");
    assert_eq!(canonical("(2*x)**2"), "4*x**2");
    assert_eq!(canonical("x - x"), "0");
}

#[test]
fn products_of_sums_are_not_expanded() {
    assert_eq!(canonical("x*(x + y)"), "x*(x + y)");
    assert_eq!(canonical("(x + 1)**2"), "(x + 1)**2");
}

#[test]
fn exact_rationals() {
    assert_eq!(canonical("1/2"), "1/2");
    assert_eq!(canonical("x/2"), "x/2");
    assert_eq!(canonical("3*x/2"), "3*x/2");
    assert_eq!(canonical("2**(1/2)"), "sqrt(2)");
    assert_eq!(canonical("6/4"), "3/2");
    assert_eq!(canonical("sqrt(4)"), "2");
    assert_eq!(canonical("(9/4)**(1/2)"), "3/2");
}

#[test]
fn floats_contaminate() {
    assert_eq!(canonical("0.5*x*x"), "0.5*x**2");
    assert_eq!(canonical("1/2 + 0.5"), "1.0");
}

#[test]
fn printing_conventions() {
    assert_eq!(canonical("1/x"), "1/x");
    assert_eq!(canonical("y/x**2"), "y/x**2");
    assert_eq!(canonical("x**-2"), "x**(-2)");
    assert_eq!(canonical("sqrt(x)"), "sqrt(x)");
    assert_eq!(canonical("x - y"), "x - y");
    assert_eq!(canonical("-x"), "-x");
    assert_eq!(canonical("-x**2"), "-x**2");
    assert_eq!(canonical("sin(x) + 3"), "sin(x) + 3");
}

#[test]
fn terms_in_monomial_order() {
    assert_eq!(canonical("1 + x + x**2"), "x**2 + x + 1");
    assert_eq!(canonical("x2 + x1"), "x1 + x2");
    assert_eq!(canonical("y*x"), "x*y");
}

#[test]
fn flat_list_is_column_vector() {
    let m = sympify_matrix("[x1, x2]").unwrap();
    assert_eq!(m.shape(), (2, 1));
    assert_eq!(m.entry_strings(), vec!["x1", "x2"]);
}

#[test]
fn nested_list_is_row_major() {
    let m = sympify_matrix("[[1, 0], [0, 1]]").unwrap();
    assert_eq!(m.shape(), (2, 2));
    assert_eq!(m.entry_strings(), vec!["1", "0", "0", "1"]);

    let m = sympify_matrix("[[a, b, c], [d, e, f]]").unwrap();
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.get(1, 2).map(ToString::to_string).as_deref(), Some("f"));
}

#[test]
fn scalar_coerces_to_one_by_one() {
    let m = sympify_matrix("k*x").unwrap();
    assert_eq!(m.shape(), (1, 1));
    assert_eq!(m.entry_strings(), vec!["k*x"]);
}

#[test]
fn empty_matrices() {
    assert_eq!(sympify_matrix("[]").unwrap().shape(), (0, 0));
    assert_eq!(sympify_matrix("[[], []]").unwrap().shape(), (2, 0));
    assert_eq!(sympify_matrix("Matrix([])").unwrap().shape(), (0, 0));
}

#[test]
fn matrix_call_and_display() {
    let value = sympify("Matrix([[1, 0], [0, 1]])").unwrap();
    assert!(matches!(value, SymValue::Matrix(_)));
    assert_eq!(value.to_string(), "Matrix([[1, 0], [0, 1]])");

    assert_eq!(canonical("[x, y]"), "[x, y]");
    assert_eq!(canonical("Matrix([x, y])"), "Matrix([[x], [y]])");
}

#[test]
fn matrix_arithmetic() {
    assert_eq!(
        canonical("Matrix([[1, 2], [3, 4]]) * Matrix([x, y])"),
        "Matrix([[x + 2*y], [3*x + 4*y]])"
    );
    assert_eq!(
        canonical("Matrix([[1, 1], [0, 1]])**2"),
        "Matrix([[1, 2], [0, 1]])"
    );
    assert_eq!(canonical("Matrix([a, b]) / 2"), "Matrix([[a/2], [b/2]])");
    assert_eq!(
        canonical("Matrix([a, b]) - Matrix([a, c])"),
        "Matrix([[0], [b - c]])"
    );
}

#[test]
fn shape_mismatch_message() {
    let err = sympify("Matrix([[a, b]]) * Matrix([[1, 0, 0], [0, 1, 0], [0, 0, 1]])").unwrap_err();
    assert_eq!(err.to_string(), "Matrix size mismatch: (1, 2) * (3, 3).");
}

#[test]
fn ragged_rows_fail() {
    let err = sympify_matrix("[[1, 2], [3]]").unwrap_err();
    assert!(matches!(err, SymbolicError::RaggedMatrix { row: 1, .. }));
}

#[test]
fn deep_or_mixed_nesting_fails() {
    assert!(matches!(
        sympify_matrix("[[[1]]]"),
        Err(SymbolicError::InvalidMatrix(_))
    ));
    assert!(matches!(
        sympify_matrix("[1, [2]]"),
        Err(SymbolicError::InvalidMatrix(_))
    ));
}

#[test]
fn list_arithmetic_fails() {
    assert!(matches!(
        sympify("[1, 2] + [3, 4]"),
        Err(SymbolicError::InvalidOperation(_))
    ));
    assert!(sympify("2*[x]").is_err());
}

#[test]
fn division_by_zero() {
    assert_eq!(sympify("1/0").unwrap_err(), SymbolicError::DivisionByZero);
    assert_eq!(sympify("x/(1 - 1)").unwrap_err().to_string(), "division by zero");
}

#[test]
fn parse_errors_are_wrapped() {
    let err = sympify("[[1,0],[0,1]").unwrap_err();
    assert!(matches!(err, SymbolicError::Parse(_)));
    assert!(err.to_string().starts_with("Parse error at position"));

    assert!(sympify("x +").is_err());
    assert!(sympify("").is_err());
}
