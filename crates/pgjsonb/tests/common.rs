#![allow(dead_code)]

/// Asserts `a` and `b` agree within the ≤1e-12 relative tolerance the
/// numeric-approximation property requires.
pub fn assert_approx_eq(a: f64, b: f64) {
    let tolerance = 1e-12 * a.abs().max(b.abs()).max(1.0);
    assert!(
        (a - b).abs() <= tolerance,
        "expected {a} and {b} to agree within relative tolerance 1e-12"
    );
}
