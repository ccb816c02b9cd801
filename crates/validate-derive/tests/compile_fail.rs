//! Misdeclared constraints are rejected at compile time.

#[test]
fn misdeclared_constraints_fail_to_compile() {
    let cases = trybuild::TestCases::new();
    cases.compile_fail("tests/ui/*.rs");
}
