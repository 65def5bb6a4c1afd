//! BigInt coercion: decimal strings with arbitrary precision, truncation
//! toward zero, numbers and booleans.

use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use rstest::rstest;
use typeval::{build, convert, Registry, Value};

fn bigint_of(text: &str) -> Value {
    Value::BigInt(text.parse::<BigInt>().unwrap())
}

#[rstest]
#[case::small("1", "1")]
#[case::fraction_truncates("3.14", "3")]
#[case::twenty_digits("12345678901234567890", "12345678901234567890")]
#[case::negative_twenty_digits("-12345678901234567890", "-12345678901234567890")]
#[case::twenty_digits_with_fraction("12345678901234567890.123", "12345678901234567890")]
#[case::negative_truncates_toward_zero("-12345678901234567890.123", "-12345678901234567890")]
fn converts_decimal_strings(#[case] input: &str, #[case] expected: &str) {
    let converted = convert(&build::bigint(), &Registry::new(), &Value::from(input));
    assert_eq!(converted, bigint_of(expected));
}

#[rstest]
#[case::truthy("true", "1")]
#[case::falsy("false", "0")]
fn converts_boolean_strings(#[case] input: &str, #[case] expected: &str) {
    let converted = convert(&build::bigint(), &Registry::new(), &Value::from(input));
    assert_eq!(converted, bigint_of(expected));
}

#[rstest]
#[case::integral(1.0, "1")]
#[case::fraction_truncates(3.14, "3")]
#[case::negative_fraction(-3.14, "-3")]
fn converts_numbers(#[case] input: f64, #[case] expected: &str) {
    let converted = convert(&build::bigint(), &Registry::new(), &Value::from(input));
    assert_eq!(converted, bigint_of(expected));
}

#[rstest]
#[case::truthy(true, "1")]
#[case::falsy(false, "0")]
fn converts_booleans(#[case] input: bool, #[case] expected: &str) {
    let converted = convert(&build::bigint(), &Registry::new(), &Value::Bool(input));
    assert_eq!(converted, bigint_of(expected));
}

#[rstest]
#[case::fraction_only(".5")]
#[case::alphabetic("abc")]
#[case::double_dot("1.2.3")]
#[case::trailing_junk("12a")]
#[case::bare_sign("-")]
#[case::empty("")]
fn leaves_malformed_strings_unchanged(#[case] input: &str) {
    let converted = convert(&build::bigint(), &Registry::new(), &Value::from(input));
    assert_eq!(converted, Value::from(input));
}

#[test]
fn precision_survives_well_beyond_the_float_range() {
    let digits = "9".repeat(64);
    let converted = convert(&build::bigint(), &Registry::new(), &Value::from(digits.as_str()));
    assert_eq!(converted, bigint_of(&digits));
}

#[test]
fn converted_bigints_validate_against_the_bigint_schema() {
    let schema = build::bigint();
    let registry = Registry::new();
    let converted = convert(&schema, &registry, &Value::from("12345678901234567890.123"));
    assert!(typeval::is_valid(&schema, &registry, &converted));
}
