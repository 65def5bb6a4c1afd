//! Property tests: pointer-segment escaping round-trips, and validation is
//! a pure function of its inputs.

use proptest::prelude::*;
use typeval::pointer::{escape, unescape};
use typeval::{build, validate, Registry, Value};

proptest! {
    #[test]
    fn escape_then_unescape_is_identity(segment in ".*") {
        let escaped = escape(&segment);
        let unescaped = unescape(&escaped);
        prop_assert_eq!(unescaped.as_ref(), segment.as_str());
    }

    #[test]
    fn escaped_segments_contain_no_bare_separators(segment in ".*") {
        let escaped = escape(&segment);
        prop_assert!(!escaped.contains('/'));
    }

    #[test]
    fn property_errors_point_back_at_their_key(key in "[^/~]{1,12}") {
        let schema = build::object([(key.clone(), build::number())]);
        let mut map = indexmap::IndexMap::new();
        map.insert(key.clone(), Value::from("not a number"));
        let errors = validate(&schema, &Registry::new(), &Value::Object(map));
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].path.as_str(), format!("/{key}"));
    }

    #[test]
    fn validation_is_deterministic(n in proptest::num::f64::NORMAL, s in ".*") {
        let schema = build::union([
            build::string().with_min_length(1),
            build::number().with_minimum(0.0),
        ]);
        let registry = Registry::new();
        for value in [Value::from(n), Value::from(s.as_str())] {
            let first = validate(&schema, &registry, &value);
            let second = validate(&schema, &registry, &value);
            prop_assert_eq!(first, second);
        }
    }
}
