//! Result-set builders for tests.
//!
//! Available to other crates with the `test-utils` feature.

use sparqvis_core::{ResultSet, Row, TypedValue};

/// Build a result set from field names and `(field, value)` rows.
///
/// Panics on duplicate field names.
pub fn result_set(fields: &[&str], rows: Vec<Vec<(&str, TypedValue)>>) -> ResultSet {
    let rows = rows
        .into_iter()
        .map(|entries| {
            entries
                .into_iter()
                .map(|(field, value)| (field.to_string(), value))
                .collect::<Row>()
        })
        .collect();
    ResultSet::new(fields.iter().map(|f| f.to_string()).collect(), rows)
        .expect("fixture fields are unique")
}

/// Build an `s`/`p`/`o` result set.
///
/// Values starting with `http` become IRIs, everything else a literal.
pub fn triples(rows: &[(&str, &str, &str)]) -> ResultSet {
    let term = |v: &str| {
        if v.starts_with("http") {
            TypedValue::uri(v)
        } else {
            TypedValue::literal(v)
        }
    };
    result_set(
        &["s", "p", "o"],
        rows.iter()
            .map(|(s, p, o)| vec![("s", term(s)), ("p", term(p)), ("o", term(o))])
            .collect(),
    )
}
