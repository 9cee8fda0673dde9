//! Total ordering over comparable cell values
//!
//! Numbers sort before strings, strings before arrays. Integers and floats
//! compare by exact numeric value, and NaN sorts after every other number.
//! Arrays compare element-wise; when one array is a prefix of the other, the
//! shorter one sorts first.

use std::cmp::Ordering;

use rowsort_core::{StringCollation, Value};

/// Compare two values, or `None` if either one is not comparable
pub fn compare_values(a: &Value, b: &Value, collation: StringCollation) -> Option<Ordering> {
    if !a.is_comparable() || !b.is_comparable() {
        return None;
    }
    Some(compare_comparable(a, b, collation))
}

/// Compare two values already known to be comparable
pub(crate) fn compare_comparable(a: &Value, b: &Value, collation: StringCollation) -> Ordering {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => compare_strings(a, b, collation),
        (Value::Array(a), Value::Array(b)) => {
            for (va, vb) in a.iter().zip(b.iter()) {
                let cmp = compare_comparable(va, vb, collation);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            a.len().cmp(&b.len())
        }
        (Value::Float(a), Value::Float(b)) => compare_f64(*a, *b),
        (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
        (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).reverse(),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Exact comparison; widening the integer to `f64` would round above 2^53
fn compare_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() || float >= i64::MAX as f64 {
        // i64::MAX as f64 is 2^63, above every i64
        return Ordering::Less;
    }
    if float < i64::MIN as f64 {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    int.cmp(&(whole as i64)).then_with(|| {
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Int(_) | Value::Float(_) => 0,
        Value::String(_) => 1,
        Value::Array(_) => 2,
        Value::Null | Value::Bool(_) | Value::Json(_) => 3,
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn compare_strings(a: &str, b: &str, collation: StringCollation) -> Ordering {
    match collation {
        StringCollation::Lexical => a.cmp(b),
        StringCollation::CaseInsensitive => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| a.cmp(b)),
    }
}
