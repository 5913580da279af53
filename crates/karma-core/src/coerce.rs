//! Leaf coercion for loosely typed payload values.
//!
//! Missing or malformed leaves degrade to `""`, `0` or `false`; nothing
//! here returns an error.

use serde_json::Value;

/// JavaScript-style truthiness, used where the payload picks the first
/// populated candidate out of several locations.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First non-null value among `keys` on an object node.
/// Non-object nodes have no fields.
pub fn field<'a>(node: Option<&'a Value>, keys: &[&str]) -> Option<&'a Value> {
    let map = node?.as_object()?;
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// Resolve the first dotted path (`"charts.rasi.houses"`) that exists.
/// A path that ends on `null` still counts as found.
pub fn path<'a>(node: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|p| {
        p.split('.')
            .try_fold(node, |cur, key| cur.as_object().and_then(|m| m.get(key)))
    })
}

/// String form of a leaf. `null`/missing become `""`.
pub fn text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => number_text(n.as_f64().unwrap_or(0.0)),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| text(Some(i)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::new(),
    }
}

/// Like [`text`], but empty strings become `None`.
pub fn opt_text(v: Option<&Value>) -> Option<String> {
    let s = text(v);
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Numeric form of a leaf. Missing, empty, non-numeric and non-finite
/// values become `0.0`.
pub fn num(v: Option<&Value>) -> f64 {
    opt_num(v).unwrap_or(0.0)
}

/// Numeric form of a leaf, `None` when there is no usable number.
pub fn opt_num(v: Option<&Value>) -> Option<f64> {
    let f = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// Boolean form of a leaf. Accepts booleans, numbers and the usual
/// string spellings; anything else present counts as set.
pub fn flag(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "no" | "n"
        ),
        Some(_) => true,
    }
}

/// Positive whole number (house numbers, indices). Zero and negatives
/// become `None`.
pub fn ordinal(v: Option<&Value>) -> Option<u32> {
    let f = opt_num(v)?;
    if f >= 1.0 {
        Some(f.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

/// Render an `f64` without a trailing `.0` for whole numbers.
pub fn number_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_prefers_first_non_null() {
        let v = json!({"name": "Sun", "body": null, "planet": "Surya"});
        assert_eq!(field(Some(&v), &["body", "name", "planet"]), Some(&json!("Sun")));
        assert_eq!(field(Some(&json!("x")), &["body"]), None);
    }

    #[test]
    fn test_path_walks_dots() {
        let v = json!({"charts": {"rasi": {"houses": [1]}}});
        assert_eq!(
            path(&v, &["charts.lagna.houses", "charts.rasi.houses"]),
            Some(&json!([1]))
        );
        assert_eq!(path(&v, &["charts.rasi.missing"]), None);
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some(&json!(null))), "");
        assert_eq!(text(Some(&json!(3))), "3");
        assert_eq!(text(Some(&json!(10.5))), "10.5");
        assert_eq!(text(Some(&json!(2.0))), "2");
        assert_eq!(text(Some(&json!(["a", 1]))), "a,1");
        assert_eq!(text(Some(&json!({"a": 1}))), "");
        assert_eq!(opt_text(Some(&json!(""))), None);
    }

    #[test]
    fn test_num_degrades_to_zero() {
        assert_eq!(num(None), 0.0);
        assert_eq!(num(Some(&json!(""))), 0.0);
        assert_eq!(num(Some(&json!("abc"))), 0.0);
        assert_eq!(num(Some(&json!("NaN"))), 0.0);
        assert_eq!(num(Some(&json!("inf"))), 0.0);
        assert_eq!(num(Some(&json!(" 12.5 "))), 12.5);
        assert_eq!(num(Some(&json!(true))), 1.0);
        assert_eq!(num(Some(&json!([1]))), 0.0);
    }

    #[test]
    fn test_flag() {
        assert!(!flag(None));
        assert!(flag(Some(&json!(true))));
        assert!(flag(Some(&json!("R"))));
        assert!(!flag(Some(&json!("false"))));
        assert!(!flag(Some(&json!(0))));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(Some(&json!(7))), Some(7));
        assert_eq!(ordinal(Some(&json!("3"))), Some(3));
        assert_eq!(ordinal(Some(&json!(0))), None);
        assert_eq!(ordinal(Some(&json!(-2))), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
