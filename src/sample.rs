//! Representative sample values for generated SQL test statements
//!
//! Values are produced from an RNG seeded by a stable hash of
//! (table, column), so the same catalog always renders the same test
//! statements while still looking like realistic data: v4-formatted uuids
//! for uuid columns, in-range numbers for numeric columns, a representative
//! string for text columns and a constructed literal for JSON and array
//! columns.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::typemap::DataType;

fn seeded_rng(table: &str, column: &str, salt: u64) -> StdRng {
    let mut hasher = DefaultHasher::new();
    table.hash(&mut hasher);
    column.hash(&mut hasher);
    salt.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

/// v4-formatted uuid derived deterministically from the column identity
pub fn sample_uuid(table: &str, column: &str, salt: u64) -> String {
    let mut rng = seeded_rng(table, column, salt);
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Render a SQL literal suitable for a test statement argument
pub fn sql_sample(
    table: &str,
    column: &str,
    data_type: &DataType,
    enum_labels: &[String],
    max_length: Option<u32>,
) -> String {
    sql_sample_salted(table, column, data_type, enum_labels, max_length, 0)
}

fn sql_sample_salted(
    table: &str,
    column: &str,
    data_type: &DataType,
    enum_labels: &[String],
    max_length: Option<u32>,
    salt: u64,
) -> String {
    let mut rng = seeded_rng(table, column, salt);
    match data_type {
        DataType::SmallInt => rng.gen_range(1..=99i16).to_string(),
        DataType::Integer => rng.gen_range(1..=9_999i32).to_string(),
        DataType::BigInt => rng.gen_range(1..=999_999i64).to_string(),
        DataType::Real | DataType::DoublePrecision | DataType::Numeric => {
            format!("{:.2}", rng.gen_range(1.0..1_000.0f64))
        }
        DataType::Boolean => {
            if rng.gen_bool(0.5) {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        DataType::Text | DataType::Varchar(_) | DataType::Char(_) => {
            let mut s = format!("sample_{}", column);
            if let Some(max) = max_length {
                s.truncate(max as usize);
            }
            format!("'{}'", s)
        }
        DataType::Timestamp => "'2024-01-15 10:30:00'".to_string(),
        DataType::TimestampTz => "'2024-01-15 10:30:00+00'".to_string(),
        DataType::Date => "'2024-01-15'".to_string(),
        DataType::Time => "'10:30:00'".to_string(),
        DataType::TimeTz => "'10:30:00+00'".to_string(),
        DataType::Uuid => format!("'{}'", sample_uuid(table, column, salt)),
        DataType::Json | DataType::JsonBinary => {
            let doc = serde_json::json!({ column: "sample" });
            format!("'{}'::jsonb", doc)
        }
        DataType::Binary => "'\\xdeadbeef'".to_string(),
        DataType::Array(inner) => {
            let first = sql_sample_salted(table, column, inner, enum_labels, max_length, salt + 1);
            let second = sql_sample_salted(table, column, inner, enum_labels, max_length, salt + 2);
            format!("ARRAY[{}, {}]", first, second)
        }
        DataType::Enum(name) => match enum_labels.first() {
            Some(label) => format!("'{}'::{}", label, name),
            None => "''".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_deterministic() {
        let a = sql_sample("users", "id", &DataType::Uuid, &[], None);
        let b = sql_sample("users", "id", &DataType::Uuid, &[], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_columns_differ() {
        let a = sql_sample("users", "id", &DataType::Uuid, &[], None);
        let b = sql_sample("posts", "id", &DataType::Uuid, &[], None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_uuid_sample_is_v4_shaped() {
        let s = sample_uuid("users", "id", 0);
        assert_eq!(s.len(), 36);
        // Version nibble is 4
        assert_eq!(&s[14..15], "4");
    }

    #[test]
    fn test_text_sample_respects_max_length() {
        let s = sql_sample("users", "nickname", &DataType::Varchar(Some(6)), &[], Some(6));
        // "'sample'" = 6 chars of payload plus the quotes
        assert_eq!(s, "'sample'");
    }

    #[test]
    fn test_numeric_sample_in_range() {
        let s = sql_sample("orders", "qty", &DataType::SmallInt, &[], None);
        let n: i16 = s.parse().unwrap();
        assert!((1..=99).contains(&n));
    }

    #[test]
    fn test_enum_sample_uses_first_label() {
        let labels = vec!["pending".to_string(), "done".to_string()];
        let s = sql_sample(
            "orders",
            "status",
            &DataType::Enum("order_status".to_string()),
            &labels,
            None,
        );
        assert_eq!(s, "'pending'::order_status");
    }

    #[test]
    fn test_array_sample_shape() {
        let s = sql_sample(
            "posts",
            "scores",
            &DataType::Array(Box::new(DataType::Integer)),
            &[],
            None,
        );
        assert!(s.starts_with("ARRAY["));
        assert!(s.ends_with(']'));
    }
}
