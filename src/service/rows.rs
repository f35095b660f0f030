//! PostgreSQL rows to JSON objects.

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row};

pub fn row_to_json(row: &PgRow) -> Value {
    let mut map = Map::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col.ordinal()));
    }
    Value::Object(map)
}

/// Decode one cell by trying the column types the API exposes, most specific first.
/// NULL becomes `null`. So do arrays, `interval`, and NUMERIC values outside
/// `Decimal`'s 28-digit range, which have no decoder here.
fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(f)) = row.try_get::<Option<f64>, _>(idx) {
        return Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }
    if let Ok(Some(f)) = row.try_get::<Option<f32>, _>(idx) {
        return Number::from_f64(f as f64).map(Value::Number).unwrap_or(Value::Null);
    }
    if let Ok(Some(d)) = row.try_get::<Option<Decimal>, _>(idx) {
        return decimal_to_value(d);
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(t)) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return Value::String(t.format("%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}

/// NUMERIC as its decimal text with the column's scale, the same text `col::text` gives.
fn decimal_to_value(d: Decimal) -> Value {
    Value::String(d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::key_text;
    use std::str::FromStr;

    #[test]
    fn numeric_keeps_exact_digits() {
        let price = Decimal::from_str("19.990").unwrap();
        assert_eq!(decimal_to_value(price), Value::String("19.990".into()));
        let big = Decimal::from_str("12345678901234567890.12").unwrap();
        assert_eq!(decimal_to_value(big), Value::String("12345678901234567890.12".into()));
    }

    #[test]
    fn numeric_key_matches_text_form() {
        let id = decimal_to_value(Decimal::from(42));
        assert_eq!(key_text(&id), Some("42".into()));
    }
}
