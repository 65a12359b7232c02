use tracing::warn;
use crate::models::{EnrichedProduct, KcalValue, Product};

/// Kilocalories per 100 g for one product.
///
/// Missing or non-object `nutriments`, and a missing `energy-kcal` key, all
/// count as 0. Finite numbers are returned as-is. A value that is present but
/// not a finite number is logged and also counts as 0, so the zero-kcal filter
/// drops the row instead of the whole country failing.
pub fn extract_kcal(product: &Product) -> f64 {
    match product.nutriments.energy_kcal() {
        KcalValue::Absent => 0.0,
        KcalValue::Numeric(v) if v.is_finite() => v,
        KcalValue::Numeric(v) => {
            warn!(code = product.code, value = v, "Non-finite energy-kcal, using 0");
            0.0
        }
        KcalValue::NonNumeric(value) => {
            warn!(code = product.code, value = %value, "Non-numeric energy-kcal, using 0");
            0.0
        }
    }
}

pub fn enrich(product: Product, country: Option<&str>) -> EnrichedProduct {
    let kcal_per100 = extract_kcal(&product);
    EnrichedProduct {
        product,
        country: country.map(str::to_string),
        kcal_per100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn product(nutriments: Value) -> Product {
        serde_json::from_value(json!({"code": "3017620422003", "nutriments": nutriments})).unwrap()
    }

    #[test]
    fn missing_or_malformed_nutriments_yield_zero() {
        let absent: Product = serde_json::from_value(json!({"code": "1"})).unwrap();
        assert_eq!(extract_kcal(&absent), 0.0);

        for shape in [json!(null), json!("none"), json!(12), json!([1, 2]), json!(true)] {
            assert_eq!(extract_kcal(&product(shape)), 0.0);
        }
    }

    #[test]
    fn missing_key_yields_zero() {
        assert_eq!(extract_kcal(&product(json!({"fat": 3.1}))), 0.0);
        assert_eq!(extract_kcal(&product(json!({"energy-kcal": null}))), 0.0);
    }

    #[test]
    fn numeric_values_pass_through_unchanged() {
        for x in [0.0, 1.5, 100.0, 539.0, 884.25, -3.0] {
            assert_eq!(extract_kcal(&product(json!({"energy-kcal": x}))), x);
        }
        assert_eq!(extract_kcal(&product(json!({"energy-kcal": 250}))), 250.0);
        assert_eq!(extract_kcal(&product(json!({"energy-kcal": "250"}))), 250.0);
    }

    #[test]
    fn unusable_values_count_as_zero() {
        for bad in [
            json!(""),
            json!("n/a"),
            json!("lots"),
            json!({}),
            json!({"value": 1}),
            json!([120]),
            json!(false),
            json!("NaN"),
            json!("inf"),
        ] {
            assert_eq!(extract_kcal(&product(json!({"energy-kcal": bad}))), 0.0);
        }
    }

    #[test]
    fn enrich_attaches_value_and_country() {
        let row = enrich(product(json!({"energy-kcal": 42})), Some("DE"));
        assert_eq!(row.kcal_per100, 42.0);
        assert_eq!(row.country.as_deref(), Some("DE"));
        assert_eq!(row.product.code, "3017620422003");
    }
}
