use serde::{Deserialize, Deserializer};
use serde_json::Value;
use super::Product;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub struct PageCountResponse {
    #[serde(deserialize_with = "number_or_string")]
    pub page_count: u32,
}

// The CGI endpoint has been seen returning counts as strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid page_count {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid page_count {:?}", s))),
        other => Err(serde::de::Error::custom(format!("invalid page_count {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_accepts_numbers_and_numeric_strings() {
        let n: PageCountResponse = serde_json::from_str(r#"{"page_count": 3}"#).unwrap();
        assert_eq!(n.page_count, 3);
        let s: PageCountResponse = serde_json::from_str(r#"{"page_count": "12", "count": 9}"#).unwrap();
        assert_eq!(s.page_count, 12);
        assert!(serde_json::from_str::<PageCountResponse>(r#"{"count": 9}"#).is_err());
    }
}
