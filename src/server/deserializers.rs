use serde::{Deserialize, Deserializer};

use crate::db::Page;

// mirrors lenient form handling: anything that is not an integer means the first page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<Page, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(Page)
        .unwrap_or_default())
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_page")]
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Page {
        let uri: axum::http::Uri = format!("/questions?{query}").parse().unwrap();
        axum::extract::Query::<PageQuery>::try_from_uri(&uri)
            .unwrap()
            .0
            .page
    }

    #[test]
    fn page_defaults_to_first() {
        assert_eq!(parse(""), Page(1));
        assert_eq!(parse("page=abc"), Page(1));
    }

    #[test]
    fn numeric_page_is_kept() {
        assert_eq!(parse("page=1000"), Page(1000));
        assert_eq!(parse("page=0"), Page(0));
    }
}
