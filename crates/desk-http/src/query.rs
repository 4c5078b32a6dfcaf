//! Query-string building.

/// Ordered query parameters. Blank values are dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Blank values are skipped.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Add a parameter if present and not blank.
    #[must_use]
    pub fn with_opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.pairs.push((key.to_string(), value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Percent-encoded `k=v&k=v`, without the leading `?`.
    #[must_use]
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: AsRef<str>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key.as_ref(), value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_values_are_omitted() {
        let params = QueryParams::new()
            .with("page", 2)
            .with("name", "")
            .with_opt("email", None::<String>)
            .with_opt("search", Some("acme corp"));

        assert_eq!(params.encode(), "page=2&search=acme%20corp");
    }

    #[test]
    fn keys_and_values_are_percent_encoded() {
        let params: QueryParams = [("q", "a&b=c")].into_iter().collect();
        assert_eq!(params.encode(), "q=a%26b%3Dc");
    }

    #[test]
    fn empty_params_encode_to_empty_string() {
        assert!(QueryParams::new().is_empty());
        assert_eq!(QueryParams::new().encode(), "");
    }
}
