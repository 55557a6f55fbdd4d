/// Ordered GET query parameters. Unset values and empty lists are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            let v = v.to_string();
            if !v.is_empty() {
                self.0.push((key.to_string(), v));
            }
        }
        self
    }

    /// Multi-value flags go under one key, comma-joined.
    pub fn push_list<S: AsRef<str>>(mut self, key: &str, values: &[S]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.as_ref().trim())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            self.0.push((key.to_string(), joined));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_are_omitted() {
        let params = QueryParams::new()
            .push("name", None::<String>)
            .push("rollup", Some(60))
            .push("query", Some(""));
        assert_eq!(params.as_slice(), &[("rollup".to_string(), "60".to_string())]);
    }

    #[test]
    fn lists_join_under_one_key() {
        let params = QueryParams::new()
            .push_list("ids", &["12", "34"])
            .push_list("monitor_tags", &Vec::<String>::new());
        assert_eq!(params.get("ids"), Some("12,34"));
        assert_eq!(params.get("monitor_tags"), None);
        assert_eq!(params.into_vec().len(), 1);
    }
}
