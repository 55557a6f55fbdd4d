use serde_json::{json, Value};

/// Matches spans/logs that carry an error in any of the common places.
pub const ERROR_FILTER: &str = "(status:error OR @error.message:* OR @error.type:*)";

/// Aggregation of one compute entry. Non-count variants need a metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    Count,
    Sum(String),
    Avg(String),
    Pc95(String),
}

impl Aggregation {
    pub fn code(&self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum(_) => "sum",
            Aggregation::Avg(_) => "avg",
            Aggregation::Pc95(_) => "pc95",
        }
    }

    pub fn metric(&self) -> Option<&str> {
        match self {
            Aggregation::Count => None,
            Aggregation::Sum(m) | Aggregation::Avg(m) | Aggregation::Pc95(m) => Some(m),
        }
    }

    pub fn to_compute(&self) -> Value {
        let mut compute = json!({ "aggregation": self.code(), "type": "total" });
        if let Some(metric) = self.metric() {
            compute["metric"] = json!(metric);
        }
        compute
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    pub facet: String,
    pub limit: u32,
}

/// Filters and shaping of one request. Built through [`QuerySpecBuilder`],
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    service: Option<String>,
    env: Option<String>,
    query: Option<String>,
    extra_clauses: Vec<String>,
    errors_only: bool,
    computes: Vec<Aggregation>,
    group_by: Option<GroupBy>,
    limit: Option<u32>,
    sort: Option<String>,
}

impl QuerySpec {
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn computes(&self) -> &[Aggregation] {
        &self.computes
    }

    pub fn group_by(&self) -> Option<&GroupBy> {
        self.group_by.as_ref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Clauses in order: free text, `service:`, `env:`, extra clauses.
    /// Concatenated as given, never deduplicated.
    pub fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(q) = &self.query {
            clauses.push(q.clone());
        }
        if let Some(service) = &self.service {
            clauses.push(format!("service:{}", service));
        }
        if let Some(env) = &self.env {
            clauses.push(format!("env:{}", env));
        }
        clauses.extend(self.extra_clauses.iter().cloned());
        clauses
    }

    pub fn has_filter(&self) -> bool {
        !self.clauses().is_empty()
    }

    /// Space-joined clauses (implicit AND), `*` when there are none.
    /// With `errors_only` the error filter is appended, or used alone.
    pub fn search_string(&self) -> String {
        let base = self.clauses().join(" ");
        match (base.is_empty(), self.errors_only) {
            (true, false) => "*".to_string(),
            (true, true) => ERROR_FILTER.to_string(),
            (false, false) => base,
            (false, true) => format!("{} {}", base, ERROR_FILTER),
        }
    }
}

#[derive(Debug, Default)]
pub struct QuerySpecBuilder {
    spec: QuerySpec,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl QuerySpecBuilder {
    pub fn service(mut self, service: Option<String>) -> Self {
        self.spec.service = non_blank(service);
        self
    }

    pub fn env(mut self, env: Option<String>) -> Self {
        self.spec.env = non_blank(env);
        self
    }

    pub fn query(mut self, query: Option<String>) -> Self {
        self.spec.query = non_blank(query);
        self
    }

    /// Adds `key:value` when `value` is set.
    pub fn tag(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.spec.extra_clauses.push(format!("{}:{}", key, v));
        }
        self
    }

    pub fn clause(mut self, clause: &str) -> Self {
        if !clause.trim().is_empty() {
            self.spec.extra_clauses.push(clause.trim().to_string());
        }
        self
    }

    pub fn errors_only(mut self) -> Self {
        self.spec.errors_only = true;
        self
    }

    pub fn compute(mut self, aggregation: Aggregation) -> Self {
        self.spec.computes.push(aggregation);
        self
    }

    pub fn group_by(mut self, facet: &str, limit: u32) -> Self {
        self.spec.group_by = Some(GroupBy {
            facet: facet.to_string(),
            limit,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: Option<String>) -> Self {
        self.spec.sort = non_blank(sort);
        self
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_matches_everything() {
        assert_eq!(QuerySpec::builder().build().search_string(), "*");
    }

    #[test]
    fn free_text_comes_before_field_clauses() {
        let spec = QuerySpec::builder()
            .query(Some("@http.status_code:500".into()))
            .service(Some("checkout".into()))
            .env(Some("prd".into()))
            .tag("cluster", Some("eu-1"))
            .build();
        assert_eq!(
            spec.search_string(),
            "@http.status_code:500 service:checkout env:prd cluster:eu-1"
        );
    }

    #[test]
    fn clauses_are_not_deduplicated() {
        let spec = QuerySpec::builder()
            .query(Some("service:checkout".into()))
            .service(Some("checkout".into()))
            .build();
        assert_eq!(spec.search_string(), "service:checkout service:checkout");
    }

    #[test]
    fn blank_values_are_ignored() {
        let spec = QuerySpec::builder()
            .service(Some("  ".into()))
            .tag("cluster", None)
            .build();
        assert!(!spec.has_filter());
    }

    #[test]
    fn error_filter_is_appended_or_alone() {
        let alone = QuerySpec::builder().errors_only().build();
        assert_eq!(alone.search_string(), ERROR_FILTER);

        let scoped = QuerySpec::builder()
            .service(Some("api".into()))
            .errors_only()
            .build();
        assert_eq!(scoped.search_string(), format!("service:api {}", ERROR_FILTER));
    }

    #[test]
    fn compute_carries_metric_when_needed() {
        assert_eq!(
            Aggregation::Count.to_compute(),
            json!({"aggregation": "count", "type": "total"})
        );
        assert_eq!(
            Aggregation::Pc95("@duration".into()).to_compute(),
            json!({"aggregation": "pc95", "type": "total", "metric": "@duration"})
        );
    }
}
