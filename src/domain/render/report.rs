use std::fmt;

use serde_json::Value;

use crate::domain::render::table_renderer::RenderedTable;

/// One request/response pair, kept for `--debug` dumps.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiExchange {
    pub label: String,
    pub request: Option<Value>,
    pub response: Value,
}

impl ApiExchange {
    pub fn new(label: &str, request: Option<Value>, response: Value) -> Self {
        Self {
            label: label.to_string(),
            request,
            response,
        }
    }
}

/// Human-facing output blocks of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Table(RenderedTable),
    Panel { title: String, lines: Vec<String> },
    Json(Value),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Table(table) => write!(f, "{}", table),
            View::Panel { title, lines } => {
                writeln!(f, "{}", title)?;
                for line in lines {
                    writeln!(f, "  {}", line)?;
                }
                Ok(())
            }
            View::Json(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                writeln!(f, "{}", pretty)
            }
        }
    }
}

/// Everything a command produced: the API traffic and what to show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandReport {
    pub exchanges: Vec<ApiExchange>,
    pub views: Vec<View>,
}

impl CommandReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exchange(mut self, exchange: ApiExchange) -> Self {
        self.exchanges.push(exchange);
        self
    }

    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Plain JSON commands (mute, trigger, ...) show the response itself.
    pub fn json(label: &str, request: Option<Value>, response: Value) -> Self {
        Self::new()
            .exchange(ApiExchange::new(label, request, response.clone()))
            .view(View::Json(response))
    }

    pub fn tables(&self) -> Vec<&RenderedTable> {
        self.views
            .iter()
            .filter_map(|v| match v {
                View::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}
