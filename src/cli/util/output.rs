use std::io::{self, Write};

use anyhow::Result;
use serde_json::Value;

use crate::domain::render::report::CommandReport;
use crate::errors::AppError;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// With `debug`, every request/response pair as labeled pretty JSON;
/// otherwise the command's views, separated by blank lines.
pub fn render_report(report: &CommandReport, debug: bool) -> String {
    if debug {
        return report
            .exchanges
            .iter()
            .map(|ex| {
                let mut block = String::new();
                if let Some(request) = &ex.request {
                    block.push_str(&format!("── {} request ──\n{}\n", ex.label, pretty(request)));
                }
                block.push_str(&format!("── {} response ──\n{}\n", ex.label, pretty(&ex.response)));
                block
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    report
        .views
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `error: <message>` on one line. With `debug`, the error chain follows,
/// and for upstream failures the untruncated response body too.
pub fn render_error(err: &anyhow::Error, debug: bool) -> String {
    let mut out = format!("error: {}\n", err);
    if !debug {
        return out;
    }
    out.push_str(&format!("{:?}\n", err));
    if let Some(body) = err.downcast_ref::<AppError>().and_then(AppError::upstream_body) {
        out.push_str(&format!("── upstream response body ──\n{}\n", body));
    }
    out
}

pub fn emit(report: &CommandReport, debug: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(render_report(report, debug).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::report::{ApiExchange, View};
    use serde_json::json;

    fn report() -> CommandReport {
        CommandReport::new()
            .exchange(ApiExchange::new("mute", Some(json!({})), json!({"id": 7})))
            .view(View::Panel {
                title: "Summary".into(),
                lines: vec!["- ok".into()],
            })
    }

    #[test]
    fn views_by_default() {
        assert_eq!(render_report(&report(), false), "Summary\n  - ok\n");
    }

    #[test]
    fn debug_dumps_request_and_response() {
        let out = render_report(&report(), true);
        assert!(out.starts_with("── mute request ──\n{}\n"));
        assert!(out.contains("── mute response ──\n{\n  \"id\": 7\n}\n"));
        assert!(!out.contains("Summary"));
    }

    #[test]
    fn debug_error_shows_the_whole_upstream_body() {
        let body = format!("{}TAIL_OF_BODY", "x".repeat(600));
        let err = anyhow::Error::new(AppError::upstream(502, &body));

        let plain = render_error(&err, false);
        assert_eq!(plain.lines().count(), 1);
        assert!(!plain.contains("TAIL_OF_BODY"));

        let debug = render_error(&err, true);
        assert!(debug.starts_with("error: HTTP 502: "));
        assert!(debug.contains(&format!("── upstream response body ──\n{}\n", body)));
    }

    #[test]
    fn debug_error_without_body_prints_chain() {
        let err = anyhow::Error::new(AppError::MissingField("service".into()));
        assert_eq!(render_error(&err, false), "error: Missing field: service\n");
        assert!(!render_error(&err, true).contains("upstream response body"));
    }
}
