use std::collections::BTreeSet;
use std::fmt;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::core::util::format_util::{CpuUnit, FormatUtil};
use crate::domain::common::model::{CellValue, NormalizedRow};

/// Free-text columns (log messages) keep this many characters.
pub const MESSAGE_LIMIT: usize = 400;
/// Span error messages are shorter to keep rows on one line.
pub const ERROR_MESSAGE_LIMIT: usize = 120;

/// How a column's values are turned into text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormat {
    Text,
    /// First N characters, no ellipsis.
    Truncate(usize),
    /// Up to 4 decimals, trailing zeros stripped.
    Decimal,
    /// Exactly N decimals.
    Fixed(usize),
    Bytes,
    /// Value already in whole cores.
    Cpu(CpuUnit),
    /// `HH:MM:SS`; the date goes to the title.
    Time,
    /// Ratio shown as a percentage.
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub format: ValueFormat,
    /// Label columns (env, service) move to the title when constant.
    pub hoistable: bool,
}

impl ColumnSpec {
    pub fn new(name: &str, format: ValueFormat) -> Self {
        Self {
            name: name.to_string(),
            format,
            hoistable: false,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, ValueFormat::Text)
    }

    pub fn hoistable(mut self) -> Self {
        self.hoistable = true;
        self
    }
}

/// Visible columns and title annotations derived from a set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub title: String,
    pub annotations: Vec<(String, String)>,
    pub columns: Vec<ColumnSpec>,
}

impl RenderSpec {
    /// `Title (k=v, k=v)`, or just the title without annotations.
    pub fn title_line(&self) -> String {
        if self.annotations.is_empty() {
            return self.title.clone();
        }
        let parts: Vec<String> = self
            .annotations
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{} ({})", self.title, parts.join(", "))
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub spec: RenderSpec,
    pub rows: Vec<Vec<String>>,
}

impl RenderedTable {
    pub fn header(&self) -> Vec<&str> {
        self.spec.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            self.spec
                .columns
                .iter()
                .map(|c| Cell::new(&c.name).add_attribute(Attribute::Bold).fg(Color::Cyan)),
        );
        for row in &self.rows {
            table.add_row(row);
        }
        table
    }
}

impl fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.spec.title_line())?;
        if self.rows.is_empty() {
            return writeln!(f, "No results.");
        }
        writeln!(f, "{}", self.to_table())
    }
}

/// Never fails: an unexpected value type is shown as-is rather than dropped.
pub fn format_cell(value: &CellValue, format: ValueFormat) -> String {
    match (format, value) {
        (ValueFormat::Time, CellValue::Time(t)) => t.format("%H:%M:%S").to_string(),
        (_, CellValue::Time(t)) => t.to_rfc3339(),
        (ValueFormat::Text, CellValue::Text(s)) => s.clone(),
        (ValueFormat::Truncate(max), CellValue::Text(s)) => FormatUtil::truncate_chars(s, max),
        (ValueFormat::Truncate(max), CellValue::Number(_)) => {
            FormatUtil::truncate_chars(&format_cell(value, ValueFormat::Decimal), max)
        }
        (ValueFormat::Text | ValueFormat::Decimal | ValueFormat::Time, CellValue::Number(n)) => {
            FormatUtil::decimal(*n, 4)
        }
        (ValueFormat::Fixed(decimals), _) => match value.as_f64() {
            Some(n) => format!("{:.*}", decimals, n),
            None => plain(value),
        },
        (ValueFormat::Bytes, _) => value.as_f64().map(FormatUtil::bytes).unwrap_or_else(|| plain(value)),
        (ValueFormat::Cpu(unit), _) => value
            .as_f64()
            .map(|cores| FormatUtil::cpu(FormatUtil::cpu_from_cores(cores, unit), unit))
            .unwrap_or_else(|| plain(value)),
        (ValueFormat::Percent, _) => value.as_f64().map(FormatUtil::percent).unwrap_or_else(|| plain(value)),
        (_, CellValue::Text(s)) => s.clone(),
    }
}

fn plain(value: &CellValue) -> String {
    format_cell(value, ValueFormat::Text)
}

/// Builds a [`RenderedTable`] from normalized rows.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    title: String,
    annotations: Vec<(String, String)>,
    columns: Vec<ColumnSpec>,
}

impl TableRenderer {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            annotations: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Fixed title annotation; blank or unset values are skipped.
    pub fn annotate(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.annotations.push((key.to_string(), v.to_string()));
        }
        self
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// 1. drops columns absent from every row,
    /// 2. hoists constant hoistable columns into the title,
    /// 3. adds `date=` when every timestamp falls on one day.
    pub fn plan(&self, rows: &[NormalizedRow]) -> RenderSpec {
        let mut annotations = self.annotations.clone();
        let mut hoisted = Vec::new();
        let mut columns = Vec::new();

        for column in &self.columns {
            let values: Vec<&CellValue> = rows.iter().filter_map(|r| r.get(&column.name)).collect();
            let Some(first) = values.first() else {
                continue;
            };
            if column.hoistable && values.iter().all(|v| v == first) {
                hoisted.push((column.name.clone(), format_cell(first, column.format)));
                continue;
            }
            columns.push(column.clone());
        }

        let dates: BTreeSet<_> = columns
            .iter()
            .filter(|c| c.format == ValueFormat::Time)
            .flat_map(|c| rows.iter().filter_map(move |r| r.get(&c.name)))
            .filter_map(|v| match v {
                CellValue::Time(t) => Some(t.date_naive()),
                _ => None,
            })
            .collect();
        // A range crossing midnight gets no date rather than a guessed one.
        if dates.len() == 1 {
            if let Some(date) = dates.iter().next() {
                annotations.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
            }
        }

        annotations.extend(hoisted);

        RenderSpec {
            title: self.title.clone(),
            annotations,
            columns,
        }
    }

    pub fn render(&self, rows: &[NormalizedRow]) -> RenderedTable {
        let spec = self.plan(rows);
        let body = rows
            .iter()
            .map(|row| {
                spec.columns
                    .iter()
                    .map(|c| {
                        row.get(&c.name)
                            .map(|v| format_cell(v, c.format))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        RenderedTable { spec, rows: body }
    }
}
