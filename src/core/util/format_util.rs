pub const NANOCORES_PER_CORE: f64 = 1_000_000_000.0;
pub const NANOCORES_PER_MILLICORE: f64 = 1_000_000.0;
pub const BYTES_PER_KIB: f64 = 1024.0;

const BYTE_UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

/// Span durations above this are nanoseconds, below it milliseconds.
const NANOSECOND_DURATION_THRESHOLD: f64 = 10_000_000.0;

/// Display unit for CPU values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuUnit {
    #[default]
    Cores,
    Millicores,
}

impl CpuUnit {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "cores" | "core" => Some(CpuUnit::Cores),
            "mcores" | "mcore" | "millicores" => Some(CpuUnit::Millicores),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            CpuUnit::Cores => "cores",
            CpuUnit::Millicores => "mCores",
        }
    }
}

pub struct FormatUtil;

impl FormatUtil {
    /// Fixed-point with at most `decimals` digits, trailing zeros stripped.
    /// Never switches to scientific notation.
    pub fn decimal(value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        let s = format!("{:.*}", decimals, value);
        let s = if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        };
        match s.as_str() {
            "" | "-0" => "0".to_string(),
            _ => s,
        }
    }

    /// Binary-scaled size: the largest of B/KiB/MiB/GiB whose magnitude is >= 1.
    /// The unit is picked on the value as printed, with two decimals.
    pub fn bytes(value: f64) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        let rounded = |v: f64| (v * 100.0).round() / 100.0;
        let mut scaled = value;
        let mut idx = 0;
        while rounded(scaled).abs() >= BYTES_PER_KIB && idx < BYTE_UNITS.len() - 1 {
            scaled /= BYTES_PER_KIB;
            idx += 1;
        }
        if idx == 0 {
            format!("{} B", Self::decimal(scaled, 2))
        } else {
            format!("{:.2} {}", scaled, BYTE_UNITS[idx])
        }
    }

    /// nanocores/s (e.g. `kubernetes.cpu.usage.total.as_rate()`) into the requested unit.
    #[inline]
    pub fn cpu_from_nanocores(nano_cores: f64, unit: CpuUnit) -> f64 {
        match unit {
            CpuUnit::Cores => nano_cores / NANOCORES_PER_CORE,
            CpuUnit::Millicores => nano_cores / NANOCORES_PER_MILLICORE,
        }
    }

    /// Whole cores (requests/limits) into the requested unit.
    #[inline]
    pub fn cpu_from_cores(cores: f64, unit: CpuUnit) -> f64 {
        match unit {
            CpuUnit::Cores => cores,
            CpuUnit::Millicores => cores * 1000.0,
        }
    }

    pub fn cpu(value: f64, unit: CpuUnit) -> String {
        format!("{} {}", Self::decimal(value, 4), unit.suffix())
    }

    /// Span duration in seconds from a raw value in ns or ms.
    pub fn span_duration_seconds(raw: f64) -> f64 {
        if raw > NANOSECOND_DURATION_THRESHOLD {
            raw / 1_000_000_000.0
        } else {
            raw / 1000.0
        }
    }

    /// Latency aggregates in milliseconds from ns, µs, ms or s.
    pub fn duration_to_ms(raw: f64) -> f64 {
        if raw > NANOSECOND_DURATION_THRESHOLD {
            raw / 1_000_000.0
        } else if raw > 10_000.0 {
            raw / 1000.0
        } else if raw <= 10.0 {
            raw * 1000.0
        } else {
            raw
        }
    }

    /// First `max` characters (not bytes), no ellipsis.
    pub fn truncate_chars(s: &str, max: usize) -> String {
        s.chars().take(max).collect()
    }

    pub fn percent(ratio: f64) -> String {
        format!("{:.2}%", ratio * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_scale_on_binary_steps() {
        assert_eq!(FormatUtil::bytes(1023.0), "1023 B");
        assert_eq!(FormatUtil::bytes(1024.0), "1.00 KiB");
        assert_eq!(FormatUtil::bytes(1_048_576.0), "1.00 MiB");
        assert_eq!(FormatUtil::bytes(1536.0 * 1024.0 * 1024.0), "1.50 GiB");
        assert_eq!(FormatUtil::bytes(0.0), "0 B");
    }

    #[test]
    fn bytes_unit_follows_rounded_value() {
        assert_eq!(FormatUtil::bytes(1023.999), "1.00 KiB");
        assert_eq!(FormatUtil::bytes(1023.99 * 1024.0), "1023.99 KiB");
        assert_eq!(FormatUtil::bytes(1023.999 * 1024.0), "1.00 MiB");
    }

    #[test]
    fn bytes_stop_at_gib() {
        assert_eq!(FormatUtil::bytes(2048.0 * 1024.0 * 1024.0 * 1024.0), "2048.00 GiB");
    }

    #[test]
    fn cpu_usage_rate_conversion() {
        let rate = 250_000_000.0;
        let cores = FormatUtil::cpu_from_nanocores(rate, CpuUnit::Cores);
        let mcores = FormatUtil::cpu_from_nanocores(rate, CpuUnit::Millicores);
        assert_eq!(FormatUtil::decimal(cores, 4), "0.25");
        assert_eq!(FormatUtil::decimal(mcores, 4), "250");
        assert_eq!(FormatUtil::cpu(mcores, CpuUnit::Millicores), "250 mCores");
    }

    #[test]
    fn decimal_is_never_scientific() {
        assert_eq!(FormatUtil::decimal(0.000_01, 4), "0");
        assert_eq!(FormatUtil::decimal(1e12, 4), "1000000000000");
        assert_eq!(FormatUtil::decimal(12.5000, 4), "12.5");
        assert_eq!(FormatUtil::decimal(-0.00001, 4), "0");
        assert_eq!(FormatUtil::decimal(f64::NAN, 4), "-");
    }

    #[test]
    fn cpu_unit_codes() {
        assert_eq!(CpuUnit::from_code("MCORES"), Some(CpuUnit::Millicores));
        assert_eq!(CpuUnit::from_code("cores"), Some(CpuUnit::Cores));
        assert_eq!(CpuUnit::from_code("ghz"), None);
    }

    #[test]
    fn span_durations() {
        assert_eq!(FormatUtil::span_duration_seconds(1_500_000_000.0), 1.5);
        assert_eq!(FormatUtil::span_duration_seconds(250.0), 0.25);
        assert_eq!(FormatUtil::duration_to_ms(2_000_000_000.0), 2000.0);
        assert_eq!(FormatUtil::duration_to_ms(0.5), 500.0);
    }

    #[test]
    fn truncation_counts_characters() {
        let msg = "é".repeat(500);
        assert_eq!(FormatUtil::truncate_chars(&msg, 400).chars().count(), 400);
        assert_eq!(FormatUtil::truncate_chars("short", 400), "short");
    }
}
