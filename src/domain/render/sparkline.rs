/// Eight block glyphs, lowest to highest.
const SPARK_CHARS: &[char] = &[
    '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}',
];

pub const DEFAULT_SPARK_POINTS: usize = 30;

/// Keeps at most `points` samples, stepping evenly over the tail.
fn downsample(values: &[f64], points: usize) -> Vec<f64> {
    if points == 0 || values.len() <= points {
        return values.to_vec();
    }
    let step = (values.len() / points).max(1);
    let start = values.len().saturating_sub(points * step);
    values[start..].iter().step_by(step).take(points).copied().collect()
}

/// One glyph per sample, scaled between the series min and max.
/// A constant series renders as the lowest glyph throughout.
pub fn sparkline(values: &[f64], points: usize) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let samples = downsample(&finite, points);
    if samples.is_empty() {
        return String::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = SPARK_CHARS.len() - 1;

    samples
        .iter()
        .map(|&v| {
            if max == min {
                return SPARK_CHARS[0];
            }
            let idx = ((v - min) / (max - min) * top as f64) as usize;
            SPARK_CHARS[idx.min(top)]
        })
        .collect()
}
