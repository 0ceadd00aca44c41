//! Minijinja rendering of comparison results.
//!
//! Renders one digest section per comparison, with access to the account
//! label, the per-metric changes, and the overall trend verdict. The
//! template is a fixed string, so a fresh [`minijinja::Environment`] is
//! created per render call.

use serde::Serialize;

use adpulse_analytics::{AggregateBundle, ComparisonKind, ComparisonResult, Direction, Metric};

/// Errors from rendering or chunking digest text.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("malformed markup: {0}")]
    Markup(String),

    #[error("chunk size {max} cannot fit tag overhead of {needed}")]
    ChunkTooSmall { max: usize, needed: usize },
}

/// Built-in digest section template. HTML tags only; the chunker and the
/// Telegram transport both expect HTML markup.
const SECTION_TEMPLATE: &str = "\
<b>{{ account }}</b> — {{ title }}
{%- for m in metrics %}
{{ m.arrow }} {{ m.label }}: {{ m.previous }} → {{ m.current }} ({{ m.percent | round(1) }}%)
{%- endfor %}
<i>Trend: {{ trend }}</i>";

/// Context data available to the section template.
#[derive(Debug, Serialize)]
struct SectionContext {
    account: String,
    title: &'static str,
    metrics: Vec<MetricLine>,
    trend: &'static str,
}

#[derive(Debug, Serialize)]
struct MetricLine {
    arrow: &'static str,
    label: &'static str,
    previous: String,
    current: String,
    percent: f64,
}

/// Renders comparison results into chat-ready digest sections.
#[derive(Debug)]
pub struct DigestRenderer {
    _private: (),
}

impl DigestRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with custom filters.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.add_filter("round", round_filter);
        env
    }

    /// Render one digest section for `result`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if rendering fails.
    pub fn render(
        &self,
        result: &ComparisonResult,
        account_label: &str,
        kind: ComparisonKind,
    ) -> Result<String, RenderError> {
        let metrics = result
            .changes
            .iter()
            .map(|change| MetricLine {
                arrow: arrow(change.direction),
                label: change.metric.label(),
                previous: format_metric(&result.previous, change.metric),
                current: format_metric(&result.current, change.metric),
                percent: change.percent_change,
            })
            .collect();

        let ctx = SectionContext {
            account: escape_html(account_label),
            title: kind.title(),
            metrics,
            trend: result.overall_trend.label(),
        };

        let env = Self::build_env();
        env.render_str(SECTION_TEMPLATE, ctx)
            .map_err(|e| RenderError::Template(e.to_string()))
    }
}

impl Default for DigestRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Flat => "•",
    }
}

/// Format one metric value for display.
///
/// Monetary and ratio metrics get two decimals, counts drop the fraction
/// when whole, and an absent conversion cost renders as a dash.
fn format_metric(bundle: &AggregateBundle, metric: Metric) -> String {
    match metric {
        Metric::ConversionCost => bundle
            .conversion_cost
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "—".to_string()),
        Metric::Spend | Metric::Cpc => format!("{:.2}", bundle.metric_value(metric)),
        Metric::Ctr => format!("{:.2}%", bundle.ctr),
        _ => format_count(bundle.metric_value(metric)),
    }
}

fn format_count(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Escapes the characters HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Custom filter: round a float to N decimal places.
fn round_filter(value: f64, decimals: Option<u32>) -> String {
    let n = decimals.unwrap_or(0);
    format!("{:.prec$}", value, prec = n as usize)
}
