//! Markdown rendering of parsed wrk results for a pull request comment.

use std::collections::BTreeSet;

use humanize_bytes::humanize_bytes_decimal;

use crate::{config::CommentConfig, report::ParsedResult};

#[derive(Debug, Clone, Copy)]
enum MetricKind {
    Count,
    Latency,
    Seconds,
    Bytes,
}

struct Metric {
    label: &'static str,
    kind: MetricKind,
    value: fn(&ParsedResult) -> Option<f64>,
}

const METRICS: [Metric; 7] = [
    Metric {
        label: "Requests/sec",
        kind: MetricKind::Count,
        value: |r: &ParsedResult| Some(r.throughput.rps as f64),
    },
    Metric {
        label: "Latency avg",
        kind: MetricKind::Latency,
        value: |r: &ParsedResult| r.latency.map(|l| l.average),
    },
    Metric {
        label: "Latency stdev",
        kind: MetricKind::Latency,
        value: |r: &ParsedResult| r.latency.map(|l| l.stdev),
    },
    Metric {
        label: "Latency max",
        kind: MetricKind::Latency,
        value: |r: &ParsedResult| r.latency.map(|l| l.max),
    },
    Metric {
        label: "Requests",
        kind: MetricKind::Count,
        value: |r: &ParsedResult| r.throughput.requests.map(|v| v as f64),
    },
    Metric {
        label: "Duration",
        kind: MetricKind::Seconds,
        value: |r: &ParsedResult| r.throughput.time,
    },
    Metric {
        label: "Read",
        kind: MetricKind::Bytes,
        value: |r: &ParsedResult| r.throughput.bytes,
    },
];

/// Renders the comment body for `head`, compared against `base` when one
/// is given.
pub fn render_comment(
    head: &ParsedResult,
    base: Option<&ParsedResult>,
    config: &CommentConfig,
) -> String {
    let mut out = format!("## {}\n\n", config.title);

    if head.is_empty() {
        out.push_str("No wrk output could be parsed from this run.\n");
        return out;
    }

    out.push_str(&summary_table(head, base));

    if config.show_statuses && !head.status.statuses.is_empty() {
        out.push('\n');
        out.push_str(&status_table(head, base));
    }

    if config.show_percentiles && !head.percentiles.is_empty() {
        out.push('\n');
        out.push_str("| Percentile | Value |\n|---|---:|\n");
        for (label, value) in head.percentiles.iter() {
            out.push_str(&format!(
                "| {}% | {} |\n",
                label,
                format_integer_string(&value.to_string())
            ));
        }
    }

    out
}

fn summary_table(head: &ParsedResult, base: Option<&ParsedResult>) -> String {
    let mut out = match base {
        Some(_) => String::from("| Metric | base | head | change |\n|---|---:|---:|---:|\n"),
        None => String::from("| Metric | Value |\n|---|---:|\n"),
    };
    for metric in &METRICS {
        let head_value = (metric.value)(head);
        match base {
            Some(base) => {
                let base_value = (metric.value)(base);
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    metric.label,
                    format_metric(metric.kind, base_value),
                    format_metric(metric.kind, head_value),
                    percent_change(base_value, head_value)
                ));
            }
            None => {
                out.push_str(&format!(
                    "| {} | {} |\n",
                    metric.label,
                    format_metric(metric.kind, head_value)
                ));
            }
        }
    }
    out
}

fn status_table(head: &ParsedResult, base: Option<&ParsedResult>) -> String {
    let count = |r: &ParsedResult, label: &str| {
        r.status
            .statuses
            .get(label)
            .map(|c| format_integer_string(&c.to_string()))
            .unwrap_or_else(|| "-".to_string())
    };
    match base {
        Some(base) => {
            let labels: BTreeSet<&String> = head
                .status
                .statuses
                .keys()
                .chain(base.status.statuses.keys())
                .collect();
            let mut out = String::from("| Status | base | head |\n|---|---:|---:|\n");
            for label in labels {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    label,
                    count(base, label.as_str()),
                    count(head, label.as_str())
                ));
            }
            out
        }
        None => {
            let mut out = String::from("| Status | Count |\n|---|---:|\n");
            for label in head.status.statuses.keys() {
                out.push_str(&format!("| {} | {} |\n", label, count(head, label.as_str())));
            }
            out
        }
    }
}

fn format_metric(kind: MetricKind, value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    match kind {
        MetricKind::Count => format_integer_string(&(value as u64).to_string()),
        MetricKind::Latency => format_latency(value),
        MetricKind::Seconds => format!("{:.2}s", value),
        MetricKind::Bytes => humanize_bytes_decimal!(value as u64).to_string(),
    }
}

fn format_latency(micros: f64) -> String {
    if micros >= 1_000_000.0 {
        format!("{:.2}s", micros / 1_000_000.0)
    } else if micros >= 1_000.0 {
        format!("{:.2}ms", micros / 1_000.0)
    } else {
        format!("{:.2}us", micros)
    }
}

/// Signed relative change from `base` to `head`, or `n/a` when there is
/// nothing to compare against.
fn percent_change(base: Option<f64>, head: Option<f64>) -> String {
    match (base, head) {
        (Some(base), Some(head)) if base != 0.0 => {
            format!("{:+.1}%", (head - base) / base * 100.0)
        }
        _ => "n/a".to_string(),
    }
}

fn format_integer_string(digits: &str) -> String {
    let len = digits.len();
    let mut formatted = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}
