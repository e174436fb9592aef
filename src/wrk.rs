use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::{
    parsers::{
        normalize_bytes, normalize_latency, normalize_time, parse_decimal, parse_leading_int,
    },
    prelude::*,
    report::{LatencyStats, ParsedResult, PercentileBreakdown, StatusBreakdown, ThroughputSummary},
};

struct Patterns {
    latency: Regex,
    totals: Regex,
    rps: Regex,
    thread_status: Regex,
    percentile: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        latency: Regex::new(
            r"Latency\s+([\d.]+)([a-zA-Zμ]*)\s+([\d.]+)([a-zA-Zμ]*)\s+([\d.]+)([a-zA-Zμ]*)\s+([\d.]+)%",
        )
        .unwrap(),
        totals: Regex::new(r"(\d+) requests in ([\d.]+)([a-zA-Z]+), ([\d.]+)([a-zA-Z]+) read")
            .unwrap(),
        rps: Regex::new(r"Requests/sec:\s+([\d.]+)").unwrap(),
        thread_status: Regex::new(r"Thread: (\d+), (\d+): (\d+)").unwrap(),
        percentile: Regex::new(r"([\d.]+)%,(\d+)").unwrap(),
    })
}

/// Extracts everything recognisable from the text wrk printed for one run.
///
/// The latency, totals and `Requests/sec` lines are searched for over the
/// whole text; the first latency and totals match with well-formed numbers
/// is used. Thread status lines and percentile lines are matched
/// line by line, with the thread status pattern tried first. Sections
/// that are missing or carry a malformed number are left at their empty
/// defaults; this never fails.
pub fn parse_wrk_output(text: &str) -> ParsedResult {
    let p = patterns();

    let latency = p
        .latency
        .captures_iter(text)
        .find_map(|cap| parse_latency_line(&cap));

    let mut throughput = p
        .totals
        .captures_iter(text)
        .find_map(|cap| parse_totals_line(&cap))
        .unwrap_or_default();
    throughput.rps = p
        .rps
        .captures(text)
        .and_then(|cap| parse_leading_int(&cap[1]))
        .unwrap_or(0);

    let mut status = StatusBreakdown::default();
    let mut percentiles = PercentileBreakdown::default();
    for line in text.lines() {
        if let Some(cap) = p.thread_status.captures(line) {
            match cap[3].parse::<u64>() {
                Ok(count) => status.record(&cap[1], &cap[2], count),
                Err(_) => trace!("Skipping thread status line with bad number: {}", line),
            }
        } else if let Some(cap) = p.percentile.captures(line) {
            match cap[2].parse::<u64>() {
                Ok(value) => percentiles.insert(&cap[1], value),
                Err(_) => trace!("Skipping percentile line with bad number: {}", line),
            }
        }
    }

    debug!(
        "Parsed wrk output: latency={}, totals={}, rps={}, threads={}, percentiles={}",
        latency.is_some(),
        throughput.has_totals(),
        throughput.rps,
        status.threads.len(),
        percentiles.len()
    );

    ParsedResult {
        latency,
        throughput,
        percentiles,
        status,
    }
}

fn parse_latency_line(cap: &Captures<'_>) -> Option<LatencyStats> {
    Some(LatencyStats {
        average: normalize_latency(parse_decimal(&cap[1])?, &cap[2]),
        stdev: normalize_latency(parse_decimal(&cap[3])?, &cap[4]),
        max: normalize_latency(parse_decimal(&cap[5])?, &cap[6]),
        variance: parse_decimal(&cap[7])?,
    })
}

fn parse_totals_line(cap: &Captures<'_>) -> Option<ThroughputSummary> {
    let requests = cap[1].parse::<u64>().ok()?;
    let time = normalize_time(parse_decimal(&cap[2])?, &cap[3]);
    let bytes = normalize_bytes(parse_decimal(&cap[4])?, &cap[5]);
    Some(ThroughputSummary {
        requests: Some(requests),
        time: Some(time),
        bytes: Some(bytes),
        rps: 0,
    })
}
