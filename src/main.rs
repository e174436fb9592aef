mod cli;

use std::path::Path;

use benchbot::{
    ParsedResult, comment::render_comment, config::BotConfig, prelude::*, trigger,
    wrk::parse_wrk_output,
};
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            match tracing_subscriber::EnvFilter::try_from_default_env() {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("info"),
            },
        )
        .init();
    debug!(
        "{} v{}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION")
    );

    let args = cli::Args::parse();
    let config = BotConfig::load(args.config.as_deref())?;

    match args.command {
        cli::Commands::Parse {
            report,
            format,
            strict,
        } => {
            let result = parse_wrk_output(&read_input(&report).await?);
            if result.is_empty() {
                if strict {
                    return Err(Error::EmptyReport(report.display().to_string()));
                }
                warn!("No wrk output recognised in {}", report.display());
            }
            match format {
                cli::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                cli::OutputFormat::Text => print_summary(&result),
            }
        }
        cli::Commands::Compare { head, base } => {
            let head_result = parse_wrk_output(&read_input(&head).await?);
            let base_result = match &base {
                Some(path) => Some(parse_wrk_output(&read_input(path).await?)),
                None => None,
            };
            if base_result.as_ref().is_some_and(|r| r.is_empty()) {
                warn!("Base report contains no wrk output; comparing against nothing");
            }
            let body = render_comment(&head_result, base_result.as_ref(), &config.comment);
            print!("{}", body);
        }
        cli::Commands::Trigger { payload, event } => {
            let body = read_input(&payload).await?;
            let decision = trigger::evaluate(&event, &body, &config.trigger)?;
            println!("{}", decision);
        }
    }

    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        Ok(content)
    } else {
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

fn print_summary(result: &ParsedResult) {
    if let Some(latency) = &result.latency {
        println!(
            "Latency (us): avg {:.2}, stdev {:.2}, max {:.2}, +/- stdev {:.2}%",
            latency.average, latency.stdev, latency.max, latency.variance
        );
    }
    if let (Some(requests), Some(time), Some(bytes)) = (
        result.throughput.requests,
        result.throughput.time,
        result.throughput.bytes,
    ) {
        println!("{} requests in {:.2}s, {:.0} bytes read", requests, time, bytes);
    }
    println!("Requests/sec: {}", result.throughput.rps);
    for (status, count) in &result.status.statuses {
        println!("Status {}: {}", status, count);
    }
    for (label, value) in result.percentiles.iter() {
        println!("{}%: {}", label, value);
    }
}
