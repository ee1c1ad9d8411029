use clap::Parser;
use sentiment_engine::api::{AlphaVantageClient, SecClient};
use sentiment_engine::sentiment::{FilingAnalysis, LexiconScorer, SentimentEngine, SentimentReport};
use sentiment_engine::{DivergenceSignal, Result, Settings};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Estimate trading sentiment for a stock ticker
#[derive(Debug, Parser)]
#[command(name = "sentiment-engine", version, about)]
struct Cli {
    /// Stock ticker (prompted for when omitted)
    ticker: Option<String>,

    /// Path to a config file (toml, json, yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let ticker = match cli.ticker {
        Some(ticker) => ticker,
        None => prompt_ticker()?,
    };
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err("No ticker given".into());
    }

    tracing::info!(
        "📊 Indicators: MACD({}, {}, {}) on {} bars",
        settings.indicators.fast_period,
        settings.indicators.slow_period,
        settings.indicators.signal_period,
        settings.alpha_vantage.interval
    );

    let engine = SentimentEngine::new(
        Arc::new(AlphaVantageClient::new(settings.alpha_vantage.clone())?),
        Arc::new(SecClient::new(settings.sec.clone())?),
        Arc::new(LexiconScorer::new()),
    )
    .with_macd_config(settings.indicators)
    .with_recent_limit(settings.sec.recent_limit);

    let report = engine.run(&ticker).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentiment_engine=info".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn prompt_ticker() -> Result<String> {
    print!("Enter the stock ticker: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_report(report: &SentimentReport) {
    if report.company_name == report.ticker {
        println!("\nAnalysis Results for {}:", report.ticker);
    } else {
        println!(
            "\nAnalysis Results for {} ({}):",
            report.company_name, report.ticker
        );
    }

    let price = &report.price;
    if price.available {
        println!("\nPrice momentum ({} bars):", price.bars);
        if let (Some(ts), Some(close)) = (price.latest_timestamp, price.latest_close) {
            println!("  Last close: {:.2} at {}", close, ts);
        }
        if let (Some(macd), Some(signal)) = (price.latest_macd, price.latest_signal_line) {
            println!("  MACD: {:.4}  Signal: {:.4}", macd, signal);
        }
        let marker = match price.signal {
            DivergenceSignal::Bullish => "🟢",
            DivergenceSignal::Bearish => "🔴",
            DivergenceSignal::None => "⚪",
        };
        println!("  {} {} ({:+})", marker, price.signal, price.score());
    } else {
        println!("\nNo price data available for {}.", report.ticker);
    }

    match &report.filings {
        FilingAnalysis::Found {
            total_filings,
            recent_filings,
        } => {
            println!("\nTotal filings found: {}", total_filings);
            println!("Most recent filings:");
            for filing in recent_filings {
                println!(
                    "- {}: {} - {}",
                    filing.filing_date, filing.form_type, filing.description
                );
            }
            println!("Filing text polarity: {:+.2}", report.filing_text_polarity);
        }
        FilingAnalysis::NoFilings => {
            println!("\nNo SEC filings data available for {}.", report.ticker);
        }
        FilingAnalysis::Unavailable { reason } => {
            println!("\nSEC filings unavailable: {}", reason);
        }
    }
}
