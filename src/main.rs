use clap::Parser;
use multilog::init::{init_diagnostics_with_config, DiagnosticsConfig};
use multilog::{fields, Facade, Fields, Level, LogContext, Logger};
use serde_json::Value;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "multilog-demo")]
#[command(about = "Write log lines through the multilog facade", long_about = None)]
struct Cli {
    /// Backend selector. With no selector, one line is written through each backend.
    #[arg(short, long)]
    backend: Option<String>,

    /// Level of the line to write.
    #[arg(short, long, default_value = "info", value_parser = parse_level)]
    level: Level,

    #[arg(short, long, default_value = "This is an info log message.")]
    message: String,

    /// Extra `key=value` field; values that parse as JSON are kept typed.
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// Skip the default common fields in the context.
    #[arg(long)]
    no_common: bool,

    /// Print the library's own diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|e: multilog::LoggerError| e.to_string())
}

fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn emit(log: &dyn Logger, level: Level, msg: &str, fields: Fields) {
    match level {
        Level::Debug => log.debug(msg, fields),
        Level::Info => log.info(msg, fields),
        Level::Warn => log.warn(msg, fields),
        Level::Error => log.error(msg, fields),
        Level::Fatal => log.fatal(msg, fields),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        init_diagnostics_with_config(DiagnosticsConfig {
            max_level: LevelFilter::TRACE,
            ..DiagnosticsConfig::default()
        })?;
    }

    let ctx = if cli.no_common {
        LogContext::background()
    } else {
        LogContext::background().with_common_fields(fields! {
            "userId" => "12345",
            "ipAddress" => "192.168.0.1",
        })
    };
    let fields: Fields = cli.fields.into_iter().collect();

    let selectors = match &cli.backend {
        Some(selector) => vec![selector.as_str()],
        None => vec!["text", "json"],
    };
    for selector in selectors {
        let log = Facade::new(selector, Some(&ctx))?;
        emit(&log, cli.level, &cli.message, fields.clone());
    }

    Ok(())
}
