//! fOS Inspect - serve the inspector protocol over stdio
//!
//! Loads an HTML page, then answers one JSON request per stdin line with
//! one JSON response per stdout line. Logs go to stderr.
//!
//! ```text
//! fos-inspect [--debounce-ms N] [--url URL] [--session TOKEN] <page.html>
//! ```

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use fos_html::HtmlParser;
use fos_inspector::{InspectorConfig, InspectorError, InspectorSession, NullOverlay};
use tracing_subscriber::EnvFilter;

struct Args {
    config: InspectorConfig,
    url: Option<String>,
    page: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = InspectorConfig::default();
    let mut url = None;
    let mut page = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debounce-ms" => {
                let ms: u64 = args
                    .next()
                    .context("--debounce-ms needs a value")?
                    .parse()
                    .context("--debounce-ms expects milliseconds")?;
                config.debounce = Duration::from_millis(ms);
            }
            "--url" => url = Some(args.next().context("--url needs a value")?),
            "--session" => {
                config.session_token = args.next().context("--session needs a value")?;
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => page = Some(path.to_string()),
        }
    }

    let Some(page) = page else {
        bail!("usage: fos-inspect [--debounce-ms N] [--url URL] [--session TOKEN] <page.html>");
    };
    Ok(Args { config, url, page })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let Args { config, url, page } = parse_args()?;
    let url = url.unwrap_or_else(|| format!("file://{page}"));

    let file = File::open(&page).with_context(|| format!("cannot open {page}"))?;
    let mut doc = HtmlParser::new()
        .parse_reader(file, &url)
        .with_context(|| format!("cannot read {page}"))?;
    tracing::info!(%url, nodes = doc.tree().len(), "page loaded");

    let mut session = InspectorSession::new(config, Box::new(NullOverlay));
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }
        match session.handle_json(&mut doc, &line, Instant::now()) {
            Ok(Some(response)) => {
                writeln!(stdout, "{response}")?;
                stdout.flush()?;
            }
            Ok(None) => {}
            Err(InspectorError::ShutDown) => break,
            Err(err) => tracing::warn!(%err, "no reply"),
        }
        if session.is_shut_down() {
            break;
        }
    }

    tracing::info!("inspector stopped");
    Ok(())
}
