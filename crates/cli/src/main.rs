#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use lingvatrans_core::config::{
    ApiToken, Env, ProxyConfig, StdEnv, TranslatorConfig, DEFAULT_TIMEOUT_SECS,
};
use lingvatrans_core::translate::{
    Detected, LingvanexTranslator, Translated, TranslateError, Translator, AUTO,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "translate")]
#[command(about = "Lingvanex Translator as a command-line tool")]
struct Args {
    /// The text you want to translate.
    text: String,

    /// The destination language you want to translate.
    #[arg(short, long, default_value = "en")]
    dest: String,

    /// The source language you want to translate.
    #[arg(short, long, default_value = AUTO)]
    src: String,

    /// Detect the language of the text.
    #[arg(short = 'c', long)]
    detect: bool,

    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    base_url: Option<String>,

    /// http(s):// or socks4/5:// proxy.
    #[arg(long)]
    proxy: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Translate { dest: String, src: String },
    Detect,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let text = args.text.clone();
    let mode = if args.detect {
        Mode::Detect
    } else {
        Mode::Translate {
            dest: args.dest.clone(),
            src: args.src.clone(),
        }
    };
    let cfg = build_config(args, &env)?;

    tracing::debug!(
        base_url = %cfg.base_url,
        timeout_secs = cfg.timeout.as_secs(),
        proxied = cfg.proxy.is_some(),
        "config loaded"
    );

    let translator = LingvanexTranslator::new(cfg).context("failed to create translator")?;
    let output = run(&translator, &text, &mode).await;
    translator.close().await;

    println!("{}", output.context("request failed")?);
    Ok(())
}

/// Runs one request and renders its output. Closing is left to the caller.
async fn run(
    translator: &impl Translator,
    text: &str,
    mode: &Mode,
) -> Result<String, TranslateError> {
    match mode {
        Mode::Detect => {
            let detected = translator.detect(text).await?;
            Ok(render_detected(text, &detected))
        }
        Mode::Translate { dest, src } => {
            let translated = translator.translate(text, dest, src).await?;
            Ok(render_translated(&translated))
        }
    }
}

fn render_translated(t: &Translated) -> String {
    format!("[{}] {}\n    ->\n[{}] {}", t.src, t.origin, t.dest, t.text)
}

fn render_detected(text: &str, d: &Detected) -> String {
    match d.confidence {
        Some(c) => format!("[{}, {}] {}", d.lang, c, text),
        None => format!("[{}, None] {}", d.lang, text),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Environment first, then command-line flags on top.
fn build_config(args: Args, env: &impl Env) -> anyhow::Result<TranslatorConfig> {
    let mut cfg = TranslatorConfig::from_env(env)
        .context("invalid environment configuration")?
        .with_timeout(Duration::from_secs(args.timeout_secs))?;

    if let Some(base_url) = args.base_url {
        cfg = cfg
            .with_base_url(&base_url)
            .with_context(|| format!("invalid --base-url: {base_url}"))?;
    }
    if let Some(token) = args.token {
        cfg = cfg.with_token(ApiToken::new(token).context("invalid --token")?);
    }
    if let Some(proxy) = args.proxy {
        cfg = cfg.with_proxy(Some(
            ProxyConfig::new(&proxy).with_context(|| format!("invalid --proxy: {proxy}"))?,
        ));
    }

    Ok(cfg)
}
