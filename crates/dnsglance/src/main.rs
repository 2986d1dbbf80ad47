// # dnsglance - DNS/provider glance
//
// This binary is a THIN integration layer over dnsglance-core:
// - All resolution logic lives in dnsglance-core
// - All HTTP logic lives in the backend crates
// - Configuration is via environment variables ONLY
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering backends
// 4. Running one activation of the resolution workflow and printing it
// 5. Optionally playing the typewriter sequence
//
// ## Configuration
//
// - `DNSGLANCE_HOSTNAME`: Hostname to resolve (default: tony-liu.com)
// - `DNSGLANCE_NAMESERVERS`: Comma-separated nameserver labels to display
// - `DNSGLANCE_DOH_URL`: DNS-over-HTTPS JSON endpoint
// - `DNSGLANCE_IPINFO_URL`: IP metadata endpoint
// - `DNSGLANCE_HTTP_TIMEOUT_SECS`: HTTP timeout for both backends (1-120)
// - `DNSGLANCE_MIN_DELAY_MS`: Minimum loading time (0-60000)
// - `DNSGLANCE_TYPEWRITER_FRAMES`: Typewriter frames to play (0 disables)
// - `DNSGLANCE_TYPEWRITER_WORDS`: Comma-separated typewriter words
// - `DNSGLANCE_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DNSGLANCE_HOSTNAME=example.com
// export DNSGLANCE_NAMESERVERS=ns1.example.net,ns2.example.net
// export DNSGLANCE_LOG_LEVEL=debug
//
// dnsglance
// ```

use anyhow::{Context, Result};
use dnsglance_core::config::{
    DEFAULT_DOH_URL, DEFAULT_HOSTNAME, DEFAULT_IPINFO_URL, GlanceConfig, ProviderLookupConfig,
    ResolverConfig, TypewriterConfig,
};
use dnsglance_core::{AddressSet, BackendRegistry, RecordType, ResolutionWorkflow, Typewriter};
use std::env;
use std::fmt::Write as _;
use std::io::Write as _;
use std::process::ExitCode;
use tokio::sync::{oneshot, watch};
use tokio_stream::{Stream, StreamExt};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum GlanceExitCode {
    /// Lookup completed (even if it degraded to empty lists)
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error or interrupted lookup
    RuntimeError = 2,
}

impl From<GlanceExitCode> for ExitCode {
    fn from(code: GlanceExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    hostname: String,
    nameservers: Vec<String>,
    doh_url: String,
    ipinfo_url: String,
    http_timeout_secs: u64,
    min_delay_ms: u64,
    typewriter_frames: usize,
    typewriter_words: Option<Vec<String>>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            hostname: env::var("DNSGLANCE_HOSTNAME")
                .unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string()),
            nameservers: env::var("DNSGLANCE_NAMESERVERS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
            doh_url: env::var("DNSGLANCE_DOH_URL")
                .unwrap_or_else(|_| DEFAULT_DOH_URL.to_string()),
            ipinfo_url: env::var("DNSGLANCE_IPINFO_URL")
                .unwrap_or_else(|_| DEFAULT_IPINFO_URL.to_string()),
            http_timeout_secs: env_number("DNSGLANCE_HTTP_TIMEOUT_SECS", 10)?,
            min_delay_ms: env_number("DNSGLANCE_MIN_DELAY_MS", 1000)?,
            typewriter_frames: env_number("DNSGLANCE_TYPEWRITER_FRAMES", 0)?,
            typewriter_words: env::var("DNSGLANCE_TYPEWRITER_WORDS")
                .ok()
                .map(|s| split_list(&s)),
            log_level: env::var("DNSGLANCE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Build the library configuration
    fn glance_config(&self) -> GlanceConfig {
        let mut config = GlanceConfig::new().with_hostname(self.hostname.clone());

        config.nameservers = self.nameservers.clone();
        config.resolver = ResolverConfig::Doh {
            url: self.doh_url.clone(),
            timeout_secs: self.http_timeout_secs,
        };
        config.provider_lookup = ProviderLookupConfig::IpWhois {
            url: self.ipinfo_url.clone(),
            timeout_secs: self.http_timeout_secs,
        };
        config.workflow.min_display_delay_ms = self.min_delay_ms;
        if let Some(words) = &self.typewriter_words {
            config.typewriter = TypewriterConfig {
                words: words.clone(),
                ..TypewriterConfig::default()
            };
        }

        config
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNSGLANCE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        if self.typewriter_frames > 10_000 {
            anyhow::bail!(
                "DNSGLANCE_TYPEWRITER_FRAMES must be at most 10000. Got: {}",
                self.typewriter_frames
            );
        }

        if self.doh_url.starts_with("http://") || self.ipinfo_url.starts_with("http://") {
            eprintln!(
                "WARNING: a backend URL uses HTTP (not HTTPS). \
                Lookups can be observed and altered in transit."
            );
        }

        self.glance_config()
            .validate()
            .context("Invalid configuration")?;

        Ok(())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Split a comma-separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read a numeric environment variable, falling back to `default` when unset
fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a number. Got '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

/// Render the resolution result the way the page lists it
fn render(hostname: &str, nameservers: &[String], addresses: &AddressSet) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Hostname: {}", hostname);
    if !nameservers.is_empty() {
        let _ = writeln!(out, "Nameservers: {}", nameservers.join(", "));
    }

    for record_type in RecordType::ALL {
        let _ = writeln!(out, "\n{} records:", record_type);

        let records = addresses.records(record_type);
        if records.is_empty() {
            let _ = writeln!(out, "  (none)");
            continue;
        }

        let width = records
            .iter()
            .map(|r| r.ip.to_string().len())
            .max()
            .unwrap_or(0);
        for record in records {
            let _ = writeln!(
                out,
                "  {:<width$}  {}",
                record.ip.to_string(),
                record.provider.as_deref().unwrap_or("unknown"),
                width = width
            );
        }
    }

    out
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return GlanceExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return GlanceExitCode::ConfigError.into();
    }

    // Initialize tracing (stderr, so stdout carries only the result)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return GlanceExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return GlanceExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("{:#}", e);
            GlanceExitCode::RuntimeError
        } else {
            GlanceExitCode::Success
        }
    });

    result.into()
}

/// Run one activation and optionally the typewriter
async fn run(config: Config) -> Result<()> {
    let glance = config.glance_config();

    let registry = BackendRegistry::new();

    #[cfg(feature = "doh")]
    {
        debug!("Registering DoH resolver");
        dnsglance_doh::register(&registry);
    }

    #[cfg(feature = "ipwhois")]
    {
        debug!("Registering ipwhois provider lookup");
        dnsglance_ipwhois::register(&registry);
    }

    let resolver = registry.create_resolver(&glance.resolver)?;
    let lookup = registry.create_provider_lookup(&glance.provider_lookup)?;

    let (workflow, mut event_rx) = ResolutionWorkflow::new(resolver, lookup, &glance)?;

    let events = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("Workflow event: {:?}", event);
        }
    });

    // SIGINT/SIGTERM tear down the lookup and stop the typewriter
    let (teardown_tx, teardown_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signals = tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                let _ = teardown_tx.send(());
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Running without shutdown signal handling: {}", e);
                let _keep_open = (teardown_tx, shutdown_tx);
                std::future::pending::<()>().await;
            }
        }
    });

    let result = run_until_shutdown(
        &config,
        &glance,
        workflow,
        events,
        teardown_rx,
        shutdown_rx,
    )
    .await;
    signals.abort();
    result
}

/// Activate, print, then play the typewriter, giving up on shutdown
async fn run_until_shutdown(
    config: &Config,
    glance: &GlanceConfig,
    workflow: ResolutionWorkflow,
    events: tokio::task::JoinHandle<()>,
    teardown_rx: oneshot::Receiver<()>,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let addresses = match workflow.activate_with_shutdown(Some(teardown_rx)).await {
        Ok(addresses) => addresses,
        Err(e) if e.is_cancelled() => anyhow::bail!("Interrupted before the lookup settled"),
        Err(e) => return Err(e.into()),
    };

    print!("{}", render(workflow.hostname(), &glance.nameservers, &addresses));

    drop(workflow);
    join_logged("Event logging", events).await;

    if config.typewriter_frames > 0 {
        let typewriter = Typewriter::from_config(&glance.typewriter)?;
        let frames = typewriter.into_stream().take(config.typewriter_frames);

        let mut stdout = std::io::stdout();
        if play_typewriter(frames, &mut stdout, shutdown_rx).await? == Playback::Interrupted {
            anyhow::bail!("Interrupted during typewriter playback");
        }
    }

    Ok(())
}

/// Wait for a background task, logging its failure instead of returning it
async fn join_logged(name: &str, task: tokio::task::JoinHandle<()>) -> bool {
    match task.await {
        Ok(()) => true,
        Err(e) => {
            warn!("{} task failed: {}", name, e);
            false
        }
    }
}

/// How typewriter playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Finished,
    Interrupted,
}

/// Write typewriter frames on one terminal line until the frames run out
/// or `shutdown` turns true
async fn play_typewriter<S, W>(
    frames: S,
    out: &mut W,
    mut shutdown: watch::Receiver<bool>,
) -> Result<Playback>
where
    S: Stream<Item = String>,
    W: std::io::Write,
{
    tokio::pin!(frames);

    // A closed channel can no longer signal, so it never interrupts
    let stopped = async move {
        if shutdown.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(stopped);

    writeln!(out)?;
    let playback = loop {
        tokio::select! {
            _ = &mut stopped => break Playback::Interrupted,
            frame = frames.next() => match frame {
                Some(text) => {
                    write!(out, "\r\x1b[2K{}|", text)?;
                    out.flush()?;
                }
                None => break Playback::Finished,
            },
        }
    };
    writeln!(out)?;

    Ok(playback)
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
