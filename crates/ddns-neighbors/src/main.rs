// # ddns-neighbors - IPv6 Neighbor Scanner
//
// The ddns-neighbors binary is a THIN integration layer. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering neighbor sources
// 4. Running one scan through the ChoiceProvider and printing the result
//
// All classification, ranking and caching lives in ddns-neighbor-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Section
// - `DDNS_SECTION`: DDNS section being edited (default: `myddns_ipv6`)
// - `DDNS_IP_INTERFACE`: Interface to scan, or `@network`
// - `DDNS_IP_NETWORK`: Logical network to scan when no interface is set
// - `DDNS_IP_SOURCE`: The section's `ip_source`; `device` requires `DDNS_IP_DEVICE`
// - `DDNS_IP_DEVICE`: Device to select from the scan (MAC, hostname, IPv4, DUID)
//
// ### Helper
// - `DDNS_HELPER_PATH`: Helper script (default: `/usr/lib/ddns/dynamic_dns_lucihelper.sh`)
// - `DDNS_HELPER_TIMEOUT_SECS`: Upper bound on one scan (default: 10)
//
// ### Output
// - `DDNS_FORCE`: `1`/`true` to bypass the cache
// - `DDNS_OUTPUT`: `json` (default) or `text`
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: warn); logs go to stderr
//
// ## Example
//
// ```bash
// export DDNS_IP_INTERFACE=br-lan
// export DDNS_OUTPUT=text
//
// ddns-neighbors
// ```

use anyhow::Result;
use ddns_neighbor_core::choices::apply_selection;
use ddns_neighbor_core::identifier::validate_device_option;
use ddns_neighbor_core::origin::{OPTION_IP_INTERFACE, OPTION_IP_NETWORK};
use ddns_neighbor_core::{
    ChoiceOutcome, ChoiceProvider, FetchOptions, MemorySectionStore, NeighborConfig,
    NeighborSourceConfig, SectionValues, SourceRegistry,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Scan completed
/// - 1: Configuration or startup error
/// - 2: Scan failed
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Scan completed (possibly with no devices)
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The collector failed or the scan was interrupted
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

/// Application configuration
struct Config {
    section: String,
    ip_interface: Option<String>,
    ip_network: Option<String>,
    ip_source: Option<String>,
    ip_device: Option<String>,
    helper_path: Option<String>,
    helper_timeout_secs: Option<u64>,
    force: bool,
    output: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let helper_timeout_secs = match env::var("DDNS_HELPER_TIMEOUT_SECS") {
            Ok(s) => Some(s.trim().parse().map_err(|_| {
                anyhow::anyhow!("DDNS_HELPER_TIMEOUT_SECS must be a number of seconds. Got: {}", s)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            section: env::var("DDNS_SECTION").unwrap_or_else(|_| "myddns_ipv6".to_string()),
            ip_interface: env::var("DDNS_IP_INTERFACE").ok(),
            ip_network: env::var("DDNS_IP_NETWORK").ok(),
            ip_source: env::var("DDNS_IP_SOURCE").ok(),
            ip_device: env::var("DDNS_IP_DEVICE").ok(),
            helper_path: env::var("DDNS_HELPER_PATH").ok(),
            helper_timeout_secs,
            force: env::var("DDNS_FORCE")
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            output: env::var("DDNS_OUTPUT").unwrap_or_else(|_| "json".to_string()),
            log_level: env::var("DDNS_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.section.trim().is_empty() {
            anyhow::bail!("DDNS_SECTION cannot be empty");
        }

        if let Some(timeout) = self.helper_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "DDNS_HELPER_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        self.output_format()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        validate_device_option(
            self.ip_source.as_deref(),
            self.ip_device.as_deref().unwrap_or_default(),
        )
        .map_err(|e| anyhow::anyhow!("DDNS_IP_DEVICE: {}", e))?;

        self.neighbor_config().validate()?;

        Ok(())
    }

    fn output_format(&self) -> Result<OutputFormat> {
        match self.output.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => anyhow::bail!(
                "DDNS_OUTPUT '{}' is not valid. Valid formats: json, text",
                self.output
            ),
        }
    }

    /// Engine configuration derived from the environment
    fn neighbor_config(&self) -> NeighborConfig {
        let mut source = match &self.helper_path {
            Some(path) => NeighborSourceConfig::helper(path.trim()),
            None => NeighborSourceConfig::default(),
        };
        if let (NeighborSourceConfig::Helper { timeout_secs, .. }, Some(timeout)) =
            (&mut source, self.helper_timeout_secs)
        {
            *timeout_secs = timeout;
        }

        NeighborConfig {
            source,
            ..NeighborConfig::default()
        }
    }

    /// The section's options as persisted configuration
    fn section_store(&self) -> MemorySectionStore {
        let mut store = MemorySectionStore::new();
        if let Some(interface) = &self.ip_interface {
            store.set(&self.section, OPTION_IP_INTERFACE, interface.as_str());
        }
        if let Some(network) = &self.ip_network {
            store.set(&self.section, OPTION_IP_NETWORK, network.as_str());
        }
        store
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Initialize tracing; stdout carries the result
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// Run one scan and print it
async fn run(config: Config) -> DdnsExitCode {
    let registry = SourceRegistry::new();

    #[cfg(feature = "helper")]
    {
        debug!("Registering helper neighbor source");
        ddns_neighbor_helper::register(&registry);
    }

    let neighbor_config = config.neighbor_config();
    let source = match registry.create_source(&neighbor_config.source) {
        Ok(source) => source,
        Err(e) => {
            error!("Cannot create neighbor source: {}", e);
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let persisted = config.section_store();
    let mut form = persisted.clone();
    let provider = ChoiceProvider::new(source, Box::new(persisted), neighbor_config.messages);

    let options = FetchOptions {
        force: config.force,
    };
    info!("Scanning neighbors for section {}", config.section);

    // Interrupting drops the fetch, which kills the helper
    let outcome = tokio::select! {
        outcome = provider.fetch_choices(&config.section, Some(&form as &dyn SectionValues), options) => outcome,
        _ = tokio::signal::ctrl_c() => {
            error!("Interrupted");
            return DdnsExitCode::RuntimeError;
        }
    };

    let selected = match config.ip_device.as_deref() {
        Some(value) => match apply_selection(&outcome, &mut form, &config.section, value) {
            Ok(device) => device.map(|d| d.mac.clone()),
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return DdnsExitCode::ConfigError;
            }
        },
        None => None,
    };

    let format = config.output_format().unwrap_or(OutputFormat::Json);
    if let Err(e) = print_outcome(&outcome, provider.messages(), selected.as_deref(), format) {
        error!("Failed to print result: {}", e);
        return DdnsExitCode::RuntimeError;
    }

    if outcome.error {
        DdnsExitCode::RuntimeError
    } else {
        DdnsExitCode::Success
    }
}

/// Print the outcome to stdout
///
/// `selected` is the MAC of the device named by `DDNS_IP_DEVICE`, if it was
/// found in the scan.
fn print_outcome(
    outcome: &ChoiceOutcome,
    messages: &ddns_neighbor_core::Messages,
    selected: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(outcome)?;
            if let Some(mac) = selected {
                value["selected"] = serde_json::Value::String(mac.to_string());
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", outcome.status_line(messages));
            for device in &outcome.choices {
                let marker = if selected == Some(device.mac.as_str()) {
                    '*'
                } else {
                    ' '
                };
                match device.pd_hint(messages) {
                    Some(hint) => println!("{} {}  ({})", marker, device.label, hint),
                    None => println!("{} {}", marker, device.label),
                }
            }
        }
    }
    Ok(())
}
