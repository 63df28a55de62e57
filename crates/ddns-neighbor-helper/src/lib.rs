// # Helper Script Neighbor Source
//
// This crate lists LAN neighbors by running the DDNS helper script:
//
// ```text
// dynamic_dns_lucihelper.sh -i br-lan -- list_neighbors
// dynamic_dns_lucihelper.sh -n lan -- list_neighbors
// ```
//
// The script prints one JSON document on stdout:
//
// ```json
// { "devices": [ { "mac": "...", "hostname": "...", "addresses": [...] } ],
//   "prefixes": ["2001:db8:1234::/64"] }
// ```
//
// ## Failure
//
// A spawn error, a non-zero exit, empty stdout, unparseable JSON, or a JSON
// `null` all fail the call. The script's stderr is logged, never parsed.
//
// ## Cancellation
//
// The child is spawned with `kill_on_drop`, so dropping the future (or
// hitting the timeout) kills the script.

use ddns_neighbor_core::config::NeighborSourceConfig;
use ddns_neighbor_core::traits::{NeighborSource, NeighborSourceFactory};
use ddns_neighbor_core::{Error, NeighborPayload, Origin, Result, SourceRegistry};

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Helper command that lists neighbors
const LIST_NEIGHBORS_COMMAND: &str = "list_neighbors";

/// Neighbor source backed by the DDNS helper script
#[derive(Debug, Clone)]
pub struct HelperNeighborSource {
    /// Program to execute
    program: String,
    /// Arguments placed before the origin arguments
    leading_args: Vec<String>,
    /// Upper bound on one invocation
    timeout: Duration,
}

impl HelperNeighborSource {
    /// Create a source running `program` with the given timeout
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout,
        }
    }

    /// Arguments placed before the origin arguments
    ///
    /// Lets a wrapper such as an interpreter run the script.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    /// Full argument list for a scan of `origin`
    pub fn args_for(&self, origin: &Origin) -> Vec<String> {
        let mut args = self.leading_args.clone();
        match origin {
            Origin::Interface(name) => args.extend(["-i".to_string(), name.clone()]),
            Origin::Network(name) => args.extend(["-n".to_string(), name.clone()]),
        }
        args.extend(["--".to_string(), LIST_NEIGHBORS_COMMAND.to_string()]);
        args
    }

    async fn run(&self, origin: &Origin) -> Result<NeighborPayload> {
        let args = self.args_for(origin);
        debug!("Running {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::collector(format!("Failed to run {}: {}", self.program, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "{} did not finish within {}s",
                    self.program,
                    self.timeout.as_secs()
                ))
            })??;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", self.program, stderr.trim());
        }

        if !output.status.success() {
            return Err(Error::collector(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        NeighborPayload::parse_str(&stdout)
    }
}

#[async_trait::async_trait]
impl NeighborSource for HelperNeighborSource {
    async fn list_neighbors(&self, origin: &Origin) -> Result<NeighborPayload> {
        let result = self.run(origin).await;
        match &result {
            Ok(payload) => debug!(
                "Helper reported {} record(s) and {} prefix(es) via {}",
                payload.devices.len(),
                payload.prefixes.len(),
                origin.via()
            ),
            Err(e) => warn!("Helper scan via {} failed: {}", origin.via(), e),
        }
        result
    }

    fn source_name(&self) -> &'static str {
        "helper"
    }
}

/// Factory for creating helper neighbor sources
pub struct HelperFactory;

impl NeighborSourceFactory for HelperFactory {
    fn create(&self, config: &NeighborSourceConfig) -> Result<Box<dyn NeighborSource>> {
        match config {
            NeighborSourceConfig::Helper {
                program,
                leading_args,
                timeout_secs,
            } => {
                config.validate()?;
                Ok(Box::new(
                    HelperNeighborSource::new(program.clone(), Duration::from_secs(*timeout_secs))
                        .with_leading_args(leading_args.clone()),
                ))
            }
            _ => Err(Error::config("Invalid config for helper neighbor source")),
        }
    }
}

/// Register the helper neighbor source with a registry
pub fn register(registry: &SourceRegistry) {
    registry.register_source("helper", Box::new(HelperFactory));
}
