// # Neighbor Source Trait
//
// Defines the interface for the collaborator that enumerates LAN neighbors.
//
// ## Implementations
//
// - DDNS helper script: `ddns-neighbor-helper` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_neighbor_core::{NeighborSource, Origin};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* NeighborSource implementation */;
//
//     let payload = source.list_neighbors(&Origin::interface("br-lan")).await?;
//     println!("{} neighbor record(s)", payload.devices.len());
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::origin::Origin;
use crate::payload::NeighborPayload;

/// Trait for neighbor-listing collaborators
///
/// The engine calls this only on a cache miss or a forced refresh, always
/// with exactly one of interface or network (see [`Origin`]).
///
/// # Failure
///
/// Any failure (process error, non-zero exit, empty or unparseable output,
/// a JSON `null`) is reported as `Err`. The engine turns it into an error
/// outcome and never caches it.
///
/// # Cancellation and Timeouts
///
/// The caller may drop the returned future at any time. Implementations own
/// whatever they started and must bound their own run time; the engine
/// imposes no timeout.
#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// List the neighbors visible from `origin`
    async fn list_neighbors(&self, origin: &Origin) -> Result<NeighborPayload, crate::Error>;

    /// Short name used in log lines
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing neighbor sources from configuration
pub trait NeighborSourceFactory: Send + Sync {
    /// Create a NeighborSource instance from configuration
    fn create(
        &self,
        config: &crate::config::NeighborSourceConfig,
    ) -> Result<Box<dyn NeighborSource>, crate::Error>;
}
