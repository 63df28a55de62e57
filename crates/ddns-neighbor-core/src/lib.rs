// # ddns-neighbor-core
//
// Core library for IPv6 neighbor discovery in a DDNS front-end.
//
// ## Architecture Overview
//
// The operator picks a downstream device whose IPv6 address gets published.
// This library turns raw neighbor listings into that device menu:
// - **NeighborSource**: Trait for the collaborator that lists LAN neighbors
// - **classify**: Address scope and priority, delegated-prefix matching
// - **NeighborNormalizer**: One labeled device per MAC, best address first
// - **NeighborCache**: Per-origin memoization of normalized results
// - **ChoiceProvider**: Origin resolution, caching and failure handling
// - **SourceRegistry**: Plugin-based registry for neighbor sources
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from collaborators
// 2. **Plugin-Based**: Sources are registered dynamically by name
// 3. **Library-First**: Everything the binary does is available as a library
// 4. **Fail Soft**: Collaborator failures become outcomes, never panics

pub mod cache;
pub mod choices;
pub mod classify;
pub mod config;
pub mod error;
pub mod identifier;
pub mod normalize;
pub mod origin;
pub mod payload;
pub mod registry;
pub mod sections;
pub mod traits;

// Re-export core types for convenience
pub use cache::{CacheEntry, NeighborCache};
pub use choices::{ChoiceOutcome, ChoiceProvider, FetchOptions};
pub use classify::{AddressPriority, AddressScope, Classification, Prefix};
pub use config::{Messages, NeighborConfig, NeighborSourceConfig};
pub use error::{Error, Result};
pub use identifier::{DeviceIdentifier, IdentifierKind, IdentifierType};
pub use normalize::{AddressInfo, NeighborNormalizer, NormalizedDevice};
pub use origin::Origin;
pub use payload::{NeighborPayload, RawNeighbor};
pub use registry::SourceRegistry;
pub use sections::MemorySectionStore;
pub use traits::{NeighborSource, NeighborSourceFactory, SectionValues};
