//! Core traits for the neighbor engine
//!
//! This module defines the interfaces the engine talks to.
//!
//! - [`NeighborSource`]: List raw neighbors for an interface or network
//! - [`SectionValues`]: Read option values of a configuration section

pub mod neighbor_source;
pub mod section_values;

pub use neighbor_source::{NeighborSource, NeighborSourceFactory};
pub use section_values::SectionValues;
