// # Section Stores
//
// Implementations of the SectionValues trait.

pub mod memory;

pub use memory::MemorySectionStore;
