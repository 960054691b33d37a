//! Resolution Module
//!
//! Parses sound references and dereferences events down to a file path.

mod reference;
mod resolver;

pub use reference::SoundRef;
pub use resolver::{DefinitionsByNamespace, Resolution, SoundResolver};
