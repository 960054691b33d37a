//! Sound Definitions Module
//!
//! Sound entries, definition tables, layer merging and entry selection.

mod definition;
mod entry;
mod merge;
mod selection;

pub use definition::{DefinitionLayer, LayerSource, SoundDefinition, SoundDefinitionSet};
pub use entry::{EntryProps, SoundEntry};
pub use merge::{merge, merge_layers};
pub use selection::{EntryPicker, SelectionPolicy};
