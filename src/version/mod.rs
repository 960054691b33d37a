//! Version Module
//!
//! Version ordering, the pack format compatibility table and the
//! catalog of mod revisions.

mod compare;
mod pack_format;
mod revision;

pub use compare::{compare_versions, sort_versions};
pub use pack_format::{PackFormatTable, VersionRequest, LATEST};
pub use revision::{platform_version_in_tag, ModRevision, RevisionCatalog, DEFAULT_REVISION};
