//! Choosing one sound out of a definition entry

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entry::SoundEntry;

/// How an entry's sounds are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Every sound is equally likely; `weight` is carried but ignored.
    /// This is what the editor has always done.
    #[default]
    Uniform,
    /// Sounds are drawn in proportion to their `weight`
    Weighted,
}

/// Picks sounds according to a [`SelectionPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryPicker {
    policy: SelectionPolicy,
}

impl EntryPicker {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Pick one entry, or `None` when there is nothing to pick from
    pub fn pick<'e, R: Rng + ?Sized>(
        &self,
        entries: &'e [SoundEntry],
        rng: &mut R,
    ) -> Option<&'e SoundEntry> {
        if entries.is_empty() {
            return None;
        }
        let index = match self.policy {
            SelectionPolicy::Uniform => rng.gen_range(0..entries.len()),
            SelectionPolicy::Weighted => weighted_index(entries, rng),
        };
        entries.get(index)
    }
}

/// Cumulative-weight draw: binary search for the first prefix sum above
/// a uniform sample in `[0, total)`
fn weighted_index<R: Rng + ?Sized>(entries: &[SoundEntry], rng: &mut R) -> usize {
    let prefix: Vec<u64> = entries
        .iter()
        .scan(0u64, |sum, entry| {
            *sum += u64::from(entry.weight());
            Some(*sum)
        })
        .collect();
    let total = prefix.last().copied().unwrap_or(0);
    if total == 0 {
        return 0;
    }
    let sample = rng.gen_range(0..total);
    prefix.partition_point(|&bound| bound <= sample)
}
