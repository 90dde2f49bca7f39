//! Remote-group normalization.
//!
//! Converts raw directory entries into a stable, label-sorted listing.
//! The label combines the first organizational-unit component of the
//! distinguished name with the entry's common name when present, and
//! falls back to the common name alone.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::client::RawEntry;

/// First `,OU=<unit>,` component of a distinguished name.
static OU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*?,OU=(.*?),").expect("OU_RE is a valid regex pattern")
});

/// A normalized remote group. Ephemeral: recomputed on every sync and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroup {
    /// Distinguished name, the remote identity of the group.
    pub dn: String,

    /// Display label, `"<unit> / <cn>"` or `<cn>`.
    pub label: String,
}

/// Normalize raw entries into a listing ordered by label ascending.
///
/// Entries without a common name are malformed and skipped. When the
/// same DN appears more than once the last entry wins, then everything
/// is sorted by label (case-sensitive collation).
#[must_use]
pub fn normalize(entries: &[RawEntry]) -> Vec<RemoteGroup> {
    let mut by_dn: Vec<RemoteGroup> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(cn) = entry.cn.iter().find(|v| !v.is_empty()) else {
            continue;
        };

        let label = match OU_RE.captures(&entry.dn).and_then(|c| c.get(1)) {
            Some(unit) if !unit.as_str().is_empty() => {
                format!("{} / {}", unit.as_str(), cn)
            }
            _ => cn.clone(),
        };

        if let Some(existing) = by_dn.iter_mut().find(|g| g.dn == entry.dn) {
            existing.label = label;
        } else {
            by_dn.push(RemoteGroup {
                dn: entry.dn.clone(),
                label,
            });
        }
    }

    by_dn.sort_by(|a, b| a.label.cmp(&b.label));
    by_dn
}
