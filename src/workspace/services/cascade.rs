//! Removal of a workspace and everything it owns.

use crate::storage::domain::{Record, SettingKey, StorageResult, StoreName};
use crate::storage::ports::StoreTransaction;
use std::collections::BTreeMap;

/// Records removed by a workspace delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    removed: BTreeMap<StoreName, usize>,
    settings: usize,
    workspace: bool,
}

impl CascadeSummary {
    /// Returns how many records of a scoped store were removed.
    #[must_use]
    pub fn removed(&self, store: StoreName) -> usize {
        self.removed.get(&store).copied().unwrap_or_default()
    }

    /// Returns how many settings were removed.
    #[must_use]
    pub const fn settings(&self) -> usize {
        self.settings
    }

    /// Returns `true` when the workspace record itself existed.
    #[must_use]
    pub const fn workspace_removed(&self) -> bool {
        self.workspace
    }

    /// Returns the number of records removed across all stores.
    #[must_use]
    pub fn total(&self) -> usize {
        self.removed.values().sum::<usize>() + self.settings + usize::from(self.workspace)
    }
}

fn delete_if_present(
    tx: &mut dyn StoreTransaction,
    store: StoreName,
    key: &str,
) -> StorageResult<bool> {
    if tx.get(store, key)?.is_none() {
        return Ok(false);
    }
    tx.delete(store, key)?;
    Ok(true)
}

/// Deletes the workspace's scoped records, its scoped settings, the
/// current-workspace pointer when it names this workspace, and the
/// workspace record.
pub(crate) fn cascade_delete(
    tx: &mut dyn StoreTransaction,
    workspace_id: &str,
) -> StorageResult<CascadeSummary> {
    let mut summary = CascadeSummary::default();
    for store in StoreName::WORKSPACE_SCOPED {
        let records = tx.get_all_by_workspace(store, workspace_id)?;
        let keys = records
            .iter()
            .map(|record| record.key(store).map(str::to_owned))
            .collect::<StorageResult<Vec<_>>>()?;
        for key in &keys {
            tx.delete(store, key)?;
        }
        summary.removed.insert(store, keys.len());
    }

    for key in [
        SettingKey::app_name(workspace_id),
        SettingKey::app_icon(workspace_id),
    ] {
        if delete_if_present(tx, StoreName::Settings, &key.to_string())? {
            summary.settings += 1;
        }
    }

    let current_key = SettingKey::CurrentWorkspace.to_string();
    let points_here = tx
        .get(StoreName::Settings, &current_key)?
        .as_ref()
        .and_then(Record::setting_value)
        .and_then(serde_json::Value::as_str)
        .is_some_and(|current| current == workspace_id);
    if points_here {
        tx.delete(StoreName::Settings, &current_key)?;
        summary.settings += 1;
    }

    summary.workspace = delete_if_present(tx, StoreName::Workspaces, workspace_id)?;
    Ok(summary)
}
