//! Whole-database export and workspace-targeted import.

use super::StorageEngine;
use crate::storage::{
    domain::{Record, SettingKey, Snapshot, StorageError, StorageResult, StoreName},
    ports::{ObjectStore, StoreTransaction},
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Counts describing a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    removed: usize,
    imported: BTreeMap<StoreName, usize>,
    skipped: usize,
    settings_restored: usize,
}

impl ImportSummary {
    /// Returns how many existing workspace records were replaced.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.removed
    }

    /// Returns how many records were written to `store`.
    #[must_use]
    pub fn imported(&self, store: StoreName) -> usize {
        self.imported.get(&store).copied().unwrap_or_default()
    }

    /// Returns how many records were written across all stores.
    #[must_use]
    pub fn total_imported(&self) -> usize {
        self.imported.values().sum()
    }

    /// Returns how many snapshot records were left out because they belong
    /// to a workspace other than the one the snapshot was taken from.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns how many settings were restored.
    #[must_use]
    pub const fn settings_restored(&self) -> usize {
        self.settings_restored
    }
}

impl<S: ObjectStore> StorageEngine<S> {
    /// Captures every store, unfiltered, in one read transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::storage::domain::StorageError`] when any store
    /// cannot be read.
    pub async fn export_data(&self) -> StorageResult<Snapshot> {
        let snapshot = self
            .read(|tx| {
                let mut snapshot = Snapshot::new();
                for store in tx.store_names()? {
                    snapshot.insert(store, tx.get_all(store)?);
                }
                Ok(snapshot)
            })
            .await?;
        info!(stores = snapshot.store_names().count(), "database exported");
        Ok(snapshot)
    }

    /// Replaces one workspace's data with the contents of a snapshot.
    ///
    /// Only the snapshot's source workspace is imported: the target itself
    /// when the snapshot holds its records, else the snapshot's current
    /// workspace, else the first workspace its records name. Records owned
    /// by other workspaces are skipped; records with no owner are kept.
    ///
    /// Runs as a single transaction: either the whole snapshot is applied or
    /// the database is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TransactionAborted`] wrapping the first
    /// failure: [`StorageError::NotFound`] when the target workspace does not
    /// exist, or [`StorageError::DuplicateKey`] when a record key is already
    /// used by another workspace.
    pub async fn import_data(
        &self,
        snapshot: Snapshot,
        workspace_id: &str,
    ) -> StorageResult<ImportSummary> {
        let target = workspace_id.to_owned();
        let summary = self
            .write(move |tx| import_into(tx, snapshot, &target))
            .await
            .map_err(|err| err.aborted("import"))?;
        info!(
            workspace_id,
            removed = summary.removed(),
            imported = summary.total_imported(),
            skipped = summary.skipped(),
            "snapshot imported"
        );
        Ok(summary)
    }
}

fn import_into(
    tx: &mut dyn StoreTransaction,
    mut snapshot: Snapshot,
    target: &str,
) -> StorageResult<ImportSummary> {
    if tx.get(StoreName::Workspaces, target)?.is_none() {
        return Err(StorageError::NotFound {
            store: StoreName::Workspaces,
            key: target.to_owned(),
        });
    }
    let mut summary = ImportSummary::default();
    let source = source_workspace(&snapshot, target);

    for store in StoreName::WORKSPACE_SCOPED {
        for existing in tx.get_all_by_workspace(store, target)? {
            tx.delete(store, existing.key(store)?)?;
            summary.removed += 1;
        }
    }

    for store in StoreName::WORKSPACE_SCOPED {
        let mut count = 0;
        for mut record in snapshot.take(store) {
            let owned_elsewhere = record
                .workspace_id()
                .is_some_and(|owner| Some(owner) != source.as_deref());
            if owned_elsewhere {
                summary.skipped += 1;
                continue;
            }
            record.set_workspace_id(target);
            tx.add(store, record)?;
            count += 1;
        }
        summary.imported.insert(store, count);
    }

    let tags = snapshot.take(StoreName::Tags);
    summary.imported.insert(StoreName::Tags, tags.len());
    for tag in tags {
        tx.put(StoreName::Tags, tag)?;
    }

    let settings = SettingsLookup::new(snapshot.records(StoreName::Settings));
    let source_id = source.as_deref();
    let app_name = settings.scoped(
        source_id,
        |id| SettingKey::app_name(id),
        &SettingKey::LegacyAppName,
    );
    if let Some(value) = app_name {
        restore_workspace_field(tx, target, "name", value)?;
        tx.put(
            StoreName::Settings,
            Record::setting(SettingKey::app_name(target).to_string(), value.clone()),
        )?;
        summary.settings_restored += 1;
    }
    let app_icon = settings.scoped(
        source_id,
        |id| SettingKey::app_icon(id),
        &SettingKey::LegacyAppIcon,
    );
    if let Some(value) = app_icon {
        restore_workspace_field(tx, target, "icon", value)?;
        tx.put(
            StoreName::Settings,
            Record::setting(SettingKey::app_icon(target).to_string(), value.clone()),
        )?;
        summary.settings_restored += 1;
    }
    if let Some(language) = settings.get(&SettingKey::Language) {
        tx.put(
            StoreName::Settings,
            Record::setting(SettingKey::Language.to_string(), language.clone()),
        )?;
        summary.settings_restored += 1;
    }

    Ok(summary)
}

/// Workspace whose records the snapshot contributes.
///
/// Prefers the target when the snapshot holds its records, then the
/// snapshot's current workspace, then the first owner among its scoped
/// records, then its first workspace.
fn source_workspace(snapshot: &Snapshot, target: &str) -> Option<String> {
    let owners: Vec<&str> = StoreName::WORKSPACE_SCOPED
        .into_iter()
        .flat_map(|store| snapshot.records(store))
        .filter_map(Record::workspace_id)
        .collect();
    if owners.contains(&target) {
        return Some(target.to_owned());
    }
    SettingsLookup::new(snapshot.records(StoreName::Settings))
        .get(&SettingKey::CurrentWorkspace)
        .and_then(Value::as_str)
        .or_else(|| owners.first().copied())
        .or_else(|| {
            snapshot
                .records(StoreName::Workspaces)
                .first()
                .and_then(|workspace| workspace.str_field("id"))
        })
        .map(str::to_owned)
}

fn restore_workspace_field(
    tx: &mut dyn StoreTransaction,
    workspace_id: &str,
    field: &str,
    value: &Value,
) -> StorageResult<()> {
    if let Some(mut workspace) = tx.get(StoreName::Workspaces, workspace_id)? {
        workspace.set(field, value.clone());
        tx.put(StoreName::Workspaces, workspace)?;
    }
    Ok(())
}

/// Settings values of a snapshot, by raw key.
struct SettingsLookup<'a> {
    values: BTreeMap<&'a str, &'a Value>,
}

impl<'a> SettingsLookup<'a> {
    fn new(records: &'a [Record]) -> Self {
        let values = records
            .iter()
            .filter_map(|record| Some((record.str_field("key")?, record.setting_value()?)))
            .collect();
        Self { values }
    }

    fn get(&self, key: &SettingKey) -> Option<&'a Value> {
        self.values.get(key.to_string().as_str()).copied()
    }

    /// Looks up the key scoped to `source`, falling back to the unscoped
    /// legacy key.
    fn scoped(
        &self,
        source: Option<&str>,
        scoped_key: impl Fn(&str) -> SettingKey,
        legacy_key: &SettingKey,
    ) -> Option<&'a Value> {
        source
            .and_then(|id| self.get(&scoped_key(id)))
            .or_else(|| self.get(legacy_key))
    }
}
