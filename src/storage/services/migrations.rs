//! Versioned schema upgrades.
//!
//! Each version has one explicit step. Steps run inside the transaction that
//! records the new version, so an interrupted upgrade leaves the database at
//! the previous version.

use crate::storage::{
    domain::{Record, SettingKey, StorageError, StorageResult, StoreName},
    ports::StoreTransaction,
};
use crate::entity::Entity;
use crate::workspace::domain::{DEFAULT_WORKSPACE_ICON, DEFAULT_WORKSPACE_NAME, Workspace};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

/// Schema version produced by this build.
pub const SCHEMA_VERSION: u32 = 4;

/// Brings the database up to [`SCHEMA_VERSION`].
///
/// Returns the version found before upgrading.
///
/// # Errors
///
/// Returns [`StorageError::VersionTooNew`] when the database is ahead of this
/// build, or the error of the failing step.
pub(crate) fn upgrade(tx: &mut dyn StoreTransaction, now: DateTime<Utc>) -> StorageResult<u32> {
    let found = tx.schema_version()?;
    if found > SCHEMA_VERSION {
        return Err(StorageError::VersionTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    for version in (found + 1)..=SCHEMA_VERSION {
        apply_step(tx, version, now)?;
        tx.set_schema_version(version)?;
    }
    Ok(found)
}

fn apply_step(
    tx: &mut dyn StoreTransaction,
    version: u32,
    now: DateTime<Utc>,
) -> StorageResult<()> {
    match version {
        1 => create_stores(
            tx,
            &[
                StoreName::Tasks,
                StoreName::Statuses,
                StoreName::Tags,
                StoreName::Priorities,
                StoreName::Settings,
            ],
        ),
        2 => create_stores(tx, &[StoreName::Attachments]),
        3 => create_stores(tx, &[StoreName::Workspaces]),
        4 => backfill_workspace_ids(tx, now),
        _ => Ok(()),
    }
}

fn create_stores(tx: &mut dyn StoreTransaction, stores: &[StoreName]) -> StorageResult<()> {
    for store in stores {
        tx.create_store(*store)?;
    }
    Ok(())
}

/// Assigns rows written before workspaces existed to a workspace and moves
/// the unscoped app name and icon to that workspace's keys.
fn backfill_workspace_ids(tx: &mut dyn StoreTransaction, now: DateTime<Utc>) -> StorageResult<()> {
    let legacy_name = take_legacy_setting(tx, &SettingKey::LegacyAppName)?;
    let legacy_icon = take_legacy_setting(tx, &SettingKey::LegacyAppIcon)?;

    let mut orphans = Vec::new();
    for store in StoreName::WORKSPACE_SCOPED {
        for record in tx.get_all(store)? {
            if record.workspace_id().is_none() {
                orphans.push((store, record));
            }
        }
    }
    if orphans.is_empty() && legacy_name.is_none() && legacy_icon.is_none() {
        return Ok(());
    }

    let target = match tx.get_all(StoreName::Workspaces)?.into_iter().next() {
        Some(existing) => existing.key(StoreName::Workspaces)?.to_owned(),
        None => create_legacy_workspace(tx, legacy_name.as_ref(), legacy_icon.as_ref(), now)?,
    };

    let moved = orphans.len();
    for (store, mut record) in orphans {
        record.set_workspace_id(&target);
        tx.put(store, record)?;
    }
    if let Some(name) = legacy_name {
        tx.put(
            StoreName::Settings,
            Record::setting(SettingKey::app_name(target.as_str()).to_string(), name),
        )?;
    }
    if let Some(icon) = legacy_icon {
        tx.put(
            StoreName::Settings,
            Record::setting(SettingKey::app_icon(target.as_str()).to_string(), icon),
        )?;
    }
    info!(workspace_id = %target, records = moved, "legacy records assigned to workspace");
    Ok(())
}

fn take_legacy_setting(
    tx: &mut dyn StoreTransaction,
    key: &SettingKey,
) -> StorageResult<Option<Value>> {
    let raw_key = key.to_string();
    let value = tx
        .get(StoreName::Settings, &raw_key)?
        .and_then(|record| record.setting_value().cloned());
    if value.is_some() {
        tx.delete(StoreName::Settings, &raw_key)?;
    }
    Ok(value)
}

fn create_legacy_workspace(
    tx: &mut dyn StoreTransaction,
    legacy_name: Option<&Value>,
    legacy_icon: Option<&Value>,
    now: DateTime<Utc>,
) -> StorageResult<String> {
    let name = legacy_name
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_WORKSPACE_NAME);
    let icon = legacy_icon
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_WORKSPACE_ICON);
    let workspace = Workspace::new(name, Some(icon.to_owned()), now);
    let id = workspace.id().to_string();
    tx.add(StoreName::Workspaces, Record::from_entity(&workspace)?)?;
    Ok(id)
}
