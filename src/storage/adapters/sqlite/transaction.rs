//! [`StoreTransaction`] implementation over a Diesel SQLite connection.

use super::{
    models::{NewObjectStoreRow, NewRecordRow},
    schema::{object_stores, records, schema_meta},
};
use crate::storage::{
    domain::{Record, StorageError, StorageResult, StoreName},
    ports::{StoreTransaction, TransactionMode},
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

/// Store operations bound to a connection that is inside a transaction.
pub(super) struct SqliteTransaction<'a> {
    conn: &'a mut SqliteConnection,
    mode: TransactionMode,
}

impl<'a> SqliteTransaction<'a> {
    pub(super) const fn new(conn: &'a mut SqliteConnection, mode: TransactionMode) -> Self {
        Self { conn, mode }
    }

    fn ensure_store(&mut self, store: StoreName) -> StorageResult<()> {
        let exists = diesel::select(diesel::dsl::exists(
            object_stores::table.filter(object_stores::name.eq(store.as_str())),
        ))
        .get_result::<bool>(self.conn)
        .map_err(StorageError::backend)?;
        if exists {
            Ok(())
        } else {
            Err(StorageError::StoreMissing(store))
        }
    }

    fn ensure_writable_store(&mut self, store: StoreName) -> StorageResult<()> {
        self.mode.ensure_writable(store)?;
        self.ensure_store(store)
    }
}

fn decode_bodies(bodies: &[String]) -> StorageResult<Vec<Record>> {
    bodies.iter().map(String::as_str).map(decode_body).collect()
}

fn decode_body(body: &str) -> StorageResult<Record> {
    serde_json::from_str(body).map_err(StorageError::malformed)
}

fn encode_body(record: &Record) -> StorageResult<String> {
    serde_json::to_string(record).map_err(StorageError::malformed)
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn mode(&self) -> TransactionMode {
        self.mode
    }

    fn schema_version(&mut self) -> StorageResult<u32> {
        let version = schema_meta::table
            .select(schema_meta::version)
            .first::<i32>(self.conn)
            .optional()
            .map_err(StorageError::backend)?;
        version.map_or(Ok(0), |value| {
            u32::try_from(value).map_err(StorageError::backend)
        })
    }

    fn set_schema_version(&mut self, version: u32) -> StorageResult<()> {
        self.mode.ensure_writable(StoreName::Settings)?;
        let persisted = i32::try_from(version).map_err(StorageError::backend)?;
        diesel::replace_into(schema_meta::table)
            .values((schema_meta::id.eq(1), schema_meta::version.eq(persisted)))
            .execute(self.conn)
            .map_err(StorageError::backend)?;
        Ok(())
    }

    fn store_names(&mut self) -> StorageResult<Vec<StoreName>> {
        let names = object_stores::table
            .select(object_stores::name)
            .load::<String>(self.conn)
            .map_err(StorageError::backend)?;
        let mut stores = names
            .iter()
            .map(|name| StoreName::try_from(name.as_str()).map_err(StorageError::backend))
            .collect::<StorageResult<Vec<_>>>()?;
        stores.sort();
        Ok(stores)
    }

    fn create_store(&mut self, store: StoreName) -> StorageResult<()> {
        self.mode.ensure_writable(store)?;
        diesel::insert_or_ignore_into(object_stores::table)
            .values(&NewObjectStoreRow {
                name: store.as_str(),
                key_path: store.key_path().as_str(),
            })
            .execute(self.conn)
            .map_err(StorageError::backend)?;
        Ok(())
    }

    fn get(&mut self, store: StoreName, key: &str) -> StorageResult<Option<Record>> {
        self.ensure_store(store)?;
        let body = records::table
            .filter(records::store.eq(store.as_str()))
            .filter(records::record_key.eq(key))
            .select(records::body)
            .first::<String>(self.conn)
            .optional()
            .map_err(StorageError::backend)?;
        body.as_deref().map(decode_body).transpose()
    }

    fn get_all(&mut self, store: StoreName) -> StorageResult<Vec<Record>> {
        self.ensure_store(store)?;
        let bodies = records::table
            .filter(records::store.eq(store.as_str()))
            .order(records::seq.asc())
            .select(records::body)
            .load::<String>(self.conn)
            .map_err(StorageError::backend)?;
        decode_bodies(&bodies)
    }

    fn get_all_by_workspace(
        &mut self,
        store: StoreName,
        workspace_id: &str,
    ) -> StorageResult<Vec<Record>> {
        self.ensure_store(store)?;
        let bodies = records::table
            .filter(records::store.eq(store.as_str()))
            .filter(records::workspace_id.eq(workspace_id))
            .order(records::seq.asc())
            .select(records::body)
            .load::<String>(self.conn)
            .map_err(StorageError::backend)?;
        decode_bodies(&bodies)
    }

    fn add(&mut self, store: StoreName, record: Record) -> StorageResult<()> {
        self.ensure_writable_store(store)?;
        let key = record.key(store)?;
        let body = encode_body(&record)?;
        let row = NewRecordRow {
            store: store.as_str(),
            record_key: key,
            workspace_id: record.workspace_id(),
            body: &body,
        };
        diesel::insert_into(records::table)
            .values(&row)
            .execute(self.conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StorageError::DuplicateKey {
                        store,
                        key: key.to_owned(),
                    }
                }
                other => StorageError::backend(other),
            })?;
        Ok(())
    }

    fn put(&mut self, store: StoreName, record: Record) -> StorageResult<()> {
        self.ensure_writable_store(store)?;
        let key = record.key(store)?;
        let body = encode_body(&record)?;
        let row = NewRecordRow {
            store: store.as_str(),
            record_key: key,
            workspace_id: record.workspace_id(),
            body: &body,
        };
        diesel::insert_into(records::table)
            .values(&row)
            .on_conflict((records::store, records::record_key))
            .do_update()
            .set((
                records::workspace_id.eq(row.workspace_id),
                records::body.eq(row.body),
            ))
            .execute(self.conn)
            .map_err(StorageError::backend)?;
        Ok(())
    }

    fn delete(&mut self, store: StoreName, key: &str) -> StorageResult<()> {
        self.ensure_writable_store(store)?;
        diesel::delete(
            records::table
                .filter(records::store.eq(store.as_str()))
                .filter(records::record_key.eq(key)),
        )
        .execute(self.conn)
        .map_err(StorageError::backend)?;
        Ok(())
    }

    fn clear(&mut self, store: StoreName) -> StorageResult<()> {
        self.ensure_writable_store(store)?;
        diesel::delete(records::table.filter(records::store.eq(store.as_str())))
            .execute(self.conn)
            .map_err(StorageError::backend)?;
        Ok(())
    }
}
