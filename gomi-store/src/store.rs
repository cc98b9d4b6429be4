//! SQLite-backed store for categories and garbage types.
//!
//! The table layout is byte-compatible with the catalog's historical
//! database, so stores written under the old single-weekday `date` scheme
//! open and read cleanly. Every multi-row mutation runs inside a single
//! transaction; a failure partway leaves the store unchanged.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use gomi_core::days::{decode_days, decode_special_days, encode_days, encode_special_days};
use gomi_core::error::CatalogError;
use gomi_core::model::{
    Category, CategoryId, CategoryPatch, GarbageType, GarbageTypeId, NewCategory,
};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS garbage_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL UNIQUE,
        date TEXT NOT NULL,
        method TEXT NOT NULL,
        special_days TEXT,
        notion TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS garbage_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER NOT NULL REFERENCES garbage_categories(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_garbage_types_category ON garbage_types(category_id);
    CREATE INDEX IF NOT EXISTS idx_garbage_types_name ON garbage_types(name);
";

/// Authoritative store owning both entity collections.
///
/// The connection is serialized behind a mutex; the catalog assumes a
/// single logical writer.
pub struct CatalogStore {
    conn: Mutex<Connection>,
}

impl CatalogStore {
    /// Open (or create) the catalog database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] when the file cannot be opened or
    /// the schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a fresh in-memory catalog, used by tests.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] when SQLite refuses the connection.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a category together with its initial garbage types, atomically.
    ///
    /// Blank garbage-type names are trimmed away rather than rejected.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] or [`CatalogError::InvalidDay`] for bad
    /// fields, [`CatalogError::DuplicateName`] when the name is taken,
    /// [`CatalogError::Storage`] for persistence failures.
    pub fn create_category(&self, fields: &NewCategory) -> Result<Category, CatalogError> {
        fields.validate()?;
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let (id, _) = insert_category(&tx, fields)?;
        tx.commit()?;
        info!(id = id.0, name = %fields.name, "created category");
        load_category(&conn, id)
    }

    /// Apply a partial update to a category, atomically.
    ///
    /// Only supplied fields are overwritten; a supplied `types` list replaces
    /// the category's entire garbage-type list.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown id,
    /// [`CatalogError::DuplicateName`] when a supplied name collides with a
    /// different category, [`CatalogError::Validation`] /
    /// [`CatalogError::InvalidDay`] for bad field values.
    pub fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, CatalogError> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        apply_patch(&tx, id, patch)?;
        tx.commit()?;
        debug!(id = id.0, "updated category");
        load_category(&conn, id)
    }

    /// Delete a category; its garbage types go with it in the same operation.
    ///
    /// Returns the record as it was just before deletion.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown id.
    pub fn delete_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let conn = self.lock();
        let existing = load_category(&conn, id)?;
        conn.execute(
            "DELETE FROM garbage_categories WHERE id = ?1",
            params![id.0],
        )?;
        info!(id = id.0, name = %existing.name, "deleted category");
        Ok(existing)
    }

    /// Fetch a single category with its garbage types.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown id.
    pub fn category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let conn = self.lock();
        load_category(&conn, id)
    }

    /// All categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let conn = self.lock();
        list_categories(&conn)
    }

    /// Number of stored categories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn count_categories(&self) -> Result<usize, CatalogError> {
        let conn = self.lock();
        count_rows(&conn, "garbage_categories")
    }

    /// Number of stored garbage types across all categories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn count_garbage_types(&self) -> Result<usize, CatalogError> {
        let conn = self.lock();
        count_rows(&conn, "garbage_types")
    }
}

/// Insert a category block and its garbage types inside the caller's
/// transaction. Returns the new id and the number of types inserted.
pub(crate) fn insert_category(
    conn: &Connection,
    fields: &NewCategory,
) -> Result<(CategoryId, usize), CatalogError> {
    if category_id_by_name(conn, &fields.name)?.is_some() {
        return Err(CatalogError::DuplicateName(fields.name.clone()));
    }

    let now = Utc::now();
    let date = encode_days(&fields.days)?;
    let special_days = encode_special_days(&fields.special_days);
    conn.execute(
        "INSERT INTO garbage_categories
             (category, date, method, special_days, notion, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            fields.name,
            date,
            fields.method,
            special_days,
            fields.notion,
            now,
            now
        ],
    )?;
    let id = CategoryId(conn.last_insert_rowid());

    let types = fields.clean_types();
    for name in &types {
        insert_garbage_type(conn, id, name, now)?;
    }
    Ok((id, types.len()))
}

fn apply_patch(
    conn: &Connection,
    id: CategoryId,
    patch: &CategoryPatch,
) -> Result<(), CatalogError> {
    let exists = conn
        .query_row(
            "SELECT id FROM garbage_categories WHERE id = ?1",
            params![id.0],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(CatalogError::NotFound(id.0));
    }
    if patch.is_empty() {
        return Ok(());
    }

    let now = Utc::now();

    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "category name must not be blank".to_owned(),
            ));
        }
        if let Some(existing) = category_id_by_name(conn, name)?
            && existing != id
        {
            return Err(CatalogError::DuplicateName(name.clone()));
        }
        conn.execute(
            "UPDATE garbage_categories SET category = ?1 WHERE id = ?2",
            params![name, id.0],
        )?;
    }

    if let Some(days) = &patch.days {
        let date = encode_days(days)?;
        conn.execute(
            "UPDATE garbage_categories SET date = ?1 WHERE id = ?2",
            params![date, id.0],
        )?;
    }

    if let Some(method) = &patch.method {
        if method.trim().is_empty() {
            return Err(CatalogError::Validation(
                "collection method must not be blank".to_owned(),
            ));
        }
        conn.execute(
            "UPDATE garbage_categories SET method = ?1 WHERE id = ?2",
            params![method, id.0],
        )?;
    }

    if let Some(special_days) = &patch.special_days {
        conn.execute(
            "UPDATE garbage_categories SET special_days = ?1 WHERE id = ?2",
            params![encode_special_days(special_days), id.0],
        )?;
    }

    if let Some(notion) = &patch.notion {
        conn.execute(
            "UPDATE garbage_categories SET notion = ?1 WHERE id = ?2",
            params![notion, id.0],
        )?;
    }

    if let Some(types) = &patch.types {
        conn.execute(
            "DELETE FROM garbage_types WHERE category_id = ?1",
            params![id.0],
        )?;
        for name in types.iter().map(|name| name.trim()) {
            if name.is_empty() {
                continue;
            }
            insert_garbage_type(conn, id, name, now)?;
        }
    }

    conn.execute(
        "UPDATE garbage_categories SET updated_at = ?1 WHERE id = ?2",
        params![now, id.0],
    )?;
    Ok(())
}

fn insert_garbage_type(
    conn: &Connection,
    category: CategoryId,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(), CatalogError> {
    conn.execute(
        "INSERT INTO garbage_types (name, category_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, category.0, now, now],
    )?;
    Ok(())
}

pub(crate) fn category_id_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<CategoryId>, CatalogError> {
    let id = conn
        .query_row(
            "SELECT id FROM garbage_categories WHERE category = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id.map(CategoryId))
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<usize, CatalogError> {
    // Table name comes from a fixed internal call site, never user input.
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(usize::try_from(count).unwrap_or(0))
}

struct CategoryRow {
    id: i64,
    name: String,
    date: String,
    method: String,
    special_days: Option<String>,
    notion: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const CATEGORY_COLUMNS: &str =
    "id, category, date, method, special_days, notion, created_at, updated_at";

fn read_category_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        method: row.get(3)?,
        special_days: row.get(4)?,
        notion: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn read_garbage_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<GarbageType> {
    Ok(GarbageType {
        id: GarbageTypeId(row.get(0)?),
        name: row.get(1)?,
        category_id: CategoryId(row.get(2)?),
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn hydrate(conn: &Connection, row: CategoryRow) -> Result<Category, CatalogError> {
    let days = decode_days(&row.date);
    if days.is_empty() {
        warn!(
            id = row.id,
            stored = %row.date,
            "collection days did not decode; category treated as collected on no day"
        );
    }
    let special_days = row
        .special_days
        .as_deref()
        .map(decode_special_days)
        .unwrap_or_default();
    let types = garbage_types_for(conn, CategoryId(row.id))?;
    Ok(Category {
        id: CategoryId(row.id),
        name: row.name,
        days,
        method: row.method,
        special_days,
        notion: row.notion,
        types,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn garbage_types_for(conn: &Connection, id: CategoryId) -> Result<Vec<GarbageType>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, created_at, updated_at
         FROM garbage_types WHERE category_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![id.0], read_garbage_type)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(CatalogError::from)
}

pub(crate) fn load_category(conn: &Connection, id: CategoryId) -> Result<Category, CatalogError> {
    let row = conn
        .query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM garbage_categories WHERE id = ?1"),
            params![id.0],
            read_category_row,
        )
        .optional()?;
    match row {
        Some(row) => hydrate(conn, row),
        None => Err(CatalogError::NotFound(id.0)),
    }
}

pub(crate) fn list_categories(conn: &Connection) -> Result<Vec<Category>, CatalogError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM garbage_categories ORDER BY id"
    ))?;
    let rows = stmt
        .query_map([], read_category_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    drop(stmt);
    rows.into_iter().map(|row| hydrate(conn, row)).collect()
}
