use rusqlite::types::Value;
use rusqlite::{params, Connection, Params, Row};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: String,
}

/// Handle to the catalog database file.
///
/// Holds only the path: every call opens its own connection, runs a single
/// statement in autocommit mode and closes the connection again.
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the parent directory and the `product` table when missing.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let store = Self::new(path);
        if let Some(dir) = store.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| DbError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }
        store.execute(
            "CREATE TABLE IF NOT EXISTS product (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price TEXT NOT NULL
            )",
            [],
        )?;
        Ok(store)
    }

    fn connect(&self) -> DbResult<Connection> {
        Connection::open(&self.path).map_err(|source| DbError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Runs one statement and returns the number of affected rows.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> DbResult<usize> {
        let conn = self.connect()?;
        let changed = conn.execute(sql, params)?;
        debug!(sql = %sql.trim(), changed, "statement executed");
        Ok(changed)
    }

    /// Runs one row-returning statement and maps every row.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> DbResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let row_iter = stmt.query_map(params, map)?;

        let mut rows = Vec::new();
        for row in row_iter {
            rows.push(row?);
        }
        debug!(sql = %sql.trim(), count = rows.len(), "query returned rows");
        Ok(rows)
    }

    pub fn list_products(&self) -> DbResult<Vec<Product>> {
        self.query(
            "SELECT name, price FROM product ORDER BY name ASC",
            [],
            |row| {
                Ok(Product {
                    name: row.get(0)?,
                    price: price_text(row.get(1)?),
                })
            },
        )
    }

    pub fn insert_product(&self, name: &str, price: &str) -> DbResult<usize> {
        self.execute(
            "INSERT INTO product (name, price) VALUES (?, ?)",
            params![name, price],
        )
    }

    /// Removes every row carrying `name`; names are not unique.
    pub fn delete_by_name(&self, name: &str) -> DbResult<usize> {
        self.execute("DELETE FROM product WHERE name = ?", params![name])
    }

    /// Replaces name and price of the rows matching the old name/price pair.
    pub fn update_product(
        &self,
        old_name: &str,
        old_price: &str,
        new_name: &str,
        new_price: &str,
    ) -> DbResult<usize> {
        self.execute(
            "UPDATE product SET name = ?, price = ? WHERE name = ? AND price = ?",
            params![new_name, new_price, old_name, old_price],
        )
    }
}

// Databases created by other tools may declare price as REAL.
fn price_text(value: Value) -> String {
    match value {
        Value::Text(s) => s,
        Value::Real(f) => f.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
        Value::Null => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("database.db")).unwrap();
        (dir, store)
    }

    fn pairs(store: &Store) -> Vec<(String, String)> {
        store
            .list_products()
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.price))
            .collect()
    }

    #[test]
    fn open_creates_file_and_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("database.db");
        let store = Store::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.list_products().unwrap().is_empty());
        // second open keeps existing rows
        store.insert_product("Widget", "9.99").unwrap();
        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.list_products().unwrap().len(), 1);
    }

    #[test]
    fn list_is_sorted_by_name() {
        let (_dir, store) = temp_store();
        store.insert_product("Widget", "9.99").unwrap();
        store.insert_product("Apple", "1.50").unwrap();
        store.insert_product("Mango", "3").unwrap();

        assert_eq!(
            pairs(&store),
            vec![
                ("Apple".to_string(), "1.50".to_string()),
                ("Mango".to_string(), "3".to_string()),
                ("Widget".to_string(), "9.99".to_string()),
            ]
        );
    }

    #[test]
    fn non_numeric_price_is_kept_as_text() {
        let (_dir, store) = temp_store();
        store.insert_product("Gadget", "cheap").unwrap();
        assert_eq!(pairs(&store), vec![("Gadget".to_string(), "cheap".to_string())]);
    }

    #[test]
    fn delete_removes_every_row_with_the_name() {
        let (_dir, store) = temp_store();
        store.insert_product("Widget", "9.99").unwrap();
        store.insert_product("Widget", "4.00").unwrap();
        store.insert_product("Apple", "1.50").unwrap();

        assert_eq!(store.delete_by_name("Widget").unwrap(), 2);
        assert_eq!(pairs(&store), vec![("Apple".to_string(), "1.50".to_string())]);
    }

    #[test]
    fn update_matches_name_and_price() {
        let (_dir, store) = temp_store();
        store.insert_product("Widget", "9.99").unwrap();
        store.insert_product("Widget", "4.00").unwrap();

        let changed = store.update_product("Widget", "4.00", "Gizmo", "5.25").unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            pairs(&store),
            vec![
                ("Gizmo".to_string(), "5.25".to_string()),
                ("Widget".to_string(), "9.99".to_string()),
            ]
        );

        let missed = store.update_product("Widget", "1.00", "Other", "2").unwrap();
        assert_eq!(missed, 0);
    }

    #[test]
    fn real_prices_from_existing_databases_are_rendered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "CREATE TABLE product (id INTEGER PRIMARY KEY, name TEXT, price REAL)",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO product (name, price) VALUES ('Bolt', 2.5)", [])
            .unwrap();
        drop(conn);

        let store = Store::open(&path).unwrap();
        assert_eq!(pairs(&store), vec![("Bolt".to_string(), "2.5".to_string())]);
        // the REAL column coerces the text key back to a number
        assert_eq!(store.update_product("Bolt", "2.5", "Bolt", "3").unwrap(), 1);
    }

    #[test]
    fn unreachable_path_reports_open_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("missing").join("database.db"));
        match store.list_products() {
            Err(DbError::Open { .. }) => {}
            other => panic!("expected open error, got {:?}", other.map(|p| p.len())),
        }
    }
}
