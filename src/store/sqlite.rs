use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::StoreError;
use crate::logger::{log, LogSeverity};
use crate::store::{ChunkStore, RawChunkRecord, StoreResult};

/// File name of the SQLite map backend inside a world directory.
pub const MAP_DATABASE: &str = "map.sqlite";

/// Read-only view of a world's `map.sqlite`.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens either a world directory (looking for `map.sqlite` inside) or the database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let path = if path.is_dir() {
            path.join(MAP_DATABASE)
        } else {
            path.to_path_buf()
        };

        if !path.is_file() {
            return Err(StoreError::MissingDatabase(path.display().to_string()));
        }

        let connection = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        log(
            format!("Opened map database {}", path.display()),
            LogSeverity::Debug,
        );

        Ok(Self { connection, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkStore for SqliteStore {
    fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .connection
            .query_row("SELECT COUNT(1) FROM blocks", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn for_each_record(
        &self,
        visit: &mut dyn FnMut(RawChunkRecord) -> ControlFlow<()>,
    ) -> StoreResult<()> {
        let mut statement = self.connection.prepare("SELECT pos, data FROM blocks")?;
        let mut rows = statement.query([])?;

        while let Some(row) = rows.next()? {
            let key: i64 = row.get(0)?;
            let data: Vec<u8> = row.get(1)?;
            if visit(RawChunkRecord::new(key, data)).is_break() {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn create_world(dir: &Path, rows: &[(i64, &[u8])]) {
        let connection = Connection::open(dir.join(MAP_DATABASE)).unwrap();
        connection
            .execute(
                "CREATE TABLE blocks (pos INT PRIMARY KEY, data BLOB)",
                [],
            )
            .unwrap();
        for (pos, data) in rows {
            connection
                .execute(
                    "INSERT INTO blocks (pos, data) VALUES (?1, ?2)",
                    rusqlite::params![pos, data],
                )
                .unwrap();
        }
    }

    #[test]
    fn test_open_world_directory() {
        let dir = tempfile::tempdir().unwrap();
        create_world(dir.path(), &[(7, &b"abc"[..]), (-4096, &b"de"[..])]);

        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.path(), dir.path().join(MAP_DATABASE));
        assert_eq!(store.count().unwrap(), 2);

        let mut records = Vec::new();
        store
            .for_each_record(&mut |record| {
                records.push((record.key, record.data.to_vec()));
                ControlFlow::Continue(())
            })
            .unwrap();
        records.sort();

        assert_eq!(records, vec![(-4096, b"de".to_vec()), (7, b"abc".to_vec())]);
    }

    #[test]
    fn test_open_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteStore::open(dir.path());
        assert_matches!(result, Err(StoreError::MissingDatabase(_)));
    }
}
