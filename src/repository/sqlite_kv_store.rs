// ==========================================
// 航线舱位配置向导 - SQLite 键值存储
// ==========================================
// 存储: kv_store 表 (path PK, value JSON 文本, updated_at)
// 共享: 多个进程指向同一库文件即共享预设
// 红线: 仓储不含业务逻辑（航线键规范化在引擎层）
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_path::{self, assemble_subtree, validate_path};
use crate::repository::kv_store::{ancestors, KvStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteKvStore
// ==========================================
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// 打开（或创建）库文件并建表
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;
        tracing::debug!(db_path, "kv_store 已打开");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA 并建表, 幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 内存库（测试 / 本地临时使用）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn decode(path: &str, raw: &str) -> RepositoryResult<Value> {
        serde_json::from_str(raw).map_err(|e| RepositoryError::MalformedValue {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, path: &str) -> RepositoryResult<Option<Value>> {
        let path = validate_path(path)?;
        let conn = self.get_conn()?;

        let leaf: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_store WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(raw) = leaf {
            return Self::decode(path, &raw).map(Some);
        }

        // substr 前缀比较, 避免 LIKE 把 '_' 当通配符
        let prefix = kv_path::subtree_prefix(path);
        let mut stmt = conn.prepare(
            r#"
            SELECT path, value
            FROM kv_store
            WHERE substr(path, 1, length(?1)) = ?1
            ORDER BY path
            "#,
        )?;
        let rows = stmt
            .query_map(params![prefix], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<(String, String)>>>()?;

        let mut descendants = Vec::with_capacity(rows.len());
        for (child_path, raw) in rows {
            match Self::decode(&child_path, &raw) {
                Ok(value) => descendants.push((child_path, value)),
                Err(e) => tracing::warn!(path = %child_path, error = %e, "跳过格式错误的存储值"),
            }
        }

        Ok(assemble_subtree(path, descendants))
    }

    async fn set(&self, path: &str, value: Value) -> RepositoryResult<()> {
        let path = validate_path(path)?;
        let raw = serde_json::to_string(&value)?;
        let updated_at = Utc::now().to_rfc3339();
        let prefix = kv_path::subtree_prefix(path);

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM kv_store WHERE substr(path, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        for ancestor in ancestors(path) {
            tx.execute("DELETE FROM kv_store WHERE path = ?1", params![ancestor])?;
        }
        tx.execute(
            r#"
            INSERT OR REPLACE INTO kv_store (path, value, updated_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![path, raw, updated_at],
        )?;

        tx.commit()?;
        tracing::trace!(path, "sqlite kv set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_sqlite_leaf_round_trip() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set("presets/FRA_MUC", json!({"y": 10, "j": 2, "f": 1})).await.unwrap();

        let value = store.get("presets/FRA_MUC").await.unwrap();
        assert_eq!(value, Some(json!({"y": 10, "j": 2, "f": 1})));
    }

    #[tokio::test]
    async fn test_sqlite_subtree_does_not_treat_underscore_as_wildcard() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set("presets/FRA_MUC", json!(1)).await.unwrap();
        store.set("presetsXFRA", json!(2)).await.unwrap();

        let tree = store.get("presets").await.unwrap();
        assert_eq!(tree, Some(json!({"FRA_MUC": 1})));
        assert_eq!(store.get("presets/FRAXMUC").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_last_write_wins() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set("presets/FRA_MUC", json!(1)).await.unwrap();
        store.set("presets/FRA_MUC", json!(2)).await.unwrap();
        assert_eq!(store.get("presets/FRA_MUC").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_sqlite_shared_by_file_path() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let writer = SqliteKvStore::new(&db_path).unwrap();
        writer.set("presets/JFK_LHR", json!({"y": 300, "j": 40, "f": 12})).await.unwrap();

        let reader = SqliteKvStore::new(&db_path).unwrap();
        assert_eq!(
            reader.get("presets/JFK_LHR").await.unwrap(),
            Some(json!({"y": 300, "j": 40, "f": 12}))
        );
    }
}
