// ==========================================
// 航线舱位配置向导 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 键值存储（预设持久化）与参考数据访问
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod kv_path;
pub mod kv_store;
pub mod reference_repo;
pub mod sqlite_kv_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use kv_store::{KvStore, MemoryKvStore};
pub use reference_repo::ReferenceData;
pub use sqlite_kv_store::SqliteKvStore;
