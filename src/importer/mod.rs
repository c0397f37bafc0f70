// ==========================================
// 航线舱位配置向导 - 导入层
// ==========================================
// 职责: 外部需求表导入, 作为航线预设的兜底数据源
// 支持: Excel, CSV
// ==========================================

pub mod demand_importer;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use demand_importer::{DemandImporter, ImportSummary, ImportedDemandTable};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawTable, UniversalFileParser};
