// ==========================================
// 航线舱位配置向导 - 需求表导入
// ==========================================
// 输入: 含表头的 CSV / Excel（出发机场, 到达机场, Y/J/F 需求）
// 输出: ImportedDemandTable（按规范航线键索引, 作为缓存未命中时的兜底）
// ==========================================
// 规则:
// - 表头匹配忽略大小写, 允许别名
// - 缺少出发或到达列: 整个文件失败
// - 出发/到达为空的行: 跳过并计数
// - 需求缺失或非法: 按 0 处理
// - 同一航线重复出现: 后出现的行覆盖
// ==========================================

use crate::domain::types::{DemandTriple, RouteKey};
use crate::engine::demand_input::parse_demand_field;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{FileParser, RawTable, UniversalFileParser};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

const DEP_ALIASES: &[&str] = &["dep", "departure", "from", "origin", "dep_airport", "departure airport"];
const ARR_ALIASES: &[&str] = &["arr", "arrival", "to", "destination", "arr_airport", "arrival airport"];
const Y_ALIASES: &[&str] = &["y", "y demand", "economy"];
const J_ALIASES: &[&str] = &["j", "j demand", "business"];
const F_ALIASES: &[&str] = &["f", "f demand", "first"];

// ==========================================
// 列定位
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    dep: usize,
    arr: usize,
    y: Option<usize>,
    j: Option<usize>,
    f: Option<usize>,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        aliases.iter().any(|alias| *alias == h)
    })
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> ImportResult<Self> {
        let dep = find_column(headers, DEP_ALIASES)
            .ok_or_else(|| ImportError::MissingColumn("departure".to_string()))?;
        let arr = find_column(headers, ARR_ALIASES)
            .ok_or_else(|| ImportError::MissingColumn("arrival".to_string()))?;

        Ok(Self {
            dep,
            arr,
            y: find_column(headers, Y_ALIASES),
            j: find_column(headers, J_ALIASES),
            f: find_column(headers, F_ALIASES),
        })
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

// ==========================================
// ImportedDemandTable
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportedDemandTable {
    pub batch_id: String,
    pub source: String,
    pub entries: HashMap<RouteKey, DemandTriple>,
    pub total_rows: usize,
    pub imported_rows: usize,
    pub skipped_rows: usize,
}

impl ImportedDemandTable {
    /// 由原始表格构建
    pub fn from_raw(raw: &RawTable, source: impl Into<String>) -> ImportResult<Self> {
        let layout = ColumnLayout::resolve(&raw.headers)?;
        let mut table = Self {
            batch_id: Uuid::new_v4().to_string(),
            source: source.into(),
            ..Default::default()
        };

        for (idx, row) in raw.rows.iter().enumerate() {
            table.total_rows += 1;

            let dep = cell(row, Some(layout.dep));
            let arr = cell(row, Some(layout.arr));
            if dep.is_empty() || arr.is_empty() {
                // 行号从表头后第 1 行起算
                tracing::debug!(row = idx + 2, "缺少航线端点, 跳过");
                table.skipped_rows += 1;
                continue;
            }

            let demand = DemandTriple::new(
                parse_demand_field(cell(row, layout.y)),
                parse_demand_field(cell(row, layout.j)),
                parse_demand_field(cell(row, layout.f)),
            );
            table.entries.insert(RouteKey::new(dep, arr), demand);
            table.imported_rows += 1;
        }

        Ok(table)
    }

    /// 按无向航线查找
    pub fn lookup(&self, a: &str, b: &str) -> Option<DemandTriple> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return None;
        }
        self.entries.get(&RouteKey::new(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            batch_id: self.batch_id.clone(),
            source: self.source.clone(),
            routes: self.entries.len(),
            total_rows: self.total_rows,
            imported_rows: self.imported_rows,
            skipped_rows: self.skipped_rows,
        }
    }
}

/// 导入汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub source: String,
    pub routes: usize,
    pub total_rows: usize,
    pub imported_rows: usize,
    pub skipped_rows: usize,
}

// ==========================================
// DemandImporter
// ==========================================
pub struct DemandImporter<P: FileParser = UniversalFileParser> {
    parser: P,
}

impl DemandImporter<UniversalFileParser> {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
        }
    }
}

impl Default for DemandImporter<UniversalFileParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: FileParser> DemandImporter<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// 导入需求文件
    pub fn import<Q: AsRef<Path>>(&self, file_path: Q) -> ImportResult<ImportedDemandTable> {
        let path = file_path.as_ref();
        let raw = self.parser.parse(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let table = ImportedDemandTable::from_raw(&raw, source)?;
        tracing::info!(
            batch_id = %table.batch_id,
            source = %table.source,
            routes = table.len(),
            skipped = table.skipped_rows,
            "需求文件导入完成"
        );
        Ok(table)
    }
}
