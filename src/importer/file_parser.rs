// ==========================================
// 航线舱位配置向导 - 需求文件解析器
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// 输出: 表头 + 原始行（单元格均已 TRIM, 全空行已跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 解析后的原始表格
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn push_row(&mut self, row: Vec<String>) {
        if row.iter().all(|v| v.is_empty()) {
            return;
        }
        self.rows.push(row);
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格（首行为表头）
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut table = RawTable {
            headers: reader.headers()?.iter().map(|h| h.trim().to_string()).collect(),
            rows: Vec::new(),
        };

        for result in reader.records() {
            let record = result?;
            table.push_row(record.iter().map(|v| v.trim().to_string()).collect());
        }

        Ok(table)
    }
}

// ==========================================
// Excel Parser（读取第一个工作表）
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let mut table = RawTable {
            headers: header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
            rows: Vec::new(),
        };
        for data_row in rows {
            table.push_row(data_row.iter().map(|c| c.to_string().trim().to_string()).collect());
        }

        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse(file_path),
            "xlsx" | "xls" => ExcelParser.parse(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
