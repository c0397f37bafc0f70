// ==========================================
// 航线舱位配置向导 - 参考数据仓储
// ==========================================
// 来源: {data_dir}/airports.json, {data_dir}/aircraft.json
// 生命周期: 启动时一次性加载, 之后只读
// ==========================================

use crate::domain::reference::{AircraftSpec, Airport};
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const AIRPORTS_FILE: &str = "airports.json";
pub const AIRCRAFT_FILE: &str = "aircraft.json";

// ==========================================
// ReferenceData - 机场与机型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    airports: Vec<Airport>,
    aircraft: Vec<AircraftSpec>,
}

impl ReferenceData {
    pub fn new(airports: Vec<Airport>, aircraft: Vec<AircraftSpec>) -> Self {
        Self { airports, aircraft }
    }

    /// 从数据目录加载
    ///
    /// # 返回
    /// - Err(ReferenceDataError): 文件缺失或 JSON 格式错误
    pub fn load_from_dir<P: AsRef<Path>>(data_dir: P) -> RepositoryResult<Self> {
        let dir = data_dir.as_ref();
        let airports: Vec<Airport> = read_json(&dir.join(AIRPORTS_FILE))?;
        let aircraft: Vec<AircraftSpec> = read_json(&dir.join(AIRCRAFT_FILE))?;

        let unusable = aircraft.iter().filter(|a| a.seats == 0).count();
        if unusable > 0 {
            tracing::warn!(count = unusable, "存在座位数为 0 的机型, 选择后不会产生结果");
        }

        tracing::info!(
            airports = airports.len(),
            aircraft = aircraft.len(),
            data_dir = %dir.display(),
            "参考数据加载完成"
        );
        Ok(Self::new(airports, aircraft))
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn aircraft(&self) -> &[AircraftSpec] {
        &self.aircraft
    }

    /// 国家列表（去重 + 排序）
    pub fn countries(&self) -> Vec<String> {
        self.airports
            .iter()
            .map(|a| a.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 按国家过滤机场; 国家为空或未指定时返回全部
    pub fn airports_in(&self, country: Option<&str>) -> Vec<&Airport> {
        match country.map(str::trim).filter(|c| !c.is_empty()) {
            None => self.airports.iter().collect(),
            Some(c) => self.airports.iter().filter(|a| a.country == c).collect(),
        }
    }

    /// 按名称精确查找机型
    pub fn find_aircraft(&self, name: &str) -> Option<&AircraftSpec> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.aircraft.iter().find(|a| a.name == name)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RepositoryResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| RepositoryError::ReferenceDataError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| RepositoryError::ReferenceDataError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// ==========================================
// 下拉选项标签
// ==========================================

/// 机场选项: "IATA / ICAO - Name"
pub fn airport_label(airport: &Airport) -> String {
    format!("{} / {} - {}", airport.iata, airport.icao, airport.name)
}

/// 从机场输入中取出标识（选项标签 " /" 之前的部分）
pub fn parse_airport_input(input: &str) -> String {
    input
        .split(" /")
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// 机型选项: "Name (seats)"
pub fn aircraft_label(aircraft: &AircraftSpec) -> String {
    format!("{} ({})", aircraft.name, aircraft.seats)
}

/// 去掉机型输入尾部的 " (NNN)"
pub fn parse_aircraft_input(input: &str) -> String {
    let trimmed = input.trim_end();
    if let Some(body) = trimmed.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let digits = &body[open + 1..];
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return body[..open].trim_end().to_string();
            }
        }
    }
    trimmed.to_string()
}
