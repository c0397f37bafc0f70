// ==========================================
// 航线舱位配置向导 - 领域类型定义
// ==========================================
// 职责: 舱位等级 / 需求三元组 / 航线键
// 红线: 航线键与方向无关, 同一航线只存一份
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 航线键分隔符（机场代码中不会出现）
pub const ROUTE_KEY_DELIMITER: char = '_';

// ==========================================
// 舱位等级 (Fare Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FareClass {
    Y, // 经济舱
    J, // 商务舱
    F, // 头等舱
}

impl FareClass {
    pub const ALL: [FareClass; 3] = [FareClass::Y, FareClass::J, FareClass::F];

    /// 单个座位占用的客舱空间单位（以经济舱为 1）
    pub fn seat_space_units(&self) -> f64 {
        match self {
            FareClass::Y => 1.0,
            FareClass::J => 2.0,
            FareClass::F => 3.0,
        }
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareClass::Y => write!(f, "Y"),
            FareClass::J => write!(f, "J"),
            FareClass::F => write!(f, "F"),
        }
    }
}

// ==========================================
// DemandTriple - 航线日需求
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandTriple {
    pub y: u32, // 经济舱日需求
    pub j: u32, // 商务舱日需求
    pub f: u32, // 头等舱日需求
}

impl DemandTriple {
    pub fn new(y: u32, j: u32, f: u32) -> Self {
        Self { y, j, f }
    }

    /// 三舱总需求（u64 防止溢出）
    pub fn total(&self) -> u64 {
        u64::from(self.y) + u64::from(self.j) + u64::from(self.f)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, class: FareClass) -> u32 {
        match class {
            FareClass::Y => self.y,
            FareClass::J => self.j,
            FareClass::F => self.f,
        }
    }
}

impl fmt::Display for DemandTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y={} J={} F={}", self.y, self.j, self.f)
    }
}

// ==========================================
// RouteKey - 无向航线键
// ==========================================
// 规范形式: 两端标识 TRIM + UPPER 后按字典序排序, 以 '_' 连接
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// 由两端标识构造规范键, normalize(a, b) == normalize(b, a)
    pub fn new(a: &str, b: &str) -> Self {
        let a = clean_identifier(a);
        let b = clean_identifier(b);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        RouteKey(format!("{}{}{}", lo, ROUTE_KEY_DELIMITER, hi))
    }

    /// 解析已存储的键（可能来自旧数据, 顺序未必规范）
    ///
    /// 无分隔符的键返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        raw.split_once(ROUTE_KEY_DELIMITER)
            .map(|(a, b)| RouteKey::new(a, b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 两端标识（已规范化）
    pub fn endpoints(&self) -> (&str, &str) {
        self.0
            .split_once(ROUTE_KEY_DELIMITER)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn clean_identifier(value: &str) -> String {
    value.trim().to_uppercase()
}
