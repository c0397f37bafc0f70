// ==========================================
// 航线舱位配置向导 - 参考数据模型
// ==========================================
// 来源: airports.json / aircraft.json（启动时一次性加载, 只读）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Airport - 机场
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,    // IATA 三字码
    pub icao: String,    // ICAO 四字码
    pub name: String,    // 机场名称
    pub country: String, // 所属国家
}

// ==========================================
// AircraftSpec - 机型
// ==========================================
// seats: 以经济舱座位计的客舱容量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftSpec {
    pub name: String,
    pub seats: u32,
}

impl AircraftSpec {
    pub fn new(name: impl Into<String>, seats: u32) -> Self {
        Self {
            name: name.into(),
            seats,
        }
    }
}
