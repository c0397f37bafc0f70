// ==========================================
// 航线舱位配置向导 - 舱位分配结果
// ==========================================

use crate::domain::types::FareClass;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// AllocationResult - 单班舱位配置 + 日航班数
// ==========================================
// 座位数为实数（不取整）, 展示时保留一位小数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub y_per: f64,   // 每班经济舱座位
    pub j_per: f64,   // 每班商务舱座位
    pub f_per: f64,   // 每班头等舱座位
    pub flights: u64, // 每日所需航班数（向上取整）
}

impl AllocationResult {
    pub fn seats_for(&self, class: FareClass) -> f64 {
        match class {
            FareClass::Y => self.y_per,
            FareClass::J => self.j_per,
            FareClass::F => self.f_per,
        }
    }

    /// 每班实际承载的乘客数
    pub fn passengers_per_flight(&self) -> f64 {
        self.y_per + self.j_per + self.f_per
    }

    /// 按空间单位加权后的客舱占用（应等于机型座位数）
    pub fn weighted_cabin_units(&self) -> f64 {
        FareClass::ALL
            .iter()
            .map(|c| self.seats_for(*c) * c.seat_space_units())
            .sum()
    }

    /// 按指定小数位格式化某舱位座位数
    pub fn format_seats(&self, class: FareClass, decimals: usize) -> String {
        format!("{:.*}", decimals, self.seats_for(class))
    }
}

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Y={:.1} J={:.1} F={:.1} flights/day={}",
            self.y_per, self.j_per, self.f_per, self.flights
        )
    }
}
