// ==========================================
// 航线舱位配置向导 - 表单状态
// ==========================================
// 说明: 需求字段保留原始文本, 解析在求解时进行（非法文本按 0 处理）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardForm {
    // ===== 航线 =====
    pub dep_country: String,
    pub arr_country: String,
    pub dep_airport: String,
    pub arr_airport: String,

    // ===== 机型 =====
    pub model: String,

    // ===== 需求（原始输入文本）=====
    pub y: String,
    pub j: String,
    pub f: String,
}

impl WizardForm {
    /// 两端机场是否都已填写
    pub fn has_route(&self) -> bool {
        !self.dep_airport.trim().is_empty() && !self.arr_airport.trim().is_empty()
    }
}
