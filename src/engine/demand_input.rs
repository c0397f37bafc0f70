// ==========================================
// 航线舱位配置向导 - 需求输入解析
// ==========================================
// 规则: 取前导整数部分（跳过前导空白, 允许正负号）
// - 无数字 -> 0
// - 负数 -> 0（需求非负）
// - 溢出 -> u32::MAX
// 非法文本从不作为错误向上传递
// ==========================================

use crate::domain::form::WizardForm;
use crate::domain::types::DemandTriple;

/// 解析单个需求字段
pub fn parse_demand_field(text: &str) -> u32 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };

    if digits.is_empty() || negative {
        return 0;
    }

    digits
        .bytes()
        .try_fold(0_u32, |acc, b| {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        })
        .unwrap_or(u32::MAX)
}

/// 从表单文本解析需求三元组
pub fn parse_demand(y: &str, j: &str, f: &str) -> DemandTriple {
    DemandTriple::new(parse_demand_field(y), parse_demand_field(j), parse_demand_field(f))
}

/// 从表单中解析需求
pub fn demand_from_form(form: &WizardForm) -> DemandTriple {
    parse_demand(&form.y, &form.j, &form.f)
}
