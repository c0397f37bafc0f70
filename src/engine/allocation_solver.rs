// ==========================================
// 航线舱位配置向导 - 舱位分配求解器
// ==========================================
// 假设: 商务舱座位占 2 个空间单位, 头等舱占 3 个, 经济舱占 1 个
// 输入: 需求三元组 + 机型座位数
// 输出: 每班各舱位座位数 + 日航班数
// ==========================================
// 前置条件不满足（无机型 / 总需求为 0 / 座位数为 0）时返回 None,
// 这代表表单未填完整, 不是错误
// ==========================================

use crate::domain::allocation::AllocationResult;
use crate::domain::reference::AircraftSpec;
use crate::domain::types::{DemandTriple, FareClass};
use tracing::instrument;

// ==========================================
// AllocationSolver - 无状态求解器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct AllocationSolver;

impl AllocationSolver {
    pub fn new() -> Self {
        Self
    }

    /// 按所选机型求解; 未选机型返回 None
    pub fn solve(
        &self,
        demand: &DemandTriple,
        aircraft: Option<&AircraftSpec>,
    ) -> Option<AllocationResult> {
        let aircraft = aircraft?;
        self.allocate(demand, aircraft.seats)
    }

    /// 按比例分配座位
    ///
    /// 1) total = y + j + f, 各舱相对占比 rel = demand / total
    /// 2) k = seats / (yRel + 2*jRel + 3*fRel), 使加权座位和等于 seats
    /// 3) 每班座位 = rel * k（不取整）
    /// 4) flights = ceil(total / (yPer + jPer + fPer))
    #[instrument(skip(self), fields(total = demand.total()))]
    pub fn allocate(&self, demand: &DemandTriple, seats: u32) -> Option<AllocationResult> {
        let total = demand.total();
        if total == 0 || seats == 0 {
            tracing::debug!(seats, "输入不完整, 不产生结果");
            return None;
        }

        let total_f = total as f64;
        let rel = |class: FareClass| f64::from(demand.get(class)) / total_f;
        let (y_rel, j_rel, f_rel) = (rel(FareClass::Y), rel(FareClass::J), rel(FareClass::F));

        let weighted_share = y_rel * FareClass::Y.seat_space_units()
            + j_rel * FareClass::J.seat_space_units()
            + f_rel * FareClass::F.seat_space_units();
        let k = f64::from(seats) / weighted_share;

        let y_per = y_rel * k;
        let j_per = j_rel * k;
        let f_per = f_rel * k;

        let flights = (total_f / (y_per + j_per + f_per)).ceil() as u64;

        Some(AllocationResult {
            y_per,
            j_per,
            f_per,
            flights,
        })
    }
}

/// 便捷函数: 直接按座位数求解
pub fn allocate(demand: &DemandTriple, seats: u32) -> Option<AllocationResult> {
    AllocationSolver.allocate(demand, seats)
}
