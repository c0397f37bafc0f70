// ==========================================
// 航线舱位配置向导 - 引擎层
// ==========================================
// 职责: 舱位分配求解 / 需求输入解析 / 航线需求缓存
// 红线: 求解器无副作用; 缓存只通过显式传入的存储句柄访问数据
// ==========================================

pub mod allocation_solver;
pub mod demand_input;
pub mod route_cache;

// 重导出核心引擎
pub use allocation_solver::{allocate, AllocationSolver};
pub use demand_input::{demand_from_form, parse_demand, parse_demand_field};
pub use route_cache::{
    lookup, normalize_key, upsert, PresetWriteHandle, RouteDemandCache, DEFAULT_PRESET_ROOT,
};
