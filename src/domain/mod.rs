// ==========================================
// 航线舱位配置向导 - 领域模型层
// ==========================================
// 职责: 定义需求、航线键、参考数据、分配结果
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod form;
pub mod reference;
pub mod types;

// 重导出核心类型
pub use allocation::AllocationResult;
pub use form::WizardForm;
pub use reference::{AircraftSpec, Airport};
pub use types::{DemandTriple, FareClass, RouteKey, ROUTE_KEY_DELIMITER};
