// ==========================================
// 航线舱位配置向导 - API 层
// ==========================================
// 职责: 面向表单/命令行的业务接口
// ==========================================

pub mod error;
pub mod wizard_api;

pub use error::{ApiError, ApiResult};
pub use wizard_api::{Prefill, PrefillSource, SolveOutcome, WizardApi, WizardOptions};
