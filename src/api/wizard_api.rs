// ==========================================
// 航线舱位配置向导 API
// ==========================================
// 职责: 表单工作流
// 1) 选择航线 -> 预填需求（缓存优先, 导入表兜底）
// 2) 求解 -> 舱位配置 + 日航班数, 并在后台回写预设
// 3) 交换出发/到达, 下拉选项, 需求文件导入
// ==========================================
// 说明: 存储失败只记录日志, 不影响表单流程
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::allocation::AllocationResult;
use crate::domain::form::WizardForm;
use crate::domain::reference::AircraftSpec;
use crate::domain::types::{DemandTriple, FareClass};
use crate::engine::allocation_solver::AllocationSolver;
use crate::engine::demand_input::demand_from_form;
use crate::engine::route_cache::{normalize_key, PresetWriteHandle, RouteDemandCache};
use crate::i18n;
use crate::importer::{DemandImporter, ImportSummary, ImportedDemandTable};
use crate::repository::reference_repo::{
    aircraft_label, airport_label, parse_aircraft_input, parse_airport_input, ReferenceData,
};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// 预填来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefillSource {
    /// 共享存储（或存储不可用时的本地快照）
    Preset,
    /// 导入的需求表
    ImportedFile,
}

/// 预填结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub demand: DemandTriple,
    pub source: PrefillSource,
}

/// 求解结果
pub struct SolveOutcome {
    pub demand: DemandTriple,
    pub aircraft: AircraftSpec,
    pub result: AllocationResult,
    /// 后台预设写入（未开启自动保存或航线不完整时为 None）
    pub pending_write: Option<PresetWriteHandle>,
}

/// API 运行参数（来自配置层）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    pub autosave_presets: bool,
    pub display_decimals: usize,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            autosave_presets: true,
            display_decimals: 1,
        }
    }
}

fn prefill_message_key(prefill: Option<&Prefill>) -> &'static str {
    match prefill.map(|p| p.source) {
        Some(PrefillSource::Preset) => "prefill.found",
        Some(PrefillSource::ImportedFile) => "prefill.found_imported",
        None => "prefill.not_found",
    }
}

// ==========================================
// WizardApi
// ==========================================
pub struct WizardApi {
    reference: Arc<ReferenceData>,
    cache: Arc<RouteDemandCache>,
    solver: AllocationSolver,
    importer: DemandImporter,
    imported: RwLock<Option<ImportedDemandTable>>,
    options: WizardOptions,
}

impl WizardApi {
    pub fn new(
        reference: Arc<ReferenceData>,
        cache: Arc<RouteDemandCache>,
        options: WizardOptions,
    ) -> Self {
        Self {
            reference,
            cache,
            solver: AllocationSolver::new(),
            importer: DemandImporter::new(),
            imported: RwLock::new(None),
            options,
        }
    }

    pub fn options(&self) -> WizardOptions {
        self.options
    }

    // ==========================================
    // 下拉选项
    // ==========================================

    pub fn country_options(&self) -> Vec<String> {
        self.reference.countries()
    }

    pub fn airport_options(&self, country: Option<&str>) -> Vec<String> {
        self.reference
            .airports_in(country)
            .into_iter()
            .map(airport_label)
            .collect()
    }

    pub fn aircraft_options(&self) -> Vec<String> {
        self.reference.aircraft().iter().map(aircraft_label).collect()
    }

    // ==========================================
    // 预填
    // ==========================================

    /// 查询航线的历史需求
    ///
    /// 顺序: 共享存储 -> 本地快照（含启动时重新规范化的旧键） -> 导入表
    pub async fn prefill(&self, dep: &str, arr: &str) -> Option<Prefill> {
        let dep = parse_airport_input(dep);
        let arr = parse_airport_input(arr);
        if dep.is_empty() || arr.is_empty() {
            return None;
        }

        let preset = match self.cache.lookup(&dep, &arr).await {
            Ok(Some(found)) => Some(found),
            Ok(None) => self.cache.cached(&dep, &arr),
            Err(e) => {
                tracing::warn!(route = %normalize_key(&dep, &arr), error = %e, "读取预设失败, 使用本地快照");
                self.cache.cached(&dep, &arr)
            }
        };
        if let Some(demand) = preset {
            return Some(Prefill {
                demand,
                source: PrefillSource::Preset,
            });
        }

        self.imported_lookup(&dep, &arr).map(|demand| Prefill {
            demand,
            source: PrefillSource::ImportedFile,
        })
    }

    /// 按航线预填表单需求字段; 未找到时保持原值
    pub async fn apply_prefill(&self, form: &mut WizardForm) -> Option<PrefillSource> {
        let prefill = self.prefill(&form.dep_airport, &form.arr_airport).await?;
        form.y = prefill.demand.y.to_string();
        form.j = prefill.demand.j.to_string();
        form.f = prefill.demand.f.to_string();
        Some(prefill.source)
    }

    fn imported_lookup(&self, dep: &str, arr: &str) -> Option<DemandTriple> {
        let guard = self.imported.read().ok()?;
        guard.as_ref()?.lookup(dep, arr)
    }

    // ==========================================
    // 求解
    // ==========================================

    /// 求解表单
    ///
    /// # 返回
    /// - None: 未选机型 / 总需求为 0 / 座位数为 0（结果面板不显示）
    /// - Some(SolveOutcome): 结果; 预设写入在后台进行, 不需要等待
    pub fn solve(&self, form: &WizardForm) -> Option<SolveOutcome> {
        let demand = demand_from_form(form);
        let model = parse_aircraft_input(&form.model);
        let aircraft = self.reference.find_aircraft(&model);

        let result = self.solver.solve(&demand, aircraft)?;
        let aircraft = aircraft?.clone();

        tracing::info!(
            aircraft = %aircraft.name,
            seats = aircraft.seats,
            %demand,
            flights = result.flights,
            "求解完成"
        );

        let pending_write = if self.options.autosave_presets {
            let dep = parse_airport_input(&form.dep_airport);
            let arr = parse_airport_input(&form.arr_airport);
            self.cache.upsert_detached(&dep, &arr, demand)
        } else {
            None
        };

        Some(SolveOutcome {
            demand,
            aircraft,
            result,
            pending_write,
        })
    }

    /// 结果面板文本（按当前语言）
    pub fn render_result(&self, result: &AllocationResult) -> Vec<String> {
        let decimals = self.options.display_decimals;
        let seat_line = |key: &str, class: FareClass| {
            format!("{}: {}", i18n::t(key), result.format_seats(class, decimals))
        };

        vec![
            seat_line("result.y_seats", FareClass::Y),
            seat_line("result.j_seats", FareClass::J),
            seat_line("result.f_seats", FareClass::F),
            format!("{}: {:.1}", i18n::t("result.flights"), result.flights as f64),
        ]
    }

    /// 预填提示文本（按来源区分）
    pub fn render_prefill(&self, route: &str, prefill: Option<&Prefill>) -> String {
        i18n::t_with_args(prefill_message_key(prefill), &[("route", route)])
    }

    // ==========================================
    // 交换出发/到达
    // ==========================================

    pub fn swap(&self, form: &WizardForm) -> WizardForm {
        WizardForm {
            dep_country: form.arr_country.clone(),
            arr_country: form.dep_country.clone(),
            dep_airport: form.arr_airport.clone(),
            arr_airport: form.dep_airport.clone(),
            ..form.clone()
        }
    }

    // ==========================================
    // 需求文件导入
    // ==========================================

    /// 导入需求文件, 替换当前兜底表
    pub fn import_demand_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportSummary> {
        let table = self.importer.import(file_path)?;
        let summary = table.summary();

        let mut guard = self
            .imported
            .write()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        *guard = Some(table);

        Ok(summary)
    }

    /// 当前导入表的汇总
    pub fn imported_summary(&self) -> Option<ImportSummary> {
        self.imported
            .read()
            .ok()?
            .as_ref()
            .map(ImportedDemandTable::summary)
    }
}
