// ==========================================
// 向导完整流程 E2E 测试
// ==========================================
// 测试目标: 选择航线 → 预填 → 求解 → 后台保存 → 重启后预填
// ==========================================


use am4_config_wizard::api::PrefillSource;
use am4_config_wizard::app::AppState;
use am4_config_wizard::config::{config_keys, ConfigManager};
use am4_config_wizard::domain::DemandTriple;
use am4_config_wizard::logging;
use am4_config_wizard::repository::{KvStore, MemoryKvStore, ReferenceData, SqliteKvStore};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use test_helpers::{create_reference_dir, create_test_db, form};

async fn open_state(db_path: &str, data_dir: &std::path::Path) -> AppState {
    AppState::new(db_path.to_string(), data_dir.to_path_buf())
        .await
        .expect("Failed to create AppState")
}

#[tokio::test]
async fn test_solve_saves_preset_for_next_session() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();

    // 第一次会话: 无预设, 手工输入需求并求解
    let state = open_state(&db_path, data_dir.path()).await;
    let api = &state.wizard_api;
    assert!(api.prefill("FRA", "MUC").await.is_none());

    let outcome = api
        .solve(&form(
            "FRA / EDDF - Frankfurt",
            "MUC / EDDM - Munich",
            "A320-200 (180)",
            "100",
            "20",
            "10",
        ))
        .expect("solve should produce a result");
    assert_eq!(outcome.aircraft.seats, 180);
    assert_eq!(outcome.result.flights, 1);

    let lines = api.render_result(&outcome.result);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("105.9"));
    assert!(lines[3].ends_with("1.0"));

    let write = outcome.pending_write.expect("write should be scheduled");
    assert!(write.finished().await);
    drop(state);

    // 第二次会话: 反向选择同一航线, 预填命中
    let state = open_state(&db_path, data_dir.path()).await;
    assert_eq!(state.cache.len(), 1);

    let mut next = form("MUC", "FRA", "", "", "", "");
    let source = state.wizard_api.apply_prefill(&mut next).await;
    assert_eq!(source, Some(PrefillSource::Preset));
    assert_eq!((next.y.as_str(), next.j.as_str(), next.f.as_str()), ("100", "20", "10"));
}

#[tokio::test]
async fn test_legacy_preset_key_prefills_after_restart() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();

    let store = SqliteKvStore::new(&db_path).expect("Failed to open kv store");
    store
        .set("presets/MUC_FRA", json!({"y": 7, "j": 3, "f": 1}))
        .await
        .unwrap();
    drop(store);

    let state = open_state(&db_path, data_dir.path()).await;
    assert_eq!(state.cache.cached("FRA", "MUC"), Some(DemandTriple::new(7, 3, 1)));

    let prefill = state.wizard_api.prefill("FRA", "MUC").await.unwrap();
    assert_eq!(prefill.source, PrefillSource::Preset);
    assert_eq!(prefill.demand, DemandTriple::new(7, 3, 1));
}

#[tokio::test]
async fn test_later_solve_overwrites_preset() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();
    let state = open_state(&db_path, data_dir.path()).await;
    let api = &state.wizard_api;

    for demand in ["100", "250"] {
        let outcome = api
            .solve(&form("JFK", "LHR", "B777-300ER", demand, "0", "0"))
            .unwrap();
        assert!(outcome.pending_write.unwrap().finished().await);
    }

    let prefill = api.prefill("LHR", "JFK").await.unwrap();
    assert_eq!(prefill.demand, DemandTriple::new(250, 0, 0));
}

#[tokio::test]
async fn test_incomplete_form_shows_no_result_and_saves_nothing() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();
    let state = open_state(&db_path, data_dir.path()).await;
    let api = &state.wizard_api;

    // 未选机型
    assert!(api.solve(&form("FRA", "MUC", "", "100", "0", "0")).is_none());
    // 需求全为 0 或非法
    assert!(api.solve(&form("FRA", "MUC", "A320-200", "0", "abc", "")).is_none());
    // 座位数为 0
    assert!(api.solve(&form("FRA", "MUC", "Broken", "100", "0", "0")).is_none());

    // 缺少到达机场: 有结果但不保存
    let outcome = api.solve(&form("FRA", "", "A320-200", "100", "0", "0")).unwrap();
    assert!(outcome.pending_write.is_none());

    assert!(state.store.get("presets").await.unwrap().is_none());
}

#[tokio::test]
async fn test_imported_file_fills_routes_without_preset() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();
    let state = open_state(&db_path, data_dir.path()).await;
    let api = &state.wizard_api;

    let csv_path = data_dir.path().join("demand.csv");
    fs::write(
        &csv_path,
        "Departure,Arrival,Y,J,F\nFRA,CDG,80,12,4\nJFK,LHR,300,40,12\n,MUC,1,1,1\n",
    )
    .unwrap();

    let summary = api.import_demand_file(&csv_path).unwrap();
    assert_eq!(summary.routes, 2);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(api.imported_summary(), Some(summary));

    let from_file = api.prefill("CDG", "FRA").await.unwrap();
    assert_eq!(from_file.source, PrefillSource::ImportedFile);
    assert_eq!(from_file.demand, DemandTriple::new(80, 12, 4));

    // 已保存的预设优先于导入表
    let outcome = api.solve(&form("LHR", "JFK", "B777-300ER", "310", "41", "13")).unwrap();
    assert!(outcome.pending_write.unwrap().finished().await);
    let preset = api.prefill("JFK", "LHR").await.unwrap();
    assert_eq!(preset.source, PrefillSource::Preset);
    assert_eq!(preset.demand, DemandTriple::new(310, 41, 13));

    assert!(api.import_demand_file(data_dir.path().join("missing.csv")).is_err());
}

#[tokio::test]
async fn test_config_overrides_preset_root_and_autosave() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let data_dir = create_reference_dir().unwrap();
    let reference = ReferenceData::load_from_dir(data_dir.path()).unwrap();

    let config = ConfigManager::new(Arc::clone(&store));
    config
        .set_config_value(config_keys::PRESET_ROOT, "shared/presets")
        .await
        .unwrap();
    config
        .set_config_value(config_keys::DISPLAY_DECIMALS, "2")
        .await
        .unwrap();

    let state = AppState::with_store(Arc::clone(&store), reference.clone())
        .await
        .unwrap();
    assert_eq!(state.cache.root(), "shared/presets");
    assert_eq!(state.wizard_api.options().display_decimals, 2);

    let outcome = state
        .wizard_api
        .solve(&form("FRA", "MUC", "A320-200", "100", "20", "10"))
        .unwrap();
    assert!(outcome.pending_write.unwrap().finished().await);
    assert_eq!(
        store.get("shared/presets/FRA_MUC").await.unwrap(),
        Some(json!({"y": 100, "j": 20, "f": 10}))
    );
    assert!(state.wizard_api.render_result(&outcome.result)[0].ends_with("105.88"));

    // 关闭自动保存
    config
        .set_config_value(config_keys::AUTOSAVE_PRESETS, "false")
        .await
        .unwrap();
    let state = AppState::with_store(Arc::clone(&store), reference).await.unwrap();
    let outcome = state
        .wizard_api
        .solve(&form("JFK", "LHR", "A320-200", "100", "0", "0"))
        .unwrap();
    assert!(outcome.pending_write.is_none());
}

#[tokio::test]
async fn test_reference_options() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let data_dir = create_reference_dir().unwrap();
    let state = open_state(&db_path, data_dir.path()).await;
    let api = &state.wizard_api;

    assert_eq!(
        api.country_options(),
        vec!["France", "Germany", "United Kingdom", "United States"]
    );
    assert_eq!(
        api.airport_options(Some("Germany")),
        vec!["FRA / EDDF - Frankfurt", "MUC / EDDM - Munich"]
    );
    assert!(api.aircraft_options().contains(&"A320-200 (180)".to_string()));

    let swapped = api.swap(&form("FRA", "MUC", "A320-200", "1", "2", "3"));
    assert_eq!(swapped.dep_airport, "MUC");
    assert_eq!(swapped.arr_airport, "FRA");
    assert_eq!(swapped.y, "1");
}
