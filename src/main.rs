// ==========================================
// 航线舱位配置向导 - 命令行入口
// ==========================================
// 示例:
//   am4-config-wizard solve --dep FRA --arr MUC --aircraft "A320-200" --y 100 --j 20 --f 10
//   am4-config-wizard prefill --dep FRA --arr MUC
//   am4-config-wizard airports --country Germany
// ==========================================

use am4_config_wizard::app::{get_default_data_dir, get_default_db_path, AppState};
use am4_config_wizard::domain::WizardForm;
use am4_config_wizard::{i18n, logging};
use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct WizardCli {
    /// 预设数据库路径（默认: AM4_WIZARD_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 参考数据目录（默认: AM4_WIZARD_DATA_DIR 或 ./data）
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 输出语言（zh-CN / en）
    #[arg(long, global = true, default_value = "zh-CN")]
    locale: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 求解舱位配置与日航班数
    Solve(SolveArgs),
    /// 查询航线的历史需求
    Prefill(RouteArgs),
    /// 列出国家
    Countries,
    /// 列出机场
    Airports {
        /// 只列出该国家的机场
        #[arg(short, long)]
        country: Option<String>,
    },
    /// 列出机型
    Aircraft,
    /// 预览需求文件导入结果
    Import {
        /// CSV / Excel 文件路径
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct RouteArgs {
    /// 出发机场（IATA 或下拉选项文本）
    #[arg(long)]
    dep: String,
    /// 到达机场
    #[arg(long)]
    arr: String,
    /// 兜底需求文件
    #[arg(long)]
    demand_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SolveArgs {
    #[command(flatten)]
    route: RouteArgs,
    /// 机型名称（可带 " (座位数)" 后缀）
    #[arg(short, long)]
    aircraft: String,
    /// 经济舱需求（未给出时尝试预填）
    #[arg(long)]
    y: Option<String>,
    /// 商务舱需求
    #[arg(long)]
    j: Option<String>,
    /// 头等舱需求
    #[arg(long)]
    f: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = WizardCli::parse();
    i18n::set_locale(&cli.locale);

    tracing::info!("航线舱位配置向导 v{}", am4_config_wizard::VERSION);

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    let data_dir = cli.data_dir.clone().unwrap_or_else(get_default_data_dir);
    let state = AppState::new(db_path, data_dir).await.map_err(|e| anyhow!(e))?;
    let api = state.wizard_api.clone();

    match cli.command {
        Command::Countries => {
            for country in api.country_options() {
                println!("{}", country);
            }
        }
        Command::Airports { country } => {
            for label in api.airport_options(country.as_deref()) {
                println!("{}", label);
            }
        }
        Command::Aircraft => {
            for label in api.aircraft_options() {
                println!("{}", label);
            }
        }
        Command::Import { file } => {
            let summary = api.import_demand_file(&file)?;
            println!(
                "{}",
                i18n::t_with_args(
                    "import.done",
                    &[
                        ("routes", &summary.routes.to_string()),
                        ("skipped", &summary.skipped_rows.to_string()),
                    ],
                )
            );
        }
        Command::Prefill(route) => {
            if let Some(file) = &route.demand_file {
                api.import_demand_file(file)?;
            }
            let route_name = format!("{} - {}", route.dep, route.arr);
            let prefill = api.prefill(&route.dep, &route.arr).await;
            println!("{}", api.render_prefill(&route_name, prefill.as_ref()));
            if let Some(prefill) = prefill {
                println!("{}", prefill.demand);
            }
        }
        Command::Solve(args) => {
            if let Some(file) = &args.route.demand_file {
                api.import_demand_file(file)?;
            }

            let mut form = WizardForm {
                dep_airport: args.route.dep.clone(),
                arr_airport: args.route.arr.clone(),
                model: args.aircraft.clone(),
                ..Default::default()
            };
            if let Some(source) = api.apply_prefill(&mut form).await {
                tracing::info!(?source, "已预填需求");
            }
            // 命令行显式给出的需求覆盖预填值
            if let Some(y) = args.y {
                form.y = y;
            }
            if let Some(j) = args.j {
                form.j = j;
            }
            if let Some(f) = args.f {
                form.f = f;
            }

            match api.solve(&form) {
                Some(outcome) => {
                    for line in api.render_result(&outcome.result) {
                        println!("{}", line);
                    }
                    // 进程即将退出, 等待后台写入只为记录结果
                    if let Some(write) = outcome.pending_write {
                        let key = write.key().clone();
                        if write.finished().await {
                            tracing::info!(route = %key, "预设已保存");
                        }
                    }
                }
                None => println!("{}", i18n::t("result.none")),
            }
        }
    }

    Ok(())
}
