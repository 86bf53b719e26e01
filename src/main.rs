// ==========================================
// 陶瓷库存系统 - 命令行主入口
// ==========================================
// 结果以 JSON 输出到 stdout，日志写 stderr
//
// 用法:
//   ceramic-stock [--db <path>] <command> [args]
//
// 命令:
//   import <file>                       导入 .xlsx/.xls/.csv 库存表
//   upload <file>                       按上传规则导入（仅 .xlsx/.xls）
//   stock [--search <kw>] [--category <c>] [--group]
//   warehouses
//   add-product <name>
//   add-warehouse <name>
//   delete-product <id>
//   delete-warehouse <id>
//   set-stock <product_id> <warehouse_id> <quantity>
//   config
// ==========================================

use anyhow::{anyhow, bail, Context};
use ceramic_stock::api::{ApiError, ErrorClass};
use ceramic_stock::app::{get_default_db_path, locale_from_env, AppState};
use ceramic_stock::domain::{Category, StockQuery};
use ceramic_stock::i18n;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "用法: ceramic-stock [--db <path>] <import|upload|stock|warehouses|add-product|add-warehouse|delete-product|delete-warehouse|set-stock|config> [args]";

#[tokio::main]
async fn main() -> ExitCode {
    ceramic_stock::logging::init();

    match run(std::env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ApiError>() {
                Some(api_err) => eprintln!(
                    "{}",
                    json!({ "error": api_err.to_string(), "class": api_err.class() })
                ),
                None => {
                    eprintln!("{:#}", e);
                    eprintln!("{}", USAGE);
                }
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// 退出码: 1 客户端错误, 2 服务端/启动错误, 64 用法错误
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ApiError>().map(ApiError::class) {
        Some(ErrorClass::Client) => 1,
        Some(ErrorClass::Server) => 2,
        None => 64,
    }
}

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let mut db_path: Option<String> = None;
    let mut rest: Vec<String> = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            db_path = Some(iter.next().ok_or_else(|| anyhow!("--db 缺少参数"))?);
        } else {
            rest.push(arg);
        }
    }

    let Some((command, params)) = rest.split_first() else {
        bail!("缺少命令");
    };

    if let Some(locale) = locale_from_env() {
        i18n::set_locale(&locale);
    }

    let db_path = db_path.unwrap_or_else(get_default_db_path);
    tracing::info!("系统版本: {}, 数据库: {}", ceramic_stock::VERSION, db_path);
    // 数据库或目录规则无法加载属于服务端错误
    let state = AppState::new(db_path).map_err(ApiError::InternalError)?;

    match command.as_str() {
        "import" => {
            let file = positional(params, 0, "file")?;
            let response = state.import_api.import_file(file).await?;
            print_json(&response)
        }
        "upload" => {
            let file = positional(params, 0, "file")?;
            let bytes = std::fs::read(file).with_context(|| format!("无法读取文件: {}", file))?;
            let file_name = Path::new(file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.to_string());
            let response = state.import_api.import_upload(&file_name, &bytes).await?;
            print_json(&response)
        }
        "stock" => {
            let (query, grouped) = parse_stock_query(params)?;
            if grouped {
                print_json(&state.stock_api.get_stock_by_category(&query)?)
            } else {
                print_json(&state.stock_api.get_stock(&query)?)
            }
        }
        "warehouses" => print_json(&state.stock_api.list_warehouses()?),
        "add-product" => {
            let name = positional(params, 0, "name")?;
            let product = state.stock_api.add_product(name)?;
            let message =
                i18n::t_with_args("stock.product_added", &[("name", product.canonical_name.as_str())]);
            print_json(&json!({ "message": message, "product": product }))
        }
        "add-warehouse" => {
            let name = positional(params, 0, "name")?;
            let warehouse = state.stock_api.add_warehouse(name)?;
            let message =
                i18n::t_with_args("stock.warehouse_added", &[("name", warehouse.name.as_str())]);
            print_json(&json!({ "message": message, "warehouse": warehouse }))
        }
        "delete-product" => {
            let id = parse_i64(positional(params, 0, "id")?)?;
            state.stock_api.delete_product(id)?;
            print_json(&json!({ "message": i18n::t("common.success") }))
        }
        "delete-warehouse" => {
            let id = parse_i64(positional(params, 0, "id")?)?;
            state.stock_api.delete_warehouse(id)?;
            print_json(&json!({ "message": i18n::t("common.success") }))
        }
        "set-stock" => {
            let product_id = parse_i64(positional(params, 0, "product_id")?)?;
            let warehouse_id = parse_i64(positional(params, 1, "warehouse_id")?)?;
            let quantity = parse_i64(positional(params, 2, "quantity")?)?;
            print_json(&state.stock_api.update_stock(product_id, warehouse_id, quantity)?)
        }
        "config" => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!("配置读取失败: {}", e))?;
            println!("{}", snapshot);
            Ok(())
        }
        other => bail!("未知命令: {}", other),
    }
}

fn positional<'a>(params: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    params
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("缺少参数: <{}>", name))
}

fn parse_i64(value: &str) -> anyhow::Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("不是有效整数: {}", value))
}

fn parse_stock_query(params: &[String]) -> anyhow::Result<(StockQuery, bool)> {
    let mut query = StockQuery::default();
    let mut grouped = false;

    let mut iter = params.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--search" => {
                query.search = Some(iter.next().ok_or_else(|| anyhow!("--search 缺少参数"))?.clone());
            }
            "--category" => {
                let raw = iter.next().ok_or_else(|| anyhow!("--category 缺少参数"))?;
                query.category = Some(raw.parse::<Category>().map_err(|e| anyhow!(e))?);
            }
            "--group" => grouped = true,
            other => bail!("未知选项: {}", other),
        }
    }

    Ok((query, grouped))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
