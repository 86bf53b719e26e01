// ==========================================
// 导入 API 端到端测试
// ==========================================
// 测试目标: AppState 组装 → CSV 导入 → 快照查询 → 错误分类
// ==========================================

mod test_helpers;

use ceramic_stock::api::{ApiError, ErrorClass};
use ceramic_stock::app::AppState;
use ceramic_stock::config::{config_keys, CatalogRules, KeywordMatcher};
use ceramic_stock::domain::{Category, StockQuery};
use ceramic_stock::logging;
use test_helpers::{create_test_db, write_csv};

#[tokio::test]
async fn test_csv_import_then_query() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    let csv = write_csv(
        "Item,Gudang X,Gudang Y,Unnamed: 3\n\
         TILE A KW1,10,0,catatan\n\
         TILE A,5,,\n\
         ,7,7,\n\
         PINGUL ARWANA,3,4,\n",
    );

    let response = state
        .import_api
        .import_file(csv.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(response.unique_items_count, 2);
    assert_eq!(response.warehouse_names, vec!["Gudang X", "Gudang Y"]);
    assert!(!response.message.is_empty());

    let stock = state.stock_api.get_stock(&StockQuery::default()).unwrap();
    assert_eq!(stock.len(), 2);
    assert_eq!(stock[0].canonical_name, "PINGUL ARWANA");
    assert_eq!(stock[0].total_quantity, 7);
    assert_eq!(stock[1].canonical_name, "TILE A");
    assert_eq!(stock[1].per_warehouse.get("Gudang X"), Some(&5));

    let pingul_only = state
        .stock_api
        .get_stock(&StockQuery {
            search: None,
            category: Some(Category::Pingul),
        })
        .unwrap();
    assert_eq!(pingul_only.len(), 1);

    let groups = state
        .stock_api
        .get_stock_by_category(&StockQuery::default())
        .unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].category, Category::Pingul);
    assert_eq!(groups.last().unwrap().category, Category::Lainnya);
}

#[tokio::test]
async fn test_structural_errors_are_client_errors() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    let wrong_header = write_csv("Nama,Gudang X\nTILE A,1\n");
    let err = state
        .import_api
        .import_file(wrong_header.path().to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
    assert_eq!(err.class(), ErrorClass::Client);

    let no_warehouses = write_csv("Item,Unnamed: 1\nTILE A,1\n");
    let err = state
        .import_api
        .import_file(no_warehouses.path().to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = state
        .import_api
        .import_file("/tidak/ada/stok.xlsx")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(err.is_client_error());

    // 结构错误不产生任何写入
    assert!(state
        .stock_api
        .get_stock(&StockQuery::default())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_catalog_rules_override_applies_after_restart() {
    let (_tmp, db_path) = create_test_db().unwrap();

    {
        let state = AppState::new(db_path.clone()).unwrap();
        let mut rules = CatalogRules::default();
        rules.classification.rules[0]
            .any_of
            .push(KeywordMatcher::Contains("bullnose".to_string()));
        state.config_manager.save_catalog_rules(&rules).unwrap();
        assert!(state
            .config_manager
            .get_global_config_value(config_keys::CATALOG_RULES)
            .unwrap()
            .is_some());
        state.stock_api.add_product("BULLNOSE 10X60").unwrap();
    }

    // 规则在启动时加载，分类在读取时计算
    let state = AppState::new(db_path).unwrap();
    let stock = state.stock_api.get_stock(&StockQuery::default()).unwrap();
    assert_eq!(stock[0].category, Category::Pingul);
}
