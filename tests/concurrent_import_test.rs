// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 同名并发解析只产生一条记录；并发对账互不破坏
// ==========================================

mod test_helpers;

use ceramic_stock::domain::ImportBatch;
use ceramic_stock::repository::{EntityKind, IdentityResolver, ProductRepository};
use std::sync::{Arc, Barrier};
use std::thread;
use test_helpers::{build_engines, create_test_db, open_shared, quantity_in};

#[test]
fn test_concurrent_resolve_same_name_yields_single_row() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let db_path = db_path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                // 每个线程独立连接，模拟多个进程/请求
                let resolver = IdentityResolver::from_connection(open_shared(&db_path));
                barrier.wait();
                resolver
                    .resolve_or_create(EntityKind::Product, "TILE A")
                    .unwrap()
            })
        })
        .collect();

    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));

    let products = ProductRepository::from_connection(open_shared(&db_path));
    assert_eq!(products.count().unwrap(), 1);
}

#[test]
fn test_concurrent_reconciliations_are_serialized() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let barrier = Arc::new(Barrier::new(2));

    let spawn = |warehouse: &'static str, quantity: i64| {
        let db_path = db_path.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            let engines = build_engines(&db_path);
            let mut batch = ImportBatch::new(vec![warehouse.to_string()]);
            batch
                .push_row("TILE BERSAMA", [quantity])
                .push_row(&format!("TILE {}", warehouse), [quantity]);
            barrier.wait();
            engines.reconciliation.reconcile(&batch).unwrap()
        })
    };

    let first = spawn("GUDANG1", 10);
    let second = spawn("GUDANG2", 20);
    assert_eq!(first.join().unwrap().unique_items_count, 2);
    assert_eq!(second.join().unwrap().unique_items_count, 2);

    let engines = build_engines(&db_path);
    let snapshot = engines.aggregator.snapshot().unwrap();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(quantity_in(&snapshot, "TILE BERSAMA", "GUDANG1"), Some(10));
    assert_eq!(quantity_in(&snapshot, "TILE BERSAMA", "GUDANG2"), Some(20));
    assert_eq!(quantity_in(&snapshot, "TILE GUDANG1", "GUDANG2"), Some(0));
}
