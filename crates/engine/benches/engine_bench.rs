use criterion::{Criterion, criterion_group, criterion_main};
use domain::{AisleLocation, CustomerType, InventoryType, Money, ShelfLevel, Temperature};
use engine::StoreService;

fn stocked_service() -> StoreService {
    let service = StoreService::new();
    service.provision_store("S1", "Bench", "1 Bench St").unwrap();
    service
        .provision_aisle("S1", "A1", "Aisle", "bench", AisleLocation::Floor)
        .unwrap();
    service
        .provision_shelf("S1", "A1", "SH1", "Shelf", ShelfLevel::Medium, "bench", Temperature::Ambient)
        .unwrap();
    service
        .provision_product("P1", "Widget", "bench", "1", "misc", Money::from_cents(100), Temperature::Ambient)
        .unwrap();
    service
        .provision_inventory("I1", "S1", "A1", "SH1", 1_000_000, 1_000_000, "P1", InventoryType::Standard)
        .unwrap();
    service
        .provision_customer("C1", "Bench", "User", CustomerType::Registered, "b@example.com", "x", None)
        .unwrap();
    service.provision_basket("B1").unwrap();
    service.update_customer("C1", "S1", "A1").unwrap();
    service.assign_customer_basket("C1", "B1").unwrap();
    service
}

fn bench_provision_store(c: &mut Criterion) {
    c.bench_function("engine/provision_store_hierarchy", |b| {
        b.iter(|| {
            let service = StoreService::new();
            service.provision_store("S1", "Bench", "1 Bench St").unwrap();
            for aisle in 0..10 {
                let aisle_id = format!("A{aisle}");
                service
                    .provision_aisle("S1", &aisle_id, "Aisle", "bench", AisleLocation::Floor)
                    .unwrap();
                service
                    .provision_shelf("S1", &aisle_id, "SH1", "Shelf", ShelfLevel::Low, "bench", Temperature::Ambient)
                    .unwrap();
            }
        });
    });
}

fn bench_add_remove(c: &mut Criterion) {
    let service = stocked_service();

    c.bench_function("engine/add_then_remove_basket_item", |b| {
        b.iter(|| {
            service.add_product_to_basket("B1", "P1", 3).unwrap();
            service.remove_product_from_basket("B1", "P1", 3).unwrap();
        });
    });
}

fn bench_clear_basket(c: &mut Criterion) {
    let service = stocked_service();

    c.bench_function("engine/fill_and_clear_basket", |b| {
        b.iter(|| {
            service.add_product_to_basket("B1", "P1", 5).unwrap();
            service.clear_basket("B1").unwrap();
        });
    });
}

criterion_group!(benches, bench_provision_store, bench_add_remove, bench_clear_basket);
criterion_main!(benches);
