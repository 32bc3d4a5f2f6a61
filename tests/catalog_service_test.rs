mod common;

use catalog_api::errors::ServiceError;
use catalog_api::services::catalog::{ProductFields, ProductQuery};
use catalog_api::services::ProductCatalogService;

use common::TestApp;

fn fields(name: &str, category: &str, price: i64, quantity: i64) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        category: category.to_string(),
        price,
        quantity,
        description: None,
    }
}

#[tokio::test]
async fn list_orders_rows_by_id() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());

    let first = service.create(fields("Một", "Khác", 1, 1)).await.unwrap();
    let second = service.create(fields("Hai", "Khác", 2, 1)).await.unwrap();
    let third = service.create(fields("Ba", "Khác", 3, 1)).await.unwrap();

    let listing = service.list(&ProductQuery::default()).await.unwrap();
    assert_eq!(listing.total, 3);
    let ids: Vec<i64> = listing.rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[tokio::test]
async fn price_bounds_are_inclusive_and_zero_min_is_ignored() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());
    for (name, price) in [("A sản phẩm", 0), ("B sản phẩm", 100), ("C sản phẩm", 200)] {
        service.create(fields(name, "Khác", price, 1)).await.unwrap();
    }

    let listing = service
        .list(&ProductQuery {
            min_price: 100,
            max_price: Some(200),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listing.total, 2);

    // min_price of zero leaves the zero-priced row in.
    let listing = service
        .list(&ProductQuery {
            min_price: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listing.total, 3);
}

#[tokio::test]
async fn offset_saturates_for_enormous_page_values() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());
    service.create(fields("Phone X", "Điện tử", 500, 10)).await.unwrap();

    let listing = service
        .list(&ProductQuery {
            page: i64::MAX,
            limit: 3,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listing.total, 1);
    assert!(listing.rows.is_empty());
}

#[tokio::test]
async fn get_update_delete_report_missing_rows() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());

    for result in [
        service.get(42).await.map(|_| ()),
        service.update(42, fields("Ghost", "Khác", 1, 1)).await,
        service.delete(42).await,
    ] {
        match result {
            Err(ServiceError::NotFound(message)) => {
                assert_eq!(message, "Product not found");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn categories_are_distinct_and_sorted() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());
    for (name, category) in [
        ("Tai nghe", "Điện tử"),
        ("Laptop", "Điện tử"),
        ("Áo thun", "Quần áo"),
    ] {
        service.create(fields(name, category, 10, 1)).await.unwrap();
    }

    let categories = service.categories().await.unwrap();
    assert_eq!(categories, vec!["Quần áo".to_string(), "Điện tử".to_string()]);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let app = TestApp::spawn().await;
    let service = ProductCatalogService::new(app.db.clone());
    let id = service.create(fields("Phone X", "Điện tử", 999, 5)).await.unwrap();

    service
        .update(
            id,
            ProductFields {
                name: "Phone X Pro".to_string(),
                category: "Điện tử".to_string(),
                price: 1099,
                quantity: 3,
                description: Some("Bản nâng cấp".to_string()),
            },
        )
        .await
        .unwrap();

    let fetched = service.get(id).await.unwrap();
    assert_eq!(fetched.name, "Phone X Pro");
    assert_eq!(fetched.price, 1099);
    assert_eq!(fetched.quantity, 3);
    assert_eq!(fetched.description.as_deref(), Some("Bản nâng cấp"));
}
