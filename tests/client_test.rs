use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_api::client::{
    CatalogClient, ClientError, ListFilters, ListView, ListViewState, ProductDraft,
    LOAD_ERROR_MESSAGE,
};

fn page_body(page: i64, name: &str) -> serde_json::Value {
    json!({
        "page": page,
        "limit": 6,
        "total": 1,
        "totalPages": 1,
        "data": [{
            "id": 1,
            "name": name,
            "category": "Điện tử",
            "price": 999,
            "quantity": 5,
            "description": null,
        }],
    })
}

#[tokio::test]
async fn list_sends_filters_and_parses_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "3"))
        .and(query_param("search", "Laptop"))
        .and(query_param("category", "Điện tử"))
        .and(query_param("minPrice", "100"))
        .and(query_param("maxPrice", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, "Laptop Pro")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let filters = ListFilters {
        search: "Laptop".to_string(),
        category: "Điện tử".to_string(),
        min_price: Some(100),
        max_price: Some(2000),
    };
    let page = client.list(2, 3, &filters).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].name, "Laptop Pro");
}

#[tokio::test]
async fn create_returns_the_bare_integer_id() {
    let server = MockServer::start().await;
    let draft = ProductDraft {
        name: "Phone X".to_string(),
        category: "Điện tử".to_string(),
        price: 999,
        quantity: 5,
        description: None,
    };
    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(json!({
            "name": "Phone X",
            "category": "Điện tử",
            "price": 999,
            "quantity": 5,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(42)))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let id = client.create(&draft).await.unwrap();
    assert_eq!(id, 42);
}

#[tokio::test]
async fn api_errors_surface_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/7"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})),
        )
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    match client.get(7).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Product not found");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn rapid_filter_edits_coalesce_into_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, "Phone X")))
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let view = ListView::with_settings(client, 6, Duration::from_millis(100));

    for search in ["P", "Ph", "Pho"] {
        view.set_search(search).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "debounce should collapse rapid edits");
    assert_eq!(view.filters().await.search, "Pho");
    assert!(matches!(view.state(), ListViewState::Loaded(_)));
}

#[tokio::test]
async fn slow_stale_response_never_overwrites_a_fresh_one() {
    let server = MockServer::start().await;
    // First request drags; the retry-free second one lands long before it.
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(1, "stale"))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, "fresh")))
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let view = ListView::with_settings(client, 6, Duration::from_millis(10));

    let slow = {
        let view = view.clone();
        tokio::spawn(async move { view.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    view.refresh().await;
    slow.await.unwrap();

    match view.state() {
        ListViewState::Loaded(page) => assert_eq!(page.data[0].name, "fresh"),
        other => panic!("expected loaded state, got {other:?}"),
    }
}

#[tokio::test]
async fn page_changes_skip_the_debounce() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, "Phone X")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    // Debounce long enough that only an immediate fetch can satisfy the mock.
    let view = ListView::with_settings(client, 6, Duration::from_secs(30));

    view.set_page(2).await;

    match view.state() {
        ListViewState::Loaded(page) => assert_eq!(page.page, 2),
        other => panic!("expected loaded state, got {other:?}"),
    }
}

#[tokio::test]
async fn filter_edits_reset_the_page_to_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, "Phone X")))
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let view = ListView::with_settings(client, 6, Duration::from_millis(10));

    view.set_page(3).await;
    assert_eq!(view.page().await, 3);

    view.set_category("Sách").await;
    assert_eq!(view.page().await, 1);
}

#[tokio::test]
async fn fetch_failures_use_the_generic_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "disk I/O error"})),
        )
        .mount(&server)
        .await;

    let client = CatalogClient::new(server.uri());
    let view = ListView::with_settings(client, 6, Duration::from_millis(10));

    view.refresh().await;

    assert_eq!(
        view.state(),
        ListViewState::Failed(LOAD_ERROR_MESSAGE.to_string())
    );
}
