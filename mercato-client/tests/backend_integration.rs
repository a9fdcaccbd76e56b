// mercato-client/tests/backend_integration.rs
// Runs the client against an in-process mock backend

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use mercato_client::{BackendClient, ClientConfig, ClientError};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{
    ExperimentAssignment, NewOrder, OrderLine, OrderStatus, PromoRedemption, ServiceType,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    headers: HeaderMap,
    body: String,
}

impl Recorded {
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<Route>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Unknown routes answer like a backend without that table
async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        params,
        headers,
        body,
    });

    match state
        .routes
        .iter()
        .find(|r| r.method == method && r.path == path)
    {
        Some(route) => (
            route.status,
            [(header::CONTENT_TYPE, "application/json")],
            route.body.clone(),
        )
            .into_response(),
        None => {
            let table = path.rsplit('/').next().unwrap_or_default();
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({
                    "code": "PGRST205",
                    "details": null,
                    "hint": null,
                    "message": format!("Could not find the table 'public.{}' in the schema cache", table),
                })),
            )
                .into_response()
        }
    }
}

struct MockBackend {
    url: String,
    state: MockState,
}

impl MockBackend {
    async fn start(routes: Vec<(Method, &str, u16, String)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(method, path, status, body)| Route {
                method,
                path: path.to_string(),
                status: StatusCode::from_u16(status).unwrap(),
                body,
            })
            .collect();
        let state = MockState {
            routes: Arc::new(routes),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    fn client(&self) -> BackendClient {
        ClientConfig::new(&self.url, "anon-key").build().unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    fn last(&self) -> Recorded {
        self.requests().pop().unwrap()
    }
}

fn restaurant_row(id: &str, fee: f64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Restaurant {}", id),
        "cuisine_type": "italian",
        "rating": 4.6,
        "delivery_fee": fee,
        "latitude": 40.4,
        "longitude": -3.7,
        "service_type": "food",
    })
}

fn order_row() -> serde_json::Value {
    json!([{
        "id": "o1",
        "user_id": "u1",
        "restaurant_id": "r1",
        "service_type": "food",
        "total_amount": 24.49,
        "status": "pending",
        "created_at": "2025-06-01T12:00:00Z",
    }])
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_list_restaurants_sends_filters_and_keys() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/restaurants",
        200,
        json!([restaurant_row("r1", 2.5), restaurant_row("r2", 0.0)]).to_string(),
    )])
    .await;

    let rows = backend
        .client()
        .list_restaurants(Some(ServiceType::Food))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].delivery_fee, d("2.5"));
    assert_eq!(rows[0].service_type, ServiceType::Food);

    let req = backend.last();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.header("apikey"), Some("anon-key"));
    assert_eq!(req.header("authorization"), Some("Bearer anon-key"));
    assert_eq!(req.param("select"), Some("*"));
    assert_eq!(req.param("service_type"), Some("eq.food"));
    assert_eq!(req.param("order"), Some("rating.desc,name.asc"));
}

#[tokio::test]
async fn test_access_token_is_the_bearer() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/restaurants",
        200,
        "[]".to_string(),
    )])
    .await;

    let client = backend.client().with_access_token("user-jwt");
    client.search_restaurants("pizza").await.unwrap();

    let req = backend.last();
    assert_eq!(req.header("apikey"), Some("anon-key"));
    assert_eq!(req.header("authorization"), Some("Bearer user-jwt"));
    assert_eq!(req.param("name"), Some("ilike.*pizza*"));
}

#[tokio::test]
async fn test_list_degrades_when_table_missing() {
    let backend = MockBackend::start(vec![]).await;
    let client = backend.client();

    assert!(client.list_favorites("u1").await.unwrap().is_empty());
    assert!(client.active_experiments().await.unwrap().is_empty());
    assert!(client.list_orders("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_writes_surface_missing_table() {
    let backend = MockBackend::start(vec![]).await;
    let client = backend.client();

    let err = client.add_favorite("u1", "r1").await.unwrap_err();
    assert!(matches!(err, ClientError::NotProvisioned(ref t) if t == "favorites"));

    let err = client.get_restaurant("r1").await.unwrap_err();
    assert!(err.is_not_provisioned());
}

#[tokio::test]
async fn test_missing_relation_postgres_code() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/menu_items",
        400,
        json!({"code": "42P01", "message": "relation \"public.menu_items\" does not exist"})
            .to_string(),
    )])
    .await;

    assert!(backend.client().menu_items("r1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_not_degraded() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/orders",
        401,
        json!({"message": "JWT expired"}).to_string(),
    )])
    .await;

    let err = backend.client().list_orders("u1").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_invalid_row_is_rejected() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/restaurants",
        200,
        json!([restaurant_row("r1", -1.0)]).to_string(),
    )])
    .await;

    let err = backend.client().get_restaurant("r1").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));

    let req = backend.last();
    assert_eq!(req.param("id"), Some("eq.r1"));
    assert_eq!(req.param("limit"), Some("1"));
}

#[tokio::test]
async fn test_blank_ids_never_reach_the_backend() {
    let backend = MockBackend::start(vec![]).await;
    let client = backend.client();

    assert!(matches!(
        client.get_restaurant(" ").await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        client.remove_favorite("u1", "").await,
        Err(ClientError::Validation(_))
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_create_order_posts_representation() {
    let backend = MockBackend::start(vec![(
        Method::POST,
        "/rest/v1/orders",
        201,
        order_row().to_string(),
    )])
    .await;

    let order = NewOrder {
        user_id: "u1".to_string(),
        restaurant_id: "r1".to_string(),
        service_type: ServiceType::Food,
        items: vec![OrderLine {
            menu_item_id: "m1".to_string(),
            name: "Margherita".to_string(),
            unit_price: d("10.00"),
            quantity: 2,
            special_instructions: Some("extra basil".to_string()),
        }],
        subtotal: d("20.00"),
        service_fee: d("0.90"),
        tax: Decimal::ZERO,
        delivery_fee: d("3.59"),
        discount_amount: Decimal::ZERO,
        total_amount: d("24.49"),
        promo_code: None,
        delivery_address: None,
        status: OrderStatus::Pending,
    };

    let record = backend.client().create_order(&order).await.unwrap();
    assert_eq!(record.id, "o1");
    assert_eq!(record.total_amount, d("24.49"));
    assert_eq!(record.status, OrderStatus::Pending);

    let req = backend.last();
    assert_eq!(req.header("prefer"), Some("return=representation"));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["total_amount"], 24.49);
    assert!(body.get("promo_code").is_none());
}

#[tokio::test]
async fn test_create_order_guards() {
    let backend = MockBackend::start(vec![]).await;
    let order = NewOrder {
        user_id: "u1".to_string(),
        restaurant_id: "r1".to_string(),
        service_type: ServiceType::Food,
        items: vec![],
        subtotal: Decimal::ZERO,
        service_fee: Decimal::ZERO,
        tax: Decimal::ZERO,
        delivery_fee: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        total_amount: Decimal::ZERO,
        promo_code: None,
        delivery_address: None,
        status: OrderStatus::Pending,
    };

    let err = backend.client().create_order(&order).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_favorites_upsert_and_delete() {
    let backend = MockBackend::start(vec![
        (
            Method::POST,
            "/rest/v1/favorites",
            201,
            json!([{"user_id": "u1", "restaurant_id": "r1"}]).to_string(),
        ),
        (Method::DELETE, "/rest/v1/favorites", 204, String::new()),
    ])
    .await;
    let client = backend.client();

    client.add_favorite("u1", "r1").await.unwrap();
    let upsert = backend.last();
    assert_eq!(upsert.param("on_conflict"), Some("user_id,restaurant_id"));
    assert_eq!(
        upsert.header("prefer"),
        Some("resolution=merge-duplicates,return=representation")
    );

    client.remove_favorite("u1", "r1").await.unwrap();
    let delete = backend.last();
    assert_eq!(delete.method, Method::DELETE);
    assert_eq!(delete.param("user_id"), Some("eq.u1"));
    assert_eq!(delete.param("restaurant_id"), Some("eq.r1"));
    assert!(delete.param("select").is_none());
}

#[tokio::test]
async fn test_promo_lookup_and_usage() {
    let backend = MockBackend::start(vec![
        (
            Method::GET,
            "/rest/v1/promo_codes",
            200,
            json!([{
                "id": "p1",
                "code": "SAVE10",
                "discount_type": "percentage",
                "discount_value": 10,
                "max_discount_amount": 20,
                "is_active": true,
            }])
            .to_string(),
        ),
        (
            Method::GET,
            "/rest/v1/promo_code_usage",
            200,
            json!([{"promo_code_id": "p1"}, {"promo_code_id": "p1"}]).to_string(),
        ),
        (
            Method::POST,
            "/rest/v1/promo_code_usage",
            201,
            "[]".to_string(),
        ),
        (
            Method::POST,
            "/rest/v1/rpc/increment_promo_usage",
            204,
            String::new(),
        ),
    ])
    .await;
    let client = backend.client();

    let promo = client.find_promo_code(" save10 ").await.unwrap().unwrap();
    assert_eq!(promo.id, "p1");
    assert_eq!(promo.max_discount_amount, Some(d("20")));
    assert_eq!(backend.last().param("code"), Some("eq.SAVE10"));

    assert_eq!(client.promo_redemption_count("p1", "u1").await.unwrap(), 2);

    client
        .record_promo_redemption(&PromoRedemption {
            promo_code_id: "p1".to_string(),
            user_id: "u1".to_string(),
            order_id: Some("o1".to_string()),
            discount_amount: d("20"),
        })
        .await
        .unwrap();

    client.increment_promo_usage("p1").await.unwrap();
    let rpc = backend.last();
    assert_eq!(rpc.path, "/rest/v1/rpc/increment_promo_usage");
    let args: serde_json::Value = serde_json::from_str(&rpc.body).unwrap();
    assert_eq!(args, json!({"promo_id": "p1"}));
}

#[tokio::test]
async fn test_missing_function_is_not_provisioned() {
    let backend = MockBackend::start(vec![(
        Method::POST,
        "/rest/v1/rpc/increment_promo_usage",
        404,
        json!({"code": "PGRST202", "message": "Could not find the function"}).to_string(),
    )])
    .await;

    let err = backend
        .client()
        .increment_promo_usage("p1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotProvisioned(ref f) if f == "increment_promo_usage"));
}

#[tokio::test]
async fn test_record_assignment_upserts() {
    let backend = MockBackend::start(vec![(
        Method::POST,
        "/rest/v1/experiment_assignments",
        201,
        json!([{"experiment_id": "e1", "user_id": "u1", "variant": "green"}]).to_string(),
    )])
    .await;

    backend
        .client()
        .record_assignment(&ExperimentAssignment {
            experiment_id: "e1".to_string(),
            user_id: "u1".to_string(),
            variant: "green".to_string(),
        })
        .await
        .unwrap();

    let req = backend.last();
    assert_eq!(req.param("on_conflict"), Some("experiment_id,user_id"));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["variant"], "green");
}

#[tokio::test]
async fn test_backend_error_details() {
    let backend = MockBackend::start(vec![(
        Method::GET,
        "/rest/v1/restaurants",
        500,
        json!({"code": "XX000", "message": "internal failure"}).to_string(),
    )])
    .await;

    match backend.client().list_restaurants(None).await.unwrap_err() {
        ClientError::Backend {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 500);
            assert_eq!(code, "XX000");
            assert_eq!(message, "internal failure");
        }
        other => panic!("unexpected {:?}", other),
    }
}
