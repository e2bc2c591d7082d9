use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
};

use std::{sync::Arc, time::Duration};

use crate::{ServerError, dashboard};
use engine::{Dashboard, ExpenseStore};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ServerState<S> {
    pub dashboard: Arc<Dashboard<S>>,
}

impl<S> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
        }
    }
}

/// Tunables for the HTTP layer.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    /// Requests running longer than this are answered with 408.
    pub request_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

async fn request_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => {
            tracing::debug!("{method} {uri} -> {}", response.status());
            Ok(response)
        }
        Err(_) => {
            tracing::warn!("{method} {uri} timed out after {}ms", limit.as_millis());
            Err(ServerError::Timeout(limit))
        }
    }
}

pub fn router<S: ExpenseStore + 'static>(state: ServerState<S>, options: ServerOptions) -> Router {
    Router::new()
        .route(
            "/api/dashboard/{username}/total-sum",
            get(dashboard::total_sum::<S>),
        )
        .route(
            "/api/dashboard/{username}/sum-by-type",
            get(dashboard::sum_by_type::<S>),
        )
        .route(
            "/api/dashboard/{username}/count-by-type",
            get(dashboard::count_by_type::<S>),
        )
        .route(
            "/api/dashboard/{username}/count-total",
            get(dashboard::count_total::<S>),
        )
        .route(
            "/api/dashboard/{username}/balances",
            get(dashboard::balances::<S>),
        )
        .route(
            "/api/dashboard/{username}/settlement",
            get(dashboard::settlement::<S>),
        )
        .route(
            "/api/dashboard/{username}/expenses",
            get(dashboard::expenses::<S>),
        )
        .route(
            "/api/dashboard/{username}/reset",
            delete(dashboard::reset::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            options.request_timeout,
            request_timeout,
        ))
        .with_state(state)
}

pub async fn run_with_listener<S: ExpenseStore + 'static>(
    dashboard: Dashboard<S>,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        dashboard: Arc::new(dashboard),
    };

    axum::serve(listener, router(state, options)).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use engine::{DatabaseStore, EngineError, Expense, MoneyCents, NewExpense, Share};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn database() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn app<S: ExpenseStore + 'static>(store: S) -> Router {
        let state = ServerState {
            dashboard: Arc::new(Dashboard::new(store)),
        };
        router(state, ServerOptions::default())
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn record(
        store: &DatabaseStore,
        username: &str,
        category: &str,
        cents: i64,
        paid_by: &str,
        participants: &[&str],
    ) {
        store
            .record_expense(NewExpense {
                username: username.to_string(),
                category: category.to_string(),
                description: None,
                amount: MoneyCents::new(cents),
                paid_by: paid_by.to_string(),
                shares: participants.iter().map(|name| Share::equal(*name)).collect(),
            })
            .await
            .unwrap();
    }

    struct DownStore;

    impl ExpenseStore for DownStore {
        async fn find_expenses_by_user(&self, _: &str) -> Result<Vec<Expense>, EngineError> {
            Err(EngineError::StoreUnavailable("connection refused".to_string()))
        }

        async fn delete_expenses_by_user(&self, _: &str) -> Result<u64, EngineError> {
            Err(EngineError::StoreUnavailable("connection refused".to_string()))
        }
    }

    struct SlowStore;

    impl ExpenseStore for SlowStore {
        async fn find_expenses_by_user(&self, _: &str) -> Result<Vec<Expense>, EngineError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn delete_expenses_by_user(&self, _: &str) -> Result<u64, EngineError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn three_way_split_end_to_end() {
        let store = DatabaseStore::new(database().await);
        record(&store, "trip", "food", 3000, "A", &["A", "B", "C"]).await;
        let app = app(store);

        let (status, body) = send(&app, "GET", "/api/dashboard/trip/balances").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"A": 20.0, "B": -10.0, "C": -10.0}));

        let (status, body) = send(&app, "GET", "/api/dashboard/trip/settlement").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"B": ["pay A 10"], "C": ["pay A 10"]}));

        let (_, body) = send(&app, "GET", "/api/dashboard/trip/total-sum").await;
        assert_eq!(body, json!(30.0));

        let (_, body) = send(&app, "GET", "/api/dashboard/trip/count-total").await;
        assert_eq!(body, json!(1));
    }

    #[tokio::test]
    async fn breakdowns_by_type() {
        let store = DatabaseStore::new(database().await);
        record(&store, "flat", "rent", 120000, "ann", &["ann", "bob"]).await;
        record(&store, "flat", "food", 2550, "bob", &["ann", "bob"]).await;
        record(&store, "flat", "food", 1000, "ann", &["ann", "bob"]).await;
        record(&store, "other", "food", 99999, "zed", &["zed"]).await;
        let app = app(store);

        let (_, body) = send(&app, "GET", "/api/dashboard/flat/sum-by-type").await;
        assert_eq!(body, json!({"food": 35.5, "rent": 1200.0}));

        let (_, body) = send(&app, "GET", "/api/dashboard/flat/count-by-type").await;
        assert_eq!(body, json!({"food": 2, "rent": 1}));

        let (_, body) = send(&app, "GET", "/api/dashboard/flat/total-sum").await;
        assert_eq!(body, json!(1235.5));

        let (status, body) = send(&app, "GET", "/api/dashboard/flat/expenses").await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|expense| expense["username"] == "flat"));
        assert_eq!(
            list[0]["participants"],
            json!([{"name": "ann", "share": null}, {"name": "bob", "share": null}])
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_results() {
        let app = app(DatabaseStore::new(database().await));

        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/total-sum").await.1, json!(0.0));
        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/count-total").await.1, json!(0));
        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/sum-by-type").await.1, json!({}));
        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/balances").await.1, json!({}));
        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/settlement").await.1, json!({}));
        assert_eq!(send(&app, "GET", "/api/dashboard/nobody/expenses").await.1, json!([]));
    }

    #[tokio::test]
    async fn reset_clears_dashboard_and_is_idempotent() {
        let store = DatabaseStore::new(database().await);
        record(&store, "trip", "food", 3000, "A", &["A", "B"]).await;
        record(&store, "keep", "food", 500, "A", &["A", "B"]).await;
        let app = app(store);

        let (status, body) = send(&app, "DELETE", "/api/dashboard/trip/reset").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        assert_eq!(send(&app, "GET", "/api/dashboard/trip/total-sum").await.1, json!(0.0));
        assert_eq!(send(&app, "GET", "/api/dashboard/keep/total-sum").await.1, json!(5.0));

        let (status, _) = send(&app, "DELETE", "/api/dashboard/trip/reset").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn malformed_username_is_bad_request() {
        let app = app(DatabaseStore::new(database().await));

        let (status, body) = send(&app, "GET", "/api/dashboard/bad%20name/total-sum").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid username"));

        let (status, _) = send(&app, "DELETE", "/api/dashboard/a;b/reset").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failures_are_server_errors() {
        let app_down = app(DownStore);
        let (status, body) = send(&app_down, "GET", "/api/dashboard/trip/balances").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"error": "expense store unavailable"}));

        let (status, _) = send(&app_down, "DELETE", "/api/dashboard/trip/reset").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let db = database().await;
        let app_broken = app(DatabaseStore::new(db.clone()));
        db.execute_unprepared("DROP TABLE expense_shares").await.unwrap();
        db.execute_unprepared("DROP TABLE expenses").await.unwrap();
        let (status, body) = send(&app_broken, "GET", "/api/dashboard/trip/total-sum").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "internal server error"}));
    }

    #[tokio::test]
    async fn slow_requests_time_out() {
        let state = ServerState {
            dashboard: Arc::new(Dashboard::new(SlowStore)),
        };
        let app = router(
            state,
            ServerOptions {
                request_timeout: Duration::from_millis(20),
            },
        );

        let (status, _) = send(&app, "GET", "/api/dashboard/trip/total-sum").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

        let (status, _) = send(&app, "DELETE", "/api/dashboard/trip/reset").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = app(DatabaseStore::new(database().await));
        let (status, _) = send(&app, "GET", "/api/dashboard/trip/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
