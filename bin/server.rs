// Employee Dashboard - Web Server
// Read-only REST API over the embedded dataset

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use employee_dashboard::columns::{self, ColumnDef, ColumnField};
use employee_dashboard::grid::{self, ColumnFilter, GridQuery, SortDirection};
use employee_dashboard::{
    export_to_string, logging, registry, CellRenderers, DashboardConfig, EmployeeRecord,
    EmployeeStore, ExportScope, GridError, SummaryCache, SummaryCard, SummaryStatistics,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Parser, Debug)]
#[command(name = "employee-server", version, about = "Employee Dashboard REST API")]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    port: Option<u16>,

    /// Replacement employee dataset (JSON)
    #[arg(short = 'D', long)]
    data: Option<PathBuf>,

    /// Dashboard config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: EmployeeStore,
    summary: Arc<Mutex<SummaryCache>>,
    renderers: Arc<CellRenderers>,
    default_page_size: usize,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Summary response: raw statistics plus display cards
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    #[serde(flatten)]
    stats: SummaryStatistics,
    has_active_employees: bool,
    cards: Vec<SummaryCard>,
}

/// Grid page response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeePageResponse<'a> {
    rows: Vec<EmployeeRow<'a>>,
    page: usize,
    page_size: usize,
    page_count: usize,
    total_rows: usize,
    first_row: usize,
    last_row: usize,
}

/// One record plus its rendered cells keyed by field
#[derive(Serialize)]
struct EmployeeRow<'a> {
    record: &'a EmployeeRecord,
    display: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeParams {
    page: Option<usize>,
    page_size: Option<usize>,
    sort: Option<String>,
    #[serde(default)]
    desc: bool,
    /// Comma separated
    department: Option<String>,
    /// Comma separated
    location: Option<String>,
    active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ExportParams {
    scope: Option<ExportScope>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_query(params: &EmployeeParams, default_page_size: usize) -> Result<GridQuery, GridError> {
    let mut query = GridQuery::new().with_page_size(params.page_size.unwrap_or(default_page_size))?;

    if let Some(sort) = &params.sort {
        let field: ColumnField = sort.parse()?;
        let direction = if params.desc { SortDirection::Desc } else { SortDirection::Asc };
        query.set_sort(field, direction)?;
    }
    if let Some(departments) = &params.department {
        query.set_filter(ColumnField::Department, ColumnFilter::Set(split_list(departments)))?;
    }
    if let Some(locations) = &params.location {
        query.set_filter(ColumnField::Location, ColumnFilter::Set(split_list(locations)))?;
    }
    if let Some(active) = params.active {
        query.set_filter(ColumnField::IsActive, ColumnFilter::Boolean(active))?;
    }

    query.set_page(params.page.unwrap_or(0));
    Ok(query)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/summary - Summary statistics (memoized on the dataset)
async fn get_summary(State(state): State<AppState>) -> Response {
    let stats = match state.summary.lock() {
        Ok(mut cache) => cache.get(&state.store.shared()),
        Err(_) => {
            tracing::error!("summary cache lock poisoned");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "summary unavailable");
        }
    };

    let response = SummaryResponse {
        has_active_employees: stats.has_active_employees(),
        cards: stats.cards().to_vec(),
        stats,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/columns - Column definitions
async fn get_columns() -> Json<ApiResponse<&'static [ColumnDef]>> {
    Json(ApiResponse::ok(columns::default_columns()))
}

/// GET /api/employees - One page of the grid
async fn get_employees(State(state): State<AppState>, Query(params): Query<EmployeeParams>) -> Response {
    let query = match build_query(&params, state.default_page_size) {
        Ok(q) => q,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match grid::apply(state.store.get_all(), &query) {
        Ok(page) => {
            let rows = page
                .rows
                .into_iter()
                .map(|record| {
                    let display = ColumnField::ALL
                        .iter()
                        .map(|f| {
                            (
                                f.as_str().to_string(),
                                serde_json::Value::String(state.renderers.render(*f, record)),
                            )
                        })
                        .collect();
                    EmployeeRow { record, display }
                })
                .collect();

            let response = EmployeePageResponse {
                rows,
                page: page.page,
                page_size: page.page_size,
                page_count: page.page_count,
                total_rows: page.total_rows,
                first_row: page.first_row,
                last_row: page.last_row,
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            tracing::error!("grid query failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/employees/:id - One employee
async fn get_employee(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    match state.store.find(id) {
        Some(record) => (StatusCode::OK, Json(ApiResponse::ok(record))).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("employee {} not found", id)),
    }
}

/// GET /api/export - CSV download
async fn export(State(state): State<AppState>, Query(params): Query<ExportParams>) -> Response {
    let scope = params.scope.unwrap_or_default();

    match export_to_string(state.store.get_all(), scope) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"employees.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("export failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/summary", get(get_summary))
        .route("/columns", get(get_columns))
        .route("/employees", get(get_employees))
        .route("/employees/:id", get(get_employee))
        .route("/export", get(export))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(logging::default_filter(args.verbose));

    let mut config = DashboardConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data) = args.data {
        config.data_path = Some(data);
    }

    registry::initialize();

    let store = match &config.data_path {
        Some(path) => EmployeeStore::from_path(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => EmployeeStore::embedded().context("loading embedded dataset")?,
    };
    tracing::info!(records = store.len(), "employee store loaded");

    // Create shared state
    let state = AppState {
        store,
        summary: Arc::new(Mutex::new(SummaryCache::new())),
        renderers: Arc::new(CellRenderers::new(config.render_options())),
        default_page_size: config.page_size,
    };

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("server running on http://{}", addr);
    tracing::info!("API: http://{}/api/employees", addr);

    axum::serve(listener, router(state))
        .await
        .context("server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        registry::initialize();
        AppState {
            store: EmployeeStore::embedded().unwrap(),
            summary: Arc::new(Mutex::new(SummaryCache::new())),
            renderers: Arc::new(CellRenderers::new(Default::default())),
            default_page_size: 10,
        }
    }

    async fn send(state: AppState, uri: &str) -> (StatusCode, Response) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let (status, response) = send(state, uri).await;
        let json = serde_json::from_str(&body_text(response).await).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_health_envelope() {
        let (status, json) = get_json(test_state(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_summary_endpoint() {
        let state = test_state();
        let (status, json) = get_json(state.clone(), "/api/summary").await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["totalEmployees"], 21);
        assert_eq!(data["departments"], 6);
        assert_eq!(data["avgPerformance"], 4.1);
        assert_eq!(data["hasActiveEmployees"], true);
        assert_eq!(data["cards"].as_array().unwrap().len(), 4);
        assert_eq!(data["cards"][0]["label"], "Total Employees");

        // second request hits the memoized value
        get_json(state.clone(), "/api/summary").await;
        assert_eq!(state.summary.lock().unwrap().recomputations(), 1);
    }

    #[tokio::test]
    async fn test_employees_page() {
        let (status, json) = get_json(
            test_state(),
            "/api/employees?pageSize=20&sort=salary&desc=true&active=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["totalRows"], 21);
        assert_eq!(data["pageCount"], 2);
        assert_eq!(data["pageSize"], 20);
        let rows = data["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|r| r["record"]["isActive"] == true));

        let salaries: Vec<f64> = rows
            .iter()
            .map(|r| r["record"]["salary"].as_f64().unwrap())
            .collect();
        assert!(salaries.windows(2).all(|w| w[0] >= w[1]));
        assert!(rows[0]["display"]["salary"].as_str().unwrap().starts_with('$'));
    }

    #[tokio::test]
    async fn test_employees_bad_request() {
        let (status, json) = get_json(test_state(), "/api/employees?pageSize=50").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("page size 50"));

        let (status, json) = get_json(test_state(), "/api/employees?sort=bonus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("bonus"));
    }

    #[tokio::test]
    async fn test_employee_by_id() {
        let (status, json) = get_json(test_state(), "/api/employees/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], 1);

        let (status, json) = get_json(test_state(), "/api/employees/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "employee 999 not found");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (status, response) = send(test_state(), "/api/export?scope=active").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let text = body_text(response).await;
        let rows = csv::Reader::from_reader(text.as_bytes()).records().count();
        assert_eq!(rows, 21);

        let (status, response) = send(test_state(), "/api/export").await;
        assert_eq!(status, StatusCode::OK);
        let text = body_text(response).await;
        assert_eq!(csv::Reader::from_reader(text.as_bytes()).records().count(), 24);
    }

    #[test]
    fn test_build_query_defaults() {
        let query = build_query(&EmployeeParams::default(), 10).unwrap();
        assert_eq!(query.page_size(), 10);
        assert!(query.sort().is_none());
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_build_query_parses_filters() {
        let params = EmployeeParams {
            page: Some(1),
            page_size: Some(20),
            sort: Some("salary".to_string()),
            desc: true,
            department: Some("Engineering, Sales".to_string()),
            location: None,
            active: Some(true),
        };
        let query = build_query(&params, 10).unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 20);
        assert_eq!(query.sort().map(|s| s.direction), Some(SortDirection::Desc));
        assert_eq!(
            query.filter_for(ColumnField::Department),
            Some(&ColumnFilter::Set(vec!["Engineering".to_string(), "Sales".to_string()]))
        );
    }

    #[test]
    fn test_build_query_rejects_bad_input() {
        let params = EmployeeParams {
            page_size: Some(50),
            ..Default::default()
        };
        assert_eq!(build_query(&params, 10).unwrap_err(), GridError::InvalidPageSize(50));

        let params = EmployeeParams {
            sort: Some("bonus".to_string()),
            ..Default::default()
        };
        assert!(matches!(build_query(&params, 10), Err(GridError::UnknownColumn(_))));
    }
}
