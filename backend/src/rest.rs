use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::db::DbConnection;
use crate::domain::{
    CourseBody, CourseService, DomainError, ExpenseBody, ExpenseService, PaymentBody,
    PaymentService, StudentBody, StudentService,
};

/// Application state shared across handlers: one service per entity kind.
#[derive(Clone)]
pub struct AppState {
    pub students: StudentService,
    pub courses: CourseService,
    pub payments: PaymentService,
    pub expenses: ExpenseService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            students: StudentService::new(db.clone()),
            courses: CourseService::new(db.clone()),
            payments: PaymentService::new(db.clone()),
            expenses: ExpenseService::new(db),
        }
    }
}

/// The error envelope every non-2xx response carries: `{"error": <message>}`.
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn domain_error_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(message) => error_response(StatusCode::BAD_REQUEST, &message),
        DomainError::NotFound(entity) => {
            error_response(StatusCode::NOT_FOUND, &format!("{} not found", entity))
        }
        DomainError::Database(inner) => {
            error!("Database error: {:?}", inner);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
    }
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ---- students ----

pub async fn list_students(State(state): State<AppState>) -> Response {
    info!("GET /api/students");
    match state.students.list().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_student(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /api/students/{}", id);
    match state.students.get(&id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<StudentBody>,
) -> Response {
    info!("POST /api/students");
    match state.students.create(body).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StudentBody>,
) -> Response {
    info!("PUT /api/students/{}", id);
    match state.students.update(&id, body).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_student(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/students/{}", id);
    match state.students.delete(&id).await {
        Ok(row) => (
            StatusCode::OK,
            Json(json!({ "message": "Student deleted", "student": row })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

// ---- courses ----

pub async fn list_courses(State(state): State<AppState>) -> Response {
    info!("GET /api/courses");
    match state.courses.list().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_course(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /api/courses/{}", id);
    match state.courses.get(&id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(body): Json<CourseBody>,
) -> Response {
    info!("POST /api/courses");
    match state.courses.create(body).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CourseBody>,
) -> Response {
    info!("PUT /api/courses/{}", id);
    match state.courses.update(&id, body).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_course(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/courses/{}", id);
    match state.courses.delete(&id).await {
        Ok(row) => (
            StatusCode::OK,
            Json(json!({ "message": "Course deleted", "course": row })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

// ---- payments ----

pub async fn list_payments(State(state): State<AppState>) -> Response {
    info!("GET /api/payments");
    match state.payments.list().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_payment(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /api/payments/{}", id);
    match state.payments.get(&id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentBody>,
) -> Response {
    info!("POST /api/payments");
    match state.payments.create(body).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PaymentBody>,
) -> Response {
    info!("PUT /api/payments/{}", id);
    match state.payments.update(&id, body).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_payment(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/payments/{}", id);
    match state.payments.delete(&id).await {
        Ok(row) => (
            StatusCode::OK,
            Json(json!({ "message": "Payment deleted", "payment": row })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

// ---- expenses ----

pub async fn list_expenses(State(state): State<AppState>) -> Response {
    info!("GET /api/expenses");
    match state.expenses.list().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_expense(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /api/expenses/{}", id);
    match state.expenses.get(&id).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<ExpenseBody>,
) -> Response {
    info!("POST /api/expenses");
    match state.expenses.create(body).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ExpenseBody>,
) -> Response {
    info!("PUT /api/expenses/{}", id);
    match state.expenses.update(&id, body).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_expense(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/expenses/{}", id);
    match state.expenses.delete(&id).await {
        Ok(row) => (
            StatusCode::OK,
            Json(json!({ "message": "Expense deleted", "expense": row })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// The API routes, without the `/api` prefix.
fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

/// Build the full application router with `/api` nesting.
pub fn app(state: AppState) -> Router {
    Router::new().nest("/api", api_router()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn setup_app() -> Router {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        app(AppState::new(db))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = setup_app().await;

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_course_crud_over_http() {
        let app = setup_app().await;

        // Create
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/courses",
                json!({ "name": "Mathematics", "fee": 5000.0, "duration": "6 months" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = response_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["fee"], 5000.0);

        // List is a bare array containing the new record
        let response = app.clone().oneshot(get_request("/api/courses")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = response_json(response).await;
        let items = listed.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Mathematics");

        // Partial update
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/courses/{}", id),
                json!({ "fee": 5500.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = response_json(response).await;
        assert_eq!(updated["fee"], 5500.0);
        assert_eq!(updated["name"], "Mathematics");

        // Delete echoes the removed record
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/courses/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let deleted = response_json(response).await;
        assert_eq!(deleted["message"], "Course deleted");
        assert_eq!(deleted["course"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let app = setup_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/courses",
                json!({ "fee": 5000.0 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "Name is required");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let app = setup_app().await;

        let response = app
            .oneshot(get_request("/api/students/no-such-id"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], "Student not found");
    }

    #[tokio::test]
    async fn test_update_with_no_fields_is_rejected() {
        let app = setup_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/students",
                json!({ "name": "Rahul Sharma" }),
            ))
            .await
            .unwrap();
        let created = response_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/students/{}", id),
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "No fields to update");
    }

    #[tokio::test]
    async fn test_payment_response_uses_wire_status() {
        let app = setup_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/payments",
                json!({
                    "student_id": "student-1",
                    "amount": 5000.0,
                    "mode": "upi",
                    "status": "completed"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        // The wire vocabulary is pending/completed; "received" exists only in
        // the canonical client-side shape.
        assert_eq!(body["status"], "completed");
        assert_eq!(body["mode"], "upi");
    }
}
