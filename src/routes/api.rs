use crate::{
    data::{
        envelope::ApiEnvelope,
        student::{Student, StudentForm},
    },
    error::{InvalidBodySnafu, StudentsResult},
    state::StudentsState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use snafu::ResultExt;

type ApiResponse<T> = StudentsResult<(StatusCode, Json<ApiEnvelope<T>>)>;

fn ok<T>(message: &'static str, data: T) -> ApiResponse<T> {
    Ok((StatusCode::OK, Json(ApiEnvelope::success(message, data))))
}

pub async fn post_add_student(
    State(state): State<StudentsState>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> ApiResponse<Student> {
    let Json(form) = body.context(InvalidBodySnafu)?;
    let student = state.service().create(&form).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::success("Student added successfully", student)),
    ))
}

pub async fn get_all_students(State(state): State<StudentsState>) -> ApiResponse<Vec<Student>> {
    ok(
        "Students fetched successfully",
        state.service().list().await?,
    )
}

pub async fn get_student(
    State(state): State<StudentsState>,
    Path(id): Path<String>,
) -> ApiResponse<Student> {
    ok(
        "Student fetched successfully",
        state.service().get_by_id(&id).await?,
    )
}

pub async fn put_update_student(
    State(state): State<StudentsState>,
    Path(id): Path<String>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> ApiResponse<Student> {
    let Json(form) = body.context(InvalidBodySnafu)?;

    ok(
        "Student updated successfully",
        state.service().update(&id, &form).await?,
    )
}

pub async fn delete_student(
    State(state): State<StudentsState>,
    Path(id): Path<String>,
) -> ApiResponse<Student> {
    ok(
        "Student deleted successfully",
        state.service().delete(&id).await?,
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        app, config::RuntimeConfiguration, state::StudentsState,
        store::memory::InMemoryStudentStore,
    };
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = StudentsState::with_store(
            Arc::new(InMemoryStudentStore::new()),
            RuntimeConfiguration::in_memory("127.0.0.1:9"),
        );
        app(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    fn ann() -> Value {
        json!({
            "name": "Ann",
            "dob": "2000-01-01",
            "gender": "Female",
            "address": "1 Rd",
            "courses": "Math"
        })
    }

    #[tokio::test]
    async fn add_returns_created_row() {
        let app = test_app();

        let (status, body) = call(&app, Method::POST, "/api/students/add", Some(ann())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Student added successfully");
        let student = &body["data"];
        assert!(student["id"].is_i64());
        for field in ["name", "dob", "gender", "address", "courses"] {
            assert_eq!(student[field], ann()[field], "{field} should round-trip");
        }
    }

    #[tokio::test]
    async fn list_returns_every_row() {
        let app = test_app();
        call(&app, Method::POST, "/api/students/add", Some(ann())).await;
        let mut bob = ann();
        bob["name"] = json!("Bob");
        bob["gender"] = json!("Male");
        call(&app, Method::POST, "/api/students/add", Some(bob)).await;

        for uri in ["/api/students/", "/api/students"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;

            assert_eq!(status, StatusCode::OK);
            let students = body["data"].as_array().unwrap();
            assert_eq!(students.len(), 2);
            assert_eq!(students[0]["name"], "Ann");
            assert_eq!(students[1]["name"], "Bob");
        }
    }

    #[tokio::test]
    async fn get_update_and_delete_round_trip() {
        let app = test_app();
        let (_, created) = call(&app, Method::POST, "/api/students/add", Some(ann())).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, body) = call(&app, Method::GET, &format!("/api/students/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], created["data"]);

        let replacement = json!({
            "name": "Andy",
            "dob": "1999-12-31",
            "gender": "Male",
            "address": "2 St",
            "courses": "Art"
        });
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/api/students/update/{id}"),
            Some(replacement.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student updated successfully");

        let (_, body) = call(&app, Method::GET, &format!("/api/students/{id}"), None).await;
        let mut expected = replacement;
        expected["id"] = json!(id);
        assert_eq!(body["data"], expected);

        let (status, body) =
            call(&app, Method::DELETE, &format!("/api/students/delete/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student deleted successfully");
        assert_eq!(body["data"], expected);

        let (status, body) = call(&app, Method::GET, &format!("/api/students/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Student not found"}));
    }

    #[tokio::test]
    async fn missing_students_are_404() {
        let app = test_app();

        let (status, body) =
            call(&app, Method::PUT, "/api/students/update/7", Some(ann())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Student not found"}));

        let (status, _) = call(&app, Method::GET, "/api/students/999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::DELETE, "/api/students/delete/999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_integer_ids_are_400() {
        let app = test_app();

        let (status, body) = call(&app, Method::DELETE, "/api/students/delete/xyz", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid student ID"}));

        let (status, _) = call(&app, Method::GET, "/api/students/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, Method::PUT, "/api/students/update/abc", Some(ann())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_details_are_400_with_field_errors() {
        let app = test_app();

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/students/add",
            Some(json!({"name": "  ", "gender": "Other"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid student details");
        assert_eq!(body["errors"]["name"], "Name is required and cannot be just spaces");
        assert_eq!(body["errors"]["gender"], "Gender must be either Male or Female");
        assert_eq!(body["errors"].as_object().unwrap().len(), 5);

        let (_, body) = call(&app, Method::GET, "/api/students/", None).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn malformed_json_uses_the_envelope() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/students/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn null_fields_are_validation_errors() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/students/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name": "Ann", "dob": null, "gender": "Female", "address": "1 Rd", "courses": "Math"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid student details");
        assert_eq!(body["errors"]["dob"], "Date of Birth is required");
    }

    #[tokio::test]
    async fn any_origin_is_allowed() {
        let app = test_app();

        let request = Request::builder()
            .uri("/api/students/")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
