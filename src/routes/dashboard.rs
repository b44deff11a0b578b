use crate::{
    data::{IdForm, student::Student},
    maud_conveniences::{Notification, notification_oob, render_table, title},
    state::StudentsState,
};
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use maud::{Markup, html};
use serde::Deserialize;

pub async fn get_index_route() -> Redirect {
    Redirect::to("/dashboard")
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub updated: Option<i32>,
}

pub async fn get_dashboard(
    State(state): State<StudentsState>,
    Query(DashboardQuery { updated }): Query<DashboardQuery>,
) -> Markup {
    //a fresh page load always shows current rows, the fragments below can reuse them
    state.queries().mark_students_stale().await;

    state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full flex flex-col space-y-4" {
            h1 class="text-3xl text-center mb-6" {"Student Management"}
            div {
                a href="/add-student" class="bg-green-600 hover:bg-green-800 font-bold py-2 px-4 rounded" {
                    "Add Student"
                }
            }
            div id="all_students" hx-get="/internal/students" hx-trigger="load" {
                p class="italic" {"Loading..."}
            }
            div id="modal" {}
            @if updated.is_some() {
                div class="fixed top-4 right-4" {
                    (Notification::success("Student updated successfully!"))
                }
            }
        }
    })
}

fn students_table(students: Vec<Student>) -> Markup {
    if students.is_empty() {
        return html! {
            (title("Students"))
            p class="text-center" {"No Student Found!"}
        };
    }

    let rows = students
        .into_iter()
        .map(|student| {
            let id = student.id;
            [
                html! {(id)},
                html! {
                    span class="font-bold" {(student.name)}
                },
                html! {(student.dob.format("%d/%m/%Y").to_string())},
                html! {(student.courses)},
                html! {(student.gender.as_str())},
                html! {(student.address)},
                html! {
                    a href={"/edit-student/" (id)} class="bg-green-600 hover:bg-green-800 font-bold py-1 px-2 rounded text-xs" {"Edit"}
                },
                html! {
                    button hx-get="/internal/students/confirm_delete" hx-vals={"{\"id\": \"" (id) "\"}" } hx-target="#modal" class="bg-red-600 hover:bg-red-800 font-bold py-1 px-2 rounded text-xs" {
                        "Delete"
                    }
                },
            ]
        })
        .collect();

    render_table(
        "Students",
        [
            "Student Id",
            "Full Name",
            "Date Of Birth",
            "Courses",
            "Gender",
            "Address",
            "Edit",
            "Delete",
        ],
        rows,
    )
}

async fn students_table_or_error(state: &StudentsState) -> Markup {
    match state.queries().students().await {
        Ok(students) => students_table(students),
        Err(e) => {
            warn!(?e, "Unable to load students");
            html! {
                p class="text-red-500" {"Error: " (e.to_string())}
            }
        }
    }
}

pub async fn internal_get_students(State(state): State<StudentsState>) -> Markup {
    students_table_or_error(&state).await
}

pub async fn internal_get_confirm_delete(Query(IdForm { id }): Query<IdForm>) -> Markup {
    html! {
        div class="fixed inset-0 bg-black/50 flex items-center justify-center" {
            div class="bg-gray-800 p-6 rounded shadow-md max-w-md w-full" {
                (title("Delete Student"))
                p {"Are you sure you want to delete student " (id) "? This cannot be undone."}
                div class="flex flex-row space-x-4 mt-4 justify-end" {
                    button hx-get="/internal/empty" hx-target="#modal" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                        "Cancel"
                    }
                    button hx-delete="/internal/students" hx-vals={"{\"id\": \"" (id) "\"}" } hx-target="#modal" hx-disabled-elt="this" class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {
                        "Delete"
                    }
                }
            }
        }
    }
}

pub async fn internal_delete_student(
    State(state): State<StudentsState>,
    Query(IdForm { id }): Query<IdForm>,
) -> Markup {
    let notification = match state.queries().delete_student(id).await {
        Ok(_) => Notification::success("Student deleted successfully!"),
        Err(e) => {
            warn!(?e, id, "Unable to delete student");
            Notification::error(format!("Failed to delete student: {e}"))
        }
    };
    let all_students = students_table_or_error(&state).await;

    //the modal itself is replaced with nothing
    html! {
        div hx-swap-oob="outerHTML:#all_students" id="all_students" {
            (all_students)
        }
        (notification_oob(&notification))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        app, client::tests::spawn_server, config::RuntimeConfiguration, state::StudentsState,
        store::memory::InMemoryStudentStore,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn index_redirects_to_dashboard() {
        let state = StudentsState::with_store(
            Arc::new(InMemoryStudentStore::new()),
            RuntimeConfiguration::in_memory("127.0.0.1:9"),
        );
        let response = app(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn unreachable_api_renders_an_error() {
        let state = StudentsState::with_store(
            Arc::new(InMemoryStudentStore::new()),
            RuntimeConfiguration::in_memory("127.0.0.1:9"),
        );
        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/internal/students")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Error: Unable to reach the students API"));
    }

    #[tokio::test]
    async fn list_and_delete_flow() {
        let root = spawn_server().await;
        let http = reqwest::Client::new();

        let empty = http
            .get(format!("{root}/internal/students"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(empty.contains("No Student Found!"));

        let created: serde_json::Value = http
            .post(format!("{root}/api/students/add"))
            .json(&json!({
                "name": "Ann",
                "dob": "2000-01-31",
                "gender": "Female",
                "address": "1 Rd",
                "courses": "Math"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = created["data"]["id"].as_i64().unwrap();

        //that write went around the UI's cache, a page load picks it up
        let dashboard = http
            .get(format!("{root}/dashboard"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(dashboard.contains("Student Management"));

        let fresh = http
            .get(format!("{root}/internal/students"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(fresh.contains("Ann"));
        assert!(!fresh.contains("No Student Found!"));

        let modal = http
            .get(format!("{root}/internal/students/confirm_delete?id={id}"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(modal.contains("Are you sure"));

        let deleted = http
            .delete(format!("{root}/internal/students?id={id}"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(deleted.contains("Student deleted successfully!"));
        assert!(deleted.contains("No Student Found!"));

        let again = http
            .delete(format!("{root}/internal/students?id={id}"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(again.contains("Failed to delete student: Student not found"));
    }

    #[tokio::test]
    async fn table_lists_students() {
        let root = spawn_server().await;
        let http = reqwest::Client::new();

        http.post(format!("{root}/api/students/add"))
            .json(&json!({
                "name": "Ann",
                "dob": "2000-01-31",
                "gender": "Female",
                "address": "1 Rd",
                "courses": "Math"
            }))
            .send()
            .await
            .unwrap();

        let table = http
            .get(format!("{root}/internal/students"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(table.contains("Ann"));
        assert!(table.contains("31/01/2000"));
        assert!(table.contains(r#"href="/edit-student/1""#));
    }
}
