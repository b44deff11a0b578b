use crate::{
    data::{
        IdForm,
        student::{FieldErrors, StudentForm},
    },
    maud_conveniences::{Notification, form_submit_button, notification_oob, title},
    routes::student_form::student_form_fields,
    service::parse_student_id,
    state::StudentsState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

pub async fn get_edit_student(
    State(state): State<StudentsState>,
    Path(raw_id): Path<String>,
) -> Markup {
    let body = match parse_student_id(&raw_id) {
        Ok(id) => {
            state.queries().mark_student_stale(id).await;
            html! {
                div id="edit_student" hx-get="/internal/students/edit_form" hx-vals={"{\"id\": \"" (id) "\"}" } hx-trigger="load" hx-swap="outerHTML" {
                    p class="italic" {"Loading student data..."}
                }
            }
        }
        Err(e) => html! {
            p class="text-red-500" {"Error: " (e.to_string())}
        },
    };

    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            (body)
            a href="/dashboard" class="text-blue-400 hover:text-blue-300 underline" {"Back to dashboard"}
        }
    })
}

fn edit_student_form(id: i32, values: &StudentForm, errors: &FieldErrors) -> Markup {
    html! {
        form id="edit_student" hx-put={"/internal/students/edit?id=" (id)} hx-target="this" hx-swap="outerHTML" class="p-4" {
            (title("Edit Student"))
            (student_form_fields(values, errors))
            (form_submit_button(Some("Update")))
        }
    }
}

pub async fn internal_get_edit_form(
    State(state): State<StudentsState>,
    Query(IdForm { id }): Query<IdForm>,
) -> Markup {
    match state.queries().student(id).await {
        Ok(student) => edit_student_form(id, &student.to_form(), &FieldErrors::new()),
        Err(e) => {
            warn!(?e, id, "Unable to load student for editing");
            html! {
                p id="edit_student" class="text-red-500" {"Error: " (e.to_string())}
            }
        }
    }
}

pub async fn internal_put_edit_student(
    State(state): State<StudentsState>,
    Query(IdForm { id }): Query<IdForm>,
    Form(form): Form<StudentForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return edit_student_form(id, &form, &errors).into_response();
    }

    match state.queries().update_student(id, &form).await {
        Ok(_) => (
            [("hx-redirect", format!("/dashboard?updated={id}"))],
            html! {},
        )
            .into_response(),
        Err(e) => {
            warn!(?e, id, "Unable to update student");
            let errors = e.field_errors().cloned().unwrap_or_default();
            html! {
                (edit_student_form(id, &form, &errors))
                (notification_oob(&Notification::error(format!("Failed to update student: {e}"))))
            }
            .into_response()
        }
    }
}
