use crate::{
    data::student::{FieldErrors, StudentForm},
    maud_conveniences::{Notification, form_submit_button, notification_oob, title},
    routes::student_form::student_form_fields,
    state::StudentsState,
};
use axum::{Form, extract::State};
use maud::{Markup, html};

pub async fn get_add_student(State(state): State<StudentsState>) -> Markup {
    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            (add_student_form(&StudentForm::default(), &FieldErrors::new()))
            a href="/dashboard" class="text-blue-400 hover:text-blue-300 underline" {"Back to dashboard"}
        }
    })
}

fn add_student_form(values: &StudentForm, errors: &FieldErrors) -> Markup {
    html! {
        form hx-post="/internal/students/add" hx-target="this" hx-swap="outerHTML" class="p-4" {
            (title("Add Student"))
            (student_form_fields(values, errors))
            (form_submit_button(Some("Add")))
        }
    }
}

pub async fn internal_post_add_student(
    State(state): State<StudentsState>,
    Form(form): Form<StudentForm>,
) -> Markup {
    if let Err(errors) = form.validate() {
        return add_student_form(&form, &errors);
    }

    match state.queries().add_student(&form).await {
        Ok(student) => {
            debug!(id = student.id, "Added student through the UI");
            html! {
                (add_student_form(&StudentForm::default(), &FieldErrors::new()))
                (notification_oob(&Notification::success("Student added successfully!")))
            }
        }
        Err(e) => {
            warn!(?e, "Unable to add student");
            let errors = e.field_errors().cloned().unwrap_or_default();
            html! {
                (add_student_form(&form, &errors))
                (notification_oob(&Notification::error(format!("Failed to add student: {e}"))))
            }
        }
    }
}
