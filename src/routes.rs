use maud::{Markup, html};

pub mod add_student;
pub mod api;
pub mod dashboard;
pub mod edit_student;
mod student_form;

///swap target for anything that should just disappear, eg. a dismissed notification
pub async fn internal_get_empty() -> Markup {
    html! {}
}
