use crate::{
    data::student::{FieldErrors, Gender, StudentField, StudentForm},
    maud_conveniences::{radio_form_element, simple_form_element},
};
use maud::{Markup, html};

const GENDERS: [&str; 2] = [Gender::ALL[0].as_str(), Gender::ALL[1].as_str()];

/// The five inputs shared by the add and edit forms, with any validation messages under them.
pub fn student_form_fields(values: &StudentForm, errors: &FieldErrors) -> Markup {
    let error = |field: StudentField| errors.get(&field).map(String::as_str);

    html! {
        (simple_form_element("name", "What is your name", None, &values.name, error(StudentField::Name)))
        (simple_form_element("dob", "Your Date of Birth", Some("date"), &values.dob, error(StudentField::Dob)))
        (radio_form_element("gender", "Gender", GENDERS, &values.gender, error(StudentField::Gender)))
        (simple_form_element("address", "Enter Your Address", None, &values.address, error(StudentField::Address)))
        (simple_form_element("courses", "Enter Your Courses", None, &values.courses, error(StudentField::Courses)))
    }
}
