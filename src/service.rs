use crate::{
    data::student::{Student, StudentForm},
    error::{
        InvalidStudentIdSnafu, InvalidStudentSnafu, MakeQuerySnafu, StudentNotFoundSnafu,
        StudentsResult,
    },
    store::StudentStore,
};
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;

/// Create/list/get/update/delete for students.
///
/// Each operation runs at most one statement against the store; nothing is cached and
/// nothing is retried.
#[derive(Clone, Debug)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, form: &StudentForm) -> StudentsResult<Student> {
        let new_student = form
            .validate()
            .map_err(|errors| InvalidStudentSnafu { errors }.build())?;

        let student = self
            .store
            .insert(&new_student)
            .await
            .context(MakeQuerySnafu {
                action: "Failed to add student",
            })?;

        info!(id = student.id, "Added student");
        Ok(student)
    }

    pub async fn list(&self) -> StudentsResult<Vec<Student>> {
        self.store.fetch_all().await.context(MakeQuerySnafu {
            action: "Failed to fetch students",
        })
    }

    pub async fn get_by_id(&self, raw_id: &str) -> StudentsResult<Student> {
        let id = parse_student_id(raw_id)?;

        self.store
            .fetch_one(id)
            .await
            .context(MakeQuerySnafu {
                action: "Error fetching student data",
            })?
            .context(StudentNotFoundSnafu { id })
    }

    pub async fn update(&self, raw_id: &str, form: &StudentForm) -> StudentsResult<Student> {
        let id = parse_student_id(raw_id)?;
        let new_details = form
            .validate()
            .map_err(|errors| InvalidStudentSnafu { errors }.build())?;

        let student = self
            .store
            .update(id, &new_details)
            .await
            .context(MakeQuerySnafu {
                action: "Error updating student",
            })?
            .context(StudentNotFoundSnafu { id })?;

        info!(id, "Updated student");
        Ok(student)
    }

    pub async fn delete(&self, raw_id: &str) -> StudentsResult<Student> {
        let id = parse_student_id(raw_id)?;

        let student = self
            .store
            .remove(id)
            .await
            .context(MakeQuerySnafu {
                action: "Error deleting student",
            })?
            .context(StudentNotFoundSnafu { id })?;

        info!(id, "Deleted student");
        Ok(student)
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

pub fn parse_student_id(raw_id: &str) -> StudentsResult<i32> {
    raw_id
        .parse()
        .context(InvalidStudentIdSnafu { original: raw_id })
}
