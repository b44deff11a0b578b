use crate::data::student::{NewStudent, Student};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod memory;
pub mod postgres;

/// The `students` table. Every method is exactly one statement.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn insert(&self, student: &NewStudent) -> sqlx::Result<Student>;
    async fn fetch_all(&self) -> sqlx::Result<Vec<Student>>;
    async fn fetch_one(&self, id: i32) -> sqlx::Result<Option<Student>>;
    /// Overwrites every mutable field. `None` if no row had that id.
    async fn update(&self, id: i32, student: &NewStudent) -> sqlx::Result<Option<Student>>;
    /// Returns the row as it was just before it was removed.
    async fn remove(&self, id: i32) -> sqlx::Result<Option<Student>>;

    async fn close(&self) {}
}
