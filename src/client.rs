//! Typed access to `/api/students` over HTTP, plus the caching layer the UI reads through.

use crate::{
    client::cache::{CacheKey, CachedRead, QueryCache},
    data::{
        envelope::ApiEnvelope,
        student::{Student, StudentForm},
    },
    error::{
        ApiRejectedSnafu, DecodeResponseSnafu, MissingResponseDataSnafu, SendRequestSnafu,
        StudentsResult,
    },
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;

pub mod cache;

#[derive(Clone, Debug)]
pub struct StudentClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> StudentsResult<T> {
        let response = request.send().await.context(SendRequestSnafu)?;
        let status = response.status();
        let body = response.bytes().await.context(SendRequestSnafu)?;

        if !status.is_success() {
            //not everything in front of the API speaks our envelope, eg. a proxy or a 405
            let (message, errors) =
                match serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body) {
                    Ok(envelope) => (envelope.message, envelope.errors),
                    Err(_) => (
                        status
                            .canonical_reason()
                            .unwrap_or("Unexpected response")
                            .to_string(),
                        None,
                    ),
                };
            return ApiRejectedSnafu {
                status,
                message,
                errors,
            }
            .fail();
        }

        serde_json::from_slice::<ApiEnvelope<T>>(&body)
            .context(DecodeResponseSnafu)?
            .data
            .context(MissingResponseDataSnafu)
    }

    pub async fn fetch_students(&self) -> StudentsResult<Vec<Student>> {
        Self::send(self.http.get(format!("{}/", self.base_url))).await
    }

    pub async fn fetch_student(&self, id: i32) -> StudentsResult<Student> {
        Self::send(self.http.get(format!("{}/{id}", self.base_url))).await
    }

    pub async fn add_student(&self, student: &StudentForm) -> StudentsResult<Student> {
        Self::send(
            self.http
                .post(format!("{}/add", self.base_url))
                .json(student),
        )
        .await
    }

    pub async fn update_student(&self, id: i32, student: &StudentForm) -> StudentsResult<Student> {
        Self::send(
            self.http
                .put(format!("{}/update/{id}", self.base_url))
                .json(student),
        )
        .await
    }

    pub async fn delete_student(&self, id: i32) -> StudentsResult<Student> {
        Self::send(self.http.delete(format!("{}/delete/{id}", self.base_url))).await
    }
}

/// Cached reads and invalidating writes over a [`StudentClient`].
///
/// A successful write invalidates every read it could have changed, so the next read goes
/// back to the API. Failed writes leave the cache alone and are handed straight back to the
/// caller. Writes made by anyone else are only picked up once a view marks its reads stale
/// with [`StudentQueries::mark_students_stale`] or [`StudentQueries::mark_student_stale`].
#[derive(Clone, Debug)]
pub struct StudentQueries {
    client: StudentClient,
    cache: QueryCache,
}

impl StudentQueries {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: StudentClient::new(base_url),
            cache: QueryCache::default(),
        }
    }

    pub async fn students(&self) -> StudentsResult<Vec<Student>> {
        let key = CacheKey::AllStudents;
        let (cached, generation) = self.cache.get(key).await;
        if let Some(CachedRead::Students(students)) = cached {
            return Ok(students);
        }

        let students = self.client.fetch_students().await?;
        self.cache
            .put(key, CachedRead::Students(students.clone()), generation)
            .await;
        Ok(students)
    }

    pub async fn student(&self, id: i32) -> StudentsResult<Student> {
        let key = CacheKey::Student(id);
        let (cached, generation) = self.cache.get(key).await;
        if let Some(CachedRead::Student(student)) = cached {
            return Ok(student);
        }

        let student = self.client.fetch_student(id).await?;
        self.cache
            .put(key, CachedRead::Student(student.clone()), generation)
            .await;
        Ok(student)
    }

    ///the next `students()` goes back to the API
    pub async fn mark_students_stale(&self) {
        self.cache.invalidate(&[CacheKey::AllStudents]).await;
    }

    ///the next `student(id)` goes back to the API
    pub async fn mark_student_stale(&self, id: i32) {
        self.cache.invalidate(&[CacheKey::Student(id)]).await;
    }

    pub async fn add_student(&self, student: &StudentForm) -> StudentsResult<Student> {
        let added = self.client.add_student(student).await?;
        self.cache.invalidate(&[CacheKey::AllStudents]).await;
        Ok(added)
    }

    pub async fn update_student(&self, id: i32, student: &StudentForm) -> StudentsResult<Student> {
        let updated = self.client.update_student(id, student).await?;
        self.cache
            .invalidate(&[CacheKey::AllStudents, CacheKey::Student(id)])
            .await;
        Ok(updated)
    }

    pub async fn delete_student(&self, id: i32) -> StudentsResult<Student> {
        let deleted = self.client.delete_student(id).await?;
        self.cache
            .invalidate(&[CacheKey::AllStudents, CacheKey::Student(id)])
            .await;
        Ok(deleted)
    }
}
