use crate::{
    data::student::{NewStudent, Student},
    store::StudentStore,
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Student>,
}

/// A process-local `students` table, for running without postgres.
#[derive(Debug, Default)]
pub struct InMemoryStudentStore {
    table: RwLock<Table>,
    statements: AtomicUsize,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    ///how many statements have been run against this store
    #[cfg(test)]
    pub fn statements_run(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }

    fn count_statement(&self) {
        self.statements.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn insert(&self, student: &NewStudent) -> sqlx::Result<Student> {
        self.count_statement();
        let mut table = self.table.write().await;

        //ids are never reused, even after the newest row is deleted
        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| sqlx::Error::Protocol("students id sequence exhausted".into()))?;
        table.last_id = id;
        let student = student.clone().with_id(id);
        table.rows.insert(student.id, student.clone());

        Ok(student)
    }

    async fn fetch_all(&self) -> sqlx::Result<Vec<Student>> {
        self.count_statement();
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn fetch_one(&self, id: i32) -> sqlx::Result<Option<Student>> {
        self.count_statement();
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i32, student: &NewStudent) -> sqlx::Result<Option<Student>> {
        self.count_statement();
        let mut table = self.table.write().await;

        Ok(table.rows.get_mut(&id).map(|row| {
            *row = student.clone().with_id(id);
            row.clone()
        }))
    }

    async fn remove(&self, id: i32) -> sqlx::Result<Option<Student>> {
        self.count_statement();
        Ok(self.table.write().await.rows.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::Gender;
    use chrono::NaiveDate;

    fn student(name: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            dob: NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            gender: Gender::Male,
            address: "2 Lane".into(),
            courses: "History".into(),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = InMemoryStudentStore::new();

        let first = store.insert(&student("Bob")).await.unwrap();
        let second = store.insert(&student("Cat")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        store.remove(second.id).await.unwrap();
        let third = store.insert(&student("Dan")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn exhausted_ids_are_an_error() {
        let store = InMemoryStudentStore::new();
        store.table.write().await.last_id = i32::MAX;

        assert!(matches!(
            store.insert(&student("Eve")).await,
            Err(sqlx::Error::Protocol(_))
        ));
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_the_whole_row() {
        let store = InMemoryStudentStore::new();
        let bob = store.insert(&student("Bob")).await.unwrap();

        let replacement = NewStudent {
            gender: Gender::Female,
            ..student("Bea")
        };
        let updated = store.update(bob.id, &replacement).await.unwrap();
        assert_eq!(updated, Some(replacement.with_id(bob.id)));

        assert_eq!(store.update(99, &student("Nobody")).await.unwrap(), None);
        assert_eq!(store.statements_run(), 3);
    }

    #[tokio::test]
    async fn rows_come_back_in_id_order() {
        let store = InMemoryStudentStore::new();
        for name in ["Bob", "Cat", "Dan"] {
            store.insert(&student(name)).await.unwrap();
        }

        let names: Vec<_> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Bob", "Cat", "Dan"]);
    }
}
