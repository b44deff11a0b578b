use crate::data::student::Student;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    AllStudents,
    Student(i32),
}

#[derive(Clone, Debug)]
pub enum CachedRead {
    Students(Vec<Student>),
    Student(Student),
}

#[derive(Debug, Default)]
struct Entries {
    //bumped on every invalidation, so reads that started before one can't cache stale data
    generation: u64,
    reads: HashMap<CacheKey, CachedRead>,
}

#[derive(Clone, Debug, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<Entries>>,
}

impl QueryCache {
    /// The cached value (if any), and the generation to hand back to [`QueryCache::put`].
    pub async fn get(&self, key: CacheKey) -> (Option<CachedRead>, u64) {
        let entries = self.entries.read().await;
        (entries.reads.get(&key).cloned(), entries.generation)
    }

    pub async fn put(&self, key: CacheKey, read: CachedRead, fetched_at_generation: u64) {
        let mut entries = self.entries.write().await;
        if entries.generation == fetched_at_generation {
            entries.reads.insert(key, read);
        } else {
            debug!(?key, "dropping read that raced an invalidation");
        }
    }

    pub async fn invalidate(&self, keys: &[CacheKey]) {
        let mut entries = self.entries.write().await;
        entries.generation += 1;
        for key in keys {
            entries.reads.remove(key);
        }
    }
}
