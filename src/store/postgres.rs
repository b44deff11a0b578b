use crate::{
    data::student::{Gender, NewStudent, Student},
    error::{MigrateSnafu, OpenDatabaseSnafu, StudentsResult},
    store::StudentStore,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use snafu::ResultExt;
use sqlx::{
    FromRow, PgConnection, Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions,
};

#[derive(FromRow)]
struct StudentRow {
    id: i32,
    name: String,
    dob: NaiveDate,
    gender: String,
    address: String,
    courses: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = sqlx::Error;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let gender = row
            .gender
            .parse::<Gender>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            dob: row.dob,
            gender,
            address: row.address,
            courses: row.courses,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgStudentStore {
    pool: Pool<Postgres>,
}

impl PgStudentStore {
    pub async fn new(options: PgPoolOptions, db_path: &str) -> StudentsResult<Self> {
        let pool = options.connect(db_path).await.context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }

    async fn get_connection(&self) -> sqlx::Result<PoolConnection<Postgres>> {
        self.pool.acquire().await
    }

    async fn fetch_optional(
        query: &'static str,
        id: i32,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Student>> {
        sqlx::query_as::<_, StudentRow>(query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .map(Student::try_from)
            .transpose()
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, student: &NewStudent) -> sqlx::Result<Student> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, StudentRow>(
            "INSERT INTO students (name, dob, gender, address, courses) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&student.name)
        .bind(student.dob)
        .bind(student.gender.as_str())
        .bind(&student.address)
        .bind(&student.courses)
        .fetch_one(&mut *conn)
        .await?
        .try_into()
    }

    async fn fetch_all(&self) -> sqlx::Result<Vec<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, StudentRow>("SELECT * FROM students ORDER BY id")
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .map(Student::try_from)
            .collect()
    }

    async fn fetch_one(&self, id: i32) -> sqlx::Result<Option<Student>> {
        let mut conn = self.get_connection().await?;
        Self::fetch_optional("SELECT * FROM students WHERE id = $1", id, &mut conn).await
    }

    async fn update(&self, id: i32, student: &NewStudent) -> sqlx::Result<Option<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, StudentRow>(
            "UPDATE students SET name = $1, dob = $2, gender = $3, address = $4, courses = $5 WHERE id = $6 RETURNING *",
        )
        .bind(&student.name)
        .bind(student.dob)
        .bind(student.gender.as_str())
        .bind(&student.address)
        .bind(&student.courses)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(Student::try_from)
        .transpose()
    }

    async fn remove(&self, id: i32) -> sqlx::Result<Option<Student>> {
        let mut conn = self.get_connection().await?;
        Self::fetch_optional("DELETE FROM students WHERE id = $1 RETURNING *", id, &mut conn).await
    }

    async fn close(&self) {
        info!("closing database pool");
        self.pool.close().await;
    }
}
