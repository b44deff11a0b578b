use crate::data::{envelope::ApiEnvelope, student::FieldErrors};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type StudentsResult<T> = Result<T, StudentsError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StudentsError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("{action}"))]
    MakeQuery {
        source: sqlx::Error,
        action: &'static str,
    },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse maximum DB connections"))]
    ParseMaxConnections { source: ParseIntError },
    #[snafu(display("Unknown student store backend {:?}, expected `postgres` or `memory`", value))]
    UnknownStoreBackend { value: String },
    #[snafu(display("Invalid student ID"))]
    InvalidStudentId {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Student not found"))]
    StudentNotFound { id: i32 },
    #[snafu(display("Invalid student details"))]
    InvalidStudent { errors: FieldErrors },
    #[snafu(display("Invalid request body"))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Unable to reach the students API"))]
    SendRequest { source: reqwest::Error },
    #[snafu(display("Unable to understand the students API response"))]
    DecodeResponse { source: serde_json::Error },
    #[snafu(display("The students API response had no data"))]
    MissingResponseData,
    #[snafu(display("{message}"))]
    ApiRejected {
        status: StatusCode,
        message: String,
        errors: Option<FieldErrors>,
    },
}

impl StudentsError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream api

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { .. } => ISE,
            Self::BadEnvVar { .. }
            | Self::ParsePort { .. }
            | Self::ParseMaxConnections { .. }
            | Self::UnknownStoreBackend { .. } => ISE,
            Self::InvalidStudentId { .. } | Self::InvalidStudent { .. } => BI,
            Self::StudentNotFound { .. } => NF,
            Self::InvalidBody { source } => source.status(),
            Self::SendRequest { .. }
            | Self::DecodeResponse { .. }
            | Self::MissingResponseData => BG,
            Self::ApiRejected { status, .. } => *status,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidStudent { errors } => Some(errors),
            Self::ApiRejected { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }
}

impl IntoResponse for StudentsError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        //the display impls never include the source, so the cause only ends up in the logs
        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Rejected request");
        }

        let body = ApiEnvelope::<()>::failure(self.to_string(), self.field_errors().cloned());
        (status_code, Json(body)).into_response()
    }
}
