use snafu::{Location, Snafu};

use crate::model::{InvalidRecordId, VideoId};
use crate::Located;

pub type Result<T, E = BackendError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BackendError {
    #[snafu(display(
        "failed to connect to the database `{url}` [{namespace}/{database}]: {source}"
    ))]
    DatabaseConnection {
        url: String,
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to apply the database schema: {source}"))]
    DatabaseSetup {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to query the database: {source}"))]
    DatabaseQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to deserialize the database response: {source}"))]
    DatabaseDeserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to parse the database response, response is empty"))]
    EmptyQuery {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("the database returned an unexpected record: {source}"))]
    InvalidRecord {
        source: InvalidRecordId,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("every video id up to {max} is taken"))]
    IdsExhausted {
        max: VideoId,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("a video with id {id} already exists"))]
    RecordExists {
        id: VideoId,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for BackendError {
    fn location(&self) -> Location {
        match self {
            BackendError::DatabaseConnection { location, .. }
            | BackendError::DatabaseSetup { location, .. }
            | BackendError::DatabaseQuery { location, .. }
            | BackendError::DatabaseDeserialize { location, .. }
            | BackendError::EmptyQuery { location, .. }
            | BackendError::InvalidRecord { location, .. }
            | BackendError::IdsExhausted { location, .. }
            | BackendError::RecordExists { location, .. } => *location,
        }
    }
}
