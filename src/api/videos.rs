use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snafu::{IntoError, OptionExt, ResultExt};
use tracing::instrument;

use super::*;
use crate::database::{videos, Backend, BackendError};
use crate::model::{is_valid_id, Video, VideoId};

/// Path ids that are not integers in `1..=MAX_VIDEO_ID` never match a video.
fn parse_id(raw: String) -> Result<VideoId> {
    match raw.parse::<VideoId>() {
        Ok(id) if is_valid_id(id) => Ok(id),
        _ => VideoNotFoundSnafu { id: raw }.fail(),
    }
}

/// Look the video up and abort with 404 when it does not exist.
async fn find_or_abort(id: VideoId, db: &Backend) -> Result<Video> {
    videos::find(id, db)
        .await
        .context(StorageSnafu {
            message: "failed to fetch the video",
        })?
        .context(VideoNotFoundSnafu { id: id.to_string() })
}

#[instrument(skip(app))]
pub async fn get(State(app): State<App>, Path(id): Path<String>) -> Result<Json<Video>> {
    let id = parse_id(id)?;
    let video = find_or_abort(id, &app.database).await?;
    Ok(Json(video))
}

#[instrument(skip(app))]
pub async fn list(State(app): State<App>) -> Result<Json<Vec<Video>>> {
    let videos = videos::all(&app.database).await.context(StorageSnafu {
        message: "failed to fetch videos",
    })?;
    Ok(Json(videos))
}

/// Create a video under the id given in the path.
#[instrument(skip(app, body))]
pub async fn create(
    State(app): State<App>, Path(id): Path<String>, body: Bytes,
) -> Result<(StatusCode, Json<Video>)> {
    let id = parse_id(id)?;
    let content = validate::creation(&body)?;

    let video = videos::insert(id, content, &app.database)
        .await
        .map_err(|source| match source {
            BackendError::RecordExists { id, .. } => VideoExistsSnafu { id }.build(),
            source => StorageSnafu {
                message: "failed to create the video",
            }
            .into_error(source),
        })?;

    tracing::info!(video_id = video.id, "created video `{}`", video.name);
    Ok((StatusCode::CREATED, Json(video)))
}

/// Create a video and let the database pick its id.
#[instrument(skip(app, body))]
pub async fn create_next(
    State(app): State<App>, body: Bytes,
) -> Result<(StatusCode, Json<Video>)> {
    let content = validate::creation(&body)?;
    let video = videos::insert_next(content, &app.database)
        .await
        .map_err(|source| match source {
            BackendError::IdsExhausted { .. } => StorageSnafu {
                message: "no video id is left to assign",
            }
            .into_error(source),
            source => StorageSnafu {
                message: "failed to create the video",
            }
            .into_error(source),
        })?;

    tracing::info!(video_id = video.id, "created video `{}`", video.name);
    Ok((StatusCode::CREATED, Json(video)))
}

#[instrument(skip(app, body))]
pub async fn update(
    State(app): State<App>, Path(id): Path<String>, body: Bytes,
) -> Result<Json<Video>> {
    let id = parse_id(id)?;
    let mut video = find_or_abort(id, &app.database).await?;

    let patch = validate::update(&body)?;
    tracing::debug!(video_id = id, patch = ?patch, "applying patch");
    patch.apply(&mut video);

    let video = videos::update(&video, &app.database)
        .await
        .context(StorageSnafu {
            message: "failed to update the video",
        })?;

    Ok(Json(video))
}

#[instrument(skip(app))]
pub async fn delete(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = parse_id(id)?;
    find_or_abort(id, &app.database).await?;

    videos::delete(id, &app.database)
        .await
        .context(StorageSnafu {
            message: "failed to delete the video",
        })?;

    tracing::info!(video_id = id, "deleted video");
    Ok(StatusCode::NO_CONTENT)
}
