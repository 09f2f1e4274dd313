use snafu::{ensure, IntoError, OptionExt, ResultExt};

use super::*;
use crate::model::{NewVideo, Video, VideoId, VideoRecord, MAX_VIDEO_ID, TABLE};

/// Creates the video under `max(id) + 1`, or `1` on an empty table. The id is computed
/// inside the statement that creates the record.
const CREATE_NEXT: &str = "CREATE type::thing('videos', (math::max((SELECT VALUE meta::id(id) FROM videos)) ?? 0) + 1) CONTENT $content";

const LAST_ID: &str = "RETURN math::max((SELECT VALUE meta::id(id) FROM videos))";

const SELECT_ALL: &str = "SELECT * FROM videos ORDER BY id ASC";

fn into_video(record: VideoRecord) -> Result<Video> {
    Video::try_from(record).context(InvalidRecordSnafu)
}

#[instrument(skip(db))]
pub async fn find(id: VideoId, db: &Backend) -> Result<Option<Video>> {
    tracing::debug!(video_id = id, "fetching video from database");
    let record: Option<VideoRecord> = db.select((TABLE, id)).await.context(DatabaseQuerySnafu)?;
    record.map(into_video).transpose()
}

#[instrument(skip(db))]
pub async fn all(db: &Backend) -> Result<Vec<Video>> {
    tracing::debug!("fetching all videos from database");
    let mut response = db.query(SELECT_ALL).await.context(DatabaseQuerySnafu)?;
    let records: Vec<VideoRecord> = response.take(0).context(DatabaseDeserializeSnafu)?;
    records.into_iter().map(into_video).collect()
}

/// Insert a video under an explicit id. Fails with [BackendError::RecordExists] when the id is taken,
/// whether that is seen before the write or reported by the database while creating the record.
#[instrument(skip(db))]
pub async fn insert(id: VideoId, video: NewVideo, db: &Backend) -> Result<Video> {
    if find(id, db).await?.is_some() {
        return RecordExistsSnafu { id }.fail();
    }

    tracing::debug!(video_id = id, "inserting video into database");
    let record: Option<VideoRecord> = db
        .create((TABLE, id))
        .content(&video)
        .await
        .map_err(|source| match source {
            surrealdb::Error::Db(surrealdb::error::Db::RecordExists { .. }) => {
                RecordExistsSnafu { id }.build()
            }
            source => DatabaseQuerySnafu.into_error(source),
        })?;

    into_video(record.context(EmptyQuerySnafu)?)
}

/// Insert a video and let the database assign its id. Fails with [BackendError::IdsExhausted]
/// once `MAX_VIDEO_ID` is taken.
#[instrument(skip(db))]
pub async fn insert_next(video: NewVideo, db: &Backend) -> Result<Video> {
    let mut response = db.query(LAST_ID).await.context(DatabaseQuerySnafu)?;
    let last: Option<VideoId> = response.take(0).context(DatabaseDeserializeSnafu)?;
    ensure!(
        last.unwrap_or(0) < MAX_VIDEO_ID,
        IdsExhaustedSnafu { max: MAX_VIDEO_ID }
    );

    tracing::debug!(last_id = ?last, "inserting video with the next free id into database");
    let mut response = db
        .query(CREATE_NEXT)
        .bind(("content", &video))
        .await
        .context(DatabaseQuerySnafu)?;
    let record: Option<VideoRecord> = response.take(0).context(DatabaseDeserializeSnafu)?;

    into_video(record.context(EmptyQuerySnafu)?)
}

/// Write back a video that was loaded and modified by the caller.
#[instrument(skip(db))]
pub async fn update(video: &Video, db: &Backend) -> Result<Video> {
    tracing::debug!(video_id = video.id, "updating video in database");
    let record: Option<VideoRecord> = db
        .update((TABLE, video.id))
        .content(video.content())
        .await
        .context(DatabaseQuerySnafu)?;

    into_video(record.context(EmptyQuerySnafu)?)
}

/// Remove a video, returning it as it was before the delete.
#[instrument(skip(db))]
pub async fn delete(id: VideoId, db: &Backend) -> Result<Option<Video>> {
    tracing::debug!(video_id = id, "deleting video from database");
    let record: Option<VideoRecord> = db.delete((TABLE, id)).await.context(DatabaseQuerySnafu)?;
    record.map(into_video).transpose()
}
