use snafu::Snafu;
use surrealdb::sql::{Id, Thing};

use super::*;

/// Name of the table that stores every video.
pub const TABLE: &str = "videos";

pub type VideoId = i64;

/// Ids live in `1..=MAX_VIDEO_ID`, one short of `i64::MAX`.
pub const MAX_VIDEO_ID: VideoId = VideoId::MAX - 1;

pub fn is_valid_id(id: VideoId) -> bool {
    (1..=MAX_VIDEO_ID).contains(&id)
}

/// A video as it is sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Video {
    pub id: VideoId,
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

impl Video {
    /// The stored fields of this video, without its id.
    pub fn content(&self) -> NewVideo {
        NewVideo::new(self.name.clone(), self.views, self.likes)
    }
}

/// The content of a video record. The id lives in the record id, never in the content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct NewVideo {
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

/// A row of the `videos` table as returned by the database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoRecord {
    pub id: Thing,
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

impl TryFrom<VideoRecord> for Video {
    type Error = InvalidRecordId;

    fn try_from(record: VideoRecord) -> Result<Self, Self::Error> {
        let id = match record.id.id {
            Id::Number(id) if record.id.tb == TABLE => id,
            _ => return Err(InvalidRecordId::new(record.id)),
        };

        Ok(Video::new(id, record.name, record.views, record.likes))
    }
}

#[derive(Debug, Clone, PartialEq, Snafu, new)]
#[snafu(display("record `{thing}` is not a video with an integer id"))]
pub struct InvalidRecordId {
    pub thing: Thing,
}

/// A partial update of a video. `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct VideoPatch {
    pub name: Option<String>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

impl VideoPatch {
    /// Merge the present fields into `video`.
    pub fn apply(self, video: &mut Video) {
        if let Some(name) = self.name {
            video.name = name;
        }
        if let Some(views) = self.views {
            video.views = views;
        }
        if let Some(likes) = self.likes {
            video.likes = likes;
        }
    }
}
