use crate::models::Video;

use super::api::ClientError;

pub const TRAILER_NOT_AVAILABLE: &str = "Trailer not available";

#[derive(Debug, PartialEq)]
pub enum TrailerOutcome {
    Found(String),
    NotAvailable,
    Failed,
}

pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|video| video.is_embeddable_trailer())
}

pub fn resolve(result: Result<Vec<Video>, ClientError>) -> TrailerOutcome {
    match result {
        Ok(videos) => match select_trailer(&videos) {
            Some(video) => TrailerOutcome::Found(video.key.clone()),
            None => TrailerOutcome::NotAvailable,
        },
        Err(err) => {
            tracing::error!(error = %err, "trailer fetch failed");
            TrailerOutcome::Failed
        }
    }
}
