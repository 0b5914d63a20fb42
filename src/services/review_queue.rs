//! Read-only view of uploads still waiting to be published.
//!
//! Operators mark an object as handled by copying it to `<key>.processed`.
//! Video goes to video hosting and audio to audio hosting; this module only
//! decides which, it never moves objects.

use crate::services::storage::StorageService;
use crate::services::upload_service::UPLOAD_PREFIX;
use anyhow::Result;
use std::fmt;

pub const PROCESSED_SUFFIX: &str = ".processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub key: String,
    pub kind: Option<MediaKind>,
}

/// Classifies a key by extension. `.webm` counts as video.
pub fn classify(key: &str) -> Option<MediaKind> {
    let ext = key.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "webm" => Some(MediaKind::Video),
        "mp3" | "wav" | "ogg" => Some(MediaKind::Audio),
        _ => None,
    }
}

pub async fn pending_uploads(storage: &dyn StorageService) -> Result<Vec<PendingUpload>> {
    let keys = storage.list_objects(UPLOAD_PREFIX).await?;

    Ok(keys
        .into_iter()
        .filter(|key| !key.ends_with(PROCESSED_SUFFIX))
        .map(|key| PendingUpload {
            kind: classify(&key),
            key,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{InMemoryStorage, PutOptions};
    use bytes::Bytes;

    #[test]
    fn test_classify() {
        assert_eq!(classify("uploads/1-clip.mp4"), Some(MediaKind::Video));
        assert_eq!(classify("uploads/1-clip.WEBM"), Some(MediaKind::Video));
        assert_eq!(classify("uploads/1-voice.mp3"), Some(MediaKind::Audio));
        assert_eq!(classify("uploads/1-voice.wav"), Some(MediaKind::Audio));
        assert_eq!(classify("uploads/1-voice.ogg"), Some(MediaKind::Audio));
        assert_eq!(classify("uploads/1-notes.txt"), None);
        assert_eq!(classify("uploads/1-noext"), None);
    }

    #[tokio::test]
    async fn test_pending_uploads_skips_processed() {
        let storage = InMemoryStorage::new();
        for key in [
            "uploads/1-a.mp4",
            "uploads/2-b.mp3",
            "uploads/3-c.mp4.processed",
            "uploads/4-d.bin",
            "other/5-e.mp4",
        ] {
            storage
                .put_object(key, Bytes::from_static(b"x"), PutOptions::default())
                .await
                .unwrap();
        }

        let pending = pending_uploads(&storage).await.unwrap();
        assert_eq!(
            pending,
            vec![
                PendingUpload {
                    key: "uploads/1-a.mp4".to_string(),
                    kind: Some(MediaKind::Video),
                },
                PendingUpload {
                    key: "uploads/2-b.mp3".to_string(),
                    kind: Some(MediaKind::Audio),
                },
                PendingUpload {
                    key: "uploads/4-d.bin".to_string(),
                    kind: None,
                },
            ]
        );
    }
}
