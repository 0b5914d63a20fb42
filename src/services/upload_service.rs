use crate::services::clock::{Clock, iso_timestamp};
use crate::services::storage::{PutOptions, StorageService};
use crate::utils::validation::{ValidatedUpload, sanitize_filename};
use anyhow::Result;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

pub const UPLOAD_PREFIX: &str = "uploads/";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub key: String,
    pub url: String,
    pub message: String,
}

pub struct UploadService {
    storage: Arc<dyn StorageService>,
    clock: Arc<dyn Clock>,
    public_bucket_url: String,
}

impl UploadService {
    pub fn new(
        storage: Arc<dyn StorageService>,
        clock: Arc<dyn Clock>,
        public_bucket_url: String,
    ) -> Self {
        Self {
            storage,
            clock,
            public_bucket_url,
        }
    }

    /// Writes the payload under a timestamped key and returns where it can be fetched.
    ///
    /// Two uploads with the same name in the same millisecond share a key; the
    /// later write wins.
    pub async fn store(&self, upload: ValidatedUpload, data: Bytes) -> Result<UploadResponse> {
        let now = self.clock.now();
        let key = object_key(now, &upload.file_name);

        let mut custom_metadata = HashMap::new();
        custom_metadata.insert("uploadedAt".to_string(), iso_timestamp(now));
        custom_metadata.insert("originalFileName".to_string(), upload.file_name.clone());

        let size = data.len();
        self.storage
            .put_object(
                &key,
                data,
                PutOptions {
                    content_type: upload.content_type.clone(),
                    custom_metadata,
                },
            )
            .await?;

        tracing::info!(
            "Stored upload key={} size={} content_type={}",
            key,
            size,
            upload.content_type
        );

        Ok(UploadResponse {
            success: true,
            url: self.public_url(&key),
            key,
            message: "File uploaded successfully".to_string(),
        })
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_bucket_url, key)
    }
}

pub fn object_key(at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "{}{}-{}",
        UPLOAD_PREFIX,
        at.timestamp_millis(),
        sanitize_filename(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::FixedClock;
    use crate::services::storage::InMemoryStorage;
    use chrono::TimeZone;

    #[test]
    fn test_object_key() {
        let at = Utc.timestamp_millis_opt(1_714_555_800_123).unwrap();
        assert_eq!(
            object_key(at, "My File!@#.mp3"),
            "uploads/1714555800123-My_File___.mp3"
        );
    }

    #[tokio::test]
    async fn test_store_writes_metadata() {
        let storage = Arc::new(InMemoryStorage::new());
        let at = Utc.timestamp_millis_opt(1_714_555_800_123).unwrap();
        let service = UploadService::new(
            storage.clone(),
            Arc::new(FixedClock(at)),
            "https://cdn.example/".to_string(),
        );

        let res = service
            .store(
                ValidatedUpload {
                    file_name: "voice note.webm".to_string(),
                    content_type: "audio/webm".to_string(),
                },
                Bytes::from_static(b"RIFF"),
            )
            .await
            .unwrap();

        assert!(res.success);
        assert_eq!(res.key, "uploads/1714555800123-voice_note.webm");
        assert_eq!(res.url, "https://cdn.example/uploads/1714555800123-voice_note.webm");

        let stored = storage.get(&res.key).unwrap();
        assert_eq!(stored.data, Bytes::from_static(b"RIFF"));
        assert_eq!(stored.options.content_type, "audio/webm");
        assert_eq!(
            stored.options.custom_metadata.get("uploadedAt").map(String::as_str),
            Some("2024-05-01T09:30:00.123Z")
        );
        assert_eq!(
            stored
                .options
                .custom_metadata
                .get("originalFileName")
                .map(String::as_str),
            Some("voice note.webm")
        );
    }
}
