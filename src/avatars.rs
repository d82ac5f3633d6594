use axum::body::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const REFERENCE_PREFIX: &str = "/avatars/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarError {
    #[error("Please upload a valid image file")]
    NotAnImage(String),
    #[error("Failed to upload image. Please try again.")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct Avatar {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Default)]
struct Registry {
    blobs: HashMap<Uuid, Avatar>,
    // insertion order, oldest first
    order: VecDeque<Uuid>,
}

// In-memory uploads; the oldest is dropped once `capacity` are held
#[derive(Clone)]
pub struct AvatarStore {
    registry: Arc<RwLock<Registry>>,
    capacity: usize,
}

impl AvatarStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
            capacity: capacity.max(1),
        }
    }

    pub async fn intake(&self, content_type: Option<&str>, bytes: Bytes) -> Result<String, AvatarError> {
        let content_type = content_type.unwrap_or_default().trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(AvatarError::NotAnImage(content_type));
        }
        if bytes.is_empty() {
            return Err(AvatarError::Empty);
        }

        let id = Uuid::new_v4();
        let size = bytes.len();
        let mut registry = self.registry.write().await;
        while registry.order.len() >= self.capacity {
            let Some(oldest) = registry.order.pop_front() else {
                break;
            };
            registry.blobs.remove(&oldest);
            debug!("Evicted avatar {}", oldest);
        }
        registry.blobs.insert(id, Avatar { content_type, bytes });
        registry.order.push_back(id);
        info!("Stored avatar {} ({} bytes)", id, size);
        Ok(reference_for(id))
    }

    pub async fn get(&self, id: Uuid) -> Option<Avatar> {
        self.registry.read().await.blobs.get(&id).cloned()
    }

    // Foreign, forged or evicted references yield None
    pub async fn resolve(&self, reference: &str) -> Option<Avatar> {
        let Some(id) = parse_reference(reference) else {
            debug!("Not an avatar reference: {reference:?}");
            return None;
        };
        self.get(id).await
    }

    pub async fn len(&self) -> usize {
        self.registry.read().await.blobs.len()
    }
}

pub fn reference_for(id: Uuid) -> String {
    format!("{REFERENCE_PREFIX}{id}")
}

pub fn parse_reference(reference: &str) -> Option<Uuid> {
    reference
        .trim()
        .strip_prefix(REFERENCE_PREFIX)
        .and_then(|id| Uuid::parse_str(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(n: u8) -> Bytes {
        Bytes::from(vec![0x89, b'P', b'N', b'G', n])
    }

    #[tokio::test]
    async fn images_are_stored_and_dereferenced() {
        let store = AvatarStore::new(8);
        let reference = store
            .intake(Some("image/jpeg"), Bytes::from_static(b"\xFF\xD8\xFF"))
            .await
            .unwrap();
        assert!(reference.starts_with("/avatars/"));

        let avatar = store.resolve(&reference).await.unwrap();
        assert_eq!(avatar.content_type, "image/jpeg");
        assert_eq!(&avatar.bytes[..], b"\xFF\xD8\xFF");
    }

    #[tokio::test]
    async fn non_images_are_rejected() {
        let store = AvatarStore::new(8);
        for content_type in [Some("application/pdf"), Some("text/plain"), None] {
            let err = store
                .intake(content_type, Bytes::from_static(b"%PDF"))
                .await
                .unwrap_err();
            assert!(matches!(err, AvatarError::NotAnImage(_)));
            assert_eq!(err.to_string(), "Please upload a valid image file");
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn media_type_check_ignores_case() {
        let store = AvatarStore::new(8);
        assert!(store.intake(Some("Image/PNG"), png(0)).await.is_ok());
    }

    #[tokio::test]
    async fn empty_upload_fails() {
        let store = AvatarStore::new(8);
        assert_eq!(
            store.intake(Some("image/png"), Bytes::new()).await,
            Err(AvatarError::Empty)
        );
    }

    #[tokio::test]
    async fn unknown_references_resolve_to_nothing() {
        let store = AvatarStore::new(8);
        assert!(store.resolve("blob:http://localhost/1234").await.is_none());
        assert!(store.resolve("not-an-upload").await.is_none());
        assert!(store.resolve(&reference_for(Uuid::new_v4())).await.is_none());
    }

    #[tokio::test]
    async fn oldest_upload_is_evicted_at_capacity() {
        let store = AvatarStore::new(2);
        let first = store.intake(Some("image/png"), png(1)).await.unwrap();
        let second = store.intake(Some("image/png"), png(2)).await.unwrap();
        let third = store.intake(Some("image/png"), png(3)).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.resolve(&first).await.is_none());
        assert_eq!(store.resolve(&second).await.unwrap().bytes, png(2));
        assert_eq!(store.resolve(&third).await.unwrap().bytes, png(3));
    }

    #[tokio::test]
    async fn registry_never_grows_past_capacity() {
        let store = AvatarStore::new(3);
        for n in 0..20 {
            store.intake(Some("image/png"), png(n)).await.unwrap();
        }
        assert_eq!(store.len().await, 3);
    }
}
