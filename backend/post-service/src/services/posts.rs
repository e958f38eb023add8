/// Post service - post creation, listing and voting
use crate::domain::{ledger, NewPost, Post, PostView, Vote};
use crate::error::{AppError, Result};
use crate::repository::Store;
use crate::storage::{image_extension, ImageStore};
use std::sync::Arc;
use uuid::Uuid;

/// An image received with a new post
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct PostService {
    store: Arc<dyn Store>,
    images: Option<Arc<dyn ImageStore>>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            images: None,
        }
    }

    pub fn with_images(store: Arc<dyn Store>, images: Option<Arc<dyn ImageStore>>) -> Self {
        Self { store, images }
    }

    /// Create a post, uploading the attached image first when there is one
    pub async fn create_post(
        &self,
        author_id: Uuid,
        description: &str,
        image: Option<ImageUpload>,
    ) -> Result<Post> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid("description", "can't be blank"));
        }

        let mut images = Vec::new();
        if let Some(upload) = image {
            let extension = image_extension(&upload.filename)?;
            let store = self.images.as_ref().ok_or_else(|| {
                AppError::BadRequest("Image uploads are not enabled".to_string())
            })?;
            images.push(store.upload(upload.bytes, &extension).await?);
        }

        let post = self
            .store
            .create_post(NewPost {
                author_id,
                description: description.to_string(),
                images,
            })
            .await?;

        tracing::info!(
            post_id = %post.id,
            author_id = %author_id,
            images = post.images.len(),
            "post created"
        );
        Ok(post)
    }

    /// All posts newest first, rendered for `viewer`
    pub async fn list_posts(&self, viewer: Uuid) -> Result<Vec<PostView>> {
        let posts = self.store.list_posts().await?;
        Ok(posts.iter().map(|post| ledger::view(post, viewer)).collect())
    }

    pub async fn get_post(&self, post_id: Uuid, viewer: Uuid) -> Result<PostView> {
        let post = self.store.get_post(post_id).await?;
        Ok(ledger::view(&post, viewer))
    }

    /// Cast `vote` on behalf of `voter` and return the updated view
    ///
    /// The voter is loaded only to confirm the account exists (404 otherwise);
    /// `record_vote` is the single write.
    pub async fn vote(&self, post_id: Uuid, voter: Uuid, vote: Vote) -> Result<PostView> {
        let mut post = self.store.get_post(post_id).await?;
        let mut user = self.store.get_user(voter).await?;

        let previous = ledger::cast_vote(&mut post, &mut user, vote);
        self.store.record_vote(post.id, user.id, vote).await?;

        tracing::debug!(
            post_id = %post.id,
            user_id = %user.id,
            vote = ?vote,
            previous = ?previous,
            "vote recorded"
        );
        Ok(ledger::view(&post, voter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, VoteState};
    use crate::repository::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingImages {
        uploads: Mutex<Vec<(usize, String)>>,
    }

    #[async_trait]
    impl ImageStore for RecordingImages {
        async fn upload(&self, body: Vec<u8>, extension: &str) -> Result<String> {
            self.uploads
                .lock()
                .unwrap()
                .push((body.len(), extension.to_string()));
            Ok(format!("https://cdn.test/post-images/img.{}", extension))
        }
    }

    async fn user(store: &MemoryStore, username: &str) -> Uuid {
        store
            .create_user(NewUser {
                first_name: "Alan".to_string(),
                last_name: "Turing".to_string(),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_post_trims_and_rejects_blank() {
        let store = Arc::new(MemoryStore::new());
        let author = user(&store, "author01").await;
        let service = PostService::new(store);

        let post = service.create_post(author, "  hello  ", None).await.unwrap();
        assert_eq!(post.description, "hello");
        assert!(post.images.is_empty());
        assert!(post.votes.is_empty());

        let err = service.create_post(author, "   ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.contains_key("description")));
    }

    #[tokio::test]
    async fn test_create_post_uploads_image() {
        let store = Arc::new(MemoryStore::new());
        let author = user(&store, "author01").await;
        let images = Arc::new(RecordingImages::default());
        let service = PostService::with_images(store, Some(images.clone()));

        let post = service
            .create_post(
                author,
                "with picture",
                Some(ImageUpload {
                    filename: "cat.PNG".to_string(),
                    bytes: vec![0u8; 16],
                }),
            )
            .await
            .unwrap();

        assert_eq!(post.images, vec!["https://cdn.test/post-images/img.png".to_string()]);
        assert_eq!(images.uploads.lock().unwrap().as_slice(), &[(16, "png".to_string())]);

        let err = service
            .create_post(
                author,
                "with video",
                Some(ImageUpload {
                    filename: "clip.mp4".to_string(),
                    bytes: vec![1, 2, 3],
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "File type is not supported"));
        assert_eq!(images.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vote_flow_persists_and_renders() {
        let store = Arc::new(MemoryStore::new());
        let author = user(&store, "author01").await;
        let alice = user(&store, "alice001").await;
        let bob = user(&store, "bob00001").await;
        let service = PostService::new(store.clone());
        let post = service.create_post(author, "vote on me", None).await.unwrap();

        let view = service.vote(post.id, alice, Vote::Up).await.unwrap();
        assert_eq!(view.score, 1);
        assert_eq!(view.vote_state, VoteState::Up);

        let view = service.vote(post.id, bob, Vote::Down).await.unwrap();
        assert_eq!(view.score, 0);
        assert_eq!(view.vote_state, VoteState::Down);

        let view = service.vote(post.id, alice, Vote::Up).await.unwrap();
        assert_eq!(view.score, 0);

        let view = service.vote(post.id, bob, Vote::Up).await.unwrap();
        assert_eq!(view.score, 2);

        let stored = store.get_post(post.id).await.unwrap();
        assert_eq!(stored.votes.len(), 2);
        let alice_user = store.get_user(alice).await.unwrap();
        assert_eq!(alice_user.voted_posts.get(&post.id), Some(&Vote::Up));

        let as_author = service.get_post(post.id, author).await.unwrap();
        assert_eq!(as_author.score, 2);
        assert_eq!(as_author.vote_state, VoteState::None);
    }

    #[tokio::test]
    async fn test_vote_on_missing_post_or_user() {
        let store = Arc::new(MemoryStore::new());
        let author = user(&store, "author01").await;
        let service = PostService::new(store);
        let post = service.create_post(author, "exists", None).await.unwrap();

        let err = service.vote(Uuid::new_v4(), author, Vote::Up).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.vote(post.id, Uuid::new_v4(), Vote::Up).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let author = user(&store, "author01").await;
        let service = PostService::new(store);
        let first = service.create_post(author, "first", None).await.unwrap();
        let second = service.create_post(author, "second", None).await.unwrap();

        let ids: Vec<Uuid> = service
            .list_posts(author)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
