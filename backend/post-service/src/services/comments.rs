/// Comment service - threaded comments on posts
use crate::domain::{Comment, NewComment};
use crate::error::{AppError, Result};
use crate::repository::Store;
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    store: Arc<dyn Store>,
}

fn require_content(field: &str, content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::invalid(field, "can't be blank"));
    }
    Ok(content.to_string())
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Top-level comment on a post
    pub async fn add_comment(&self, post_id: Uuid, author_id: Uuid, content: &str) -> Result<Comment> {
        let content = require_content("comment", content)?;
        self.store.get_post(post_id).await?;

        let comment = self
            .store
            .create_comment(NewComment {
                post_id,
                author_id,
                parent_id: None,
                content,
            })
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment added");
        Ok(comment)
    }

    pub async fn post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.store.get_post(post_id).await?;
        self.store.list_post_comments(post_id).await
    }

    /// Reply to an existing comment; the reply belongs to the same post
    pub async fn reply(&self, parent_id: Uuid, author_id: Uuid, content: &str) -> Result<Comment> {
        let content = require_content("content", content)?;
        let parent = self.store.get_comment(parent_id).await?;

        let reply = self
            .store
            .create_comment(NewComment {
                post_id: parent.post_id,
                author_id,
                parent_id: Some(parent.id),
                content,
            })
            .await?;

        tracing::info!(comment_id = %reply.id, parent_id = %parent_id, "reply added");
        Ok(reply)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment> {
        self.store.get_comment(id).await
    }

    /// Delete a comment and its replies; only the author may do this
    pub async fn delete_comment(&self, id: Uuid, requester: Uuid) -> Result<()> {
        let comment = self.store.get_comment(id).await?;
        if comment.author_id != requester {
            tracing::warn!(comment_id = %id, requester = %requester, "comment delete refused");
            return Err(AppError::Forbidden(
                "You have no permission to delete this comment".to_string(),
            ));
        }

        self.store.delete_comment(id).await?;
        tracing::info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPost, NewUser};
    use crate::repository::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: CommentService,
        alice: Uuid,
        bob: Uuid,
        post: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for username in ["alice001", "bob00001"] {
            let user = store
                .create_user(NewUser {
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    username: username.to_string(),
                    email: format!("{}@example.com", username),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let post = store
            .create_post(NewPost {
                author_id: ids[0],
                description: "discuss".to_string(),
                images: vec![],
            })
            .await
            .unwrap();

        Fixture {
            service: CommentService::new(store.clone()),
            store,
            alice: ids[0],
            bob: ids[1],
            post: post.id,
        }
    }

    #[tokio::test]
    async fn test_comments_listed_newest_first_with_author() {
        let f = fixture().await;
        let first = f.service.add_comment(f.post, f.alice, "first").await.unwrap();
        let second = f.service.add_comment(f.post, f.bob, "second").await.unwrap();

        let listed = f.service.post_comments(f.post).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(listed[0].author.as_ref().map(|a| a.id), Some(f.bob));
    }

    #[tokio::test]
    async fn test_blank_comment_and_missing_post() {
        let f = fixture().await;
        let err = f.service.add_comment(f.post, f.alice, "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.contains_key("comment")));

        let err = f
            .service
            .add_comment(Uuid::new_v4(), f.alice, "orphan")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replies_are_threaded() {
        let f = fixture().await;
        let root = f.service.add_comment(f.post, f.alice, "root").await.unwrap();
        let reply = f.service.reply(root.id, f.bob, "reply").await.unwrap();

        assert_eq!(reply.parent_id, Some(root.id));
        assert_eq!(reply.post_id, f.post);

        let root = f.service.get_comment(root.id).await.unwrap();
        assert_eq!(root.replies, vec![reply.id]);

        // replies are not top-level comments
        assert_eq!(f.service.post_comments(f.post).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_only_author_can_delete() {
        let f = fixture().await;
        let root = f.service.add_comment(f.post, f.alice, "mine").await.unwrap();
        let reply = f.service.reply(root.id, f.bob, "theirs").await.unwrap();

        let err = f.service.delete_comment(root.id, f.bob).await.unwrap_err();
        assert_eq!(err.to_string(), "You have no permission to delete this comment");

        f.service.delete_comment(root.id, f.alice).await.unwrap();
        assert!(matches!(
            f.store.get_comment(reply.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
