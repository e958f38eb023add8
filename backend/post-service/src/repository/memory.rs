/// In-process `Store` used by tests and by local runs without `DATABASE_URL`
use super::Store;
use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, User, Vote};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    /// Insertion order; newest last
    post_order: Vec<Uuid>,
    votes: HashMap<(Uuid, Uuid), Vote>,
    comments: HashMap<Uuid, Comment>,
    /// Insertion order; newest last
    comment_order: Vec<Uuid>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Result<User> {
        let mut user = self
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

        user.voted_posts = self
            .votes
            .iter()
            .filter(|((_, user_id), _)| *user_id == id)
            .map(|((post_id, _), vote)| (*post_id, *vote))
            .collect();
        Ok(user)
    }

    fn post(&self, id: Uuid) -> Result<Post> {
        let mut post = self
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;

        post.votes = self
            .votes
            .iter()
            .filter(|((post_id, _), _)| *post_id == id)
            .map(|((_, user_id), vote)| (*user_id, *vote))
            .collect();
        post.author = self.users.get(&post.author_id).map(User::summary);
        Ok(post)
    }

    fn comment(&self, id: Uuid) -> Result<Comment> {
        let mut comment = self
            .comments
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("comment {}", id)))?;

        comment.replies = self
            .comment_order
            .iter()
            .filter(|reply_id| {
                self.comments
                    .get(*reply_id)
                    .map(|c| c.parent_id == Some(id))
                    .unwrap_or(false)
            })
            .copied()
            .collect();
        comment.author = self.users.get(&comment.author_id).map(User::summary);
        Ok(comment)
    }

    fn username_or_email_taken(&self, username: &str, email: &str) -> bool {
        self.users.values().any(|u| {
            u.username.eq_ignore_ascii_case(username) || u.email.eq_ignore_ascii_case(email)
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<User> {
        self.tables.read().await.user(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        let id = tables
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .map(|u| u.id);

        id.map(|id| tables.user(id)).transpose()
    }

    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.username_or_email_taken(&new.username, &new.email) {
            return Err(AppError::Conflict(
                "username or email is already taken".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            email: new.email,
            bio: None,
            image: None,
            password_hash: new.password_hash,
            voted_posts: HashMap::new(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user.id)))?;

        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.bio = user.bio.clone();
        stored.image = user.image.clone();
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Post> {
        self.tables.read().await.post(id)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        tables
            .post_order
            .iter()
            .rev()
            .map(|id| tables.post(*id))
            .collect()
    }

    async fn create_post(&self, new: NewPost) -> Result<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new.author_id) {
            return Err(AppError::NotFound(format!("user {}", new.author_id)));
        }

        let post = Post {
            id: Uuid::new_v4(),
            author_id: new.author_id,
            author: None,
            description: new.description,
            images: new.images,
            votes: HashMap::new(),
            created_at: Utc::now(),
        };
        let id = post.id;
        tables.posts.insert(id, post);
        tables.post_order.push(id);
        tables.post(id)
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post.id)))?;

        stored.description = post.description.clone();
        stored.images = post.images.clone();
        Ok(())
    }

    async fn record_vote(&self, post_id: Uuid, user_id: Uuid, vote: Vote) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        tables.votes.insert((post_id, user_id), vote);
        Ok(())
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new.post_id) {
            return Err(AppError::NotFound(format!("post {}", new.post_id)));
        }
        if let Some(parent_id) = new.parent_id {
            if !tables.comments.contains_key(&parent_id) {
                return Err(AppError::NotFound(format!("comment {}", parent_id)));
            }
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: new.post_id,
            author_id: new.author_id,
            author: None,
            parent_id: new.parent_id,
            content: new.content,
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = comment.id;
        tables.comments.insert(id, comment);
        tables.comment_order.push(id);
        tables.comment(id)
    }

    async fn get_comment(&self, id: Uuid) -> Result<Comment> {
        self.tables.read().await.comment(id)
    }

    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        tables
            .comment_order
            .iter()
            .rev()
            .filter(|id| {
                tables
                    .comments
                    .get(*id)
                    .map(|c| c.post_id == post_id && c.parent_id.is_none())
                    .unwrap_or(false)
            })
            .map(|id| tables.comment(*id))
            .collect()
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&id) {
            return Err(AppError::NotFound(format!("comment {}", id)));
        }

        let mut doomed = vec![id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let parent = doomed[cursor];
            doomed.extend(
                tables
                    .comments
                    .values()
                    .filter(|c| c.parent_id == Some(parent))
                    .map(|c| c.id),
            );
            cursor += 1;
        }

        for comment_id in &doomed {
            tables.comments.remove(comment_id);
        }
        tables.comment_order.retain(|c| !doomed.contains(c));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("gracehopper")).await.unwrap();

        let err = store
            .create_user(new_user("GraceHopper"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn vote_visible_from_both_sides() {
        let store = MemoryStore::new();
        let author = store.create_user(new_user("author01")).await.unwrap();
        let voter = store.create_user(new_user("voter001")).await.unwrap();
        let post = store
            .create_post(NewPost {
                author_id: author.id,
                description: "first".to_string(),
                images: vec![],
            })
            .await
            .unwrap();

        store.record_vote(post.id, voter.id, Vote::Up).await.unwrap();
        store.record_vote(post.id, voter.id, Vote::Down).await.unwrap();

        let post = store.get_post(post.id).await.unwrap();
        let voter = store.get_user(voter.id).await.unwrap();
        assert_eq!(post.votes.get(&voter.id), Some(&Vote::Down));
        assert_eq!(voter.voted_posts.get(&post.id), Some(&Vote::Down));
        assert_eq!(post.votes.len(), 1);
    }

    #[tokio::test]
    async fn save_updates_mutable_fields_only() {
        let store = MemoryStore::new();
        let author = store.create_user(new_user("author01")).await.unwrap();
        let voter = store.create_user(new_user("voter001")).await.unwrap();
        let post = store
            .create_post(NewPost {
                author_id: author.id,
                description: "draft".to_string(),
                images: vec![],
            })
            .await
            .unwrap();
        store.record_vote(post.id, voter.id, Vote::Up).await.unwrap();

        let mut edited = store.get_post(post.id).await.unwrap();
        edited.description = "final".to_string();
        edited.votes.clear();
        store.save_post(&edited).await.unwrap();

        let mut profile = store.get_user(author.id).await.unwrap();
        profile.bio = Some("writes posts".to_string());
        store.save_user(&profile).await.unwrap();

        let reloaded = store.get_post(post.id).await.unwrap();
        assert_eq!(reloaded.description, "final");
        assert_eq!(reloaded.votes.get(&voter.id), Some(&Vote::Up));
        assert_eq!(reloaded.author.map(|a| a.id), Some(author.id));
        assert_eq!(
            store.get_user(author.id).await.unwrap().bio.as_deref(),
            Some("writes posts")
        );
    }

    #[tokio::test]
    async fn delete_removes_reply_subtree() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("commenter")).await.unwrap();
        let post = store
            .create_post(NewPost {
                author_id: user.id,
                description: "thread".to_string(),
                images: vec![],
            })
            .await
            .unwrap();
        let root = store
            .create_comment(NewComment {
                post_id: post.id,
                author_id: user.id,
                parent_id: None,
                content: "root".to_string(),
            })
            .await
            .unwrap();
        let child = store
            .create_comment(NewComment {
                post_id: post.id,
                author_id: user.id,
                parent_id: Some(root.id),
                content: "child".to_string(),
            })
            .await
            .unwrap();
        let grandchild = store
            .create_comment(NewComment {
                post_id: post.id,
                author_id: user.id,
                parent_id: Some(child.id),
                content: "grandchild".to_string(),
            })
            .await
            .unwrap();

        store.delete_comment(child.id).await.unwrap();

        assert!(store.get_comment(root.id).await.unwrap().replies.is_empty());
        assert!(matches!(
            store.get_comment(grandchild.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
