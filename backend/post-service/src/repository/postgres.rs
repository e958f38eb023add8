/// PostgreSQL `Store` backed by sqlx
///
/// Author summaries are attached with an explicit join; votes live in
/// `post_votes` keyed by `(post_id, user_id)` and indexed by `user_id`.
use super::Store;
use crate::domain::{AuthorSummary, Comment, NewComment, NewPost, NewUser, Post, User, Vote};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    bio: Option<String>,
    image: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, voted_posts: HashMap<Uuid, Vote>) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
            bio: self.bio,
            image: self.image,
            password_hash: self.password_hash,
            voted_posts,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    description: String,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    author_first_name: String,
    author_last_name: String,
    author_image: Option<String>,
}

impl PostRow {
    fn into_post(self, votes: HashMap<Uuid, Vote>) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            author: Some(AuthorSummary {
                id: self.author_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
                image: self.author_image,
            }),
            description: self.description,
            images: self.images,
            votes,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    post_id: Uuid,
    user_id: Uuid,
    vote: i16,
}

impl VoteRow {
    fn decode(&self) -> Result<Vote> {
        Vote::from_i16(self.vote)
            .ok_or_else(|| AppError::Database(format!("invalid stored vote {}", self.vote)))
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_first_name: String,
    author_last_name: String,
    author_image: Option<String>,
}

impl CommentRow {
    fn into_comment(self, replies: Vec<Uuid>) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            author_id: self.author_id,
            author: Some(AuthorSummary {
                id: self.author_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
                image: self.author_image,
            }),
            parent_id: self.parent_id,
            content: self.content,
            replies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, username, email, bio, image, password_hash, created_at";

const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.description, p.images, p.created_at,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           u.image AS author_image
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, c.parent_id, c.content, c.created_at, c.updated_at,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           u.image AS author_image
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Repository over the service's PostgreSQL schema
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn voted_posts(&self, user_id: Uuid) -> Result<HashMap<Uuid, Vote>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT post_id, user_id, vote FROM post_votes WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| Ok((row.post_id, row.decode()?))).collect()
    }

    /// Votes for a batch of posts, grouped by post id
    async fn votes_for(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, HashMap<Uuid, Vote>>> {
        let mut grouped: HashMap<Uuid, HashMap<Uuid, Vote>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT post_id, user_id, vote FROM post_votes WHERE post_id = ANY($1)",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        for row in &rows {
            grouped
                .entry(row.post_id)
                .or_default()
                .insert(row.user_id, row.decode()?);
        }
        Ok(grouped)
    }

    /// Direct replies for a batch of comments, oldest first
    async fn replies_for(&self, comment_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Uuid>>> {
        let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if comment_ids.is_empty() {
            return Ok(grouped);
        }

        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT parent_id, id
            FROM comments
            WHERE parent_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(comment_ids)
        .fetch_all(&self.pool)
        .await?;

        for (parent_id, id) in rows {
            grouped.entry(parent_id).or_default().push(id);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: Uuid) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

        let voted_posts = self.voted_posts(id).await?;
        Ok(row.into_user(voted_posts))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let voted_posts = self.voted_posts(row.id).await?;
                Ok(Some(row.into_user(voted_posts)))
            }
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user(HashMap::new()))
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, bio = $4, image = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(&user.image)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;

        let mut votes = self.votes_for(&[id]).await?;
        Ok(row.into_post(votes.remove(&id).unwrap_or_default()))
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} ORDER BY p.created_at DESC, p.id DESC",
            POST_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut votes = self.votes_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let post_votes = votes.remove(&row.id).unwrap_or_default();
                row.into_post(post_votes)
            })
            .collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO posts (id, author_id, description, images)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post.author_id)
        .bind(&post.description)
        .bind(&post.images)
        .fetch_one(&self.pool)
        .await?;

        self.get_post(id).await
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        let result = sqlx::query("UPDATE posts SET description = $2, images = $3 WHERE id = $1")
            .bind(post.id)
            .bind(&post.description)
            .bind(&post.images)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("post {}", post.id)));
        }
        Ok(())
    }

    async fn record_vote(&self, post_id: Uuid, user_id: Uuid, vote: Vote) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO post_votes (post_id, user_id, vote)
            VALUES ($1, $2, $3)
            ON CONFLICT (post_id, user_id) DO UPDATE
            SET vote = EXCLUDED.vote, updated_at = NOW()
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(vote.as_i16())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO comments (id, post_id, author_id, parent_id, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        self.get_comment(id).await
    }

    async fn get_comment(&self, id: Uuid) -> Result<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", id)))?;

        let mut replies = self.replies_for(&[id]).await?;
        Ok(row.into_comment(replies.remove(&id).unwrap_or_default()))
    }

    async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.post_id = $1 AND c.parent_id IS NULL ORDER BY c.created_at DESC, c.id DESC",
            COMMENT_SELECT
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut replies = self.replies_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let comment_replies = replies.remove(&row.id).unwrap_or_default();
                row.into_comment(comment_replies)
            })
            .collect())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        // parent_id is ON DELETE CASCADE, so replies go with it
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("comment {}", id)));
        }
        Ok(())
    }
}
