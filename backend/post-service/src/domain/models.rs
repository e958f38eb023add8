use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use uuid::Uuid;

/// A single user's vote on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Contribution to a post's score
    pub fn value(self) -> i64 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }

    /// Storage encoding (`post_votes.vote`)
    pub fn as_i16(self) -> i16 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Vote::Up),
            -1 => Some(Vote::Down),
            _ => None,
        }
    }
}

/// A viewer's own vote on a post
///
/// Serializes as `"UP"`, `"DOWN"` or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
    Up,
    Down,
    #[default]
    None,
}

impl From<Option<Vote>> for VoteState {
    fn from(vote: Option<Vote>) -> Self {
        match vote {
            Some(Vote::Up) => VoteState::Up,
            Some(Vote::Down) => VoteState::Down,
            None => VoteState::None,
        }
    }
}

impl Serialize for VoteState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VoteState::Up => serializer.serialize_str("UP"),
            VoteState::Down => serializer.serialize_str("DOWN"),
            VoteState::None => serializer.serialize_none(),
        }
    }
}

/// Public fields of a user attached to posts and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

/// Post entity
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    /// Joined by the store on read
    pub author: Option<AuthorSummary>,
    pub description: String,
    pub images: Vec<String>,
    /// user id -> vote; one entry per user who has voted
    pub votes: HashMap<Uuid, Vote>,
    pub created_at: DateTime<Utc>,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password_hash: String,
    /// post id -> vote; mirror of `Post::votes` for this user
    pub voted_posts: HashMap<Uuid, Vote>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            image: self.image.clone(),
        }
    }
}

/// User fields returned to the account owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Comment entity - top-level comment on a post or a reply to another comment
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author: Option<AuthorSummary>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    /// Direct replies, oldest first
    pub replies: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// Post as rendered for a particular viewer
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: Option<AuthorSummary>,
    pub description: String,
    pub images: Vec<String>,
    pub score: i64,
    pub vote_state: VoteState,
    pub created_at: DateTime<Utc>,
}
