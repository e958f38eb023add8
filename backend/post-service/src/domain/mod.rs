pub mod ledger;
pub mod models;

pub use models::{
    AuthorSummary, Comment, NewComment, NewPost, NewUser, Post, PostView, User, UserProfile,
    Vote, VoteState,
};
