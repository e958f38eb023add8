//! Vote ledger
//!
//! Votes are last-write-wins per user: casting the same vote twice changes
//! nothing, casting the opposite vote flips it. The score is never cached; it
//! is summed from the current votes whenever it is read.

use super::models::{Post, PostView, User, Vote, VoteState};
use uuid::Uuid;

/// Upsert `vote` for `user` on `post`, mirroring it into `user.voted_posts`
///
/// Returns the user's previous vote on the post, if any.
pub fn cast_vote(post: &mut Post, user: &mut User, vote: Vote) -> Option<Vote> {
    let previous = post.votes.insert(user.id, vote);
    user.voted_posts.insert(post.id, vote);
    previous
}

/// Sum of +1 per UP and -1 per DOWN
pub fn score(post: &Post) -> i64 {
    post.votes.values().map(|v| v.value()).sum()
}

pub fn vote_state(post: &Post, user_id: Uuid) -> VoteState {
    post.votes.get(&user_id).copied().into()
}

/// Render a post with its score and the viewer's own vote
pub fn view(post: &Post, viewer: Uuid) -> PostView {
    PostView {
        id: post.id,
        author: post.author.clone(),
        description: post.description.clone(),
        images: post.images.clone(),
        score: score(post),
        vote_state: vote_state(post, viewer),
        created_at: post.created_at,
    }
}
