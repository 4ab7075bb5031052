use crate::schema::{Comment, Complaint, Engagement, Person, Project, Reply};
use crate::store::{Record, RecordStore};
use tracing::debug;

/// Where a user stands on a record after toggling a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Liked,
    Disliked,
    Cleared,
}

/// Records that carry likes, dislikes and comments.
pub trait Engaged: Record {
    fn engagement(&self) -> &Engagement;
    fn engagement_mut(&mut self) -> &mut Engagement;
}

impl Engaged for Complaint {
    fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    fn engagement_mut(&mut self) -> &mut Engagement {
        &mut self.engagement
    }
}

impl Engaged for Project {
    fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    fn engagement_mut(&mut self) -> &mut Engagement {
        &mut self.engagement
    }
}

impl Engagement {
    /// A user is in at most one of the two sets.
    pub fn reaction_of(&self, user_id: &str) -> Reaction {
        if self.likes.contains(user_id) {
            Reaction::Liked
        } else if self.dislikes.contains(user_id) {
            Reaction::Disliked
        } else {
            Reaction::Cleared
        }
    }

    pub fn toggle_like(&mut self, user_id: &str) -> Reaction {
        if self.likes.remove(user_id) {
            return Reaction::Cleared;
        }
        self.dislikes.remove(user_id);
        self.likes.insert(user_id.to_string());
        Reaction::Liked
    }

    pub fn toggle_dislike(&mut self, user_id: &str) -> Reaction {
        if self.dislikes.remove(user_id) {
            return Reaction::Cleared;
        }
        self.likes.remove(user_id);
        self.dislikes.insert(user_id.to_string());
        Reaction::Disliked
    }

    pub fn comment_count(&self) -> usize {
        self.comments
            .iter()
            .map(|comment| 1 + comment.replies.len())
            .sum()
    }
}

impl<R: Engaged> RecordStore<R> {
    pub fn toggle_like(&mut self, id: &str, user_id: &str) -> Option<Reaction> {
        let reaction = self.with_record_mut(id, |record| record.engagement_mut().toggle_like(user_id))?;
        debug!(kind = R::KIND, id, user_id, ?reaction, "like toggled");
        Some(reaction)
    }

    pub fn toggle_dislike(&mut self, id: &str, user_id: &str) -> Option<Reaction> {
        let reaction =
            self.with_record_mut(id, |record| record.engagement_mut().toggle_dislike(user_id))?;
        debug!(kind = R::KIND, id, user_id, ?reaction, "dislike toggled");
        Some(reaction)
    }

    /// Appends a top-level comment. `None` if the record is unknown.
    pub fn add_comment(&mut self, id: &str, author: Person, body: impl Into<String>) -> Option<Comment> {
        let comment = Comment {
            id: format!("comment-{}", self.next_token()),
            author,
            body: body.into(),
            created_at: self.now(),
            replies: Vec::new(),
        };
        self.with_record_mut(id, |record| {
            record.engagement_mut().comments.push(comment.clone());
        })?;
        debug!(kind = R::KIND, id, comment_id = %comment.id, "comment added");
        Some(comment)
    }

    /// Replies to an existing comment. `None` if either id is unknown.
    pub fn add_reply(
        &mut self,
        id: &str,
        comment_id: &str,
        author: Person,
        body: impl Into<String>,
    ) -> Option<Reply> {
        let reply = Reply {
            id: format!("reply-{}", self.next_token()),
            author,
            body: body.into(),
            created_at: self.now(),
        };
        self.with_record_mut(id, |record| {
            let comment = record
                .engagement_mut()
                .comments
                .iter_mut()
                .find(|comment| comment.id == comment_id)?;
            comment.replies.push(reply.clone());
            Some(())
        })??;
        debug!(kind = R::KIND, id, comment_id, reply_id = %reply.id, "reply added");
        Some(reply)
    }
}
