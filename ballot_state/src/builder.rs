use log::debug;

use std::collections::HashMap;

pub use crate::config::*;
use crate::{Ballot, Selection};

/// A builder for the ballot of one election, fed by the data rendered in the page.
///
/// ```
/// pub use ballot_state::builder::Builder;
/// # use ballot_state::*;
///
/// let ballot = Builder::new(ElectionId(3))
///     .post(PostId(1), "Treasurer", 2, false)?
///     .candidate(PostId(1), CandidateId(10), "Anna", false)?
///     .candidate(PostId(1), CandidateId(11), "Bob", false)?
///     .candidate(PostId(1), CandidateId(12), "NOTA", true)?
///     .build()?;
///
/// assert_eq!(ballot.post(PostId(1)).map(|p| p.candidates.len()), Some(3));
/// # Ok::<(), BallotErrors>(())
/// ```
pub struct Builder {
    pub(crate) _election: ElectionId,
    pub(crate) _posts: Vec<Post>,
    pub(crate) _candidates: Vec<Candidate>,
}

impl Builder {
    pub fn new(election: ElectionId) -> Builder {
        Builder {
            _election: election,
            _posts: Vec::new(),
            _candidates: Vec::new(),
        }
    }

    /// Declares a post. Posts keep the order in which they are declared.
    pub fn post(
        mut self,
        id: PostId,
        name: &str,
        max_vote: usize,
        unique: bool,
    ) -> Result<Builder, BallotErrors> {
        if max_vote == 0 {
            return Err(BallotErrors::InvalidMaxVote(id));
        }
        if self._posts.iter().any(|p| p.id == id) {
            return Err(BallotErrors::DuplicatePost(id));
        }
        self._posts.push(Post {
            id,
            name: name.to_string(),
            max_vote,
            unique,
            candidates: Vec::new(),
        });
        Ok(self)
    }

    /// Adds a candidate to a post that has already been declared.
    pub fn candidate(
        mut self,
        post: PostId,
        id: CandidateId,
        name: &str,
        auto_generated: bool,
    ) -> Result<Builder, BallotErrors> {
        if self._candidates.iter().any(|c| c.id == id) {
            return Err(BallotErrors::DuplicateCandidate(id));
        }
        let p = self
            ._posts
            .iter_mut()
            .find(|p| p.id == post)
            .ok_or(BallotErrors::UnknownPost(post))?;
        p.candidates.push(id);
        self._candidates.push(Candidate {
            id,
            name: name.to_string(),
            post,
            auto_generated,
        });
        Ok(self)
    }

    pub fn build(self) -> Result<Ballot, BallotErrors> {
        let post_index: HashMap<PostId, usize> = self
            ._posts
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();
        let selections: HashMap<PostId, Selection> = self
            ._posts
            .iter()
            .map(|p| (p.id, Selection::new()))
            .collect();
        debug!(
            "Builder::build: election {:?}: {} posts, {} candidates",
            self._election,
            self._posts.len(),
            self._candidates.len()
        );
        Ok(Ballot {
            election: self._election,
            posts: self._posts,
            post_index,
            candidates: self
                ._candidates
                .into_iter()
                .map(|c| (c.id, c))
                .collect(),
            selections,
        })
    }
}
