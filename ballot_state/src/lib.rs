/*!
State of an election ballot page.

A [`Ballot`] holds, for every post of the election, the voter's current
[`Selection`]: a bounded list of accept/reject picks. The
[`controller::BallotController`] reacts to UI events, keeps the
[`surface::BallotSurface`] (posters and radio inputs) in sync with the
selections, and produces the vote payload on submit.

```
use ballot_state::builder::Builder;
use ballot_state::controller::BallotController;
use ballot_state::surface::MemorySurface;
use ballot_state::*;

let ballot = Builder::new(ElectionId(1))
    .post(PostId(1), "General Secretary", 1, false)?
    .candidate(PostId(1), CandidateId(5), "Anna", false)?
    .candidate(PostId(1), CandidateId(9), "Bob", false)?
    .build()?;
let surface = MemorySurface::for_ballot(&ballot);
let mut controller = BallotController::new(ballot, surface);

controller.record_vote(PostId(1), CandidateId(5), VoteValue::Accept);
let payload = controller.serialize(ElectionId(1))?;
assert_eq!(payload, r#"{"5":1,"9":0}"#);
# Ok::<(), BallotErrors>(())
```
*/
mod config;

pub mod builder;
pub mod controller;
pub mod manual;
pub mod payload;
pub mod surface;

use log::debug;

use std::collections::{HashMap, VecDeque};

pub use crate::config::*;

/// The picks recorded for one post, oldest first.
///
/// Invariants: a candidate appears at most once, only accept/reject values are
/// stored, and the length never exceeds the maximum passed to [`Selection::record`].
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Selection {
    entries: VecDeque<(CandidateId, VoteValue)>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &(CandidateId, VoteValue)> {
        self.entries.iter()
    }

    pub fn candidates(&self) -> Vec<CandidateId> {
        self.entries.iter().map(|(cid, _)| *cid).collect()
    }

    pub fn value_of(&self, candidate: CandidateId) -> Option<VoteValue> {
        self.entries
            .iter()
            .find(|(cid, _)| *cid == candidate)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a pick at the most recent position.
    ///
    /// A previous pick for the same candidate is dropped first. If the list is
    /// full, the pick that was inserted first is evicted and returned. Neutral
    /// values are not stored: they only remove the candidate. Nothing is stored
    /// either when `max_vote` is 0.
    pub fn record(
        &mut self,
        candidate: CandidateId,
        value: VoteValue,
        max_vote: usize,
    ) -> Option<(CandidateId, VoteValue)> {
        self.remove(candidate);
        if value.is_neutral() || max_vote == 0 {
            return None;
        }
        let evicted = if self.entries.len() >= max_vote {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some((cid, v)) = evicted {
            debug!("Selection::record: evicting {:?} ({:?})", cid, v);
        }
        self.entries.push_back((candidate, value));
        evicted
    }

    /// Removes the pick for this candidate, keeping the order of the others.
    pub fn remove(&mut self, candidate: CandidateId) -> Option<VoteValue> {
        let idx = self.entries.iter().position(|(cid, _)| *cid == candidate)?;
        self.entries.remove(idx).map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The whole ballot of one election: posts, candidates and the current picks.
///
/// Built once from the page data with [`builder::Builder`], then only mutated
/// by the controller.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub(crate) election: ElectionId,
    // Posts in page order.
    pub(crate) posts: Vec<Post>,
    pub(crate) post_index: HashMap<PostId, usize>,
    pub(crate) candidates: HashMap<CandidateId, Candidate>,
    pub(crate) selections: HashMap<PostId, Selection>,
}

impl Ballot {
    pub fn election(&self) -> ElectionId {
        self.election
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post: PostId) -> Option<&Post> {
        self.post_index.get(&post).map(|idx| &self.posts[*idx])
    }

    pub fn candidate(&self, candidate: CandidateId) -> Option<&Candidate> {
        self.candidates.get(&candidate)
    }

    /// All the candidates of the ballot, in page order.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.posts
            .iter()
            .flat_map(|p| p.candidates.iter())
            .filter_map(|cid| self.candidates.get(cid))
    }

    pub fn selection(&self, post: PostId) -> Option<&Selection> {
        self.selections.get(&post)
    }

    pub(crate) fn set_selection(&mut self, post: PostId, selection: Selection) {
        self.selections.insert(post, selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CandidateId = CandidateId(1);
    const B: CandidateId = CandidateId(2);
    const C: CandidateId = CandidateId(3);
    const D: CandidateId = CandidateId(4);

    #[test]
    fn oldest_pick_is_evicted() {
        let mut s = Selection::new();
        assert_eq!(s.record(A, VoteValue::Accept, 3), None);
        assert_eq!(s.record(B, VoteValue::Reject, 3), None);
        assert_eq!(s.record(C, VoteValue::Accept, 3), None);
        assert_eq!(s.record(D, VoteValue::Accept, 3), Some((A, VoteValue::Accept)));
        assert_eq!(s.candidates(), vec![B, C, D]);
    }

    #[test]
    fn revote_moves_to_the_end() {
        let mut s = Selection::new();
        s.record(A, VoteValue::Accept, 2);
        s.record(B, VoteValue::Accept, 2);
        assert_eq!(s.record(A, VoteValue::Reject, 2), None);
        assert_eq!(s.len(), 2);
        assert_eq!(s.candidates(), vec![B, A]);
        assert_eq!(s.value_of(A), Some(VoteValue::Reject));
    }

    #[test]
    fn eviction_is_by_insertion_age() {
        let mut s = Selection::new();
        s.record(A, VoteValue::Accept, 2);
        s.record(B, VoteValue::Accept, 2);
        // Re-voting B does not refresh A.
        s.record(B, VoteValue::Reject, 2);
        s.record(C, VoteValue::Accept, 2);
        assert_eq!(s.candidates(), vec![B, C]);
    }

    #[test]
    fn neutral_only_removes() {
        let mut s = Selection::new();
        s.record(A, VoteValue::Accept, 2);
        s.record(B, VoteValue::Accept, 2);
        assert_eq!(s.record(A, VoteValue::Neutral, 2), None);
        assert_eq!(s.candidates(), vec![B]);
        assert_eq!(s.remove(C), None);
    }

    #[test]
    fn single_slot() {
        let mut s = Selection::new();
        s.record(A, VoteValue::Accept, 1);
        assert_eq!(s.record(B, VoteValue::Reject, 1), Some((A, VoteValue::Accept)));
        assert_eq!(s.candidates(), vec![B]);
    }

    #[test]
    fn zero_slots_store_nothing() {
        let mut s = Selection::new();
        assert_eq!(s.record(A, VoteValue::Accept, 0), None);
        assert!(s.is_empty());
    }
}
