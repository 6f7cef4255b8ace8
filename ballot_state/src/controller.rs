use log::{debug, info, warn};

use crate::config::*;
use crate::payload;
use crate::surface::BallotSurface;
use crate::{Ballot, Selection};

/// The input events of the ballot page.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum UiEvent {
    /// A radio input of a candidate changed. `unique` is the flag carried by the input.
    RadioChanged {
        post: PostId,
        candidate: CandidateId,
        value: VoteValue,
        unique: bool,
    },
    ResetPost {
        post: PostId,
    },
    /// The vote form of the election is submitted.
    Submit {
        election: ElectionId,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum EventOutcome {
    Rendered,
    /// The payload written to the form.
    Submitted(String),
    /// The event referred to a post or candidate that is not on the ballot.
    Ignored,
}

/// Keeps the posters and radio inputs of the surface consistent with the
/// selections of the ballot.
///
/// Every operation runs to completion before the next event is handled.
pub struct BallotController<S: BallotSurface> {
    ballot: Ballot,
    surface: S,
}

impl<S: BallotSurface> BallotController<S> {
    pub fn new(ballot: Ballot, surface: S) -> BallotController<S> {
        BallotController { ballot, surface }
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn handle(&mut self, event: &UiEvent) -> Result<EventOutcome, BallotErrors> {
        debug!("handle: {:?}", event);
        let outcome = match event {
            UiEvent::RadioChanged {
                post,
                candidate,
                value,
                unique,
            } => {
                if *unique {
                    self.pick_exclusive(*post, *candidate, *value)
                } else if value.is_neutral() {
                    self.withdraw(*post, *candidate)
                } else {
                    self.record_vote(*post, *candidate, *value)
                }
            }
            UiEvent::ResetPost { post } => self.reset(*post),
            UiEvent::Submit { election } if *election != self.ballot.election() => {
                warn!(
                    "handle: submit of election {} on the ballot of election {}",
                    election,
                    self.ballot.election()
                );
                EventOutcome::Ignored
            }
            UiEvent::Submit { election } => EventOutcome::Submitted(self.serialize(*election)?),
            UiEvent::Resize { width, height } => {
                self.surface.relayout(*width, *height);
                EventOutcome::Rendered
            }
        };
        Ok(outcome)
    }

    /// Records an accept or reject pick for a candidate of a multi-select post.
    ///
    /// The previous pick of the candidate is replaced, the oldest pick of the
    /// post is evicted when the post is full, and the post is re-rendered.
    pub fn record_vote(
        &mut self,
        post: PostId,
        candidate: CandidateId,
        value: VoteValue,
    ) -> EventOutcome {
        let max_vote = match self.lookup(post, candidate) {
            Some(p) => p.max_vote,
            None => return EventOutcome::Ignored,
        };
        let mut selection = self.current_selection(post);
        if let Some((evicted, _)) = selection.record(candidate, value, max_vote) {
            info!(
                "record_vote: post {}: candidate {} evicted by candidate {}",
                post, evicted, candidate
            );
        }
        self.render(post, &selection);
        self.ballot.set_selection(post, selection);
        EventOutcome::Rendered
    }

    /// The pick of a single-winner post.
    ///
    /// The inputs of such a post form one radio group: every other candidate of
    /// the post is left unchecked and only the chosen input is checked. Nothing
    /// is kept in the selection.
    pub fn pick_exclusive(
        &mut self,
        post: PostId,
        candidate: CandidateId,
        value: VoteValue,
    ) -> EventOutcome {
        let candidates = match self.lookup(post, candidate) {
            Some(p) => p.candidates.clone(),
            None => return EventOutcome::Ignored,
        };
        for cid in candidates {
            self.surface.clear_marks(cid);
            self.surface.uncheck(cid);
        }
        self.surface.check(candidate, value);
        self.ballot.set_selection(post, Selection::new());
        EventOutcome::Rendered
    }

    /// The neutral input of a candidate was picked: drops its pick, if any.
    pub fn withdraw(&mut self, post: PostId, candidate: CandidateId) -> EventOutcome {
        if self.lookup(post, candidate).is_none() {
            return EventOutcome::Ignored;
        }
        let mut selection = self.current_selection(post);
        selection.remove(candidate);
        self.render(post, &selection);
        self.ballot.set_selection(post, selection);
        EventOutcome::Rendered
    }

    /// Sets every candidate of the post back to neutral and clears its selection.
    pub fn reset(&mut self, post: PostId) -> EventOutcome {
        if self.ballot.post(post).is_none() {
            warn!("reset: unknown post {}", post);
            return EventOutcome::Ignored;
        }
        self.reset_surface(post);
        self.ballot.set_selection(post, Selection::new());
        EventOutcome::Rendered
    }

    /// Reads the checked inputs of the election, writes the payload into the
    /// form and returns it. Only the election of this ballot can be submitted.
    pub fn serialize(&mut self, election: ElectionId) -> Result<String, BallotErrors> {
        if election != self.ballot.election() {
            return Err(BallotErrors::ForeignElection(election));
        }
        let inputs = self.surface.checked_inputs(election);
        let votes = payload::collect_checked(&inputs)?;
        let encoded = payload::encode(&votes)?;
        info!(
            "serialize: election {}: {} checked inputs",
            election,
            votes.len()
        );
        self.surface.write_payload(&encoded);
        Ok(encoded)
    }

    // The post, if the candidate runs for it.
    fn lookup(&self, post: PostId, candidate: CandidateId) -> Option<&Post> {
        let p = match self.ballot.post(post) {
            Some(p) => p,
            None => {
                warn!("unknown post {} (candidate {})", post, candidate);
                return None;
            }
        };
        if !p.candidates.contains(&candidate) {
            warn!("candidate {} does not run for post {}", candidate, post);
            return None;
        }
        Some(p)
    }

    fn current_selection(&self, post: PostId) -> Selection {
        self.ballot.selection(post).cloned().unwrap_or_default()
    }

    fn reset_surface(&mut self, post: PostId) {
        let candidates: Vec<CandidateId> = self
            .ballot
            .post(post)
            .map(|p| p.candidates.clone())
            .unwrap_or_default();
        for cid in candidates {
            self.surface.clear_marks(cid);
            self.surface.check(cid, VoteValue::Neutral);
        }
    }

    fn render(&mut self, post: PostId, selection: &Selection) {
        self.reset_surface(post);
        for (cid, value) in selection.entries() {
            if let Some(mark) = PosterMark::for_value(*value) {
                self.surface.mark(*cid, mark);
                self.surface.check(*cid, *value);
            }
        }
    }
}
