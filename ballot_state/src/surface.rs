//! The UI the controller renders into.
//!
//! On the ballot page every candidate has a poster and a group of three radio
//! inputs (accept, reject, neutral) whose value attributes are `1`, `-1` and
//! `0`. The page also carries a hidden field that receives the vote payload
//! right before the form is submitted.

use log::debug;

use std::collections::BTreeMap;

use crate::config::*;
use crate::Ballot;

/// A checked radio input, as read back from the page.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CheckedInput {
    pub candidate: CandidateId,
    /// The raw value attribute of the input.
    pub value: String,
}

pub trait BallotSurface {
    /// Removes the accepted and rejected markers from a poster.
    fn clear_marks(&mut self, candidate: CandidateId);

    fn mark(&mut self, candidate: CandidateId, mark: PosterMark);

    /// Checks the radio input of this candidate that carries the given value.
    fn check(&mut self, candidate: CandidateId, value: VoteValue);

    /// Leaves no radio input of this candidate checked.
    fn uncheck(&mut self, candidate: CandidateId);

    /// Every checked input inside the scope of the election.
    fn checked_inputs(&self, election: ElectionId) -> Vec<CheckedInput>;

    /// Writes the hidden payload field of the submit form.
    fn write_payload(&mut self, payload: &str);

    /// Called when the window is resized. Only cosmetic layout depends on it.
    fn relayout(&mut self, _width: u32, _height: u32) {}
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct InputGroup {
    election: ElectionId,
    poster: Option<PosterMark>,
    checked: Option<String>,
}

/// A headless surface that keeps the page state in memory.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MemorySurface {
    // Iterated in candidate id order.
    groups: BTreeMap<CandidateId, InputGroup>,
    payload: Option<String>,
    viewport: Option<(u32, u32)>,
}

impl MemorySurface {
    pub fn new() -> MemorySurface {
        MemorySurface::default()
    }

    /// A surface with one poster and one unchecked radio group per candidate of the ballot.
    pub fn for_ballot(ballot: &Ballot) -> MemorySurface {
        let mut s = MemorySurface::new();
        for c in ballot.candidates() {
            s.add_candidate(ballot.election(), c.id);
        }
        s
    }

    pub fn add_candidate(&mut self, election: ElectionId, candidate: CandidateId) {
        self.groups.insert(
            candidate,
            InputGroup {
                election,
                poster: None,
                checked: None,
            },
        );
    }

    /// Checks an input with an arbitrary value attribute, as a tampered page would.
    pub fn check_raw(&mut self, candidate: CandidateId, value: &str) {
        if let Some(g) = self.groups.get_mut(&candidate) {
            g.checked = Some(value.to_string());
        }
    }

    pub fn poster_mark(&self, candidate: CandidateId) -> Option<PosterMark> {
        self.groups.get(&candidate).and_then(|g| g.poster)
    }

    /// The value of the checked input of this candidate, if any input is checked.
    pub fn checked_value(&self, candidate: CandidateId) -> Option<VoteValue> {
        self.groups
            .get(&candidate)
            .and_then(|g| g.checked.as_deref())
            .and_then(|v| VoteValue::parse(v).ok())
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }
}

impl BallotSurface for MemorySurface {
    fn clear_marks(&mut self, candidate: CandidateId) {
        if let Some(g) = self.groups.get_mut(&candidate) {
            g.poster = None;
        }
    }

    fn mark(&mut self, candidate: CandidateId, mark: PosterMark) {
        if let Some(g) = self.groups.get_mut(&candidate) {
            g.poster = Some(mark);
        }
    }

    fn check(&mut self, candidate: CandidateId, value: VoteValue) {
        self.check_raw(candidate, value.as_int().to_string().as_str());
    }

    fn uncheck(&mut self, candidate: CandidateId) {
        if let Some(g) = self.groups.get_mut(&candidate) {
            g.checked = None;
        }
    }

    fn checked_inputs(&self, election: ElectionId) -> Vec<CheckedInput> {
        self.groups
            .iter()
            .filter(|(_, g)| g.election == election)
            .filter_map(|(cid, g)| {
                g.checked.as_ref().map(|v| CheckedInput {
                    candidate: *cid,
                    value: v.clone(),
                })
            })
            .collect()
    }

    fn write_payload(&mut self, payload: &str) {
        debug!("MemorySurface::write_payload: {}", payload);
        self.payload = Some(payload.to_string());
    }

    fn relayout(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }
}
