//! The vote payload carried by the submit form.
//!
//! The payload is a JSON object mapping candidate ids (as strings) to the
//! integer vote value of the checked input: `{"5": 1, "9": -1, "12": 0}`.
//! Candidates without a checked input do not appear.

use log::{debug, warn};

use std::collections::BTreeMap;

use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::config::*;
use crate::surface::CheckedInput;
use crate::Ballot;

pub type SubmittedVotes = BTreeMap<CandidateId, VoteValue>;

/// Builds the vote mapping from the checked inputs of the page.
///
/// When the same candidate shows up several times, the last input wins.
pub fn collect_checked(inputs: &[CheckedInput]) -> Result<SubmittedVotes, BallotErrors> {
    let mut votes = SubmittedVotes::new();
    for input in inputs.iter() {
        let value = VoteValue::parse(&input.value)?;
        votes.insert(input.candidate, value);
    }
    Ok(votes)
}

pub fn encode(votes: &SubmittedVotes) -> Result<String, BallotErrors> {
    serde_json::to_string(votes).map_err(|e| BallotErrors::MalformedPayload(e.to_string()))
}

/// Reads a payload back. Keys must be integers, values must be -1, 0 or 1
/// (either as numbers or as numeric strings).
pub fn decode(payload: &str) -> Result<SubmittedVotes, BallotErrors> {
    let js: JSMap<String, JSValue> =
        serde_json::from_str(payload).map_err(|e| BallotErrors::MalformedPayload(e.to_string()))?;
    let mut votes = SubmittedVotes::new();
    for (key, value) in js.iter() {
        let cid = key
            .trim()
            .parse::<u32>()
            .map(CandidateId)
            .map_err(|_| BallotErrors::MalformedPayload(format!("key {:?} is not an id", key)))?;
        let v = match value {
            JSValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| BallotErrors::InvalidVoteValue(n.to_string()))
                .and_then(VoteValue::from_int)?,
            JSValue::String(s) => VoteValue::parse(s)?,
            x => return Err(BallotErrors::InvalidVoteValue(x.to_string())),
        };
        votes.insert(cid, v);
    }
    debug!("decode: {} votes", votes.len());
    Ok(votes)
}

fn rejected(msg: String) -> BallotErrors {
    warn!("check_submission: {}", msg);
    BallotErrors::RejectedSubmission(msg)
}

impl Ballot {
    /// Checks that a submission is one this ballot could have produced.
    ///
    /// Only accept and reject entries are constrained; neutral entries are
    /// allowed for any candidate of the ballot.
    pub fn check_submission(&self, votes: &SubmittedVotes) -> Result<(), BallotErrors> {
        if let Some(cid) = votes.keys().find(|cid| !self.candidates.contains_key(*cid)) {
            warn!("check_submission: candidate {} is not on this ballot", cid);
            return Err(BallotErrors::UnknownCandidate(*cid));
        }

        for post in self.posts.iter() {
            let picks: Vec<(&Candidate, VoteValue)> = post
                .candidates
                .iter()
                .filter_map(|cid| match (self.candidates.get(cid), votes.get(cid)) {
                    (Some(c), Some(v)) if !v.is_neutral() => Some((c, *v)),
                    _ => None,
                })
                .collect();
            let (auto_picks, human_picks): (Vec<_>, Vec<_>) =
                picks.iter().partition(|(c, _)| c.auto_generated);

            if let Some((c, _)) = auto_picks.iter().find(|(_, v)| *v == VoteValue::Reject) {
                return Err(rejected(format!(
                    "reject vote for the auto-generated candidate {} of post {}",
                    c.id, post.id
                )));
            }
            if auto_picks.len() > 1 {
                return Err(rejected(format!(
                    "several auto-generated candidates picked for post {}",
                    post.id
                )));
            }
            if !auto_picks.is_empty() && !human_picks.is_empty() {
                return Err(rejected(format!(
                    "auto-generated and regular candidates picked together for post {}",
                    post.id
                )));
            }

            let num_human_candidates = post
                .candidates
                .iter()
                .filter_map(|cid| self.candidates.get(cid))
                .filter(|c| !c.auto_generated)
                .count();
            let has_reject = human_picks.iter().any(|(_, v)| *v == VoteValue::Reject);
            if has_reject && num_human_candidates > post.max_vote {
                return Err(rejected(format!(
                    "reject vote for post {} where candidates ({}) outnumber seats ({})",
                    post.id, num_human_candidates, post.max_vote
                )));
            }
            if human_picks.len() > post.max_vote {
                return Err(rejected(format!(
                    "{} picks for post {} which allows {}",
                    human_picks.len(),
                    post.id,
                    post.max_vote
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn input(candidate: u32, value: &str) -> CheckedInput {
        CheckedInput {
            candidate: CandidateId(candidate),
            value: value.to_string(),
        }
    }

    // Post 1: two seats, three regular candidates and a NOTA.
    // Post 2: one seat, one regular candidate and a neutral.
    fn ballot() -> Ballot {
        Builder::new(ElectionId(1))
            .post(PostId(1), "Council", 2, false)
            .unwrap()
            .candidate(PostId(1), CandidateId(1), "Anna", false)
            .unwrap()
            .candidate(PostId(1), CandidateId(2), "Bob", false)
            .unwrap()
            .candidate(PostId(1), CandidateId(3), "Carl", false)
            .unwrap()
            .candidate(PostId(1), CandidateId(4), "NOTA", true)
            .unwrap()
            .post(PostId(2), "Treasurer", 1, true)
            .unwrap()
            .candidate(PostId(2), CandidateId(5), "Dana", false)
            .unwrap()
            .candidate(PostId(2), CandidateId(6), "Neutral", true)
            .unwrap()
            .build()
            .unwrap()
    }

    fn votes(l: &[(u32, VoteValue)]) -> SubmittedVotes {
        l.iter().map(|(c, v)| (CandidateId(*c), *v)).collect()
    }

    #[test]
    fn encodes_checked_inputs() {
        let v = collect_checked(&[input(5, "1"), input(9, "-1")]).unwrap();
        let payload = encode(&v).unwrap();
        assert_eq!(payload, r#"{"5":1,"9":-1}"#);

        let js: JSValue = serde_json::from_str(&payload).unwrap();
        assert_eq!(js, serde_json::json!({"5": 1, "9": -1}));
    }

    #[test]
    fn rejects_bad_input_values() {
        assert_eq!(
            collect_checked(&[input(5, "2")]),
            Err(BallotErrors::InvalidVoteValue("2".to_string()))
        );
        assert_eq!(
            collect_checked(&[input(5, "yes")]),
            Err(BallotErrors::InvalidVoteValue("yes".to_string()))
        );
    }

    #[test]
    fn decodes_numbers_and_numeric_strings() {
        let v = decode(r#"{"5": 1, "9": "-1", "12": 0}"#).unwrap();
        assert_eq!(
            v,
            votes(&[
                (5, VoteValue::Accept),
                (9, VoteValue::Reject),
                (12, VoteValue::Neutral)
            ])
        );
    }

    #[test]
    fn decode_errors() {
        assert!(matches!(decode("[1, 2]"), Err(BallotErrors::MalformedPayload(_))));
        assert!(matches!(decode(r#"{"x": 1}"#), Err(BallotErrors::MalformedPayload(_))));
        assert!(matches!(decode(r#"{"5": 3}"#), Err(BallotErrors::InvalidVoteValue(_))));
        assert!(matches!(decode(r#"{"5": null}"#), Err(BallotErrors::InvalidVoteValue(_))));
        assert!(matches!(decode(r#"{"5": 0.5}"#), Err(BallotErrors::InvalidVoteValue(_))));
    }

    #[test]
    fn accepts_a_regular_ballot() {
        let b = ballot();
        let v = votes(&[
            (1, VoteValue::Accept),
            (2, VoteValue::Accept),
            (3, VoteValue::Neutral),
            (4, VoteValue::Neutral),
            (5, VoteValue::Accept),
        ]);
        assert_eq!(b.check_submission(&v), Ok(()));
        assert_eq!(b.check_submission(&SubmittedVotes::new()), Ok(()));
    }

    #[test]
    fn rejects_unknown_candidates() {
        let b = ballot();
        assert_eq!(
            b.check_submission(&votes(&[(42, VoteValue::Neutral)])),
            Err(BallotErrors::UnknownCandidate(CandidateId(42)))
        );
    }

    #[test]
    fn rejects_too_many_picks() {
        let b = ballot();
        let v = votes(&[
            (1, VoteValue::Accept),
            (2, VoteValue::Accept),
            (3, VoteValue::Accept),
        ]);
        assert!(matches!(
            b.check_submission(&v),
            Err(BallotErrors::RejectedSubmission(_))
        ));
    }

    #[test]
    fn rejects_auto_generated_misuse() {
        let b = ballot();
        // Reject on NOTA.
        assert!(b
            .check_submission(&votes(&[(4, VoteValue::Reject)]))
            .is_err());
        // NOTA together with a regular pick.
        assert!(b
            .check_submission(&votes(&[(4, VoteValue::Accept), (1, VoteValue::Accept)]))
            .is_err());
        // NOTA alone is fine.
        assert_eq!(b.check_submission(&votes(&[(4, VoteValue::Accept)])), Ok(()));
    }

    #[test]
    fn reject_only_when_seats_cover_candidates() {
        let b = ballot();
        // Three candidates for two seats: no reject vote.
        assert!(b
            .check_submission(&votes(&[(1, VoteValue::Reject)]))
            .is_err());
        // One candidate for one seat: reject is a meaningful vote.
        assert_eq!(b.check_submission(&votes(&[(5, VoteValue::Reject)])), Ok(()));
    }
}
