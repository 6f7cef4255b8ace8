// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(pub u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl Display for ElectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three mutually exclusive states of a candidate on the ballot.
///
/// The integer representation is the one that travels in the submitted
/// payload: `1` for accept, `-1` for reject and `0` for neutral.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum VoteValue {
    Accept,
    Reject,
    #[default]
    Neutral,
}

impl VoteValue {
    pub fn as_int(self) -> i64 {
        match self {
            VoteValue::Accept => 1,
            VoteValue::Reject => -1,
            VoteValue::Neutral => 0,
        }
    }

    pub fn from_int(x: i64) -> Result<VoteValue, BallotErrors> {
        match x {
            1 => Ok(VoteValue::Accept),
            -1 => Ok(VoteValue::Reject),
            0 => Ok(VoteValue::Neutral),
            _ => Err(BallotErrors::InvalidVoteValue(x.to_string())),
        }
    }

    /// Parses the value attribute of a radio input.
    pub fn parse(s: &str) -> Result<VoteValue, BallotErrors> {
        let x = s
            .trim()
            .parse::<i64>()
            .map_err(|_| BallotErrors::InvalidVoteValue(s.to_string()))?;
        VoteValue::from_int(x)
    }

    pub fn is_neutral(self) -> bool {
        self == VoteValue::Neutral
    }
}

impl Serialize for VoteValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_int())
    }
}

impl<'de> Deserialize<'de> for VoteValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let x = i64::deserialize(deserializer)?;
        VoteValue::from_int(x).map_err(serde::de::Error::custom)
    }
}

/// A contestable position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub name: String,
    /// Maximum number of simultaneous accept/reject picks. Always at least 1.
    pub max_vote: usize,
    /// Single-winner post: picking a candidate clears every other pick.
    pub unique: bool,
    /// The candidates running for this post, in display order.
    pub candidates: Vec<CandidateId>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub post: PostId,
    /// NOTA and neutral pseudo-candidates added by the portal.
    pub auto_generated: bool,
}

// ******** Output data structures *********

/// The visual marker on a candidate poster.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PosterMark {
    Accepted,
    Rejected,
}

impl PosterMark {
    pub fn for_value(value: VoteValue) -> Option<PosterMark> {
        match value {
            VoteValue::Accept => Some(PosterMark::Accepted),
            VoteValue::Reject => Some(PosterMark::Rejected),
            VoteValue::Neutral => None,
        }
    }

    /// The css class used by the ballot page.
    pub fn class_name(self) -> &'static str {
        match self {
            PosterMark::Accepted => "accepted-candidate",
            PosterMark::Rejected => "rejected-candidate",
        }
    }
}

/// Errors raised while building a ballot, serializing it or checking a submission.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotErrors {
    /// A post must accept at least one pick.
    InvalidMaxVote(PostId),
    DuplicatePost(PostId),
    DuplicateCandidate(CandidateId),
    UnknownPost(PostId),
    UnknownCandidate(CandidateId),
    /// The form of another election was submitted through this ballot.
    ForeignElection(ElectionId),
    /// A vote value that is not one of -1, 0, 1.
    InvalidVoteValue(String),
    /// The payload is not a JSON object of integer keys and values.
    MalformedPayload(String),
    /// A submission that the ballot would never have produced.
    RejectedSubmission(String),
}

impl Error for BallotErrors {}

impl Display for BallotErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotErrors::InvalidMaxVote(p) => write!(f, "post {} must allow at least one vote", p),
            BallotErrors::DuplicatePost(p) => write!(f, "post {} is declared twice", p),
            BallotErrors::DuplicateCandidate(c) => write!(f, "candidate {} is declared twice", c),
            BallotErrors::UnknownPost(p) => write!(f, "unknown post {}", p),
            BallotErrors::UnknownCandidate(c) => write!(f, "unknown candidate {}", c),
            BallotErrors::ForeignElection(e) => write!(f, "election {} is not on this ballot", e),
            BallotErrors::InvalidVoteValue(v) => write!(f, "invalid vote value {:?}", v),
            BallotErrors::MalformedPayload(msg) => write!(f, "malformed vote payload: {}", msg),
            BallotErrors::RejectedSubmission(msg) => write!(f, "submission rejected: {}", msg),
        }
    }
}
