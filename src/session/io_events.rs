// Primitives for reading event scripts.

use crate::session::*;

use serde::Deserialize;

/// One recorded interaction with the page.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventRecord {
    RadioChanged {
        post: PostId,
        candidate: CandidateId,
        value: VoteValue,
        // Falls back to the flag of the post.
        unique: Option<bool>,
    },
    ResetPost {
        post: PostId,
    },
    Submit {
        election: Option<ElectionId>,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

impl EventRecord {
    pub fn to_ui_event(&self, ballot: &Ballot) -> UiEvent {
        match self {
            EventRecord::RadioChanged {
                post,
                candidate,
                value,
                unique,
            } => UiEvent::RadioChanged {
                post: *post,
                candidate: *candidate,
                value: *value,
                unique: unique
                    .or_else(|| ballot.post(*post).map(|p| p.unique))
                    .unwrap_or(false),
            },
            EventRecord::ResetPost { post } => UiEvent::ResetPost { post: *post },
            EventRecord::Submit { election } => UiEvent::Submit {
                election: election.unwrap_or_else(|| ballot.election()),
            },
            EventRecord::Resize { width, height } => UiEvent::Resize {
                width: *width,
                height: *height,
            },
        }
    }
}

pub fn read_events(path: &str) -> SessionResult<Vec<EventRecord>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let events: Vec<EventRecord> =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_events: {} events from {}", events.len(), path);
    Ok(events)
}
