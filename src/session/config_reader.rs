use crate::session::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub id: CandidateId,
    pub name: String,
    #[serde(rename = "autoGenerated")]
    pub auto_generated: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    pub id: PostId,
    pub name: String,
    #[serde(rename = "maxVote")]
    pub max_vote: usize,
    pub unique: Option<bool>,
    pub candidates: Vec<CandidateConfig>,
}

/// The data rendered by the server into the ballot page.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(rename = "electionId")]
    pub election_id: ElectionId,
    pub posts: Vec<PostConfig>,
}

impl PageConfig {
    pub fn build_ballot(&self) -> SessionResult<Ballot> {
        let mut builder = Builder::new(self.election_id);
        for p in self.posts.iter() {
            builder = builder
                .post(p.id, &p.name, p.max_vote, p.unique.unwrap_or(false))
                .context(InvalidPageSnafu {})?;
            for c in p.candidates.iter() {
                builder = builder
                    .candidate(p.id, c.id, &c.name, c.auto_generated.unwrap_or(false))
                    .context(InvalidPageSnafu {})?;
            }
        }
        builder.build().context(InvalidPageSnafu {})
    }
}

pub fn read_page(path: &str) -> SessionResult<PageConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_page: {:?}", contents);
    let page: PageConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    Ok(page)
}
