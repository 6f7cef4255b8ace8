use clap::Parser;

/// Replays the interactions of a voter on a ballot page and prints the vote payload.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The description of the ballot page in JSON format: election, posts and candidates.
    /// For more information about the file format, read the documentation of ballot_state::manual.
    #[clap(short, long, value_parser)]
    pub page: String,

    /// (file path) The list of events (radio changes, resets, submit) to replay, in JSON format.
    #[clap(short, long, value_parser)]
    pub events: String,

    /// (file path, 'stdout' or empty) Where to write the payload of the last submit. Defaults to stdout.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference payload. If provided, ballotui will check that the submitted
    /// payload matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a JSON summary of the final state of every
    /// post (selections, checked inputs, posters) is written to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// If passed as an argument, the submitted payload is checked against the ballot the way
    /// the portal checks it on receipt.
    #[clap(long, takes_value = false)]
    pub check: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
