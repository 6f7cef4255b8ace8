use log::{debug, info, warn};

use ballot_state::builder::Builder;
use ballot_state::controller::{BallotController, EventOutcome, UiEvent};
use ballot_state::payload;
use ballot_state::surface::MemorySurface;
use ballot_state::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_events;

use crate::session::config_reader::*;
use crate::session::io_events::*;

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error encoding the {what} as JSON: {source}"))]
    EncodingJson {
        source: serde_json::Error,
        what: String,
    },
    #[snafu(display("Invalid page description: {source}"))]
    InvalidPage { source: BallotErrors },
    #[snafu(display("Event #{index} failed: {source}"))]
    ReplayingEvent { source: BallotErrors, index: usize },
    #[snafu(display("The submitted payload is not accepted: {source}"))]
    CheckingSubmission { source: BallotErrors },
    #[snafu(display("The event script never submits the ballot"))]
    MissingSubmit {},
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Replays the events through the controller. Returns the payload of the last submit.
fn replay(
    controller: &mut BallotController<MemorySurface>,
    events: &[EventRecord],
) -> SessionResult<Option<String>> {
    let mut last_payload: Option<String> = None;
    for (index, record) in events.iter().enumerate() {
        let event = record.to_ui_event(controller.ballot());
        let outcome = controller
            .handle(&event)
            .context(ReplayingEventSnafu { index })?;
        debug!("replay: #{} {:?} -> {:?}", index, event, outcome);
        match outcome {
            EventOutcome::Submitted(p) => {
                last_payload = Some(p);
            }
            EventOutcome::Ignored => {
                warn!("replay: event #{} ignored: {:?}", index, event);
            }
            EventOutcome::Rendered => {}
        }
    }
    Ok(last_payload)
}

fn vote_js(value: Option<VoteValue>) -> JSValue {
    match value {
        Some(v) => json!(v.as_int()),
        None => JSValue::Null,
    }
}

fn build_summary_js(controller: &BallotController<MemorySurface>, payload: &Option<String>) -> JSValue {
    let ballot = controller.ballot();
    let surface = controller.surface();
    let mut posts: Vec<JSValue> = Vec::new();
    for post in ballot.posts() {
        let selection: Vec<JSValue> = ballot
            .selection(post.id)
            .map(|s| {
                s.entries()
                    .map(|(cid, v)| json!({"candidate": cid, "vote": v.as_int()}))
                    .collect()
            })
            .unwrap_or_default();
        let candidates: Vec<JSValue> = post
            .candidates
            .iter()
            .filter_map(|cid| ballot.candidate(*cid))
            .map(|c| {
                json!({
                    "id": c.id,
                    "name": c.name,
                    "checked": vote_js(surface.checked_value(c.id)),
                    "poster": surface.poster_mark(c.id).map(|m| m.class_name()),
                })
            })
            .collect();
        posts.push(json!({
            "id": post.id,
            "name": post.name,
            "maxVote": post.max_vote,
            "unique": post.unique,
            "selection": selection,
            "candidates": candidates,
        }));
    }
    json!({
        "electionId": ballot.election(),
        "posts": posts,
        "payload": payload,
    })
}

fn summary_text(
    controller: &BallotController<MemorySurface>,
    payload: &Option<String>,
) -> SessionResult<String> {
    let summary_js = build_summary_js(controller, payload);
    serde_json::to_string_pretty(&summary_js).context(EncodingJsonSnafu { what: "summary" })
}

fn write_output(dest: &Option<String>, content: &str) -> SessionResult<()> {
    match dest.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })
        }
    }
}

fn read_reference(path: &str) -> SessionResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_reference: {:?}", js);
    Ok(js)
}

fn check_payload(ballot: &Ballot, payload_str: &str) -> SessionResult<()> {
    let votes = payload::decode(payload_str).context(CheckingSubmissionSnafu {})?;
    ballot
        .check_submission(&votes)
        .context(CheckingSubmissionSnafu {})?;
    info!("check_payload: {} votes accepted", votes.len());
    Ok(())
}

pub fn run_session(args: &Args) -> SessionResult<()> {
    let page = read_page(&args.page)?;
    info!("page: {:?}", page);
    let ballot = page.build_ballot()?;
    let events = read_events(&args.events)?;
    info!("Replaying {} events", events.len());

    let surface = MemorySurface::for_ballot(&ballot);
    let mut controller = BallotController::new(ballot, surface);
    let last_payload = replay(&mut controller, &events)?;

    if let Some(summary_dest) = &args.summary {
        let pretty = summary_text(&controller, &last_payload)?;
        write_output(&Some(summary_dest.clone()), &pretty)?;
    }

    let payload_str = last_payload.context(MissingSubmitSnafu {})?;
    write_output(&args.out, &payload_str)?;

    if args.check {
        check_payload(controller.ballot(), &payload_str)?;
    }

    // The reference payload, if provided for comparison
    if let Some(reference_p) = &args.reference {
        let reference = read_reference(reference_p)?;
        let submitted: JSValue =
            serde_json::from_str(&payload_str).context(ParsingJsonSnafu { path: "payload" })?;
        let pretty_reference = serde_json::to_string_pretty(&reference)
            .context(EncodingJsonSnafu { what: "reference payload" })?;
        let pretty_submitted = serde_json::to_string_pretty(&submitted)
            .context(EncodingJsonSnafu { what: "payload" })?;
        if pretty_reference != pretty_submitted {
            warn!("Found differences with the reference payload");
            print_diff(pretty_reference.as_str(), pretty_submitted.as_str(), "\n");
            whatever!("Difference detected between the submitted payload and the reference payload")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args(test_name: &str, check: bool) -> Args {
        let test_dir = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), test_name);
        Args {
            page: format!("{}/{}_page.json", test_dir, test_name),
            events: format!("{}/{}_events.json", test_dir, test_name),
            out: None,
            reference: Some(format!("{}/{}_expected_payload.json", test_dir, test_name)),
            summary: None,
            check,
            verbose: false,
        }
    }

    fn test_wrapper(test_name: &str) {
        let _ = env_logger::builder().is_test(true).try_init();
        info!("Running test {}", test_name);
        let res = run_session(&test_args(test_name, true));
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    #[test]
    fn bounded_council() {
        test_wrapper("bounded_council");
    }

    #[test]
    fn unique_president() {
        test_wrapper("unique_president");
    }

    #[test]
    fn reset_and_revote() {
        test_wrapper("reset_and_revote");
    }

    #[test]
    fn tampered_submission_is_refused() {
        let _ = env_logger::builder().is_test(true).try_init();
        let res = run_session(&test_args("reject_on_crowded_post", true));
        assert!(matches!(res, Err(SessionError::CheckingSubmission { .. })));
        // Without the portal checks the payload is still produced.
        let res = run_session(&test_args("reject_on_crowded_post", false));
        assert!(res.is_ok());
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let mut args = test_args("bounded_council", false);
        args.reference = Some(format!(
            "{}/tests/data/unique_president/unique_president_expected_payload.json",
            env!("CARGO_MANIFEST_DIR")
        ));
        assert!(matches!(
            run_session(&args),
            Err(SessionError::Whatever { .. })
        ));
    }

    #[test]
    fn missing_submit() {
        let mut args = test_args("bounded_council", false);
        args.events = format!(
            "{}/tests/data/no_submit/no_submit_events.json",
            env!("CARGO_MANIFEST_DIR")
        );
        args.reference = None;
        assert!(matches!(
            run_session(&args),
            Err(SessionError::MissingSubmit { .. })
        ));
    }

    #[test]
    fn invalid_page() {
        let mut args = test_args("bounded_council", false);
        args.page = format!(
            "{}/tests/data/invalid_page/invalid_page_page.json",
            env!("CARGO_MANIFEST_DIR")
        );
        assert!(matches!(
            run_session(&args),
            Err(SessionError::InvalidPage {
                source: BallotErrors::InvalidMaxVote(PostId(1))
            })
        ));
    }

    #[test]
    fn summary_reflects_the_page() {
        let args = test_args("bounded_council", false);
        let page = read_page(&args.page).unwrap();
        let ballot = page.build_ballot().unwrap();
        let events = read_events(&args.events).unwrap();
        let surface = MemorySurface::for_ballot(&ballot);
        let mut controller = BallotController::new(ballot, surface);
        let payload = replay(&mut controller, &events).unwrap();
        let js = build_summary_js(&controller, &payload);

        assert_eq!(js["electionId"], json!(7));
        assert_eq!(
            js["posts"][0]["selection"],
            json!([{"candidate": 12, "vote": 1}, {"candidate": 13, "vote": 1}])
        );
        assert_eq!(js["posts"][0]["candidates"][0]["poster"], JSValue::Null);
        assert_eq!(
            js["posts"][0]["candidates"][2]["poster"],
            json!("accepted-candidate")
        );
        assert_eq!(js["posts"][1]["candidates"][0]["checked"], json!(-1));
        assert_eq!(js["payload"], json!(r#"{"11":0,"12":1,"13":1,"21":-1}"#));
    }

    #[test]
    fn summary_is_written_to_a_file() {
        let mut args = test_args("unique_president", true);
        let dest = std::env::temp_dir().join("ballotui_unique_president_summary.json");
        args.summary = Some(dest.to_string_lossy().to_string());
        assert!(run_session(&args).is_ok());

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        let checked: Vec<&JSValue> = js["posts"][0]["candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| &c["checked"])
            .collect();
        assert_eq!(checked, vec![&JSValue::Null, &JSValue::Null, &json!(1)]);
        assert_eq!(js["payload"], json!(r#"{"53":1,"61":0,"62":1}"#));
        let _ = fs::remove_file(&dest);
    }

    #[test]
    fn encoding_errors_name_what_was_encoded() {
        let source = serde_json::from_str::<JSValue>("{").unwrap_err();
        let e = SessionError::EncodingJson {
            source,
            what: "summary".to_string(),
        };
        assert!(e.to_string().starts_with("Error encoding the summary as JSON"));
    }
}
