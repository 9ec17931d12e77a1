//! Headless replay driver.
//!
//! Runs the engine without a UI: events come in as JSON lines on stdin, store
//! requests go to a [`StoreWorker`] backed by the JSON store file, and
//! announcements plus the final order go out as JSON lines on stdout.
//!
//! # Usage
//!
//! ```text
//! sortable [config.toml] items.json < events.ndjson
//! ```
//!
//! `items.json` is an array of `{"id": "...", "label": "...", "payload": ...}`.
//! Each stdin line is one `Event`, for example:
//!
//! ```text
//! {"type":"focus","item":"task-1"}
//! {"type":"key_move","direction":"down"}
//! {"type":"pointer_down","pointer_id":1,"item":"task-3","x":10,"y":50}
//! ```
//!
//! Store requests are answered before the next input line is read, so the
//! store sees saves in commit order.

#![allow(clippy::multiple_crate_versions)]

use serde::Serialize;
use sortable::app::{startup_actions, Action, Event};
use sortable::worker::StoreWorker;
use sortable::{handle_event, initialize, observability, AppState, Config, Generation, Item, ItemId, SortableError};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

/// One line of driver output.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Output<'a> {
    Notification {
        message: String,
        is_error: bool,
    },
    Focus {
        item: &'a ItemId,
    },
    Rejected {
        line: usize,
        error: String,
    },
    Order {
        ids: &'a [ItemId],
        generation: Generation,
        unresolved_saves: bool,
    },
}

fn emit(out: &mut impl Write, output: &Output<'_>) -> sortable::Result<()> {
    let line = serde_json::to_string(output).map_err(|e| SortableError::Worker(e.to_string()))?;
    writeln!(out, "{line}")?;
    Ok(())
}

/// Feeds `first` and every store response it causes through the handler.
fn dispatch(
    state: &mut AppState,
    worker: &mut StoreWorker,
    first: Vec<Action>,
    out: &mut impl Write,
) -> sortable::Result<()> {
    let mut actions: VecDeque<Action> = first.into();

    while let Some(action) = actions.pop_front() {
        match action {
            Action::PostToStore(message) => {
                let response = worker.handle_message(message);
                let (_, more) = handle_event(state, &Event::WorkerResponse { response })?;
                actions.extend(more);
            }
            Action::Notify(notification) => emit(
                out,
                &Output::Notification {
                    message: notification.message(),
                    is_error: notification.is_error(),
                },
            )?,
            Action::SetFocus(item) => emit(out, &Output::Focus { item: &item })?,
        }
    }
    Ok(())
}

fn load_items(path: &Path) -> sortable::Result<Vec<Item>> {
    let source = std::fs::read_to_string(path)?;
    serde_json::from_str(&source)
        .map_err(|e| SortableError::Config(format!("invalid items file {}: {e}", path.display())))
}

fn run() -> sortable::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, items_path) = match args.as_slice() {
        [items] => (Config::default(), Path::new(items)),
        [config, items] => (Config::from_toml_file(Path::new(config))?, Path::new(items)),
        _ => {
            return Err(SortableError::Config(
                "usage: sortable [config.toml] items.json < events.ndjson".to_string(),
            ))
        }
    };

    if !observability::init_tracing(&config) {
        eprintln!("sortable: tracing disabled");
    }

    let mut state = initialize(&config, load_items(items_path)?)?;
    let mut worker = StoreWorker::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    dispatch(&mut state, &mut worker, startup_actions(), &mut out)?;

    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let _span = tracing::info_span!("replay_line", line = index + 1).entered();

        let outcome = serde_json::from_str::<Event>(&line)
            .map_err(|e| SortableError::Config(format!("invalid event: {e}")))
            .and_then(|event| handle_event(&mut state, &event))
            .and_then(|(_, actions)| dispatch(&mut state, &mut worker, actions, &mut out));

        if let Err(e) = outcome {
            tracing::warn!(error = %e, "event rejected");
            emit(
                &mut out,
                &Output::Rejected {
                    line: index + 1,
                    error: e.to_string(),
                },
            )?;
        }
    }

    emit(
        &mut out,
        &Output::Order {
            ids: state.collection.ids(),
            generation: state.coordinator.generation(),
            unresolved_saves: state.coordinator.has_unresolved_saves(),
        },
    )?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sortable: {e}");
            ExitCode::FAILURE
        }
    }
}
