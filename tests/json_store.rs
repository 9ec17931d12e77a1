//! Persisted order across restarts, through the JSON store file.

use sortable::app::{handle_event, startup_actions, Action, AppState, Event};
use sortable::input::Direction;
use sortable::worker::StoreWorker;
use sortable::{initialize, Config, Item, ItemId, Result};

fn items() -> Vec<Item> {
    ["inbox", "today", "someday", "archive"]
        .into_iter()
        .map(|id| Item::new(id, id))
        .collect()
}

fn run(state: &mut AppState, worker: &mut StoreWorker, actions: Vec<Action>) -> Result<()> {
    for action in actions {
        if let Action::PostToStore(message) = action {
            let response = worker.handle_message(message);
            let (_, more) = handle_event(state, &Event::WorkerResponse { response })?;
            run(state, worker, more)?;
        }
    }
    Ok(())
}

fn order(state: &AppState) -> Vec<&str> {
    state.collection.ids().iter().map(ItemId::as_str).collect()
}

#[test]
fn saved_order_is_restored_on_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };

    {
        let mut state = initialize(&config, items()).unwrap();
        let mut worker = StoreWorker::from_config(&config).unwrap();
        run(&mut state, &mut worker, startup_actions()).unwrap();
        assert_eq!(order(&state), ["inbox", "today", "someday", "archive"]);

        handle_event(&mut state, &Event::Focus { item: ItemId::from("archive") }).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Up }).unwrap();
        run(&mut state, &mut worker, actions).unwrap();
        assert!(!state.coordinator.has_unresolved_saves());
    }

    assert!(config.store_path().exists());

    let mut state = initialize(&config, items()).unwrap();
    let mut worker = StoreWorker::from_config(&config).unwrap();
    run(&mut state, &mut worker, startup_actions()).unwrap();

    assert_eq!(order(&state), ["inbox", "today", "archive", "someday"]);
    assert_eq!(state.coordinator.generation().get(), 1);

    handle_event(&mut state, &Event::Focus { item: ItemId::from("inbox") }).unwrap();
    let (_, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Down }).unwrap();
    run(&mut state, &mut worker, actions).unwrap();
    assert_eq!(state.coordinator.baseline_generation().get(), 2);
}

#[test]
fn new_items_are_appended_to_a_stored_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };

    {
        let mut state = initialize(&config, items()).unwrap();
        let mut worker = StoreWorker::from_config(&config).unwrap();
        handle_event(&mut state, &Event::Focus { item: ItemId::from("today") }).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Up }).unwrap();
        run(&mut state, &mut worker, actions).unwrap();
    }

    let mut grown = items();
    grown.insert(0, Item::new("new", "new"));
    grown.retain(|item| item.id.as_str() != "archive");

    let mut state = initialize(&config, grown).unwrap();
    let mut worker = StoreWorker::from_config(&config).unwrap();
    run(&mut state, &mut worker, startup_actions()).unwrap();

    assert_eq!(order(&state), ["today", "inbox", "someday", "new"]);
}

#[test]
fn malformed_config_is_rejected() {
    assert!(Config::from_toml_str("pointer_drag_threshold = \"far\"").is_err());
}
