//! Game Mode State Machine
//!
//! This demo shows a host loop that keeps the state machine on the main
//! thread and pushes slow work onto a background worker.
//!
//! Key concepts:
//! - Dynamic transitions chosen from trigger arguments
//! - Guards reading host state
//! - `SingleThreadWorker` callbacks feeding triggers back to the host
//!
//! Run with: cargo run --example game_modes

use hsm_engine::worker::WorkerBuilder;
use hsm_engine::{state_enum, trigger_enum, StateMachine};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

state_enum! {
    enum Mode {
        Title,
        Loading,
        InGame,
        Exploring,
        Combat,
        GameOver,
    }
}

trigger_enum! {
    enum Event {
        NewGame,
        Loaded,
        LoadFailed,
        Encounter,
        Resolve,
        Quit,
    }
}

fn load_level(level: u32) -> Result<String, String> {
    std::thread::sleep(Duration::from_millis(50));
    if level > 3 {
        Err(format!("level {level} does not exist"))
    } else {
        Ok(format!("level-{level}.map"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Game Mode State Machine ===\n");

    let health = Rc::new(Cell::new(3i32));
    let mut game = StateMachine::new(Mode::Title);
    let resolve = game.set_trigger_parameters::<(i32,)>(Event::Resolve)?;

    game.configure(Mode::Title)
        .permit(Event::NewGame, Mode::Loading);

    game.configure(Mode::Loading)
        .permit(Event::Loaded, Mode::Exploring)
        .permit(Event::LoadFailed, Mode::Title);

    game.configure(Mode::InGame)
        .permit(Event::Quit, Mode::Title)
        .on_entry(|_| {
            info!("session started");
            Ok(())
        })
        .on_exit(|_| {
            info!("session ended");
            Ok(())
        });

    let alive = Rc::clone(&health);
    game.configure(Mode::Exploring)
        .substate_of(Mode::InGame)
        .permit_if(Event::Encounter, Mode::Combat, move || alive.get() > 0);

    let hp = Rc::clone(&health);
    game.configure(Mode::Combat)
        .substate_of(Mode::InGame)
        .permit_dynamic_with(&resolve, move |(damage,)| {
            hp.set(hp.get() - damage.unwrap_or(0));
            if hp.get() > 0 {
                Mode::Exploring
            } else {
                Mode::GameOver
            }
        });

    game.configure(Mode::GameOver)
        .permit(Event::Quit, Mode::Title);

    let worker = WorkerBuilder::new().name("level-loader").spawn()?;
    let (events, inbox) = mpsc::channel();

    game.fire(Event::NewGame)?;
    let (loaded, failed) = (events.clone(), events.clone());
    worker.enqueue_with_callback(
        || load_level(2),
        move |map| {
            let _ = loaded.send((Event::Loaded, map));
        },
        move |error| {
            let _ = failed.send((Event::LoadFailed, error));
        },
    );

    let (event, detail) = inbox.recv_timeout(Duration::from_secs(5))?;
    println!("worker reported {event}: {detail}");
    game.fire(event)?;
    println!("{game}");

    for damage in [1, 1, 2] {
        game.fire(Event::Encounter)?;
        game.fire_with(&resolve, (damage,))?;
        println!("took {damage} damage, health {}, now {}", health.get(), game.state());
    }

    println!("in game: {}", game.is_in_state(&Mode::InGame));
    game.fire(Event::Encounter)?;
    game.fire(Event::Quit)?;
    println!("{game}");

    worker.join();
    println!("\n=== Demo Complete ===");
    Ok(())
}
