//! Media Player State Machine
//!
//! This demo drives a small player through a hierarchy of states.
//!
//! Key concepts:
//! - Superstates sharing a `Stop` transition
//! - Reentrant transitions
//! - Typed trigger parameters
//! - Transition history and the configuration audit
//!
//! Run with: cargo run --example media_player
//! Set `RUST_LOG=hsm_engine=trace` to see every exit and entry step.

use hsm_engine::{state_enum, trigger_enum, StateMachine, TransitionHistory};
use std::cell::Cell;
use std::rc::Rc;
use stillwater::validation::Validation;

state_enum! {
    enum Player {
        Stopped,
        Active,
        Playing,
        Paused,
    }
}

trigger_enum! {
    enum Button {
        Play,
        Pause,
        Stop,
        Seek,
        Volume,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Media Player State Machine ===\n");

    let volume = Rc::new(Cell::new(50u8));
    let mut player = StateMachine::new(Player::Stopped);
    let set_volume = player.set_trigger_parameters::<(u8,)>(Button::Volume)?;

    player
        .configure(Player::Stopped)
        .permit(Button::Play, Player::Playing)
        .on_entry(|t| {
            println!("  [Stopped] stopped via {}", t.trigger());
            Ok(())
        });

    player
        .configure(Player::Active)
        .permit(Button::Stop, Player::Stopped)
        .on_entry(|_| {
            println!("  [Active] audio device opened");
            Ok(())
        })
        .on_exit(|_| {
            println!("  [Active] audio device released");
            Ok(())
        });

    player
        .configure(Player::Playing)
        .substate_of(Player::Active)
        .permit(Button::Pause, Player::Paused)
        .permit_reentry(Button::Seek)
        .on_entry(|t| {
            if t.is_reentry() {
                println!("  [Playing] seek, restarting buffer");
            } else {
                println!("  [Playing] playback started");
            }
            Ok(())
        });

    let level = Rc::clone(&volume);
    player
        .configure(Player::Paused)
        .substate_of(Player::Active)
        .permit(Button::Play, Player::Playing)
        .permit_reentry(Button::Volume)
        .on_entry_from_with(&set_volume, move |(value,), _| {
            if let Some(value) = value {
                level.set(value.min(100));
                println!("  [Paused] volume set to {}", level.get());
            }
            Ok(())
        });

    if let Validation::Failure(issues) = player.audit() {
        for issue in issues.iter() {
            println!("audit: {issue}");
        }
    }

    let history = TransitionHistory::new();
    player.on_transitioned(history.recorder());

    println!("{player}\n");

    player.fire(Button::Play)?;
    player.fire(Button::Seek)?;
    player.fire(Button::Pause)?;
    player.fire_with(&set_volume, (80,))?;
    println!("\n{player}");
    println!("Still active: {}", player.is_in_state(&Player::Active));

    player.fire(Button::Volume)?;
    player.fire(Button::Stop)?;
    player.fire(Button::Pause)?;

    println!("\nVolume: {}", volume.get());
    let path: Vec<String> = history.path().iter().map(|s| s.to_string()).collect();
    println!("Path: {}", path.join(" -> "));

    println!("\n=== Demo Complete ===");
    Ok(())
}
