//! Per-frame simulation step
//!
//! Order within a tick is fixed: accumulate time, scroll obstacles and
//! scenery, recycle pools, integrate the character, judge, then step the
//! transition animator. The judge reads positions written earlier in the same
//! tick.

use super::input::{Command, TickInput};
use super::judge::judge;
use super::obstacles::Recycle;
use super::scene::Scene;
use super::state::{EndSummary, GameEvent, GameState};
use super::transition::{Effect, Route};
use crate::approach;

/// How a gameplay step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Alive and clear of every pole
    Clear,
    /// Collided or fell off the world
    Dying,
    /// Pool indices left the ring
    Broken(&'static str),
}

/// Advance the game by `dt` frame units
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.clock.accumulate(dt);

    for &command in &input.commands {
        handle_command(state, command);
    }

    if state.scenes.visibility().loading {
        state.scenes.menu.spin(dt);
    }

    match state.scenes.scene() {
        Scene::Loading | Scene::End => {}
        Scene::MainMenu => {
            let t = state.clock.accumulated();
            state.scenes.menu.hover(t, &state.surface);
        }
        Scene::Game => play(state, input, dt),
    }

    animate_transition(state, dt);
}

/// Convert a frame timestamp into a delta and tick
pub fn frame(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let dt = state.clock.frame_delta(now_ms);
    tick(state, input, dt);
}

fn handle_command(state: &mut GameState, command: Command) {
    let scene = state.scene();
    let result = match command {
        Command::Play if scene == Scene::MainMenu => state.request(Scene::Game),
        Command::Replay if scene == Scene::End => state.request(Scene::Game),
        Command::BackToMenu if scene == Scene::End => state.request(Scene::MainMenu),
        Command::NextSkin | Command::PreviousSkin
            if scene == Scene::MainMenu && !state.scenes.is_transitioning() =>
        {
            if command == Command::NextSkin {
                state.next_skin();
            } else {
                state.previous_skin();
            }
            Ok(())
        }
        _ => {
            log::debug!("Ignoring {:?} in {:?}", command, scene);
            return;
        }
    };

    match result {
        Ok(()) => state.events.push(GameEvent::ButtonPressed),
        Err(e) => log::debug!("Ignoring {:?}: {}", command, e),
    }
}

/// The gameplay loop proper
fn play(state: &mut GameState, input: &TickInput, dt: f32) {
    let outcome = {
        let GameState {
            world,
            surface,
            tuning,
            clock,
            rng,
            score,
            events,
            ..
        } = &mut *state;
        let Some(world) = world.as_mut() else {
            return;
        };

        world.obstacles.scroll(dt, clock.accumulated());
        world.parallax.scroll(dt);

        if world.obstacles.recycle(rng) == Recycle::IndexUnderflow {
            Outcome::Broken("collision index underflow on recycle")
        } else {
            let character = &mut world.character;
            if input.activate.pressed && character.controls_enabled && character.jump(surface, tuning)
            {
                events.push(GameEvent::Jumped);
            }
            character.tick(dt, surface, tuning);

            if character.is_dead(surface) {
                Outcome::Dying
            } else {
                let judgment = judge(
                    &mut world.obstacles,
                    &world.character,
                    &tuning.hitbox,
                    surface.scale_factor(),
                );
                if judgment.invariant_broken {
                    Outcome::Broken("pool index outside the obstacle ring")
                } else {
                    if judgment.scored {
                        *score += 1;
                        events.push(GameEvent::Scored { score: *score });
                        log::debug!("Scored: {}", score);
                    }
                    if judgment.collided {
                        Outcome::Dying
                    } else {
                        Outcome::Clear
                    }
                }
            }
        }
    };

    match outcome {
        Outcome::Clear => {
            let step = dt / state.tuning.hud_fade_frames;
            let hud = &mut state.scenes.hud;
            let go = hud.go_label_mut();
            go.alpha = approach(go.alpha, 0.0, step);
            hud.score_alpha = approach(hud.score_alpha, 1.0, step);
        }
        Outcome::Dying => dying(state),
        Outcome::Broken(reason) => {
            log::warn!("Invariant failure ({}), resetting run", reason);
            state.reset_run();
        }
    }
}

/// Death handling, repeated every tick until the character is off screen
fn dying(state: &mut GameState) {
    if state.scenes.visibility().end {
        return;
    }
    let Some(world) = state.world.as_mut() else {
        return;
    };

    if world.character.scoring_active {
        world.character.die(&state.tuning);
        state.events.push(GameEvent::Died { score: state.score });
        log::info!("Died with score {}", state.score);
    }

    if state.save.record_score(state.score) {
        state.summary.new_best = true;
        state.events.push(GameEvent::SaveRequested);
        log::info!("New highscore: {}", state.score);
    }

    if world.character.is_dead(&state.surface) {
        state.scenes.hud.reset_countdown();
        state.summary = EndSummary {
            score: state.score,
            best: state.save.highscore,
            new_best: state.summary.new_best,
        };
        if let Err(e) = state.request(Scene::End) {
            log::warn!("Could not show the end panel: {}", e);
        }
    }
}

fn animate_transition(state: &mut GameState, dt: f32) {
    let from = state.scenes.scene();
    let effects = state.scenes.advance(dt, &state.tuning);

    for effect in effects {
        match effect {
            Effect::Flip(route) if route.enters_game() || route == Route::EndToMenu => {
                state.reset_run();
            }
            Effect::CountdownTick { step } => state.events.push(GameEvent::CountdownTick { step }),
            Effect::Go => state.events.push(GameEvent::Go),
            _ => {}
        }
    }

    state.note_scene_change(from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::tests::loaded_state;

    fn idle(state: &mut GameState, frames: usize) {
        for _ in 0..frames {
            tick(state, &TickInput::default(), 1.0);
        }
    }

    /// Tick with no input until `scene` is active and no transition plays
    fn settle_in(state: &mut GameState, scene: Scene) {
        for _ in 0..10_000 {
            if state.scene() == scene && !state.scenes.is_transitioning() {
                return;
            }
            tick(state, &TickInput::default(), 1.0);
        }
        panic!("never settled in {scene:?}");
    }

    fn in_game(seed: u64) -> GameState {
        let mut state = loaded_state(seed);
        settle_in(&mut state, Scene::MainMenu);
        tick(&mut state, &TickInput::command(Command::Play), 1.0);
        settle_in(&mut state, Scene::Game);
        state.take_events();
        state
    }

    #[test]
    fn test_play_button_only_from_menu() {
        let mut state = loaded_state(1);
        settle_in(&mut state, Scene::MainMenu);
        state.take_events();

        tick(&mut state, &TickInput::command(Command::Replay), 1.0);
        assert!(state.take_events().is_empty());

        tick(&mut state, &TickInput::command(Command::Play), 1.0);
        assert_eq!(state.take_events(), vec![GameEvent::ButtonPressed]);
        assert!(state.scenes.is_transitioning());
    }

    #[test]
    fn test_countdown_events_then_game() {
        let mut state = loaded_state(1);
        settle_in(&mut state, Scene::MainMenu);
        tick(&mut state, &TickInput::command(Command::Play), 1.0);
        settle_in(&mut state, Scene::Game);
        let events = state.take_events();
        let countdown: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CountdownTick { .. } | GameEvent::Go))
            .copied()
            .collect();
        assert_eq!(
            countdown,
            vec![
                GameEvent::CountdownTick { step: 1 },
                GameEvent::CountdownTick { step: 2 },
                GameEvent::CountdownTick { step: 3 },
                GameEvent::Go,
            ]
        );
        assert!(events.contains(&GameEvent::SceneChanged {
            from: Scene::MainMenu,
            to: Scene::Game
        }));
    }

    #[test]
    fn test_character_frozen_during_countdown() {
        let mut state = loaded_state(1);
        settle_in(&mut state, Scene::MainMenu);
        tick(&mut state, &TickInput::command(Command::Play), 1.0);
        for _ in 0..100 {
            tick(&mut state, &TickInput::press(), 1.0);
            assert_ne!(state.scene(), Scene::Game);
        }
        let world = state.world.as_ref().unwrap();
        assert_eq!(world.character.velocity, 0.0);
        assert_eq!(world.character.pos.y, 320.0);
    }

    #[test]
    fn test_jump_event() {
        let mut state = in_game(2);
        tick(&mut state, &TickInput::press(), 1.0);
        assert!(state.take_events().contains(&GameEvent::Jumped));
        let world = state.world.as_ref().unwrap();
        // Impulse then one frame of gravity
        assert_eq!(world.character.velocity, -9.5);
    }

    #[test]
    fn test_hud_fades_during_play() {
        let mut state = in_game(2);
        assert_eq!(state.scenes.hud.labels[3].alpha, 1.0);
        tick(&mut state, &TickInput::default(), 4.0);
        assert!((state.scenes.hud.labels[3].alpha - 0.9).abs() < 1e-5);
        assert!((state.scenes.hud.score_alpha - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_falling_without_input_dies_and_ends() {
        let mut state = in_game(3);
        let mut died = 0;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), 1.0);
            for event in state.take_events() {
                if matches!(event, GameEvent::Died { .. }) {
                    died += 1;
                    let world = state.world.as_ref().unwrap();
                    assert!(!world.character.scoring_active);
                    assert!(!world.character.controls_enabled);
                }
            }
            if state.scene() == Scene::End {
                break;
            }
        }
        assert_eq!(died, 1);
        assert_eq!(state.scene(), Scene::End);
        assert_eq!(state.summary.score, 0);
        assert!(!state.summary.new_best);
        // Countdown labels are rewound for the next run
        assert_eq!(state.scenes.hud.countdown_step, 0);
    }

    #[test]
    fn test_death_from_threshold_height_still_ends() {
        let mut state = in_game(3);
        {
            let tuning = state.tuning.clone();
            let surface = state.surface;
            let character = &mut state.world.as_mut().unwrap().character;
            character.die(&tuning);
            character.pos.y = surface.height() + character.size.y - 10.5;
        }
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 1.0);
            if state.scene() == Scene::End {
                break;
            }
        }
        assert_eq!(state.scene(), Scene::End);
    }

    #[test]
    fn test_index_underflow_resets_run() {
        let mut state = in_game(5);
        state.score = 4;
        {
            let world = state.world.as_mut().unwrap();
            world.obstacles.ring_mut()[0].pos.x = -500.0;
            world.obstacles.set_indices(0, 0);
        }
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.scene(), Scene::Game);
        let world = state.world.as_ref().unwrap();
        assert_eq!(world.obstacles.get(0).unwrap().pos.x, 480.0);
    }

    #[test]
    fn test_menu_hover_runs_on_menu() {
        let mut state = loaded_state(1);
        settle_in(&mut state, Scene::MainMenu);
        idle(&mut state, 10);
        assert!((state.scenes.menu.skin_y - 320.0).abs() <= 6.0);
        assert!(state.scenes.menu.skin_rotation != 0.0);
    }

    #[test]
    fn test_skin_commands_only_on_idle_menu() {
        let mut state = loaded_state(1);
        // Still fading in from the loading screen
        tick(&mut state, &TickInput::command(Command::NextSkin), 1.0);
        assert_eq!(state.selected_skin(), "default");

        settle_in(&mut state, Scene::MainMenu);
        tick(&mut state, &TickInput::command(Command::NextSkin), 1.0);
        assert_eq!(state.selected_skin(), "rocker");
    }
}
