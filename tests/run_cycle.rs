//! Whole-game scenarios driven only through the public API

use canopy_flap::assets::{AssetKey, SpriteSize};
use canopy_flap::render::{SpriteKind, build_draw_list};
use canopy_flap::sim::{Command, GameEvent, GameState, Scene, TickInput, tick};
use canopy_flap::{SaveData, Surface};
use proptest::prelude::*;

fn sprite(key: &AssetKey) -> Option<SpriteSize> {
    Some(match key {
        AssetKey::Skin { .. } => SpriteSize::new(160.0, 120.0),
        AssetKey::ObstaclePole { .. } => SpriteSize::new(80.0, 500.0),
        AssetKey::Scenery { .. } => SpriteSize::new(400.0, 200.0),
    })
}

fn new_game(save: SaveData) -> GameState {
    let mut state = GameState::builtin(Surface::reference(), save, 42).unwrap();
    state.load_assets(sprite).unwrap();
    state
}

fn run_until(
    state: &mut GameState,
    input: &TickInput,
    done: impl Fn(&GameState) -> bool,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..10_000 {
        if done(state) {
            return events;
        }
        tick(state, input, 1.0);
        events.extend(state.take_events());
    }
    panic!("condition never reached");
}

fn idle_in(scene: Scene) -> impl Fn(&GameState) -> bool {
    move |s| s.scene() == scene && !s.scenes.is_transitioning()
}

fn start_run(state: &mut GameState) {
    run_until(state, &TickInput::default(), idle_in(Scene::MainMenu));
    tick(state, &TickInput::command(Command::Play), 1.0);
    run_until(state, &TickInput::default(), idle_in(Scene::Game));
    state.take_events();
}

#[test]
fn death_to_reset_cycle() {
    let mut state = new_game(SaveData::default());
    start_run(&mut state);

    // Fall without flapping until the character leaves the screen
    let mut fell = false;
    for _ in 0..1000 {
        tick(&mut state, &TickInput::default(), 1.0);
        let world = state.world.as_ref().unwrap();
        if !world.character.scoring_active {
            fell = true;
            assert!(!world.character.controls_enabled);
        }
        if world.character.is_dead(&state.surface) {
            break;
        }
    }
    assert!(fell);
    assert_eq!(state.scene(), Scene::End);

    // Jumps are ignored while dead
    tick(&mut state, &TickInput::press(), 1.0);
    assert!(!state.take_events().contains(&GameEvent::Jumped));

    run_until(&mut state, &TickInput::default(), idle_in(Scene::End));
    tick(&mut state, &TickInput::command(Command::Replay), 1.0);
    run_until(&mut state, &TickInput::default(), |s| !s.scenes.visibility().end);

    let world = state.world.as_ref().unwrap();
    assert_eq!(world.character.velocity, 0.0);
    assert_eq!(world.character.rotation, 0.0);
    assert_eq!(world.character.pos.y, 320.0);
    assert!(world.character.scoring_active);
    assert!(world.character.controls_enabled);
    assert_eq!(state.score, 0);

    let events = run_until(&mut state, &TickInput::default(), idle_in(Scene::Game));
    assert!(events.contains(&GameEvent::Go));
}

#[test]
fn new_highscore_is_saved_once() {
    let mut state = new_game(SaveData {
        highscore: 2,
        ..Default::default()
    });
    start_run(&mut state);
    state.score = 3;

    let events = run_until(&mut state, &TickInput::default(), |s| s.scene() == Scene::End);
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::Died { score: 3 })).count(),
        1
    );
    assert_eq!(
        events.iter().filter(|e| **e == GameEvent::SaveRequested).count(),
        1
    );
    assert_eq!(state.save.highscore, 3);
    assert_eq!(state.summary.best, 3);
    assert!(state.summary.new_best);
}

#[test]
fn back_to_menu_hides_game() {
    let mut state = new_game(SaveData::default());
    start_run(&mut state);
    run_until(&mut state, &TickInput::default(), idle_in(Scene::End));

    tick(&mut state, &TickInput::command(Command::BackToMenu), 1.0);
    let events = run_until(&mut state, &TickInput::default(), idle_in(Scene::MainMenu));
    assert!(events.contains(&GameEvent::SceneChanged {
        from: Scene::End,
        to: Scene::MainMenu
    }));

    let list = build_draw_list(&state);
    assert!(list.iter().any(|s| s.is(SpriteKind::MenuSkin)));
    assert!(!list.iter().any(|s| s.is(SpriteKind::Character)));
    assert!(!list.iter().any(|s| s.is(SpriteKind::EndPanel)));
}

#[test]
fn same_seed_same_run() {
    let play = || {
        let mut state = new_game(SaveData::default());
        start_run(&mut state);
        for i in 0..600 {
            let input = if i % 18 == 0 {
                TickInput::press()
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, 1.0);
        }
        let world = state.world.unwrap();
        (
            world.character.pos,
            world.obstacles.iter().map(|o| o.pos).collect::<Vec<_>>(),
            state.score,
        )
    };
    assert_eq!(play(), play());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pool_stays_ordered_during_play(seed in any::<u64>(), period in 12u32..40) {
        let mut state = GameState::builtin(Surface::reference(), SaveData::default(), seed).unwrap();
        state.load_assets(sprite).unwrap();
        start_run(&mut state);

        for i in 0..1500u32 {
            let input = if i % period == 0 { TickInput::press() } else { TickInput::default() };
            tick(&mut state, &input, 1.0);
            if state.scene() != Scene::Game {
                break;
            }
            let world = state.world.as_ref().unwrap();
            if !world.character.scoring_active {
                continue;
            }
            let obstacles = &world.obstacles;
            prop_assert!(obstacles.collision_index() <= obstacles.scoring_index());
            prop_assert!(obstacles.scoring_index() <= obstacles.len());
            let xs: Vec<f32> = obstacles.iter().map(|o| o.pos.x).collect();
            prop_assert!(xs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
