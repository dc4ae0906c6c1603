//! Draw list construction
//!
//! Turns a state snapshot into sprite instances, back to front. Texture
//! lookup, text layout and the GPU work belong to the backend.

pub mod instance;

pub use instance::{SpriteInstance, SpriteKind, flags};

use crate::sim::{GameState, ParallaxLayer, Scene, World};
use crate::surface::Surface;

/// Every sprite of the current frame, back to front
pub fn build_draw_list(state: &GameState) -> Vec<SpriteInstance> {
    let mut list = Vec::new();
    let surface = &state.surface;
    let scenes = &state.scenes;
    let (w, h) = (surface.width(), surface.height());

    let loading = scenes.alpha(Scene::Loading);
    if loading > 0.0 {
        list.push(
            SpriteInstance::new(SpriteKind::LoaderSpinner, [w / 2.0, h / 2.5], [1.0, 1.0])
                .with_flags(flags::CENTERED | flags::SCALE_ONLY)
                .with_rotation(scenes.menu.loader_rotation)
                .with_alpha(loading),
        );
    }

    if let Some(world) = &state.world {
        let menu = scenes.alpha(Scene::MainMenu);
        if menu > 0.0 {
            let size = world.character.size;
            list.push(
                SpriteInstance::new(
                    SpriteKind::MenuSkin,
                    [w / 1.9, scenes.menu.skin_y],
                    [size.x, size.y],
                )
                .with_flags(flags::CENTERED)
                .with_variant(state.skin.0 as u32)
                .with_rotation(scenes.menu.skin_rotation)
                .with_alpha(menu),
            );
        }

        if scenes.alpha(Scene::Game) > 0.0 {
            push_game(&mut list, state, world);
        }
    }

    let end = scenes.alpha(Scene::End);
    if end > 0.0 {
        let new_best = if state.summary.new_best {
            flags::NEW_BEST
        } else {
            0
        };
        list.push(
            SpriteInstance::new(SpriteKind::EndPanel, [0.0, 0.0], [w, h])
                .with_variant(state.summary.score)
                .with_flags(new_best)
                .with_alpha(end),
        );
        list.push(
            SpriteInstance::new(SpriteKind::BestLabel, [w / 2.0, h * 0.05], [1.0, 1.0])
                .with_flags(flags::CENTERED | flags::SCALE_ONLY)
                .with_variant(state.summary.best)
                .with_alpha(end),
        );
    }

    let backdrop = scenes.animator().backdrop_alpha();
    if backdrop > 0.0 {
        list.push(SpriteInstance::new(SpriteKind::Backdrop, [0.0, 0.0], [w, h]).with_alpha(backdrop));
    }

    list
}

fn push_game(list: &mut Vec<SpriteInstance>, state: &GameState, world: &World) {
    let surface = &state.surface;

    for layer in world.parallax.background() {
        push_layer(list, layer, surface);
    }

    let geometry = world.obstacles.geometry();
    for obstacle in world.obstacles.iter() {
        let [x, y] = obstacle.pos.to_array();
        let pole = [geometry.width, geometry.pole_height];
        list.push(SpriteInstance::new(SpriteKind::ObstaclePole, [x, y], pole).with_flags(flags::FLIP_Y));
        list.push(SpriteInstance::new(
            SpriteKind::ObstaclePole,
            [x, y + geometry.pole_height + geometry.gap],
            pole,
        ));
    }

    let character = &world.character;
    list.push(
        SpriteInstance::new(
            SpriteKind::Character,
            character.pos.to_array(),
            character.size.to_array(),
        )
        .with_flags(flags::CENTERED)
        .with_variant(state.skin.0 as u32)
        .with_rotation(character.rotation),
    );

    for layer in world.parallax.foreground() {
        push_layer(list, layer, surface);
    }

    let hud = &state.scenes.hud;
    let center = [surface.width() / 2.0, surface.height() / 2.0];
    for (step, label) in hud.labels.iter().enumerate() {
        if label.alpha > 0.0 {
            list.push(
                SpriteInstance::new(SpriteKind::CountdownLabel, center, [label.scale, label.scale])
                    .with_flags(flags::CENTERED | flags::SCALE_ONLY)
                    .with_variant(step as u32)
                    .with_alpha(label.alpha),
            );
        }
    }
    if hud.score_alpha > 0.0 {
        list.push(
            SpriteInstance::new(SpriteKind::ScoreLabel, [surface.width() / 2.0, 30.0], [1.0, 1.0])
                .with_flags(flags::CENTERED | flags::SCALE_ONLY)
                .with_variant(state.score)
                .with_alpha(hud.score_alpha),
        );
    }
}

fn push_layer(list: &mut Vec<SpriteInstance>, layer: &ParallaxLayer, surface: &Surface) {
    match layer {
        ParallaxLayer::Tile(tile) => {
            // Enough repetitions to cover the screen from the wrapped offset
            let mut x = tile.tile_offset.rem_euclid(tile.size.x) - tile.size.x;
            while x < surface.width() {
                list.push(
                    SpriteInstance::new(SpriteKind::Scenery, [x, tile.y], tile.size.to_array())
                        .with_variant(tile.scenery as u32),
                );
                x += tile.size.x;
            }
        }
        ParallaxLayer::Spawn(spawn) => {
            for &x in spawn.xs.iter().filter(|&&x| x < surface.width()) {
                list.push(
                    SpriteInstance::new(SpriteKind::Scenery, [x, spawn.y], spawn.size.to_array())
                        .with_variant(spawn.scenery as u32),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::tests::loaded_state;
    use crate::sim::{Command, TickInput, tick};

    fn kinds(list: &[SpriteInstance]) -> Vec<u32> {
        list.iter().map(|s| s.kind).collect()
    }

    fn first(list: &[SpriteInstance], kind: SpriteKind) -> Option<usize> {
        list.iter().position(|s| s.is(kind))
    }

    fn last(list: &[SpriteInstance], kind: SpriteKind) -> Option<usize> {
        list.iter().rposition(|s| s.is(kind))
    }

    #[test]
    fn test_loading_shows_spinner_only() {
        let state = crate::sim::GameState::builtin(
            Surface::reference(),
            crate::SaveData::default(),
            1,
        )
        .unwrap();
        let list = build_draw_list(&state);
        assert_eq!(kinds(&list), vec![SpriteKind::LoaderSpinner as u32]);
    }

    #[test]
    fn test_backdrop_drawn_last_during_fade() {
        let mut state = loaded_state(1);
        tick(&mut state, &TickInput::default(), 5.0);
        let list = build_draw_list(&state);
        assert_eq!(last(&list, SpriteKind::Backdrop), Some(list.len() - 1));
    }

    #[test]
    fn test_game_layers_back_to_front() {
        let mut state = loaded_state(1);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        tick(&mut state, &TickInput::command(Command::Play), 1.0);
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), 1.0);
            if state.scene() == Scene::Game {
                break;
            }
        }
        let list = build_draw_list(&state);
        let pole = first(&list, SpriteKind::ObstaclePole).unwrap();
        let character = first(&list, SpriteKind::Character).unwrap();
        assert!(first(&list, SpriteKind::Scenery).unwrap() < pole);
        assert!(last(&list, SpriteKind::ObstaclePole).unwrap() < character);
        // Foreground leaves cover the character
        assert!(last(&list, SpriteKind::Scenery).unwrap() > character);
        // Two poles per obstacle
        let poles = list.iter().filter(|s| s.is(SpriteKind::ObstaclePole)).count();
        assert_eq!(poles, 2 * state.world.as_ref().unwrap().obstacles.len());
        assert!(first(&list, SpriteKind::MenuSkin).is_none());
    }

    #[test]
    fn test_pole_pair_spans_gap() {
        let state = loaded_state(1);
        let mut list = Vec::new();
        push_game(&mut list, &state, state.world.as_ref().unwrap());
        let poles: Vec<_> = list.iter().filter(|s| s.is(SpriteKind::ObstaclePole)).collect();
        let g = state.world.as_ref().unwrap().obstacles.geometry();
        assert_eq!(poles[0].flags & flags::FLIP_Y, flags::FLIP_Y);
        assert_eq!(poles[1].flags & flags::FLIP_Y, 0);
        let gap = poles[1].pos[1] - (poles[0].pos[1] + poles[0].size[1]);
        assert!((gap - g.gap).abs() < 1e-3);
    }

    #[test]
    fn test_tile_strip_covers_screen() {
        let mut state = loaded_state(1);
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        let world = state.world.as_ref().unwrap();
        let mut list = Vec::new();
        push_layer(&mut list, &world.parallax.layers()[0], &state.surface);
        let left = list.iter().map(|s| s.pos[0]).fold(f32::INFINITY, f32::min);
        let right = list
            .iter()
            .map(|s| s.pos[0] + s.size[0])
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(left <= 0.0);
        assert!(right >= state.surface.width());
    }
}
