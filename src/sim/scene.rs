//! Scene state machine
//!
//! Tracks which scene's per-frame loop runs, which scene containers are
//! visible, and owns the transition animator that sequences the changes.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use super::transition::{self, Animator, Effect, Hud, Route};
use crate::error::TransitionError;
use crate::surface::Surface;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    Loading,
    MainMenu,
    Game,
    End,
}

/// Which scene containers are currently shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub loading: bool,
    pub main_menu: bool,
    pub game: bool,
    pub end: bool,
}

impl Visibility {
    pub fn is_visible(&self, scene: Scene) -> bool {
        match scene {
            Scene::Loading => self.loading,
            Scene::MainMenu => self.main_menu,
            Scene::Game => self.game,
            Scene::End => self.end,
        }
    }

    fn set(&mut self, scene: Scene, visible: bool) {
        match scene {
            Scene::Loading => self.loading = visible,
            Scene::MainMenu => self.main_menu = visible,
            Scene::Game => self.game = visible,
            Scene::End => self.end = visible,
        }
    }
}

/// Idle animation of the loading spinner and the menu skin preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuAnimation {
    pub loader_rotation: f32,
    /// Preview sprite center y
    pub skin_y: f32,
    pub skin_rotation: f32,
}

impl MenuAnimation {
    pub fn spin(&mut self, dt: f32) {
        self.loader_rotation = (self.loader_rotation + PI / 100.0 * dt) % std::f32::consts::TAU;
    }

    /// Gentle hover driven by total elapsed frames
    pub fn hover(&mut self, accumulated: f64, surface: &Surface) {
        let t = accumulated / 20.0;
        self.skin_y = surface.height() / 2.0 + t.sin() as f32 * 6.0;
        self.skin_rotation = PI / 60.0 * (t + 1.0).sin() as f32;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMachine {
    /// Scene whose per-frame loop runs
    scene: Scene,
    visible: Visibility,
    animator: Animator,
    pub hud: Hud,
    pub menu: MenuAnimation,
}

impl Default for SceneMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneMachine {
    /// Starts on the loading screen
    pub fn new() -> Self {
        Self {
            scene: Scene::Loading,
            visible: Visibility {
                loading: true,
                ..Default::default()
            },
            animator: Animator::new(),
            hud: Hud::default(),
            menu: MenuAnimation::default(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn visibility(&self) -> Visibility {
        self.visible
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_transitioning(&self) -> bool {
        !self.animator.is_idle()
    }

    /// Opacity a scene container is drawn with
    pub fn alpha(&self, scene: Scene) -> f32 {
        match scene {
            _ if !self.visible.is_visible(scene) => 0.0,
            Scene::End => self.hud.end_alpha,
            _ => 1.0,
        }
    }

    /// Start the transition to `to`
    pub fn request(&mut self, to: Scene) -> Result<Route, TransitionError> {
        let route = Route::between(self.scene, to).ok_or(TransitionError::NotAllowed {
            from: self.scene,
            to,
        })?;
        self.animator.start(route)?;

        match route {
            Route::LoadingToMenu => self.scene = Scene::MainMenu,
            Route::GameToEnd => {
                self.scene = Scene::End;
                self.hud.end_alpha = 0.0;
                self.visible.set(Scene::End, true);
            }
            _ => {}
        }

        log::info!("Transition {:?} -> {:?}", route.from(), route.to());
        Ok(route)
    }

    /// Step the animator and apply its visibility changes; the effects are
    /// returned for the caller's own bookkeeping
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> Vec<Effect> {
        let effects = transition::step(&mut self.animator, &mut self.hud, dt, tuning);
        for effect in &effects {
            match *effect {
                Effect::Flip(route) => self.flip(route),
                Effect::Complete(route) if route.enters_game() => self.scene = Scene::Game,
                _ => {}
            }
        }
        effects
    }

    fn flip(&mut self, route: Route) {
        match route {
            Route::LoadingToMenu => {
                self.visible.set(Scene::Loading, false);
                self.visible.set(Scene::MainMenu, true);
            }
            Route::MenuToGame => {
                self.visible.set(Scene::MainMenu, false);
                self.visible.set(Scene::Game, true);
            }
            Route::EndToMenu => {
                self.visible.set(Scene::End, false);
                self.visible.set(Scene::Game, false);
                self.visible.set(Scene::MainMenu, true);
                self.hud.end_alpha = 0.0;
                self.scene = Scene::MainMenu;
            }
            Route::EndToGame => {
                self.visible.set(Scene::End, false);
                self.hud.end_alpha = 0.0;
            }
            Route::GameToEnd => {}
        }
    }
}
