//! Scene transition sequences
//!
//! A transition is a small tagged state machine advanced by [`step`]. It never
//! touches scenes directly: it reports [`Effect`]s and the scene machine acts
//! on them.

use serde::{Deserialize, Serialize};

use super::scene::Scene;
use crate::approach;
use crate::consts::COUNTDOWN_STEPS;
use crate::error::TransitionError;
use crate::tuning::Tuning;

/// Every allowed scene change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    LoadingToMenu,
    MenuToGame,
    GameToEnd,
    EndToMenu,
    EndToGame,
}

impl Route {
    /// The transition table
    pub fn between(from: Scene, to: Scene) -> Option<Self> {
        match (from, to) {
            (Scene::Loading, Scene::MainMenu) => Some(Route::LoadingToMenu),
            (Scene::MainMenu, Scene::Game) => Some(Route::MenuToGame),
            (Scene::Game, Scene::End) => Some(Route::GameToEnd),
            (Scene::End, Scene::MainMenu) => Some(Route::EndToMenu),
            (Scene::End, Scene::Game) => Some(Route::EndToGame),
            _ => None,
        }
    }

    pub fn from(self) -> Scene {
        match self {
            Route::LoadingToMenu => Scene::Loading,
            Route::MenuToGame => Scene::MainMenu,
            Route::GameToEnd => Scene::Game,
            Route::EndToMenu | Route::EndToGame => Scene::End,
        }
    }

    pub fn to(self) -> Scene {
        match self {
            Route::LoadingToMenu | Route::EndToMenu => Scene::MainMenu,
            Route::MenuToGame | Route::EndToGame => Scene::Game,
            Route::GameToEnd => Scene::End,
        }
    }

    /// Ends with the countdown and a fresh run
    pub fn enters_game(self) -> bool {
        matches!(self, Route::MenuToGame | Route::EndToGame)
    }
}

/// Direction of the backdrop fade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadePhase {
    /// Backdrop rising to opaque
    Covering,
    /// Backdrop falling back to transparent, scenes already swapped
    Revealing,
}

/// The active sequence, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sequence {
    #[default]
    Idle,
    /// Backdrop fade through black
    Fade { route: Route, phase: FadePhase },
    /// "3", "2", "1", "GO!" after the backdrop has cleared
    Countdown { route: Route },
    /// End panel cross-fades over the score label, no backdrop
    EndReveal,
}

/// One countdown label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub alpha: f32,
    pub scale: f32,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            scale: 1.0,
        }
    }
}

/// Fading overlay elements shared by transitions and gameplay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub labels: [Label; COUNTDOWN_STEPS],
    /// Countdown steps completed, 0..=4
    pub countdown_step: usize,
    pub score_alpha: f32,
    /// End panel opacity
    pub end_alpha: f32,
}

impl Hud {
    /// Hide every countdown label and rewind the countdown
    pub fn reset_countdown(&mut self) {
        self.labels = Default::default();
        self.countdown_step = 0;
    }

    /// The final "GO!" label
    pub fn go_label_mut(&mut self) -> &mut Label {
        &mut self.labels[COUNTDOWN_STEPS - 1]
    }
}

/// Something the scene machine must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Backdrop is opaque: swap scene visibility now
    Flip(Route),
    /// A countdown label finished appearing (`step` of 1..=3)
    CountdownTick { step: usize },
    /// The last countdown label finished appearing
    Go,
    /// Sequence over; the animator is idle again
    Complete(Route),
}

/// Owner of the single active sequence slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    sequence: Sequence,
    backdrop_alpha: f32,
    /// Set once the backdrop has peaked; blocks a second rise
    backdrop_on: bool,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin `route`; only one sequence may run at a time
    pub fn start(&mut self, route: Route) -> Result<(), TransitionError> {
        if !self.is_idle() {
            return Err(TransitionError::Busy);
        }
        self.sequence = match route {
            Route::GameToEnd => Sequence::EndReveal,
            route => Sequence::Fade {
                route,
                phase: FadePhase::Covering,
            },
        };
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.sequence == Sequence::Idle
    }

    pub fn backdrop_alpha(&self) -> f32 {
        self.backdrop_alpha
    }

    fn finish(&mut self, route: Route, effects: &mut Vec<Effect>) {
        self.sequence = Sequence::Idle;
        self.backdrop_on = false;
        effects.push(Effect::Complete(route));
    }
}

/// Advance the active sequence by `dt` frames
pub fn step(animator: &mut Animator, hud: &mut Hud, dt: f32, tuning: &Tuning) -> Vec<Effect> {
    let mut effects = Vec::new();
    let rate = dt / tuning.transition_frames;

    match animator.sequence {
        Sequence::Idle => {}
        Sequence::Fade {
            route,
            phase: FadePhase::Covering,
        } => {
            if animator.backdrop_alpha < 1.0 && !animator.backdrop_on {
                animator.backdrop_alpha = approach(animator.backdrop_alpha, 1.0, rate);
            } else {
                animator.backdrop_on = true;
                animator.sequence = Sequence::Fade {
                    route,
                    phase: FadePhase::Revealing,
                };
                effects.push(Effect::Flip(route));
                animator.backdrop_alpha = approach(animator.backdrop_alpha, 0.0, rate);
            }
        }
        Sequence::Fade {
            route,
            phase: FadePhase::Revealing,
        } => {
            if animator.backdrop_alpha > 0.0 {
                animator.backdrop_alpha = approach(animator.backdrop_alpha, 0.0, rate);
            } else if route.enters_game() {
                animator.sequence = Sequence::Countdown { route };
                count_down(animator, hud, route, dt, tuning, &mut effects);
            } else {
                animator.finish(route, &mut effects);
            }
        }
        Sequence::Countdown { route } => {
            count_down(animator, hud, route, dt, tuning, &mut effects);
        }
        Sequence::EndReveal => {
            if hud.end_alpha < 1.0 {
                hud.end_alpha = approach(hud.end_alpha, 1.0, rate);
                hud.score_alpha = approach(hud.score_alpha, 0.0, rate);
            } else {
                animator.finish(Route::GameToEnd, &mut effects);
            }
        }
    }

    effects
}

/// Fade the current label in (shrinking toward half size) while the previous
/// one fades out; a step completes once both are done
fn count_down(
    animator: &mut Animator,
    hud: &mut Hud,
    route: Route,
    dt: f32,
    tuning: &Tuning,
    effects: &mut Vec<Effect>,
) {
    let current = hud.countdown_step;
    if current >= COUNTDOWN_STEPS {
        animator.finish(route, effects);
        return;
    }

    let rate = dt / tuning.countdown_frames;
    let previous_done = match current.checked_sub(1) {
        Some(previous) => {
            let label = &mut hud.labels[previous];
            label.alpha = approach(label.alpha, 0.0, rate * tuning.countdown_fade_out_factor);
            label.alpha <= 0.0
        }
        None => true,
    };

    let label = &mut hud.labels[current];
    label.alpha = approach(label.alpha, 1.0, rate);
    label.scale = approach(label.scale, 0.5, rate);

    if previous_done && label.alpha >= 1.0 {
        hud.countdown_step += 1;
        if hud.countdown_step == COUNTDOWN_STEPS {
            effects.push(Effect::Go);
        } else {
            effects.push(Effect::CountdownTick {
                step: hud.countdown_step,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(animator: &mut Animator, hud: &mut Hud, dt: f32) -> Vec<Effect> {
        let tuning = Tuning::default();
        let mut all = Vec::new();
        for _ in 0..10_000 {
            let effects = step(animator, hud, dt, &tuning);
            let done = effects.iter().any(|e| matches!(e, Effect::Complete(_)));
            all.extend(effects);
            if done {
                return all;
            }
        }
        panic!("sequence never completed");
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(
            Route::between(Scene::Loading, Scene::MainMenu),
            Some(Route::LoadingToMenu)
        );
        assert_eq!(Route::between(Scene::End, Scene::Game), Some(Route::EndToGame));
        assert_eq!(Route::between(Scene::MainMenu, Scene::End), None);
        assert_eq!(Route::between(Scene::Game, Scene::MainMenu), None);
        assert_eq!(Route::between(Scene::Loading, Scene::Game), None);
        for route in [
            Route::LoadingToMenu,
            Route::MenuToGame,
            Route::GameToEnd,
            Route::EndToMenu,
            Route::EndToGame,
        ] {
            assert_eq!(Route::between(route.from(), route.to()), Some(route));
        }
    }

    #[test]
    fn test_single_active_sequence() {
        let mut animator = Animator::new();
        animator.start(Route::LoadingToMenu).unwrap();
        assert_eq!(animator.start(Route::MenuToGame), Err(TransitionError::Busy));
    }

    #[test]
    fn test_idle_step_is_noop() {
        let mut animator = Animator::new();
        let mut hud = Hud::default();
        assert!(step(&mut animator, &mut hud, 1.0, &Tuning::default()).is_empty());
        assert_eq!(animator, Animator::new());
    }

    #[test]
    fn test_fade_phases() {
        let tuning = Tuning::default();
        let mut animator = Animator::new();
        let mut hud = Hud::default();
        animator.start(Route::LoadingToMenu).unwrap();

        assert!(step(&mut animator, &mut hud, 15.0, &tuning).is_empty());
        assert_eq!(animator.backdrop_alpha(), 0.5);
        assert!(step(&mut animator, &mut hud, 15.0, &tuning).is_empty());
        assert_eq!(animator.backdrop_alpha(), 1.0);

        // Swap happens under the opaque backdrop, then it starts falling
        let effects = step(&mut animator, &mut hud, 15.0, &tuning);
        assert_eq!(effects, vec![Effect::Flip(Route::LoadingToMenu)]);
        assert_eq!(animator.backdrop_alpha(), 0.5);

        assert!(step(&mut animator, &mut hud, 15.0, &tuning).is_empty());
        let effects = step(&mut animator, &mut hud, 15.0, &tuning);
        assert_eq!(effects, vec![Effect::Complete(Route::LoadingToMenu)]);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_game_entry_runs_countdown() {
        let mut animator = Animator::new();
        let mut hud = Hud::default();
        animator.start(Route::MenuToGame).unwrap();
        let effects = run_to_completion(&mut animator, &mut hud, 1.0);
        assert_eq!(
            effects,
            vec![
                Effect::Flip(Route::MenuToGame),
                Effect::CountdownTick { step: 1 },
                Effect::CountdownTick { step: 2 },
                Effect::CountdownTick { step: 3 },
                Effect::Go,
                Effect::Complete(Route::MenuToGame),
            ]
        );
        assert_eq!(hud.countdown_step, COUNTDOWN_STEPS);
        // Only "GO!" remains, at half size
        assert_eq!(hud.labels[3], Label { alpha: 1.0, scale: 0.5 });
        assert!(hud.labels[..3].iter().all(|l| l.alpha == 0.0));
    }

    #[test]
    fn test_countdown_overlaps_fades() {
        let tuning = Tuning::default();
        let mut animator = Animator::new();
        let mut hud = Hud::default();
        hud.labels[0].alpha = 1.0;
        hud.countdown_step = 1;
        animator.sequence = Sequence::Countdown {
            route: Route::EndToGame,
        };
        step(&mut animator, &mut hud, 5.0, &tuning);
        assert!(hud.labels[0].alpha < 1.0);
        assert!(hud.labels[1].alpha > 0.0);
    }

    #[test]
    fn test_end_reveal_cross_fade() {
        let mut animator = Animator::new();
        let mut hud = Hud {
            score_alpha: 1.0,
            ..Default::default()
        };
        animator.start(Route::GameToEnd).unwrap();
        let effects = run_to_completion(&mut animator, &mut hud, 1.0);
        assert_eq!(effects, vec![Effect::Complete(Route::GameToEnd)]);
        assert_eq!(hud.end_alpha, 1.0);
        assert_eq!(hud.score_alpha, 0.0);
        // No backdrop involved
        assert_eq!(animator.backdrop_alpha(), 0.0);
    }

    #[test]
    fn test_backdrop_guard_released_on_completion() {
        let mut animator = Animator::new();
        let mut hud = Hud::default();
        animator.start(Route::EndToMenu).unwrap();
        run_to_completion(&mut animator, &mut hud, 2.0);
        assert!(!animator.backdrop_on);
        animator.start(Route::MenuToGame).unwrap();
        step(&mut animator, &mut hud, 2.0, &Tuning::default());
        assert!(animator.backdrop_alpha() > 0.0);
    }
}
