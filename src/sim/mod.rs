//! Game simulation
//!
//! Everything that moves lives here and advances only through `tick`.
//! Frame deltas are supplied by the caller and randomness comes from the
//! state's seeded `Pcg32`, so a seed plus an input sequence replays exactly.
//! Nothing in this module touches a window, a GPU or the browser.

pub mod character;
pub mod clock;
pub mod input;
pub mod judge;
pub mod obstacles;
pub mod parallax;
pub mod scene;
pub mod state;
pub mod tick;
pub mod transition;

pub use character::Character;
pub use clock::SimClock;
pub use input::{ButtonState, Command, InputPoll, TickInput};
pub use judge::{Aabb, Judgment, judge};
pub use obstacles::{Behaviour, Obstacle, ObstacleField, ObstacleGeometry, Recycle};
pub use parallax::{ParallaxField, ParallaxLayer, SpawnLayer, TileLayer};
pub use scene::{MenuAnimation, Scene, SceneMachine, Visibility};
pub use state::{EndSummary, GameEvent, GameState, World};
pub use tick::{frame, tick};
pub use transition::{Animator, Effect, Hud, Label, Route};
