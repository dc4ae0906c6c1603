//! Game state and the simulation context
//!
//! `GameState` is the single owner of every simulation component. Components
//! never reference each other; the tick passes them what they need.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::clock::SimClock;
use super::obstacles::ObstacleField;
use super::parallax::ParallaxField;
use super::scene::{Scene, SceneMachine};
use crate::assets::{AssetCatalog, AssetKey, SkinHandle, SpriteSize};
use crate::content::{GameContent, MapConfig};
use crate::error::{SetupError, TransitionError};
use crate::persistence::SaveData;
use crate::surface::Surface;
use crate::tuning::Tuning;

/// Outbound signals for audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Scored { score: u32 },
    Died { score: u32 },
    Jumped,
    ButtonPressed,
    CountdownTick { step: usize },
    Go,
    SceneChanged { from: Scene, to: Scene },
    /// Save data changed and should be written out
    SaveRequested,
}

/// What the end panel shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndSummary {
    pub score: u32,
    pub best: u32,
    /// This run raised the highscore
    pub new_best: bool,
}

/// Gameplay entities; they exist once assets have loaded
#[derive(Debug, Clone)]
pub struct World {
    pub catalog: AssetCatalog,
    pub character: Character,
    pub obstacles: ObstacleField,
    pub parallax: ParallaxField,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub surface: Surface,
    pub tuning: Tuning,
    pub content: GameContent,
    /// Index of the played map in `content.maps`
    pub map: usize,
    pub clock: SimClock,
    pub scenes: SceneMachine,
    pub world: Option<World>,
    pub score: u32,
    pub save: SaveData,
    pub skin: SkinHandle,
    pub summary: EndSummary,
    /// Signals raised since the platform last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New state on the loading screen
    pub fn new(
        content: GameContent,
        tuning: Tuning,
        surface: Surface,
        save: SaveData,
        seed: u64,
    ) -> Result<Self, SetupError> {
        content.validate()?;
        tuning.validate()?;
        content.default_map()?;

        let save = save.sanitized(&content.skin_names());
        let skin = Self::handle_for(&content, &save.selected_skin);

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            surface,
            clock: SimClock::new(tuning.max_frame_delta),
            tuning,
            content,
            map: 0,
            scenes: SceneMachine::new(),
            world: None,
            score: 0,
            save,
            skin,
            summary: EndSummary::default(),
            events: Vec::new(),
        })
    }

    /// Built-in content and default tuning
    pub fn builtin(surface: Surface, save: SaveData, seed: u64) -> Result<Self, SetupError> {
        Self::new(GameContent::builtin()?, Tuning::default(), surface, save, seed)
    }

    fn handle_for(content: &GameContent, skin: &str) -> SkinHandle {
        SkinHandle(
            content
                .skins
                .iter()
                .position(|s| s.skin == skin)
                .unwrap_or(0),
        )
    }

    /// Choose the map to play; only possible while still loading
    pub fn select_map(&mut self, name: &str) -> Result<(), SetupError> {
        let index = self.content.map_index(name)?;
        if self.world.is_some() {
            log::warn!("Map '{}' requested after loading, ignoring", name);
            return Ok(());
        }
        self.map = index;
        Ok(())
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.content.maps[self.map]
    }

    pub fn scene(&self) -> Scene {
        self.scenes.scene()
    }

    pub fn is_loaded(&self) -> bool {
        self.world.is_some()
    }

    /// Resolve sprites through the loader and finish loading
    pub fn load_assets<F>(&mut self, lookup: F) -> Result<(), SetupError>
    where
        F: FnMut(&AssetKey) -> Option<SpriteSize>,
    {
        let catalog = AssetCatalog::resolve(&self.content, self.map_config(), lookup)?;
        self.finish_loading(catalog)
    }

    /// Build the gameplay entities and leave the loading screen
    pub fn finish_loading(&mut self, catalog: AssetCatalog) -> Result<(), SetupError> {
        if self.world.is_some() {
            log::warn!("Assets already loaded, ignoring");
            return Ok(());
        }

        let map = &self.content.maps[self.map];
        let behaviours = map.validate()?;
        let size = Self::character_size(&catalog, self.skin, &self.surface, &self.tuning);
        let character = Character::new(size, &self.surface, &self.tuning);
        let obstacles = ObstacleField::new(
            map,
            behaviours,
            catalog.obstacle_pole(),
            &self.surface,
            &mut self.rng,
        )?;
        let parallax = ParallaxField::new(map, &catalog, &self.surface, &mut self.rng)?;

        log::info!(
            "Map '{}' ready: {} obstacle(s), {} scenery layer(s)",
            map.map,
            obstacles.len(),
            parallax.layers().len()
        );

        self.world = Some(World {
            catalog,
            character,
            obstacles,
            parallax,
        });

        if let Err(e) = self.request(Scene::MainMenu) {
            log::warn!("Could not leave the loading screen: {}", e);
        }
        Ok(())
    }

    fn character_size(
        catalog: &AssetCatalog,
        skin: SkinHandle,
        surface: &Surface,
        tuning: &Tuning,
    ) -> Vec2 {
        let sprite = catalog
            .skin(skin)
            .scaled(tuning.character_scale * surface.scale_factor());
        Vec2::new(sprite.width, sprite.height)
    }

    /// Start a scene transition, reporting the scene change if it is immediate
    pub fn request(&mut self, to: Scene) -> Result<(), TransitionError> {
        if self.world.is_none() {
            return Err(TransitionError::NotLoaded);
        }
        let from = self.scenes.scene();
        self.scenes.request(to)?;
        self.note_scene_change(from);
        Ok(())
    }

    pub(crate) fn note_scene_change(&mut self, from: Scene) {
        let to = self.scenes.scene();
        if from != to {
            self.events.push(GameEvent::SceneChanged { from, to });
        }
    }

    /// Fresh run: character back at spawn, obstacles re-laid, score cleared
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.summary = EndSummary::default();
        self.scenes.hud.reset_countdown();
        self.scenes.hud.score_alpha = 0.0;

        let size_skin = self.skin;
        if let Some(world) = self.world.as_mut() {
            world.character.size =
                Self::character_size(&world.catalog, size_skin, &self.surface, &self.tuning);
            world.character.reset(&self.surface, &self.tuning);
            world.obstacles.reset(&mut self.rng);
        }
        log::info!("Run reset");
    }

    pub fn next_skin(&mut self) {
        self.save.next_skin();
        self.apply_skin();
    }

    pub fn previous_skin(&mut self) {
        self.save.previous_skin();
        self.apply_skin();
    }

    fn apply_skin(&mut self) {
        self.skin = Self::handle_for(&self.content, &self.save.selected_skin);
        if let Some(world) = self.world.as_mut() {
            world.character.size =
                Self::character_size(&world.catalog, self.skin, &self.surface, &self.tuning);
        }
        log::debug!("Selected skin '{}'", self.save.selected_skin);
        self.events.push(GameEvent::SaveRequested);
    }

    pub fn is_skin_unlocked(&self, skin: &str) -> bool {
        self.save.is_skin_unlocked(skin)
    }

    pub fn selected_skin(&self) -> &str {
        &self.save.selected_skin
    }

    /// Drain the signals raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
