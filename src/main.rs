//! Canopy Flap entry point
//!
//! On the web the page's loader, renderer and widgets drive a `WebGame`
//! handle. Natively there is no window: the binary runs a headless autopilot
//! session, useful for soak-testing the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::collections::HashMap;

    use wasm_bindgen::prelude::*;

    use canopy_flap::assets::SpriteSize;
    use canopy_flap::render::{SpriteInstance, build_draw_list};
    use canopy_flap::sim::{self, Command, GameEvent, GameState, InputPoll};
    use canopy_flap::{SaveData, Surface};

    /// Game handle exported to the page
    #[wasm_bindgen]
    pub struct WebGame {
        state: GameState,
        input: InputPoll,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(window_width: f32) -> Result<WebGame, JsError> {
            let surface = Surface::fit_window(window_width)?;
            let seed = js_sys::Date::now() as u64;
            let state = GameState::builtin(surface, SaveData::load(), seed)?;
            log::info!(
                "Game initialized at {}x{} with seed: {}",
                surface.width(),
                surface.height(),
                seed
            );
            Ok(Self {
                state,
                input: InputPoll::new(),
            })
        }

        pub fn width(&self) -> f32 {
            self.state.surface.width()
        }

        pub fn height(&self) -> f32 {
            self.state.surface.height()
        }

        /// Loader finished; `sizes` maps each content `texture` file name
        /// (skins, obstacle and scenery alike) to `[width, height]`
        #[wasm_bindgen(js_name = assetsLoaded)]
        pub fn assets_loaded(&mut self, sizes: &str) -> Result<(), JsError> {
            let sizes: HashMap<String, [f32; 2]> = serde_json::from_str(sizes)?;
            self.state
                .load_assets(|key| sizes.get(key.texture()).map(|&[w, h]| SpriteSize::new(w, h)))?;
            Ok(())
        }

        /// Pointer down or space bar
        pub fn press(&mut self) {
            self.input.press();
        }

        pub fn release(&mut self) {
            self.input.release();
        }

        /// A UI button was clicked
        pub fn command(&mut self, name: &str) -> Result<(), JsError> {
            let command = Command::from_name(name)
                .ok_or_else(|| JsError::new(&format!("Unknown command '{name}'")))?;
            self.input.command(command);
            Ok(())
        }

        /// Advance one display frame; returns the raised events as JSON
        pub fn frame(&mut self, now_ms: f64) -> String {
            let input = self.input.take();
            sim::frame(&mut self.state, &input, now_ms);
            let events = self.state.take_events();
            if events.contains(&GameEvent::SaveRequested) {
                self.state.save.save();
            }
            serde_json::to_string(&events).unwrap_or_else(|_| "[]".into())
        }

        /// Sprite instances of the current frame as raw bytes
        #[wasm_bindgen(js_name = drawList)]
        pub fn draw_list(&self) -> Vec<u8> {
            SpriteInstance::as_bytes(&build_draw_list(&self.state)).to_vec()
        }

        pub fn score(&self) -> u32 {
            self.state.score
        }

        pub fn highscore(&self) -> u32 {
            self.state.save.highscore
        }

        #[wasm_bindgen(js_name = selectedSkin)]
        pub fn selected_skin(&self) -> String {
            self.state.selected_skin().to_string()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Canopy Flap starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canopy_flap::assets::{AssetKey, SpriteSize};
    use canopy_flap::consts::NOMINAL_FRAME_MS;
    use canopy_flap::error::SetupError;
    use canopy_flap::render::build_draw_list;
    use canopy_flap::sim::{self, Command, GameEvent, GameState, InputPoll, Scene};
    use canopy_flap::{SaveData, Surface};

    /// Texture sizes of the shipped art, standing in for a real loader
    fn shipped_sprite(key: &AssetKey) -> Option<SpriteSize> {
        let texture = key.texture();
        Some(match key {
            AssetKey::Skin { .. } => SpriteSize::new(160.0, 120.0),
            AssetKey::ObstaclePole { .. } => SpriteSize::new(80.0, 500.0),
            AssetKey::Scenery { .. } if texture.contains("flower") => SpriteSize::new(120.0, 200.0),
            AssetKey::Scenery { .. } if texture.contains("tree") => SpriteSize::new(180.0, 400.0),
            AssetKey::Scenery { .. } => SpriteSize::new(960.0, 300.0),
        })
    }

    /// Press buttons and flap toward the next gap
    fn autopilot(state: &GameState, poll: &mut InputPoll) {
        if state.scenes.is_transitioning() {
            poll.release();
            return;
        }
        match state.scene() {
            Scene::Loading => {}
            Scene::MainMenu => poll.command(Command::Play),
            Scene::End => poll.command(Command::Replay),
            Scene::Game => {
                let Some(world) = &state.world else {
                    return;
                };
                let obstacles = &world.obstacles;
                let target = obstacles
                    .get(obstacles.collision_index())
                    .map(|o| {
                        let (top, bottom) = obstacles.geometry().gap_window(o.pos.y);
                        top + (bottom - top) * 0.6
                    })
                    .unwrap_or(state.surface.height() / 2.0);
                let character = &world.character;
                if character.pos.y > target && character.velocity > 0.0 {
                    poll.press();
                } else {
                    poll.release();
                }
            }
        }
    }

    pub fn run() -> Result<(), SetupError> {
        let mut args = std::env::args().skip(1);
        let frames: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(7200);
        let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5eed);
        let map = args.next();

        let surface = Surface::fit_window(480.0)?;
        let mut state = GameState::builtin(surface, SaveData::load(), seed)?;
        if let Some(map) = &map {
            state.select_map(map)?;
        }
        state.load_assets(shipped_sprite)?;
        log::info!("Headless run: {} frames, seed {}", frames, seed);

        let mut poll = InputPoll::new();
        let mut runs = 0u32;
        for frame in 0..frames {
            autopilot(&state, &mut poll);
            let input = poll.take();
            sim::frame(&mut state, &input, f64::from(frame) * NOMINAL_FRAME_MS);

            for event in state.take_events() {
                match event {
                    GameEvent::Died { score } => {
                        runs += 1;
                        log::info!("Run {} over at frame {}: score {}", runs, frame, score);
                    }
                    GameEvent::SaveRequested => state.save.save(),
                    GameEvent::Jumped | GameEvent::Scored { .. } => {}
                    other => log::debug!("{:?}", other),
                }
            }
        }

        log::info!(
            "Finished: {} run(s), highscore {}, {} sprite(s) in the last frame",
            runs,
            state.save.highscore,
            build_draw_list(&state).len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canopy Flap (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
