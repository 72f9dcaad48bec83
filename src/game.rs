use crate::app::App;
use crate::browser;
use crate::config::{AppConfig, Config};
use crate::engine::audio::{Audio, Silent, WebAudio};
use crate::engine::dialog::WebDialog;
use crate::engine::input::WebInput;
use crate::engine::{Game, Surfaces};
use crate::level::Maps;
use crate::state::Context as GameContext;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;

/// TABLE
/// ┌──────────────────────── Moonlander lifecycle ─────────────────────────┐
/// │                                                                       │
/// │   Loading ──initialize()──► join!(config.json, maps.json)             │
/// │                               │                                       │
/// │                               ├─► size canvases (fit_screen aware)    │
/// │                               ├─► WebAudio or Silent (muted)          │
/// │                               ├─► WebInput on the UI canvas           │
/// │                               └─► App::start() ─► Menu                │
/// │                                                                       │
/// │   Loaded(App) ──update(now)──► resize? ─► tick ─► cursor              │
/// │               ──draw()──────► clear ─► state draw                     │
/// │                                                                       │
/// └───────────────────────────────────────────────────────────────────────┘
pub enum Moonlander {
    Loading,
    Loaded(App),
}

impl Moonlander {
    const CONFIG_PATH: &'static str = "config.json";
    const MAPS_PATH: &'static str = "maps.json";

    pub fn new() -> Self {
        Moonlander::Loading
    }

    async fn load_config() -> Result<Config> {
        browser::fetch_json::<Config>(Self::CONFIG_PATH)
            .await
            .with_context(|| format!("Failed to load config from : {}", Self::CONFIG_PATH))
    }

    async fn load_maps() -> Result<Maps> {
        browser::fetch_json::<Maps>(Self::MAPS_PATH)
            .await
            .with_context(|| format!("Failed to load levels from : {}", Self::MAPS_PATH))
    }

    /// Sizes both canvases, following the window when `fit_screen` is set
    fn fit_canvases(app: &mut AppConfig) -> Result<()> {
        if app.fit_screen {
            let (width, height) = browser::inner_size()?;
            app.width = width;
            app.height = height;
        }
        for id in [browser::html::FOREGROUND_ID, browser::html::UI_ID] {
            browser::resize_canvas(id, app.width, app.height)?;
        }
        Ok(())
    }

    fn follow_window(app: &mut App) -> Result<()> {
        let (width, height) = browser::inner_size()?;
        let context = app.context();
        if width == context.width() && height == context.height() {
            return Ok(());
        }
        app.resize(width, height);
        for id in [browser::html::FOREGROUND_ID, browser::html::UI_ID] {
            browser::resize_canvas(id, width, height)?;
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Game for Moonlander {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Moonlander::Loading => {
                let (config_result, maps_result) = join!(Self::load_config(), Self::load_maps());
                let mut config = config_result.unwrap_or_else(|err| {
                    log!("[game] {:#}, using defaults", err);
                    Config::default()
                });
                let maps = maps_result.unwrap_or_else(|err| {
                    error!("[game] {:#}", err);
                    Maps::default()
                });
                log!("[game] {} levels loaded", maps.len());

                Self::fit_canvases(&mut config.app)?;

                let audio: Box<dyn Audio> = if config.app.muted {
                    Box::new(Silent)
                } else {
                    Box::new(WebAudio::new(&config.app.audio_folder))
                };
                let input = WebInput::new(browser::canvas(browser::html::UI_ID)?);
                let context =
                    GameContext::new(config, maps, audio, Box::new(WebDialog), browser::now()?);

                let mut app = App::new(context, Box::new(input));
                app.start();
                Ok(Box::new(Moonlander::Loaded(app)))
            }
            Moonlander::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, now: f64) {
        if let Moonlander::Loaded(app) = self {
            if app.context().config.app.fit_screen {
                if let Err(err) = Self::follow_window(app) {
                    error!("[game] {:#?}", err);
                }
            }

            app.tick(now);

            if let Some(cursor) = app.take_cursor() {
                if let Err(err) = browser::set_cursor(browser::html::UI_ID, cursor.as_str()) {
                    error!("[game] {:#?}", err);
                }
            }
        }
    }

    fn draw(&self, surfaces: &Surfaces) {
        if let Moonlander::Loaded(app) = self {
            app.draw(surfaces);
        }
    }
}
