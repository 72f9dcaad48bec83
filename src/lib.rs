// ==================== Imports ====================
use wasm_bindgen::prelude::*;

#[macro_use]
pub mod browser;
pub mod app;
pub mod config;
pub mod engine;
pub mod game;
pub mod geometry;
pub mod level;
pub mod object;
pub mod state;
pub mod timer;
pub mod ui;

#[cfg(test)]
mod testing;

use engine::GameLoop;
use game::Moonlander;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - loads config and levels, then runs the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Moonlander::new()).await {
            error!("[main] Could not start the game : {:#?}", err);
        }
    });

    Ok(())
}
