//! Furnish - furniture scene editor core
//!
//! Loads furniture assets into a shared scene, resolves pointer picks into a
//! single selection and applies inspector edits (position, material, extend)
//! to every primitive of the selected piece.
//!
//! Usage: `furnish [config.json]`. Without a config the demo room (two chairs,
//! three shelves) is loaded from the working directory.

mod app;
mod assets;
mod config;
mod furniture;
mod registry;
mod render;
mod scene;
mod selection;
mod ui;

use std::path::PathBuf;

fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Err(err) = app::run(config_path.as_deref()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
