//! Pond Ripple
//!
//! Damped circular waves spreading from a droplet impact at the centre of a
//! pond, shown as a colour-mapped 3D surface with a time slider and a small
//! control panel.

mod app;
mod colormap;
mod config;
mod controls;
mod gpu;
mod simulation;
mod ui;
mod viewer;

use anyhow::Result;
use winit::event_loop::EventLoop;

use app::App;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Pond Ripple");
    log::info!("===========");

    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    app.finish()
}
