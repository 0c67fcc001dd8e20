mod droplet;
mod grid;
mod wave;

pub use droplet::Droplet;
pub use grid::PondGrid;
pub use wave::{wave_function, FieldStats, WaveParams};
