use crate::colormap;
use crate::config::{METERS_TO_MM, T_INIT};
use crate::controls::TimeListener;
use crate::gpu::{OrbitCamera, SurfaceSample};
use crate::simulation::{wave_function, FieldStats, PondGrid, WaveParams};

/// Owns the static grid and the CPU side of the plot.
///
/// Every time change recomputes the whole field and re-colours the surface;
/// nothing carries over between redraws except the camera.
pub struct Viewer {
    grid: PondGrid,
    params: WaveParams,
    time: f64,
    samples: Vec<SurfaceSample>,
    stats_mm: FieldStats,
    dirty: bool,
    pub camera: OrbitCamera,
}

impl Viewer {
    pub fn new(grid: PondGrid, params: WaveParams) -> Self {
        let mut viewer = Self {
            samples: vec![SurfaceSample::default(); grid.len()],
            grid,
            params,
            time: T_INIT,
            stats_mm: FieldStats { min: 0.0, max: 0.0 },
            dirty: true,
            camera: OrbitCamera::default(),
        };
        viewer.redraw(T_INIT);
        viewer
    }

    pub fn grid(&self) -> &PondGrid {
        &self.grid
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }

    /// Height range of the current field (mm)
    pub fn stats_mm(&self) -> FieldStats {
        self.stats_mm
    }

    pub fn title(&self) -> String {
        format!("Wave Propagation from Droplet Impact (Time = {:.2} s)", self.time)
    }

    /// Returns true once after each redraw, when the samples need uploading
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn redraw(&mut self, t: f64) {
        let field_mm = wave_function(&self.grid, &self.params, t) * METERS_TO_MM;
        let stats = FieldStats::of(&field_mm);
        let (lo, hi) = (stats.min as f32, stats.max as f32);

        self.samples.clear();
        self.samples.extend(field_mm.iter().map(|&h| {
            let height_mm = h as f32;
            SurfaceSample {
                height_mm,
                color: colormap::viridis_linear(colormap::normalize(height_mm, lo, hi)),
            }
        }));

        self.time = t;
        self.stats_mm = stats;
        self.dirty = true;
    }
}

impl TimeListener for Viewer {
    fn on_time_changed(&mut self, t: f64) {
        self.redraw(t);
    }
}
