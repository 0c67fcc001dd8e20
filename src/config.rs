use std::time::Duration;

// ============================================
// Pond and Wave Parameters
// ============================================

/// Radius of the pond in meters. The grid spans [-POND_RADIUS, POND_RADIUS] on both axes.
pub const POND_RADIUS: f64 = 500.0;

/// Samples per axis (300x300 = 90K surface vertices)
pub const GRID_POINTS: usize = 300;

/// Wave propagation speed (m/s)
pub const WAVE_SPEED: f64 = 1.0;

/// Peak wave height (m)
pub const WAVE_AMPLITUDE: f64 = 0.01;

/// Spatial period of the ripple (m)
pub const WAVE_LENGTH: f64 = 20.0;

// ============================================
// Droplet
// ============================================

/// Mass of the water drop (kg)
pub const DROPLET_MASS: f64 = 0.001;

/// Height the drop falls from (m)
pub const DROP_HEIGHT: f64 = 1.0;

/// Acceleration due to gravity (m/s^2)
pub const GRAVITY: f64 = 9.8;

// ============================================
// Time Controls
// ============================================

/// Initial slider value (s)
pub const T_INIT: f64 = 0.0;

/// Upper end of the time slider (s)
pub const TIME_STEPS: f64 = 200.0;

/// Increment applied by the step buttons (s)
pub const STEP_SIZE: f64 = 1.0;

/// Slider increment between auto-advance frames (s)
pub const AUTO_ADVANCE_STRIDE: f64 = 10.0;

/// Wall-clock pause between auto-advance frames
pub const AUTO_ADVANCE_INTERVAL: Duration = Duration::from_secs(1);

/// Start the auto-advance sequence when the window opens
pub const AUTO_ADVANCE_ON_START: bool = false;

// ============================================
// Rendering
// ============================================

/// Meters to millimeters for the height axis
pub const METERS_TO_MM: f64 = 1000.0;

/// Fixed z-axis limit of the plot (mm), applied symmetrically
pub const Z_LIMIT_MM: f32 = 10.0;

/// Half-height of the plot box in world units (the x/y extent is always [-1, 1])
pub const BOX_HALF_HEIGHT: f32 = 0.6;

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 700;

/// Spacing of the floor grid lines and x/y ticks (m)
pub const TICK_SPACING_M: f64 = 250.0;

/// Spacing of the height ticks (mm)
pub const TICK_SPACING_MM: f32 = 5.0;

// ============================================
// Camera
// ============================================

/// Default elevation, matching matplotlib's 3D axes (degrees)
pub const CAMERA_ELEVATION_DEG: f32 = 30.0;

/// Default azimuth, matching matplotlib's 3D axes (degrees)
pub const CAMERA_AZIMUTH_DEG: f32 = -60.0;

pub const CAMERA_DISTANCE: f32 = 3.6;
pub const CAMERA_FOV_DEG: f32 = 35.0;

/// Radians of rotation per dragged point
pub const CAMERA_DRAG_SPEED: f32 = 0.005;

/// Exponential zoom factor per scrolled point
pub const CAMERA_ZOOM_SPEED: f32 = 0.0015;
