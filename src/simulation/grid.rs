use ndarray::{Array1, Array2, Zip};
use crate::config::{GRID_POINTS, POND_RADIUS};

/// Square sampling grid over the pond, centred on the impact point.
///
/// Built once at startup and never modified. The 2D arrays follow meshgrid
/// "xy" indexing: shape is `(ny, nx)`, `xx[[j, i]] == x[i]`, `yy[[j, i]] == y[j]`.
pub struct PondGrid {
    /// Horizontal extent in meters (half-width of the grid)
    pub radius: f64,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub xx: Array2<f64>,
    pub yy: Array2<f64>,
    /// Radial distance from the impact point at every sample
    pub r: Array2<f64>,
}

impl PondGrid {
    /// Create a `points` x `points` grid spanning [-radius, radius] on both axes
    pub fn new(radius: f64, points: usize) -> Self {
        let x = Array1::linspace(-radius, radius, points);
        let y = Array1::linspace(-radius, radius, points);

        let xx = Array2::from_shape_fn((points, points), |(_, i)| x[i]);
        let yy = Array2::from_shape_fn((points, points), |(j, _)| y[j]);
        let r = Zip::from(&xx).and(&yy).map_collect(|&px, &py| px.hypot(py));

        Self { radius, x, y, xx, yy, r }
    }

    /// Create a grid with default dimensions
    pub fn new_default() -> Self {
        Self::new(POND_RADIUS, GRID_POINTS)
    }

    /// Samples per axis
    pub fn points(&self) -> usize {
        self.x.len()
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.r.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = PondGrid::new(500.0, 300);
        assert_eq!(grid.points(), 300);
        assert_eq!(grid.len(), 90_000);
        assert_eq!(grid.r.dim(), (300, 300));
    }

    #[test]
    fn test_axes_span_radius() {
        let grid = PondGrid::new(500.0, 301);
        assert_eq!(grid.x[0], -500.0);
        assert!((grid.x[300] - 500.0).abs() < 1e-9);
        assert_eq!(grid.y[0], -500.0);
        assert!((grid.y[300] - 500.0).abs() < 1e-9);
        // Odd sample count puts a sample on the impact point
        assert!(grid.r[[150, 150]].abs() < 1e-9);
    }

    #[test]
    fn test_meshgrid_indexing() {
        let grid = PondGrid::new(10.0, 5);
        for j in 0..5 {
            for i in 0..5 {
                assert_eq!(grid.xx[[j, i]], grid.x[i]);
                assert_eq!(grid.yy[[j, i]], grid.y[j]);
            }
        }
    }

    #[test]
    fn test_radius_is_symmetric() {
        let grid = PondGrid::new(500.0, 300);
        let n = grid.points();
        let corner = grid.r[[0, 0]];
        assert!((corner - 500.0 * 2f64.sqrt()).abs() < 1e-9);
        for r in [grid.r[[0, n - 1]], grid.r[[n - 1, 0]], grid.r[[n - 1, n - 1]]] {
            assert!((r - corner).abs() < 1e-9);
        }
    }
}
