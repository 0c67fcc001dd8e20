use crate::config::{DROP_HEIGHT, DROPLET_MASS};

/// The water drop that starts the ripple.
///
/// Informational only: the wave field does not depend on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    pub mass_kg: f64,
    pub drop_height_m: f64,
}

impl Default for Droplet {
    fn default() -> Self {
        Self {
            mass_kg: DROPLET_MASS,
            drop_height_m: DROP_HEIGHT,
        }
    }
}

impl Droplet {
    /// Potential energy released on impact (J)
    pub fn impact_energy(&self, gravity: f64) -> f64 {
        self.mass_kg * gravity * self.drop_height_m
    }
}
