//! Stellar map: orbital layout of the catalog and the pan/zoom view.
//!
//! World coordinates are map pixels at zoom 1 with the Sun at the origin.
//! Orbits are log-scaled so Mercury and Pluto fit on the same screen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use decolagem_core::constants::{MAP_HIT_RADIUS_PX, MAP_MAX_ZOOM, MAP_MIN_ZOOM};

use crate::catalog::Catalog;

/// Golden angle, spreads planets around the Sun without overlap.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

const PLANET_ORBIT_SCALE: f64 = 60.0;
const PLANET_ORBIT_UNIT_KM: f64 = 1.0e7;
const MOON_ORBIT_BASE: f64 = 10.0;
const MOON_ORBIT_SCALE: f64 = 8.0;
const MOON_ORBIT_UNIT_KM: f64 = 1.0e5;

/// A body placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMarker {
    pub name: &'static str,
    pub position: DVec2,
    /// Radius of the orbit ring drawn around the parent.
    pub orbit_radius: f64,
    pub has_water: bool,
}

/// Place every catalog body. Moons are placed after their parent.
pub fn layout(catalog: &Catalog) -> Vec<BodyMarker> {
    let mut markers: Vec<BodyMarker> = Vec::with_capacity(catalog.bodies().len());
    for (index, body) in catalog.bodies().iter().enumerate() {
        let angle = index as f64 * GOLDEN_ANGLE;
        let direction = DVec2::from_angle(angle);
        let (center, radius) = match body.parent {
            None => (
                DVec2::ZERO,
                PLANET_ORBIT_SCALE * (1.0 + body.orbit_km / PLANET_ORBIT_UNIT_KM).ln(),
            ),
            Some(parent) => {
                let center = markers
                    .iter()
                    .find(|m| m.name == parent)
                    .map(|m| m.position)
                    .unwrap_or(DVec2::ZERO);
                (
                    center,
                    MOON_ORBIT_BASE
                        + MOON_ORBIT_SCALE * (1.0 + body.orbit_km / MOON_ORBIT_UNIT_KM).ln(),
                )
            }
        };
        markers.push(BodyMarker {
            name: body.name,
            position: center + direction * radius,
            orbit_radius: radius,
            has_water: body.has_water,
        });
    }
    markers
}

/// Pan and zoom state of the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Screen-space offset applied after zoom.
    pub pan: DVec2,
    pub zoom: f64,
    /// Viewport size in pixels. The Sun sits at its centre when `pan` is zero.
    pub viewport: DVec2,
}

impl MapView {
    pub fn new(viewport: DVec2) -> Self {
        Self {
            pan: DVec2::ZERO,
            zoom: 1.0,
            viewport,
        }
    }

    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        world * self.zoom + self.pan + self.viewport * 0.5
    }

    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        (screen - self.pan - self.viewport * 0.5) / self.zoom
    }

    /// Drag the map by a screen-space delta.
    pub fn drag(&mut self, delta: DVec2) {
        self.pan += delta;
    }

    /// Zoom by `factor`, keeping the world point under `cursor` fixed.
    pub fn zoom_at(&mut self, cursor: DVec2, factor: f64) {
        let anchor = self.screen_to_world(cursor);
        self.zoom = (self.zoom * factor).clamp(MAP_MIN_ZOOM, MAP_MAX_ZOOM);
        self.pan = cursor - self.viewport * 0.5 - anchor * self.zoom;
    }

    pub fn reset(&mut self) {
        self.pan = DVec2::ZERO;
        self.zoom = 1.0;
    }

    /// The marker closest to `screen`, if within the click radius.
    pub fn hit_test<'a>(&self, markers: &'a [BodyMarker], screen: DVec2) -> Option<&'a BodyMarker> {
        markers
            .iter()
            .map(|m| (m, self.world_to_screen(m.position).distance(screen)))
            .filter(|(_, d)| *d <= MAP_HIT_RADIUS_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }
}
