//! The building geometry and constructions the registry is built from.

use std::ops::Range;

use hottel_solvers::view_factor::SurfaceKind;
use uom::si::{
    area::square_meter,
    f64::{Angle, Area},
};

use crate::UserViewFactors;

/// Zones, surfaces, and constructions of a building.
///
/// Surface ids are positions in [`Building::surfaces`]. Every zone owns a
/// contiguous range of those ids.
#[derive(Debug, Clone, Default)]
pub struct Building {
    pub zones: Vec<Zone>,
    pub surfaces: Vec<Surface>,
    pub constructions: Vec<Construction>,
    pub user_view_factors: Vec<UserViewFactors>,
}

/// A thermal zone and the surface ids it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub surfaces: Range<usize>,
}

/// Surface categories relevant to interior radiant exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    Wall,
    Floor,
    Ceiling,
    Roof,
    InternalMass,
    Window,
    Door,
    TubularDaylightDiffuser,
}

/// Movable insulation that can cover the inside face of an opaque surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovableInsulation {
    /// Thermal absorptivity of the insulation material.
    pub absorptivity: f64,
}

/// One building surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub class: SurfaceClass,
    pub zone: usize,
    pub area: Area,
    pub azimuth: Angle,
    pub tilt: Angle,
    pub construction: usize,

    /// Only heat transfer surfaces take part in radiant exchange.
    pub heat_transfer: bool,

    pub movable_insulation: Option<MovableInsulation>,
}

/// Window model used by a window construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Standard,
    EquivalentLayer,
    Bsdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionKind {
    Opaque,
    Window(WindowKind),
}

/// The inside-face radiative properties of a construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    pub name: String,

    /// Inside thermal absorptivity, used as the base long-wave emissivity.
    pub inside_absorptivity: f64,

    /// Infrared-transparent constructions radiate from both faces.
    pub ir_transparent: bool,

    pub kind: ConstructionKind,
}

impl Construction {
    #[must_use]
    pub fn is_window(&self) -> bool {
        matches!(self.kind, ConstructionKind::Window(_))
    }
}

impl Surface {
    /// Returns the kind used by the view-factor estimator.
    #[must_use]
    pub fn estimate_kind(&self) -> SurfaceKind {
        match self.class {
            SurfaceClass::Floor => SurfaceKind::Floor,
            SurfaceClass::Roof => SurfaceKind::Roof,
            SurfaceClass::Ceiling => SurfaceKind::Ceiling,
            SurfaceClass::InternalMass => SurfaceKind::InternalMass,
            SurfaceClass::Wall
            | SurfaceClass::Window
            | SurfaceClass::Door
            | SurfaceClass::TubularDaylightDiffuser => SurfaceKind::Other,
        }
    }

    /// Returns the radiating area in m², doubled for infrared-transparent constructions.
    #[must_use]
    pub fn radiating_area(&self, construction: &Construction) -> f64 {
        let area = self.area.get::<square_meter>();
        if construction.ir_transparent {
            2.0 * area
        } else {
            area
        }
    }
}

impl Building {
    /// Returns the construction of a surface, if the index is valid.
    #[must_use]
    pub fn construction_of(&self, surface: &Surface) -> Option<&Construction> {
        self.constructions.get(surface.construction)
    }
}
