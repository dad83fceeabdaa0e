//! Shared fixtures for enclosure unit tests.
//!
//! The reference zone is a square-ish room of four walls with areas 10, 10,
//! 20, and 20 m² facing north, east, south, and west.

use uom::si::{
    angle::degree,
    area::square_meter,
    f64::{Angle, Area, ThermodynamicTemperature},
    thermodynamic_temperature::degree_celsius,
};

use crate::{
    Building, Construction, ConstructionKind, MovableInsulation, Shading, SlatTable, Surface,
    SurfaceClass, SurfaceState, WindowKind, WindowState, Zone,
};

pub(crate) const OPAQUE: usize = 0;
pub(crate) const WINDOW: usize = 1;

pub(crate) fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

pub(crate) fn constructions() -> Vec<Construction> {
    vec![
        Construction {
            name: "Gypsum".into(),
            inside_absorptivity: 0.9,
            ir_transparent: false,
            kind: ConstructionKind::Opaque,
        },
        Construction {
            name: "Double Pane".into(),
            inside_absorptivity: 0.84,
            ir_transparent: false,
            kind: ConstructionKind::Window(WindowKind::Standard),
        },
    ]
}

pub(crate) fn surface(
    name: &str,
    class: SurfaceClass,
    zone: usize,
    area: f64,
    azimuth: f64,
) -> Surface {
    let tilt = match class {
        SurfaceClass::Floor => 180.0,
        SurfaceClass::Ceiling | SurfaceClass::Roof => 0.0,
        _ => 90.0,
    };
    Surface {
        name: name.to_owned(),
        class,
        zone,
        area: Area::new::<square_meter>(area),
        azimuth: Angle::new::<degree>(azimuth),
        tilt: Angle::new::<degree>(tilt),
        construction: OPAQUE,
        heat_transfer: true,
        movable_insulation: None,
    }
}

/// The four walls of the reference zone, with names prefixed by `prefix`.
pub(crate) fn four_walls(prefix: &str, zone: usize) -> Vec<Surface> {
    [("North", 10.0, 0.0), ("East", 10.0, 90.0), ("South", 20.0, 180.0), ("West", 20.0, 270.0)]
        .into_iter()
        .map(|(name, area, azimuth)| {
            surface(&format!("{prefix}{name}"), SurfaceClass::Wall, zone, area, azimuth)
        })
        .collect()
}

/// One zone holding the reference walls.
pub(crate) fn office() -> Building {
    Building {
        zones: vec![Zone {
            name: "Office".into(),
            surfaces: 0..4,
        }],
        surfaces: four_walls("", 0),
        constructions: constructions(),
        user_view_factors: Vec::new(),
    }
}

/// The reference zone with its south wall swapped for a standard window.
pub(crate) fn office_with_window() -> Building {
    let mut building = office();
    let south = &mut building.surfaces[2];
    south.class = SurfaceClass::Window;
    south.construction = WINDOW;
    building
}

/// Two copies of the reference zone, "Office" then "Lobby".
pub(crate) fn two_zones() -> Building {
    let mut surfaces = four_walls("Office ", 0);
    surfaces.extend(four_walls("Lobby ", 1));
    Building {
        zones: vec![
            Zone {
                name: "Office".into(),
                surfaces: 0..4,
            },
            Zone {
                name: "Lobby".into(),
                surfaces: 4..8,
            },
        ],
        surfaces,
        constructions: constructions(),
        user_view_factors: Vec::new(),
    }
}

/// The reference zone with movable insulation on the north wall.
pub(crate) fn office_with_insulation(absorptivity: f64) -> Building {
    let mut building = office();
    building.surfaces[0].movable_insulation = Some(MovableInsulation { absorptivity });
    building
}

/// Opaque states at the given temperatures in °C.
pub(crate) fn states(temperatures: &[f64]) -> Vec<SurfaceState> {
    temperatures
        .iter()
        .map(|&t| SurfaceState::opaque(celsius(t)))
        .collect()
}

/// A standard window state with a blind that blends to 0.9 when deployed.
pub(crate) fn window_state(
    temperature: f64,
    shading: Shading,
    previous_shading: Shading,
) -> WindowState {
    WindowState {
        shading,
        previous_shading,
        slat_angle: Angle::new::<degree>(90.0),
        movable_slats: true,
        shade_emissivity: SlatTable::new(vec![0.5, 0.7, 0.9]),
        glass_emissivity: SlatTable::new(vec![0.1, 0.2, 0.3]),
        glass_temperature: celsius(temperature),
        effective_temperature: celsius(temperature),
        effective_emissivity: 0.84,
    }
}
