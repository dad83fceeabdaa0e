//! Deciding when an enclosure's script-F matrix is stale, and the emissivities
//! to rebuild it with.

use crate::{Enclosure, EnclosureSurface, StepContext, SurfaceState};

/// Returns `true` if surface emissivities may have changed since the
/// enclosure's script-F matrix was computed.
///
/// That is the case at the start of an environment period, when any window's
/// interior shade or blind was deployed or retracted, or when movable
/// insulation appeared or disappeared on a surface whose insulation and
/// construction absorptivities differ by more than `insulation_threshold`.
///
/// # Panics
///
/// Panics if `states` has no entry for one of the enclosure's surfaces.
#[must_use]
pub fn enclosure_requires_rebuild(
    enclosure: &Enclosure,
    states: &[SurfaceState],
    step: &StepContext,
    insulation_threshold: f64,
) -> bool {
    step.begin_environment
        || enclosure
            .surfaces()
            .iter()
            .any(|surface| surface_changed(surface, &states[surface.id], insulation_threshold))
}

fn surface_changed(
    surface: &EnclosureSurface,
    state: &SurfaceState,
    insulation_threshold: f64,
) -> bool {
    if surface.window.is_some() {
        return state.window.as_ref().is_some_and(|w| {
            w.shading != w.previous_shading
                && (w.shading.is_interior() || w.previous_shading.is_interior())
        });
    }

    match (surface.insulation_absorptivity, state.insulation) {
        (Some(absorptivity), Some(insulation)) => {
            insulation.present != insulation.previously_present
                && (surface.base_emissivity - absorptivity).abs() > insulation_threshold
        }
        _ => false,
    }
}

/// Returns the emissivity of every enclosure surface for the current state.
///
/// Surfaces start from their construction's inside absorptivity. Windows with
/// an interior shade or blind use the slat-angle blend of shade and glass
/// emissivity, and surfaces covered by movable insulation use the insulation's
/// absorptivity.
///
/// # Panics
///
/// Panics if `states` has no entry for one of the enclosure's surfaces.
#[must_use]
pub fn effective_emissivities(enclosure: &Enclosure, states: &[SurfaceState]) -> Vec<f64> {
    enclosure
        .surfaces()
        .iter()
        .map(|surface| {
            let state = &states[surface.id];
            let mut emissivity = surface.base_emissivity;

            if let Some(window) = state
                .window
                .as_ref()
                .filter(|w| surface.window.is_some() && w.shading.is_interior())
            {
                emissivity = window.shaded_emissivity();
            }

            let insulated = state.insulation.is_some_and(|i| i.present);
            if let (true, Some(absorptivity)) = (insulated, surface.insulation_absorptivity) {
                emissivity = absorptivity;
            }

            emissivity
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        ExchangeConfig, InsulationState, Registry, Shading,
        test_utils::{office_with_insulation, office_with_window, states, window_state},
    };

    const THRESHOLD: f64 = 0.01;

    fn enclosure(building: &crate::Building) -> Enclosure {
        let registry =
            Registry::build(building, &ExchangeConfig::default()).expect("building is valid");
        registry.enclosures()[0].clone()
    }

    fn with_window(shading: Shading, previous_shading: Shading) -> Vec<SurfaceState> {
        let mut states = states(&[20.0; 4]);
        states[2].window = Some(window_state(20.0, shading, previous_shading));
        states
    }

    fn with_insulation(present: bool, previously_present: bool) -> Vec<SurfaceState> {
        let mut states = states(&[20.0; 4]);
        states[0].insulation = Some(InsulationState {
            present,
            previously_present,
        });
        states
    }

    #[test]
    fn begin_environment_always_rebuilds() {
        let enclosure = enclosure(&office_with_window());
        let step = StepContext {
            begin_environment: true,
            ..StepContext::default()
        };

        assert!(enclosure_requires_rebuild(&enclosure, &states(&[20.0; 4]), &step, THRESHOLD));
        assert!(!enclosure_requires_rebuild(
            &enclosure,
            &states(&[20.0; 4]),
            &StepContext::default(),
            THRESHOLD
        ));
    }

    #[test]
    fn interior_shading_changes_rebuild() {
        let enclosure = enclosure(&office_with_window());
        let step = StepContext::default();
        let rebuilds = |shading, previous| {
            let states = with_window(shading, previous);
            enclosure_requires_rebuild(&enclosure, &states, &step, THRESHOLD)
        };

        assert!(rebuilds(Shading::InteriorBlind, Shading::None));
        assert!(rebuilds(Shading::None, Shading::InteriorShade));
        assert!(rebuilds(Shading::Other, Shading::InteriorShade));
        assert!(!rebuilds(Shading::InteriorBlind, Shading::InteriorBlind));
        assert!(!rebuilds(Shading::Other, Shading::None));
    }

    #[test]
    fn insulation_changes_rebuild_only_above_threshold() {
        let step = StepContext::default();

        let rebuilds = |enclosure: &Enclosure, present, previously_present| {
            let states = with_insulation(present, previously_present);
            enclosure_requires_rebuild(enclosure, &states, &step, THRESHOLD)
        };

        let contrasting = enclosure(&office_with_insulation(0.3));
        assert!(rebuilds(&contrasting, true, false));
        assert!(rebuilds(&contrasting, false, true));
        assert!(!rebuilds(&contrasting, true, true));

        let matching = enclosure(&office_with_insulation(0.905));
        assert!(!rebuilds(&matching, true, false));
    }

    #[test]
    fn effective_emissivities_follow_shading_and_insulation() {
        let windowed = enclosure(&office_with_window());
        let blind = with_window(Shading::InteriorBlind, Shading::None);
        let shaded = effective_emissivities(&windowed, &blind);
        assert_relative_eq!(shaded[2], 0.9, epsilon = 1e-12);
        assert_relative_eq!(shaded[0], 0.9);

        let bare = effective_emissivities(&windowed, &with_window(Shading::Other, Shading::None));
        assert_relative_eq!(bare[2], 0.84);

        let insulated = enclosure(&office_with_insulation(0.3));
        let emissivity = effective_emissivities(&insulated, &with_insulation(true, false));
        assert_eq!(emissivity, vec![0.3, 0.9, 0.9, 0.9]);

        let removed = effective_emissivities(&insulated, &with_insulation(false, true));
        assert_eq!(removed, vec![0.9; 4]);
    }
}
