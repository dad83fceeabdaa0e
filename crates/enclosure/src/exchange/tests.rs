use approx::assert_relative_eq;
use hottel_core::radiation::{STEFAN_BOLTZMANN, kelvin_fourth};
use uom::si::{
    f64::{HeatFluxDensity, Power},
    heat_flux_density::watt_per_square_meter,
    power::watt,
};

use crate::{
    BuildError, ExchangeConfig, ExchangeError, Shading, StepContext, SurfaceClass, SurfaceState,
    WindowKind,
    test_utils::{celsius, office, office_with_window, states, two_zones, window_state},
};

use super::{Counters, ExchangeOutput, RadiantExchange, Scope, radiating_state};

fn watts(output: &ExchangeOutput) -> Vec<f64> {
    output.net.iter().map(|p| p.get::<watt>()).collect()
}

fn first_step() -> StepContext {
    StepContext {
        begin_environment: true,
        ..StepContext::default()
    }
}

fn windowed_states(wall: f64, glass: f64, shading: Shading) -> Vec<SurfaceState> {
    let mut states = states(&[wall; 4]);
    states[2].window = Some(window_state(glass, shading, Shading::None));
    states
}

#[test]
fn heat_flows_from_warm_to_cool_walls() {
    let building = office();
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let mut output = ExchangeOutput::new(4);

    let states = states(&[20.0, 20.0, 25.0, 15.0]);

    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");

    let net = watts(&output);
    assert!(net[2] < 0.0, "warm south wall loses heat");
    assert!(net[3] > 0.0, "cool west wall gains heat");
    assert_relative_eq!(net[2], -771.58, max_relative = 1e-2);
    assert_relative_eq!(net[3], 760.72, max_relative = 1e-2);
    assert_relative_eq!(net[0], net[1], epsilon = 1e-9);
    assert_relative_eq!(net.iter().sum::<f64>(), 0.0, epsilon = 1e-6);
}

#[test]
fn uniform_temperature_has_no_net_exchange() {
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let mut output = ExchangeOutput::new(4);

    engine
        .calculate(&office(), &states(&[21.0; 4]), &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");

    for net in watts(&output) {
        assert_relative_eq!(net, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn window_irradiance_matches_a_uniform_enclosure() {
    let building = office_with_window();
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let states = windowed_states(20.0, 20.0, Shading::None);
    let mut output = ExchangeOutput::new(4);

    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");

    let black_body = STEFAN_BOLTZMANN * kelvin_fourth(celsius(20.0));
    assert_relative_eq!(
        output.window_ir[2].get::<watt_per_square_meter>(),
        black_body,
        max_relative = 1e-2
    );
    assert_eq!(output.window_ir[0], HeatFluxDensity::new::<watt_per_square_meter>(0.0));
    assert_relative_eq!(output.net[2].get::<watt>(), 0.0, epsilon = 1e-6);
}

#[test]
fn standard_window_uses_glass_temperature_on_first_iteration() {
    let building = office_with_window();
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let states = windowed_states(20.0, 30.0, Shading::None);
    let mut output = ExchangeOutput::new(4);

    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");
    assert!(output.net[2].get::<watt>() < -1.0, "warm glass loses heat");
    assert_relative_eq!(watts(&output).iter().sum::<f64>(), 0.0, epsilon = 1e-6);

    let later = StepContext {
        iteration: 1,
        ..StepContext::default()
    };
    engine
        .calculate(&building, &states, &later, Scope::All, &mut output)
        .expect("inputs are valid");
    assert_relative_eq!(output.net[2].get::<watt>(), 0.0, epsilon = 1e-6);
}

#[test]
fn repeated_calls_without_changes_are_identical() {
    let building = office();
    let states = states(&[20.0, 20.0, 25.0, 15.0]);
    let mut engine = RadiantExchange::new(ExchangeConfig::default());

    let mut first = ExchangeOutput::new(4);
    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut first)
        .expect("inputs are valid");
    assert_eq!(engine.counters().rebuilds, 1);

    let mut second = ExchangeOutput::new(4);
    engine
        .calculate(&building, &states, &StepContext::default(), Scope::All, &mut second)
        .expect("inputs are valid");

    assert_eq!(first, second);
    assert_eq!(
        engine.counters(),
        Counters {
            full_passes: 2,
            zone_passes: 0,
            rebuilds: 1,
        }
    );
}

#[test]
fn accumulators_are_reset_each_call() {
    let building = office();
    let states = states(&[20.0, 20.0, 25.0, 15.0]);
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let mut output = ExchangeOutput::new(4);

    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");
    let once = output.clone();
    engine
        .calculate(&building, &states, &StepContext::default(), Scope::All, &mut output)
        .expect("inputs are valid");

    assert_eq!(output, once);
}

#[test]
fn deploying_a_blind_rebuilds_on_the_first_iteration_only() {
    let building = office_with_window();
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let mut output = ExchangeOutput::new(4);

    let bare = windowed_states(20.0, 20.0, Shading::None);
    engine
        .calculate(&building, &bare, &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");
    assert_eq!(engine.counters().rebuilds, 1);

    let blind = windowed_states(20.0, 20.0, Shading::InteriorBlind);
    engine
        .calculate(&building, &blind, &StepContext::default(), Scope::All, &mut output)
        .expect("inputs are valid");
    assert_eq!(engine.counters().rebuilds, 2);

    let enclosure = &engine.registry().expect("registry is built").enclosures()[0];
    assert_relative_eq!(enclosure.emissivity()[2], 0.9, epsilon = 1e-12);

    let later = StepContext {
        iteration: 1,
        ..StepContext::default()
    };
    engine
        .calculate(&building, &blind, &later, Scope::All, &mut output)
        .expect("inputs are valid");
    assert_eq!(engine.counters().rebuilds, 2);
}

#[test]
fn single_zone_pass_leaves_other_zones_untouched() {
    let building = two_zones();
    let states = states(&[20.0, 20.0, 25.0, 15.0, 18.0, 22.0, 20.0, 20.0]);
    let mut engine = RadiantExchange::new(ExchangeConfig::default());

    let mut full = ExchangeOutput::new(8);
    engine
        .calculate(&building, &states, &first_step(), Scope::All, &mut full)
        .expect("inputs are valid");

    let sentinel = Power::new::<watt>(123.0);
    let mut partial = ExchangeOutput::new(8);
    partial.net.fill(sentinel);
    engine
        .calculate(&building, &states, &StepContext::default(), Scope::Zone(0), &mut partial)
        .expect("inputs are valid");

    assert_eq!(partial.net[..4], full.net[..4]);
    assert!(partial.net[4..].iter().all(|&p| p == sentinel));

    let mut lobby = ExchangeOutput::new(8);
    engine
        .calculate(&building, &states, &StepContext::default(), Scope::Zone(1), &mut lobby)
        .expect("inputs are valid");
    assert_eq!(lobby.net[4..], full.net[4..]);

    let lobby_net: f64 = watts(&full)[4..].iter().sum();
    assert_relative_eq!(lobby_net, 0.0, epsilon = 1e-6);
    assert_eq!(engine.counters().zone_passes, 2);
}

#[test]
fn kickoff_builds_the_registry_without_calculating() {
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let sentinel = Power::new::<watt>(-5.0);
    let mut output = ExchangeOutput::new(4);
    output.net.fill(sentinel);
    let kickoff = StepContext {
        kickoff: true,
        ..StepContext::default()
    };

    engine
        .calculate(&office(), &states(&[20.0; 4]), &kickoff, Scope::All, &mut output)
        .expect("inputs are valid");

    assert!(engine.registry().is_some());
    assert!(output.net.iter().all(|&p| p == sentinel));
    assert_eq!(engine.counters(), Counters::default());
}

#[test]
fn reset_discards_the_registry() {
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let mut output = ExchangeOutput::new(4);
    engine
        .calculate(&office(), &states(&[20.0; 4]), &first_step(), Scope::All, &mut output)
        .expect("inputs are valid");

    engine.reset();

    assert!(engine.registry().is_none());
    assert_eq!(engine.counters(), Counters::default());
}

#[test]
fn mismatched_inputs_are_rejected() {
    let building = office();
    let mut engine = RadiantExchange::new(ExchangeConfig::default());
    let step = StepContext::default();
    let four = states(&[20.0; 4]);
    let mut output = ExchangeOutput::new(4);

    let result = engine.calculate(&building, &four[..3], &step, Scope::All, &mut output);
    assert!(matches!(
        result,
        Err(ExchangeError::StateCount {
            expected: 4,
            actual: 3
        })
    ));

    let result = engine.calculate(&building, &four, &step, Scope::All, &mut ExchangeOutput::new(5));
    assert!(matches!(
        result,
        Err(ExchangeError::OutputSize {
            expected: 4,
            actual: 5
        })
    ));

    let result = engine.calculate(&building, &four, &step, Scope::Zone(1), &mut output);
    assert!(matches!(
        result,
        Err(ExchangeError::UnknownZone { zone: 1, count: 1 })
    ));
}

#[test]
fn registry_errors_are_reported() {
    let mut building = office();
    building.zones[0].surfaces = 0..9;
    let mut engine = RadiantExchange::new(ExchangeConfig::default());

    let result = engine.calculate(
        &building,
        &states(&[20.0; 4]),
        &first_step(),
        Scope::All,
        &mut ExchangeOutput::new(4),
    );

    assert!(matches!(
        result,
        Err(ExchangeError::Build(BuildError::RangeOutOfBounds { .. }))
    ));
    assert!(engine.registry().is_none());
}

#[test]
fn radiating_state_depends_on_window_model() {
    let mut state = SurfaceState::opaque(celsius(20.0));
    let mut window = window_state(20.0, Shading::None, Shading::None);
    window.glass_temperature = celsius(25.0);
    window.effective_temperature = celsius(30.0);
    window.effective_emissivity = 0.7;
    state.window = Some(window);

    let opaque = radiating_state(None, SurfaceClass::Wall, 0.9, &state, 0);
    assert_eq!(opaque, (celsius(20.0), 0.9));

    let window = |kind| radiating_state(Some(kind), SurfaceClass::Window, 0.84, &state, 0);

    assert_eq!(window(WindowKind::EquivalentLayer), (celsius(30.0), 0.7));

    let (temperature, emissivity) = window(WindowKind::Bsdf);
    assert_eq!(temperature, celsius(30.0));
    assert_relative_eq!(emissivity, 0.6, epsilon = 1e-12);

    assert_eq!(window(WindowKind::Standard), (celsius(25.0), 0.84));

    let diffuser = radiating_state(
        Some(WindowKind::Standard),
        SurfaceClass::TubularDaylightDiffuser,
        0.84,
        &state,
        0,
    );
    assert_eq!(diffuser, (celsius(20.0), 0.84));

    if let Some(window) = state.window.as_mut() {
        window.shading = Shading::InteriorShade;
    }
    let (temperature, emissivity) =
        radiating_state(Some(WindowKind::Standard), SurfaceClass::Window, 0.84, &state, 2);
    assert_eq!(temperature, celsius(30.0));
    assert_relative_eq!(emissivity, 0.9, epsilon = 1e-12);
}
