//! Headless viewer binary driving the orrery time model.
//!
//! Stands in for the 3D visualization layer: once per frame it polls the
//! frame timer for a simulated-ms delta, advances a toy orbital body with
//! it, pumps the clock's time broadcast, and logs the readout a UI clock
//! would display. Control input is a scripted schedule of rate changes
//! and pause/resume events; bursty rate changes go through the throttle
//! exactly as a UI slider's would.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `cargo run -p orrery-viewer -- --scale 3600 --run-seconds 5`.

mod orbit;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use orrery_config::{CliArgs, Config};
use orrery_log::init_logging;
use orrery_time::{
    MonotonicSource, ScalePreset, SimClock, SimPeriod, Throttle, TimeSource, TimeUnit, convert,
};
use tracing::{info, warn};

use crate::orbit::OrbitalBody;

/// Timer name the frame loop polls, per the consumer contract.
const FRAME_TIMER: &str = "viewer.frame";

/// A scripted control input, standing in for user interaction.
#[derive(Debug, Clone, Copy)]
enum Control {
    /// Rate change request (goes through the throttle, like a slider).
    Rate(f64),
    Pause,
    Resume,
}

/// Build the demo's control schedule as `(frame index, event)` pairs.
///
/// Around the two-second mark a burst of rate changes arrives faster than
/// the throttle window; only the last one may take effect.
fn control_script(frame_rate: u32) -> Vec<(u32, Control)> {
    let at = |secs: u32| secs * frame_rate;
    let mut script = Vec::new();

    // Slider drag: ten rate requests within a few frames.
    for i in 0..10u32 {
        script.push((at(2) + i, Control::Rate(60.0 * f64::from(i + 1))));
    }
    script.push((at(5), Control::Pause));
    script.push((at(6), Control::Resume));
    script.push((at(8), Control::Rate(ScalePreset::Reverse.factor())));
    script
}

fn run(config: &Config) {
    let source = Arc::new(MonotonicSource::new());
    let mut clock = match config.clock.start_time_ms {
        Some(start_ms) => SimClock::with_start_time(source.clone(), start_ms),
        None => SimClock::new(source.clone()),
    };
    clock.set_scale(config.clock.initial_scale);
    clock.set_paused(config.clock.start_paused);
    clock.set_broadcast(config.clock.broadcast_time);
    let (readout_sub, readout_rx) = clock.subscribe_time();

    let mut throttle = Throttle::new(config.viewer.control_throttle_ms);
    let orbit_period_ms = convert(
        config.viewer.orbit_period_hours,
        TimeUnit::Hours,
        TimeUnit::Milliseconds,
    );
    let mut body = OrbitalBody::new(orbit_period_ms);
    let script = control_script(config.viewer.frame_rate);

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config.viewer.frame_rate));
    let total_frames = config.viewer.run_seconds * config.viewer.frame_rate;
    info!(
        scale = clock.scale(),
        frames = total_frames,
        orbit_period_hours = config.viewer.orbit_period_hours,
        "viewer loop starting"
    );

    clock.start_timer(FRAME_TIMER);
    for frame in 0..total_frames {
        std::thread::sleep(frame_duration);
        let now = source.now_ms();

        for (_, control) in script.iter().filter(|(f, _)| *f == frame) {
            match control {
                Control::Rate(scale) => throttle.trigger(now, *scale),
                Control::Pause => clock.set_paused(true),
                Control::Resume => clock.set_paused(false),
            }
        }
        if let Some(scale) = throttle.poll(now) {
            info!(scale, "applying throttled rate change");
            clock.set_scale(scale);
        }

        if let Some(delta) = clock.delta(FRAME_TIMER) {
            body.advance(delta);
        }

        clock.pump();
        for sim_ms in readout_rx.try_iter() {
            info!(
                clock = %SimPeriod::from_millis(sim_ms),
                angle_deg = format!("{:.1}", body.angle_deg()),
                paused = clock.is_paused(),
                "simulation time"
            );
        }
    }

    clock.unsubscribe(readout_sub);
    info!(
        final_time = %SimPeriod::from_millis(clock.time()),
        angle_deg = format!("{:.1}", body.angle_deg()),
        "viewer loop finished"
    );
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("orrery")
    });
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|err| {
        eprintln!("config unavailable ({err}), using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    init_logging(None, cfg!(debug_assertions), Some(&config));
    if config.viewer.frame_rate == 0 {
        warn!("frame_rate 0 is invalid, falling back to 60");
        config.viewer.frame_rate = 60;
    }

    run(&config);
}
