//! Command-line argument parsing for the orrery viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Orrery time-model viewer")]
pub struct CliArgs {
    /// Clock rate: simulated milliseconds per real millisecond.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Simulated start time in milliseconds since the Unix epoch.
    #[arg(long)]
    pub start_time_ms: Option<f64>,

    /// Start with the clock paused.
    #[arg(long)]
    pub paused: Option<bool>,

    /// Broadcast the simulated time once per real second.
    #[arg(long)]
    pub broadcast: Option<bool>,

    /// Target frame rate (Hz).
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// How long the demo loop runs, in real seconds.
    #[arg(long)]
    pub run_seconds: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(scale) = args.scale {
            self.clock.initial_scale = scale;
        }
        if let Some(start) = args.start_time_ms {
            self.clock.start_time_ms = Some(start);
        }
        if let Some(paused) = args.paused {
            self.clock.start_paused = paused;
        }
        if let Some(broadcast) = args.broadcast {
            self.clock.broadcast_time = broadcast;
        }
        if let Some(rate) = args.frame_rate {
            self.viewer.frame_rate = rate;
        }
        if let Some(seconds) = args.run_seconds {
            self.viewer.run_seconds = seconds;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            scale: Some(86_400.0),
            start_time_ms: None,
            paused: Some(true),
            broadcast: None,
            frame_rate: None,
            run_seconds: None,
            log_level: None,
            config: None,
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.clock.initial_scale, 86_400.0);
        assert!(config.clock.start_paused);
        // Non-overridden fields retain defaults
        assert_eq!(config.viewer.frame_rate, 60);
        assert!(config.clock.broadcast_time);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs {
            scale: None,
            start_time_ms: None,
            paused: None,
            broadcast: None,
            frame_rate: None,
            run_seconds: None,
            log_level: None,
            config: None,
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config, original);
    }
}
