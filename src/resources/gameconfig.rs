//! Game configuration resource.
//!
//! Manages simulation and scheduler settings loaded from an INI configuration
//! file. Provides defaults for safe startup and methods to load/save
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fps = 60
//! ticks = 600
//! log_every = 60
//!
//! [scheduler]
//! advance_tweens_without_update = false
//! max_completions_per_tick = 8
//!
//! [viewport]
//! width = 640
//! height = 360
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_FPS: u32 = 60;
const DEFAULT_TICKS: u64 = 600;
const DEFAULT_LOG_EVERY: u64 = 60;
const DEFAULT_ADVANCE_WITHOUT_UPDATE: bool = false;
const DEFAULT_MAX_COMPLETIONS_PER_TICK: u32 = 8;
const DEFAULT_VIEWPORT_WIDTH: u32 = 640;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 360;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Read by [`script_update_system`](crate::systems::script::script_update_system)
/// for its scheduling policy and by the runner for its loop settings.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Simulated frames per second; the tick delta is `1 / fps`.
    pub fps: u32,
    /// Number of ticks the runner simulates.
    pub ticks: u64,
    /// Log a progress line every this many ticks (0 disables it).
    pub log_every: u64,
    /// Advance tweens of entities whose script has no update hook.
    ///
    /// Off by default: such entities stall after their first tween.
    pub advance_tweens_without_update: bool,
    /// Cap on tween completions per entity within one tick.
    pub max_completions_per_tick: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            ticks: DEFAULT_TICKS,
            log_every: DEFAULT_LOG_EVERY,
            advance_tweens_without_update: DEFAULT_ADVANCE_WITHOUT_UPDATE,
            max_completions_per_tick: DEFAULT_MAX_COMPLETIONS_PER_TICK,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Tick delta in seconds.
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [simulation] section
        if let Some(fps) = config.getuint("simulation", "fps").ok().flatten() {
            self.fps = u32::try_from(fps).unwrap_or(u32::MAX).max(1);
        }
        if let Some(ticks) = config.getuint("simulation", "ticks").ok().flatten() {
            self.ticks = ticks;
        }
        if let Some(every) = config.getuint("simulation", "log_every").ok().flatten() {
            self.log_every = every;
        }

        // [scheduler] section
        if let Some(advance) = config
            .getbool("scheduler", "advance_tweens_without_update")
            .ok()
            .flatten()
        {
            self.advance_tweens_without_update = advance;
        }
        if let Some(cap) = config
            .getuint("scheduler", "max_completions_per_tick")
            .ok()
            .flatten()
        {
            self.max_completions_per_tick = u32::try_from(cap).unwrap_or(u32::MAX).max(1);
        }

        // [viewport] section
        if let Some(width) = config.getuint("viewport", "width").ok().flatten() {
            self.viewport_width = u32::try_from(width).unwrap_or(u32::MAX);
        }
        if let Some(height) = config.getuint("viewport", "height").ok().flatten() {
            self.viewport_height = u32::try_from(height).unwrap_or(u32::MAX);
        }

        info!(
            "Loaded config: fps={}, ticks={}, advance_tweens_without_update={}, max_completions_per_tick={}, viewport {}x{}",
            self.fps,
            self.ticks,
            self.advance_tweens_without_update,
            self.max_completions_per_tick,
            self.viewport_width,
            self.viewport_height
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [simulation] section
        config.set("simulation", "fps", Some(self.fps.to_string()));
        config.set("simulation", "ticks", Some(self.ticks.to_string()));
        config.set("simulation", "log_every", Some(self.log_every.to_string()));

        // [scheduler] section
        config.set(
            "scheduler",
            "advance_tweens_without_update",
            Some(self.advance_tweens_without_update.to_string()),
        );
        config.set(
            "scheduler",
            "max_completions_per_tick",
            Some(self.max_completions_per_tick.to_string()),
        );

        // [viewport] section
        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
