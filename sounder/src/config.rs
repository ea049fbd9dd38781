use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Limits and step sizes for the sound. Frequencies are in Hz and gains in decibels relative to
/// full scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoundConfig {
    pub starting_frequency_hz: f32,
    pub frequency_delta_hz: f32,
    pub min_frequency_hz: f32,
    pub max_frequency_hz: f32,
    pub initial_gain_db: f32,
    pub gain_delta_db: f32,
    pub min_gain_db: f32,
    pub max_gain_db: f32,
    pub target_latency_s: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            starting_frequency_hz: 400.0,
            frequency_delta_hz: 20.0,
            min_frequency_hz: 20.0,
            max_frequency_hz: 4000.0,
            initial_gain_db: -20.0,
            gain_delta_db: 0.5,
            min_gain_db: -60.0,
            max_gain_db: 0.0,
            target_latency_s: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width_px: u32,
    pub height_px: u32,
    pub info_line_count: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sounder".to_string(),
            width_px: 640,
            height_px: 480,
            info_line_count: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SounderConfig {
    pub sound: SoundConfig,
    pub window: WindowConfig,
    /// Number of messages kept in the info area.
    pub info_area_capacity: usize,
}

impl Default for SounderConfig {
    fn default() -> Self {
        Self {
            sound: SoundConfig::default(),
            window: WindowConfig::default(),
            info_area_capacity: 256,
        }
    }
}

fn check_finite(name: &str, value: f32) -> anyhow::Result<()> {
    if !value.is_finite() {
        bail!("{} must be a finite number (got {})", name, value);
    }
    Ok(())
}

impl SoundConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("starting_frequency_hz", self.starting_frequency_hz),
            ("frequency_delta_hz", self.frequency_delta_hz),
            ("min_frequency_hz", self.min_frequency_hz),
            ("max_frequency_hz", self.max_frequency_hz),
            ("initial_gain_db", self.initial_gain_db),
            ("gain_delta_db", self.gain_delta_db),
            ("min_gain_db", self.min_gain_db),
            ("max_gain_db", self.max_gain_db),
            ("target_latency_s", self.target_latency_s),
        ] {
            check_finite(name, value)?;
        }
        if self.min_frequency_hz <= 0.0 {
            bail!("min_frequency_hz must be positive");
        }
        if self.min_frequency_hz > self.max_frequency_hz {
            bail!(
                "min_frequency_hz ({}) is above max_frequency_hz ({})",
                self.min_frequency_hz,
                self.max_frequency_hz
            );
        }
        if !(self.min_frequency_hz..=self.max_frequency_hz)
            .contains(&self.starting_frequency_hz)
        {
            bail!(
                "starting_frequency_hz ({}) is outside {}..={}",
                self.starting_frequency_hz,
                self.min_frequency_hz,
                self.max_frequency_hz
            );
        }
        if self.min_gain_db > self.max_gain_db {
            bail!(
                "min_gain_db ({}) is above max_gain_db ({})",
                self.min_gain_db,
                self.max_gain_db
            );
        }
        if !(self.min_gain_db..=self.max_gain_db).contains(&self.initial_gain_db) {
            bail!(
                "initial_gain_db ({}) is outside {}..={}",
                self.initial_gain_db,
                self.min_gain_db,
                self.max_gain_db
            );
        }
        if self.frequency_delta_hz < 0.0 || self.gain_delta_db < 0.0 {
            bail!("deltas must not be negative");
        }
        if self.target_latency_s <= 0.0 {
            bail!("target_latency_s must be positive");
        }
        Ok(())
    }
}

impl SounderConfig {
    /// Read a json config file. Missing fields take their default values and unknown fields are
    /// an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json_string = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(json_string.as_str())
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.sound.validate()?;
        if self.window.width_px == 0 || self.window.height_px == 0 {
            bail!("window dimensions must be non-zero");
        }
        if self.info_area_capacity == 0 {
            bail!("info_area_capacity must be at least 1");
        }
        Ok(())
    }
}
