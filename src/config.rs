/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Defaults mirror the original hardware cadence: a 35 ms animation frame
/// (30 ms scroll pulse + 5 ms settle) and an oracle period short enough for
/// ~60–70 collision checks per frame.

use serde::Deserialize;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub input: InputConfig,
    /// Fixed RNG seed for reproducible sessions; absent = seed from clock.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Control-loop frame period (one scroll tick + one animation phase).
    pub frame_ms: u64,
    /// Collision oracle period, independent of the frame period.
    pub oracle_period_us: u64,
}

#[derive(Clone, Debug)]
pub struct InputConfig {
    /// Axis below this = stick up (jump). 10-bit ADC range.
    pub up_threshold: u16,
    /// Axis above this = stick down (duck).
    pub down_threshold: u16,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_oracle_period_us")]
    oracle_period_us: u64,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_up_threshold")]
    up_threshold: u16,
    #[serde(default = "default_down_threshold")]
    down_threshold: u16,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    seed: Option<u64>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 35 }
fn default_oracle_period_us() -> u64 { 500 }
fn default_up_threshold() -> u16 { 300 }
fn default_down_threshold() -> u16 { 650 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            oracle_period_us: default_oracle_period_us(),
        }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput {
            up_threshold: default_up_threshold(),
            down_threshold: default_down_threshold(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    pub fn load() -> Self {
        let toml_cfg = read_config_file().unwrap_or_default();
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                frame_ms: t.timing.frame_ms.max(1),
                oracle_period_us: t.timing.oracle_period_us.max(1),
            },
            input: InputConfig {
                up_threshold: t.input.up_threshold,
                down_threshold: t.input.down_threshold.max(t.input.up_threshold),
            },
            seed: t.general.seed,
        }
    }
}

fn read_config_file() -> Option<TomlConfig> {
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join("config.toml"));
        }
    }
    candidates.push(std::path::PathBuf::from("config.toml"));

    for path in candidates {
        if let Ok(text) = std::fs::read_to_string(&path) {
            match toml::from_str(&text) {
                Ok(cfg) => return Some(cfg),
                Err(e) => {
                    eprintln!("config.toml ignored ({e})");
                    return None;
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hardware_cadence() {
        let cfg = GameConfig::from_toml(TomlConfig::default());
        assert_eq!(cfg.timing.frame_ms, 35);
        assert_eq!(cfg.timing.oracle_period_us, 500);
        assert_eq!(cfg.input.up_threshold, 300);
        assert_eq!(cfg.input.down_threshold, 650);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let t: TomlConfig = toml::from_str(
            "[timing]\nframe_ms = 20\n\n[general]\nseed = 99\n",
        )
        .expect("parse");
        let cfg = GameConfig::from_toml(t);
        assert_eq!(cfg.timing.frame_ms, 20);
        assert_eq!(cfg.timing.oracle_period_us, 500);
        assert_eq!(cfg.seed, Some(99));
    }

    #[test]
    fn thresholds_never_invert() {
        let t: TomlConfig =
            toml::from_str("[input]\nup_threshold = 800\ndown_threshold = 100\n").expect("parse");
        let cfg = GameConfig::from_toml(t);
        assert!(cfg.input.down_threshold >= cfg.input.up_threshold);
    }
}
