//! Command-line configuration.

use std::path::PathBuf;

/// Startup options. Absent flags keep the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Log every scene node once startup finishes.
    pub show_scene: bool,
    /// Directory scanned for patient files.
    pub data_dir: Option<PathBuf>,
    /// Patient file-name prefix, e.g. `1000_`.
    pub patient: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// Accepts `--show-scene[=on|off]`, `--data-dir=<dir>` and
    /// `--patient=<prefix>`; anything else is ignored with a warning.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == "--show-scene" {
                config.show_scene = true;
            } else if let Some(val) = arg.strip_prefix("--show-scene=") {
                config.show_scene = parse_switch(val);
            } else if let Some(val) = arg.strip_prefix("--data-dir=") {
                config.data_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--patient=") {
                config.patient = Some(val.to_string());
            } else {
                log::warn!("Ignoring unknown argument '{}'", arg);
            }
        }
        config
    }
}

fn parse_switch(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
