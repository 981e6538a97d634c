//! Entry point for vpaw.
//! Logging, window chrome, the default haptic probe in a fresh scene, then
//! an optional patient file listing.

use anyhow::Result;
use corelib::Scene;
use vpaw::{config::AppConfig, patient, probe, resources, shell::WindowChrome};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let chrome = WindowChrome::vpaw();
    log::info!("Starting {} (show_scene={})", chrome.title, config.show_scene);
    chrome.log_summary();

    let mut scene = Scene::new();

    // Optional asset: a failed load is logged inside and never stops startup.
    let outcome = probe::load_default_probe(resources::lookup(resources::PROBE_MESH), &mut scene);
    log::debug!("Haptic probe outcome: {:?}", outcome);

    if config.show_scene {
        vpaw::log_scene(&scene);
    }

    if let Some(data_dir) = &config.data_dir {
        let files = patient::find_and_sort_files_with_prefix(data_dir, config.patient.as_deref())?;
        for file in &files {
            log::info!("  {}", file.display());
        }
    }

    log::info!("Startup complete. Bye!");
    Ok(())
}
