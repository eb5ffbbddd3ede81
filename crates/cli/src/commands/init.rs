//! `dossier init`: write a starter config.

use std::path::Path;

use dossier_config::AppConfig;

pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("Dossier: first-time setup");
    println!("=========================\n");

    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force.\n");
        return Ok(());
    }

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Created config at: {}", config_path.display());

    let defaults = AppConfig::default();
    println!("\nNext steps:");
    println!("   1. Put your profile at {}", defaults.persona.profile_path.display());
    println!("      and a short summary at {}", defaults.persona.summary_path.display());
    println!("   2. Set OPENAI_API_KEY (and PUSHOVER_TOKEN / PUSHOVER_USER for notifications)");
    println!("   3. Edit [persona] name in the config");
    println!("   4. Run: dossier chat   or   dossier serve\n");

    Ok(())
}
