//! `dossier doctor`: diagnose configuration and connectivity.

use std::path::Path;

use dossier_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Dossier Doctor: system diagnostics");
    println!("==================================\n");

    let mut issues = 0;

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  1 issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    for (label, path) in [
        ("Profile", &config.persona.profile_path),
        ("Summary", &config.persona.summary_path),
    ] {
        match dossier_knowledge::extract_text(path) {
            Ok(text) => println!("  [ok]   {label} readable ({} chars): {}", text.len(), path.display()),
            Err(e) => {
                println!("  [fail] {label}: {e}");
                issues += 1;
            }
        }
    }

    if config.notifications.has_pushover_credentials() {
        println!("  [ok]   Pushover credentials set");
    } else {
        println!("  [warn] No Pushover credentials; notifications will only be logged");
    }

    match dossier_providers::build_from_config(&config) {
        Ok(provider) => {
            println!("  [ok]   Provider '{}' configured, model {}", provider.name(), config.model);
            match provider.health_check().await {
                Ok(true) => println!("  [ok]   Provider reachable"),
                Ok(false) => {
                    println!("  [fail] Provider rejected the health check (check the API key)");
                    issues += 1;
                }
                Err(e) => {
                    println!("  [fail] Provider unreachable: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  [fail] {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
