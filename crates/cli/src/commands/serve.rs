//! `dossier serve`: start the web chat widget.

use std::path::Path;

use super::bootstrap;

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = bootstrap::load_config(config_path)?;
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let runtime = bootstrap::build(config)?;

    println!("Dossier: {}", runtime.persona.name);
    println!("   Listening: http://{}:{}/", runtime.config.gateway.host, runtime.config.gateway.port);
    println!("   Notifier:  {}", runtime.notifier_name);

    dossier_gateway::start(&runtime.config.gateway, runtime.conversation, runtime.persona).await?;

    Ok(())
}
