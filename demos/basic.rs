//! Basic usage example

use configurator::{build_catalog, Configure};

#[derive(Debug, Default, Configure)]
struct Config {
    // Key derived from the field name: HOST / --host
    #[config(tag = "env,flag,default=127.0.0.1")]
    pub host: String,

    // Explicit env key
    #[config(tag = "env=SERVICE_PORT,default=8080")]
    pub port: u16,

    // Boolean aliases such as `1`, `t` and `TRUE` are accepted
    #[config(tag = "env,default=false")]
    pub debug: bool,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("SERVICE_PORT", "3000");

    let mut config = Config::default();
    let mut catalog = build_catalog(&mut config)?;

    for field in catalog.iter_mut() {
        let raw = std::env::var(field.env_key())
            .ok()
            .unwrap_or_else(|| field.default_value().to_string());
        field.coerce(&raw)?;
    }
    drop(catalog);

    println!("Configuration loaded:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Debug: {}", config.debug);

    Ok(())
}
