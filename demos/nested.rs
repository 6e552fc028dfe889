//! Nested, embedded and optional structs

use std::time::Duration;

use chrono::{DateTime, Utc};
use configurator::{build_catalog, Configure};

#[derive(Debug, Default, Configure)]
struct Common {
    #[config(tag = "env,flag,default=info")]
    pub log_level: String,
}

#[derive(Debug, Default, Configure)]
struct Database {
    #[config(tag = "env,flag")]
    pub url: String,

    #[config(tag = "env,flag,default=30s")]
    pub connect_timeout: Duration,

    #[config(tag = "env")]
    pub max_conns: Option<u32>,
}

#[derive(Debug, Default, Configure)]
struct Config {
    // Flattened: LOG_LEVEL, not COMMON_LOG_LEVEL
    #[config(embed)]
    pub common: Common,

    // DATABASE_URL, DATABASE_CONNECT_TIMEOUT, ...
    pub database: Database,

    // Allocated while cataloging: CACHE_URL, CACHE_CONNECT_TIMEOUT, ...
    pub cache: Option<Box<Database>>,

    #[config(tag = "env=DEPLOYED_AT")]
    pub deployed_at: Option<DateTime<Utc>>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("DATABASE_URL", "postgres://localhost/app");
    std::env::set_var("DATABASE_MAX_CONNS", "0x40");
    std::env::set_var("CACHE_CONNECT_TIMEOUT", "1m 30s");
    std::env::set_var("DEPLOYED_AT", "2024-06-01T09:00:00+02:00");

    let mut config = Config::default();
    let mut catalog = build_catalog(&mut config)?;

    for field in catalog.iter_mut() {
        let key = field.env_key();
        let raw = match std::env::var(&key) {
            Ok(value) => value,
            Err(_) if field.directives().has_default() => field.default_value().to_string(),
            Err(_) => continue,
        };
        println!("  {key} <- {raw}");
        field.coerce(&raw)?;
    }
    drop(catalog);

    println!("{config:#?}");

    Ok(())
}
