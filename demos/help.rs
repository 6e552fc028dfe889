//! Render a help table and a JSON dump from the catalog

use configurator::{build_catalog, Configure};

#[derive(Debug, Default, Configure)]
struct Tls {
    #[config(tag = "env,flag")]
    pub cert_file: String,

    #[config(tag = "env,flag")]
    pub key_file: String,
}

#[derive(Debug, Default, Configure)]
struct Config {
    #[config(tag = "env=LISTEN_ADDR,flag=listen,default=0.0.0.0:443")]
    pub listen: String,

    #[config(tag = "env,flag,default=4")]
    pub workers: usize,

    pub tls: Option<Tls>,
}

fn main() -> anyhow::Result<()> {
    let mut config = Config::default();
    let catalog = build_catalog(&mut config)?;

    println!("{:<20} {:<20} {:<12} DEFAULT", "FLAG", "ENV", "TYPE");
    for field in &catalog {
        let flag = match field.flag_key() {
            key if key.is_empty() => String::new(),
            key => format!("--{key}"),
        };
        println!(
            "{:<20} {:<20} {:<12} {}",
            flag,
            field.env_key(),
            field.declared_type().to_string(),
            field.default_value()
        );
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&catalog.summary())?);

    Ok(())
}
