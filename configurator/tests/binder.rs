//! A minimal env/default binder built on the catalog, run against the real
//! process environment.

use std::collections::HashMap;
use std::env;

use configurator::{build_catalog, Bindable, Configure, Error};
use serial_test::serial;

#[derive(Debug, Default, Configure)]
struct Limits {
    #[config(tag = "env,default=64")]
    pub burst: u16,

    #[config(tag = "env")]
    pub rate: Option<f64>,
}

#[derive(Debug, Default, Configure)]
struct ProxyConfig {
    #[config(tag = "env=PROXY_LISTEN,flag=listen,default=127.0.0.1:3128")]
    pub listen: String,

    #[config(tag = "env,flag,default=false")]
    pub debug: bool,

    pub limits: Option<Limits>,
}

/// Env var, else flag, else default. Fields with no value are left alone.
fn bind<T: Bindable>(
    config: &mut T,
    flags: &HashMap<&str, &str>,
) -> Result<(), Error> {
    let mut catalog = build_catalog(config)?;
    for field in catalog.iter_mut() {
        let env_key = field.env_key();
        let flag_key = field.flag_key();

        let raw = if !env_key.is_empty() && env::var(&env_key).is_ok() {
            env::var(&env_key).ok()
        } else if let Some(value) = flags.get(flag_key.as_str()).filter(|_| !flag_key.is_empty()) {
            Some(value.to_string())
        } else if field.directives().has_default() {
            Some(field.default_value().to_string())
        } else {
            None
        };

        if let Some(raw) = raw {
            field.coerce(&raw)?;
        }
    }
    Ok(())
}

fn clear() {
    for key in ["PROXY_LISTEN", "DEBUG", "LIMITS_BURST", "LIMITS_RATE"] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_only() {
    clear();

    let mut config = ProxyConfig::default();
    bind(&mut config, &HashMap::new()).unwrap();

    assert_eq!(config.listen, "127.0.0.1:3128");
    assert!(!config.debug);
    let limits = config.limits.unwrap();
    assert_eq!(limits.burst, 64);
    assert_eq!(limits.rate, None);
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clear();
    env::set_var("PROXY_LISTEN", "0.0.0.0:8080");
    env::set_var("DEBUG", "T");
    env::set_var("LIMITS_RATE", "12.5");

    let mut config = ProxyConfig::default();
    bind(&mut config, &HashMap::new()).unwrap();

    assert_eq!(config.listen, "0.0.0.0:8080");
    assert!(config.debug);
    assert_eq!(config.limits.as_ref().and_then(|l| l.rate), Some(12.5));

    clear();
}

#[test]
#[serial]
fn test_flags_between_env_and_defaults() {
    clear();
    env::set_var("PROXY_LISTEN", "10.0.0.1:80");

    let flags = HashMap::from([("listen", "ignored:1"), ("debug", "1")]);
    let mut config = ProxyConfig::default();
    bind(&mut config, &flags).unwrap();

    assert_eq!(config.listen, "10.0.0.1:80");
    assert!(config.debug);

    clear();
}

#[test]
#[serial]
fn test_bad_env_value_surfaces_parse_error() {
    clear();
    env::set_var("LIMITS_BURST", "lots");

    let mut config = ProxyConfig::default();
    let err = bind(&mut config, &HashMap::new()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));

    clear();
}
