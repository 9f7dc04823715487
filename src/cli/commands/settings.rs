//! Configuration command.

use std::path::Path;

use crate::config::{self, Config};

/// Print the effective configuration, optionally writing it out
pub fn cmd_config(config: &Config, explicit_path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => config::config_path(),
    };

    match &path {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not created, using defaults)", path.display()),
        None => println!("# Config file: unavailable on this platform"),
    }
    println!();
    print!("{}", toml::to_string_pretty(config)?);

    if init {
        let written = match explicit_path {
            Some(path) => {
                config::save_to(config, path)?;
                path.to_path_buf()
            }
            None => config::save(config)?,
        };
        println!();
        println!("✓ Wrote {}", written.display());
    }

    Ok(())
}
