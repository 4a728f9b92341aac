//! Configuration management commands.

use std::path::Path;

use console::style;

use crate::config::{Settings, CONFIG_FILENAME};

/// Print the effective settings.
pub fn cmd_config_show(settings: &Settings) -> anyhow::Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}

/// Write a config file with default settings.
pub fn cmd_config_init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| Path::new(CONFIG_FILENAME));
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Settings::default().to_toml()?)?;

    eprintln!("{} Wrote {}", style("✓").green(), path.display());
    eprintln!(
        "  {} Set OPENAI_API_KEY or LLM_API_KEY in the environment or .env",
        style("→").dim()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jobsift.toml");

        cmd_config_init(Some(&path), false).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let settings = Settings::from_toml(&written).unwrap();
        assert_eq!(settings.jobs, Settings::default().jobs);

        assert!(cmd_config_init(Some(&path), false).is_err());
        assert!(cmd_config_init(Some(&path), true).is_ok());
    }
}
