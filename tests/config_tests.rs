#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pyenv_menu::config::{DEFAULT_HELP_URL, DEFAULT_SHELL, DEFAULT_TOOL};
    use pyenv_menu::{Config, Error};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    // Test defaults when nothing is configured
    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tool, DEFAULT_TOOL);
        assert_eq!(config.shell, PathBuf::from(DEFAULT_SHELL));
        assert_eq!(config.help_url, DEFAULT_HELP_URL);
        assert!(config.init_hooks.is_empty());
        assert!(config.log_file.is_none());
    }

    // Test loading a full config file
    #[test]
    fn test_config_from_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        let toml_content = r#"
tool = "/usr/local/bin/pyenv"
shell = "/bin/zsh"
init_hooks = ['eval "$(/opt/homebrew/bin/brew shellenv)"']
log_file = "/tmp/pyenv-menu.log"
"#;
        write!(temp_file, "{toml_content}")?;

        let config = Config::from_file(temp_file.path())?;
        assert_eq!(config.tool, "/usr/local/bin/pyenv");
        assert_eq!(config.shell, PathBuf::from("/bin/zsh"));
        assert_eq!(
            config.init_hooks,
            vec![r#"eval "$(/opt/homebrew/bin/brew shellenv)""#.to_string()]
        );
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pyenv-menu.log"));

        // Unset keys keep their defaults
        assert_eq!(config.help_url, DEFAULT_HELP_URL);
        Ok(())
    }

    // Test that an empty file is a valid config
    #[test]
    fn test_empty_config() -> Result<()> {
        let config = Config::from_toml("")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    // Test parse and read errors
    #[test]
    fn test_config_errors() -> Result<()> {
        assert!(Config::from_toml("unknown_key = 1").is_err());
        assert!(Config::from_toml("tool = 42").is_err());

        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "tool = [")?;
        assert!(matches!(
            Config::from_file(temp_file.path()),
            Err(Error::ConfigParse { .. })
        ));

        assert!(matches!(
            Config::load(Some("/nonexistent/pyenv-menu.toml".as_ref())),
            Err(Error::ConfigRead { .. })
        ));
        Ok(())
    }
}
