use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_wait_time_secs")]
    pub wait_time_secs: u64,
}

fn default_wait_time_secs() -> u64 {
    30
}

impl SpotifyConfig {
    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            spotify: SpotifyConfig {
                client_id: "your_spotify_client_id".to_string(),
                client_secret: "your_spotify_client_secret".to_string(),
                wait_time_secs: default_wait_time_secs(),
            },
        }
    }
}

/// Load the configuration from `config_path`, then apply the
/// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_WAIT_TIME_SECS`
/// environment overrides.
///
/// A missing file is fine when both credentials come from the environment.
/// Otherwise a template is written to `config_path` and an error returned.
pub fn load_config(config_path: &Path) -> Result<Config, Box<dyn Error>> {
    load_config_with(config_path, |key| env::var(key).ok())
}

pub fn load_config_with(
    config_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, Box<dyn Error>> {
    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(config_path)?;
        toml::from_str(&config_str)?
    } else if lookup("SPOTIFY_CLIENT_ID").is_some() && lookup("SPOTIFY_CLIENT_SECRET").is_some() {
        Config::default()
    } else {
        write_default_config(config_path)?;
        return Err(format!(
            "Configuration file not found. A default '{}' has been created. Please update it with your credentials.",
            config_path.display()
        )
        .into());
    };

    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), Box<dyn Error>> {
    if let Some(client_id) = lookup("SPOTIFY_CLIENT_ID") {
        config.spotify.client_id = client_id;
    }
    if let Some(client_secret) = lookup("SPOTIFY_CLIENT_SECRET") {
        config.spotify.client_secret = client_secret;
    }
    if let Some(wait) = lookup("SPOTIFY_WAIT_TIME_SECS") {
        config.spotify.wait_time_secs = wait
            .parse()
            .map_err(|e| format!("Invalid SPOTIFY_WAIT_TIME_SECS '{wait}': {e}"))?;
    }
    Ok(())
}

fn write_default_config(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let toml_string = toml::to_string_pretty(&Config::default())?;
    let mut file = fs::File::create(config_path)?;
    file.write_all(toml_string.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_file_and_defaults_wait_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[spotify]\nclient_id = \"id\"\nclient_secret = \"secret\"\n",
        )
        .unwrap();

        let config = load_config_with(&path, env_of(&[])).unwrap();
        assert_eq!(config.spotify.client_id, "id");
        assert_eq!(config.spotify.client_secret, "secret");
        assert_eq!(config.spotify.wait_time(), Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[spotify]\nclient_id = \"id\"\nclient_secret = \"secret\"\nwait_time_secs = 5\n",
        )
        .unwrap();

        let config = load_config_with(
            &path,
            env_of(&[("SPOTIFY_CLIENT_SECRET", "env-secret"), ("SPOTIFY_WAIT_TIME_SECS", "2")]),
        )
        .unwrap();
        assert_eq!(config.spotify.client_id, "id");
        assert_eq!(config.spotify.client_secret, "env-secret");
        assert_eq!(config.spotify.wait_time_secs, 2);
    }

    #[test]
    fn environment_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config_with(
            &path,
            env_of(&[("SPOTIFY_CLIENT_ID", "a"), ("SPOTIFY_CLIENT_SECRET", "b")]),
        )
        .unwrap();
        assert_eq!(config.spotify.client_id, "a");
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(load_config_with(&path, env_of(&[])).is_err());
        let written: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, Config::default());
    }

    #[test]
    fn client_built_from_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[spotify]\nclient_id = \"id\"\nclient_secret = \"secret\"\nwait_time_secs = 7\n",
        )
        .unwrap();

        let config = load_config_with(&path, env_of(&[])).unwrap();
        let client = crate::SpotifyClient::from_config(&config.spotify).unwrap();
        assert_eq!(client.wait_time(), Duration::from_secs(7));
    }

    #[test]
    fn bad_wait_time_override_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[spotify]\nclient_id = \"id\"\nclient_secret = \"s\"\n").unwrap();

        assert!(load_config_with(&path, env_of(&[("SPOTIFY_WAIT_TIME_SECS", "soon")])).is_err());
    }
}
