use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub geojson: PathBuf,
    #[serde(default = "default_name_property")]
    pub name_property: String, // Property holding the unique region name
}

fn default_name_property() -> String {
    "adm1_name".to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            static_dir: PathBuf::from("../frontend"),
        }
    }
}

/// Viewport defaults used when the map is reset or fitted to a region.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub center: [f64; 2], // [lat, lon]
    pub zoom: u8,
    pub fit_padding: u32,
    pub fit_max_zoom: u8,
    pub animation_secs: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [-0.0236, 37.9062],
            zoom: 6,
            fit_padding: 20,
            fit_max_zoom: 8,
            animation_secs: 0.5,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input]\ngeojson = \"counties.geojson\"").unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input.geojson, PathBuf::from("counties.geojson"));
        assert_eq!(config.input.name_property, "adm1_name");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.map, MapConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\ngeojson = \"a.json\"\nname_property = \"NAME\"\n\n[server]\nport = 8080\n\n[map]\nzoom = 7"
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input.name_property, "NAME");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, PathBuf::from("../frontend"));
        assert_eq!(config.map.zoom, 7);
        assert_eq!(config.map.fit_max_zoom, 8);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load_from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
