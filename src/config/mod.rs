use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::geo::{DEFAULT_BBOX_OFFSET, DEFAULT_EMBED_BASE, DEFAULT_EMBED_LAYER};
use crate::loader::DataSource;
use crate::map::{DEFAULT_TARGET, OSM_ATTRIBUTION, OSM_TILE_URL};
use crate::search::DEFAULT_SUGGESTIONS;

pub const PROJECT_CONFIG_DIR: &str = ".dishmap";
pub const DEFAULT_DATA_SOURCE: &str = "restaurants.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data: DataSource,
    pub theme: String,
    pub suggestions: Vec<String>,
    pub map: MapConfig,
    pub embed: EmbedConfig,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub target: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedConfig {
    pub base_url: String,
    pub layer: String,
    pub offset: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: 4,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBED_BASE.to_string(),
            layer: DEFAULT_EMBED_LAYER.to_string(),
            offset: DEFAULT_BBOX_OFFSET,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataSource::parse(DEFAULT_DATA_SOURCE),
            theme: "dark".to_string(),
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            map: MapConfig::default(),
            embed: EmbedConfig::default(),
            log_file: PathBuf::from("./dishmap.log"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub data: Option<String>,
    pub theme: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub log_file: Option<PathBuf>,
    pub map: Option<PartialMapConfig>,
    pub embed: Option<PartialEmbedConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialMapConfig {
    pub target: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub zoom: Option<u8>,
    pub tile_url: Option<String>,
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialEmbedConfig {
    pub base_url: Option<String>,
    pub layer: Option<String>,
    pub offset: Option<f64>,
}

/// Values that can be given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data: Option<String>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve the full configuration. Config files that exist but cannot be used are
    /// skipped and returned as warnings, since logging is not installed yet.
    pub fn from_cli(cli: CliOverrides) -> Result<(Self, Vec<ConfigWarning>)> {
        let project_root = std::env::current_dir().context("resolve current dir")?;
        let mut warnings = Vec::new();
        let project_cfg = load_project_config(&project_root, &mut warnings);
        let file_cfg = load_file_config(&mut warnings);
        let env = EnvOverrides {
            data: std::env::var("DISHMAP_DATA").ok(),
            theme: std::env::var("DISHMAP_THEME").ok(),
        };
        Ok((Self::merge(cli, env, project_cfg, file_cfg), warnings))
    }

    /// Priority: CLI > env > project config > user config > defaults.
    pub fn merge(
        cli: CliOverrides,
        env: EnvOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
    ) -> Self {
        let defaults = AppConfig::default();

        let data = cli
            .data
            .or(env.data)
            .or(project_cfg.data)
            .or(file_cfg.data)
            .map(|s| DataSource::parse(&s))
            .unwrap_or(defaults.data);

        let theme = cli
            .theme
            .or(env.theme)
            .or(project_cfg.theme)
            .or(file_cfg.theme)
            .unwrap_or(defaults.theme);

        let suggestions = project_cfg
            .suggestions
            .or(file_cfg.suggestions)
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.suggestions);

        let log_file = cli
            .log_file
            .or(project_cfg.log_file)
            .or(file_cfg.log_file)
            .unwrap_or(defaults.log_file);

        let map = {
            let p = project_cfg.map.unwrap_or_default();
            let f = file_cfg.map.unwrap_or_default();
            let d = defaults.map;
            MapConfig {
                target: p.target.or(f.target).unwrap_or(d.target),
                center_lat: p.center_lat.or(f.center_lat).unwrap_or(d.center_lat),
                center_lon: p.center_lon.or(f.center_lon).unwrap_or(d.center_lon),
                zoom: p.zoom.or(f.zoom).unwrap_or(d.zoom),
                tile_url: p.tile_url.or(f.tile_url).unwrap_or(d.tile_url),
                attribution: p.attribution.or(f.attribution).unwrap_or(d.attribution),
            }
        };

        let embed = {
            let p = project_cfg.embed.unwrap_or_default();
            let f = file_cfg.embed.unwrap_or_default();
            let d = defaults.embed;
            EmbedConfig {
                base_url: p.base_url.or(f.base_url).unwrap_or(d.base_url),
                layer: p.layer.or(f.layer).unwrap_or(d.layer),
                offset: p.offset.or(f.offset).unwrap_or(d.offset),
            }
        };

        Self {
            data,
            theme,
            suggestions,
            map,
            embed,
            log_file,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub data: Option<String>,
    pub theme: Option<String>,
}

/// A config file that was found but ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub path: PathBuf,
    pub error: String,
}

impl ConfigWarning {
    fn new(path: &Path, error: impl fmt::Display) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }

    pub fn log(&self) {
        warn!(path = %self.path.display(), error = %self.error, "config file ignored");
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ignored config file {}: {}", self.path.display(), self.error)
    }
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    toml::from_str::<FileConfig>(&s).context("parse config")
}

/// First usable user config: $DISHMAP_CONFIG, then the XDG / platform config dir.
pub fn load_file_config(warnings: &mut Vec<ConfigWarning>) -> FileConfig {
    use std::env;

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("DISHMAP_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("dishmap/config.toml"));
        } else if let Some(dir) = dirs::config_dir() {
            v.push(dir.join("dishmap/config.toml"));
        }
        v
    }

    for p in candidate_paths() {
        if !p.exists() {
            continue;
        }
        match read_config(&p) {
            Ok(cfg) => {
                info!(path=%p.display(), "loaded config file");
                return cfg;
            }
            Err(e) => warnings.push(ConfigWarning::new(&p, format!("{e:#}"))),
        }
    }
    FileConfig::default()
}

/// Load project-specific configuration from .dishmap/config.toml
pub fn load_project_config(project_root: &Path, warnings: &mut Vec<ConfigWarning>) -> FileConfig {
    let project_config_path = project_root.join(PROJECT_CONFIG_DIR).join("config.toml");

    if !project_config_path.exists() {
        return FileConfig::default();
    }
    match read_config(&project_config_path) {
        Ok(cfg) => {
            info!(path=%project_config_path.display(), "loaded project config file");
            cfg
        }
        Err(e) => {
            warnings.push(ConfigWarning::new(&project_config_path, format!("{e:#}")));
            FileConfig::default()
        }
    }
}
