//! TOML configuration for the command-line adapter.

use std::{
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::Path,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use toy_robot_core::{GridSize, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};

const DEFAULT_PORT: u16 = 7878;

/// Largest accepted table width or height; the console redraws every cell.
pub(crate) const MAX_TABLE_DIMENSION: u32 = 100;

/// Settings resolved before the processor is constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RobotConfig {
    /// Table dimensions.
    pub(crate) table: TableConfig,
    /// TCP transport settings.
    pub(crate) server: ServerConfig,
}

/// `[table]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TableConfig {
    /// Number of columns.
    pub(crate) width: u32,
    /// Number of rows.
    pub(crate) height: u32,
}

/// `[server]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerConfig {
    /// Address `serve` listens on.
    pub(crate) bind: SocketAddr,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

impl RobotConfig {
    /// Loads the configuration file when one is given, falling back to
    /// defaults otherwise.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to load config at {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Table dimensions, rejecting empty and oversized tables.
    pub(crate) fn grid(&self) -> Result<GridSize> {
        let TableConfig { width, height } = self.table;
        if width == 0 || height == 0 {
            bail!("table dimensions must be non-zero, got {width}x{height}");
        }
        if width > MAX_TABLE_DIMENSION || height > MAX_TABLE_DIMENSION {
            bail!(
                "table dimensions must not exceed {MAX_TABLE_DIMENSION}, got {width}x{height}"
            );
        }
        Ok(GridSize::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = RobotConfig::load(None).expect("defaults");
        assert_eq!(config, RobotConfig::default());
        assert_eq!(config.grid().expect("grid"), GridSize::new(5, 5));
        assert_eq!(config.server.bind, "127.0.0.1:7878".parse::<SocketAddr>().expect("addr"));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = RobotConfig::from_toml("[table]\nwidth = 8\n").expect("parse");
        assert_eq!(config.grid().expect("grid"), GridSize::new(8, 5));
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[table]\nwidth = 3\nheight = 7\n\n[server]\nbind = \"0.0.0.0:9000\""
        )
        .expect("write config");

        let config = RobotConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.grid().expect("grid"), GridSize::new(3, 7));
        assert_eq!(config.server.bind, "0.0.0.0:9000".parse::<SocketAddr>().expect("addr"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = RobotConfig::from_toml("[table]\ndepth = 2\n").expect_err("unknown key");
        assert!(format!("{error:#}").contains("depth"));
    }

    #[test]
    fn rejects_empty_table() {
        let config = RobotConfig::from_toml("[table]\nwidth = 0\n").expect("parse");
        assert!(config.grid().is_err());
    }

    #[test]
    fn rejects_oversized_table() {
        let config = RobotConfig::from_toml("[table]\nwidth = 100000\nheight = 100000\n")
            .expect("parse");
        let error = config.grid().expect_err("oversized table");
        assert!(error.to_string().contains("must not exceed 100"));

        let largest = RobotConfig::from_toml("[table]\nwidth = 100\nheight = 100\n").expect("parse");
        assert_eq!(largest.grid().expect("grid"), GridSize::new(100, 100));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let error = RobotConfig::load(Some(Path::new("/definitely/not/here.toml")))
            .expect_err("missing file");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
