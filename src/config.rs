//! Configuration loading for GaganNav

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub mission: MissionConfig,
}

/// Network connection settings
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Vehicle link host address (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port number (default: 5760)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Path planning settings
#[derive(Clone, Debug, Deserialize)]
pub struct PlanningConfig {
    /// Flight altitude in meters (default: 5.0)
    #[serde(default = "default_target_altitude")]
    pub target_altitude: f32,

    /// Obstacle inflation margin in meters (default: 5.0)
    #[serde(default = "default_safety_distance")]
    pub safety_distance: f32,

    /// Movement model: 4 or 8 neighbors per cell (default: 8)
    #[serde(default = "default_connectivity")]
    pub connectivity: u8,

    /// Maximum A* expansions before giving up (default: 500000)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Path to the obstacle data file (default: colliders.csv)
    #[serde(default = "default_colliders_path")]
    pub colliders_path: String,
}

/// Mission goal settings
#[derive(Clone, Debug, Deserialize)]
pub struct MissionConfig {
    /// Goal longitude in degrees
    #[serde(default = "default_goal_longitude")]
    pub goal_longitude: f64,

    /// Goal latitude in degrees
    #[serde(default = "default_goal_latitude")]
    pub goal_latitude: f64,

    /// Goal altitude in meters (default: 0.0)
    #[serde(default)]
    pub goal_altitude: f64,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5760
}
fn default_timeout() -> u64 {
    5000
}
fn default_target_altitude() -> f32 {
    5.0
}
fn default_safety_distance() -> f32 {
    5.0
}
fn default_connectivity() -> u8 {
    8
}
fn default_max_iterations() -> usize {
    500_000
}
fn default_colliders_path() -> String {
    "colliders.csv".to_string()
}
fn default_goal_longitude() -> f64 {
    -122.398249
}
fn default_goal_latitude() -> f64 {
    37.796079
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            target_altitude: default_target_altitude(),
            safety_distance: default_safety_distance(),
            connectivity: default_connectivity(),
            max_iterations: default_max_iterations(),
            colliders_path: default_colliders_path(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            goal_longitude: default_goal_longitude(),
            goal_latitude: default_goal_latitude(),
            goal_altitude: 0.0,
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            planning: PlanningConfig::default(),
            mission: MissionConfig::default(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::GaganError::Config(format!("Failed to read config file: {}", e))
        })?;
        let config: NavConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the full address string for connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.connection.host, self.connection.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavConfig::default();
        assert_eq!(config.connection.host, "127.0.0.1");
        assert_eq!(config.connection.port, 5760);
        assert_eq!(config.planning.target_altitude, 5.0);
        assert_eq!(config.planning.safety_distance, 5.0);
        assert_eq!(config.planning.connectivity, 8);
    }

    #[test]
    fn test_partial_toml() {
        let config: NavConfig = toml::from_str(
            r#"
            [connection]
            host = "10.0.0.2"

            [planning]
            target_altitude = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.host, "10.0.0.2");
        assert_eq!(config.connection.port, 5760);
        assert_eq!(config.planning.target_altitude, 12.0);
        assert_eq!(config.planning.safety_distance, 5.0);
    }
}
