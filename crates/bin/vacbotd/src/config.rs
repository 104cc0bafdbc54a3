//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `vacbot.toml` in the working directory, or at the path named by
//! `VACBOT_CONFIG`. Every field has a default so the file is optional, but
//! validation requires at least one admin. Environment variables take
//! precedence over file values.

use std::net::SocketAddr;

use serde::Deserialize;

use vacbot_adapter_miio::MiioConfig;
use vacbot_domain::access::{AdminAllowList, UserId};
use vacbot_domain::error::ValidationError;
use vacbot_domain::geometry::{Point, Rectangle};
use vacbot_domain::zone::{CleaningRegion, Zone};
use vacbot_domain::zone_registry::ZoneRegistry;

const DEFAULT_PATH: &str = "vacbot.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device selection and connection.
    pub device: DeviceConfig,
    /// Who may talk to the bot.
    pub access: AccessConfig,
    /// Cleaning zones offered in the zone menu.
    pub zones: ZonesConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Device selection.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Use the simulator instead of the real device.
    pub simulation: bool,
    /// Live device connection parameters.
    #[serde(flatten)]
    pub link: MiioConfig,
}

/// Admin allow-list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub admins: Vec<AdminConfig>,
}

/// One allow-listed chat identity.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Display name, used in logs only.
    pub name: String,
    pub id: UserId,
}

/// Zone building blocks and the zones composed from them.
///
/// Rooms, doors and areas are declared once by name; zones reference them
/// by name (case-insensitively). Every coordinate is shifted by `offset`.
///
/// A zone's regions reach the device in a fixed order: its rooms first, then
/// its doors, then its areas, each group in the order the zone lists them.
/// The device cleans regions in the order it receives them, so list the
/// rooms of a zone the way the robot should visit them.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ZonesConfig {
    pub offset: Point,
    pub rooms: Vec<RegionConfig>,
    pub doors: Vec<RegionConfig>,
    pub areas: Vec<RegionConfig>,
    pub zones: Vec<ZoneConfig>,
}

/// A named rectangle.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub bottom_left: Point,
    pub top_right: Point,
    /// Cleaning passes; ignored for doors.
    #[serde(default = "default_iterations")]
    pub iterations: u8,
}

/// A zone as a list of references to rooms, doors and areas.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub doors: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
}

fn default_iterations() -> u8 {
    1
}

/// Find a building block by name, ignoring case and surrounding whitespace.
fn resolve<'a>(
    blocks: &'a [RegionConfig],
    kind: &str,
    zone: &str,
    name: &str,
) -> Result<&'a RegionConfig, ConfigError> {
    let wanted = name.trim().to_uppercase();
    blocks
        .iter()
        .find(|block| block.name.trim().to_uppercase() == wanted)
        .ok_or_else(|| ConfigError::Validation(format!("zone {zone:?}: unknown {kind} {name:?}")))
}

/// Parse an environment override, naming the variable on failure.
fn parse_override<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} has unusable value {val:?}")))
}

impl Config {
    /// Load configuration from `vacbot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration does not validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("VACBOT_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("VACBOT_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("VACBOT_PORT") {
            self.server.port = parse_override("VACBOT_PORT", &val)?;
        }
        if let Some(val) = var("VACBOT_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("VACBOT_BIND {val:?} is not host:port"))
            })?;
            self.server.port = parse_override("VACBOT_BIND", port)?;
            self.server.host = host.to_string();
        }
        if let Some(val) = var("VACBOT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("VACBOT_DEVICE_ADDRESS") {
            self.device.link.address = val;
        }
        if let Some(val) = var("VACBOT_DEVICE_TOKEN") {
            self.device.link.token = val;
        }
        if let Some(val) = var("VACBOT_SIMULATION") {
            self.device.simulation = parse_override("VACBOT_SIMULATION", &val)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if !self.device.simulation {
            self.device.socket_addr()?;
            if !self.device.link.has_valid_token() {
                return Err(ConfigError::Validation(
                    "device token must be 32 hex digits".to_string(),
                ));
            }
        }
        self.access.allow_list()?;
        self.zones.build_registry()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DeviceConfig {
    /// Parse the configured device address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the address is not `ip:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.link.address.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "device address {:?} is not a socket address",
                self.link.address
            ))
        })
    }
}

impl AccessConfig {
    /// Build the admin allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoAdmins`] when no admin is configured.
    pub fn allow_list(&self) -> Result<AdminAllowList, ValidationError> {
        AdminAllowList::new(self.admins.iter().map(|admin| admin.id))
    }
}

impl ZonesConfig {
    /// Resolve every zone's references and build the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a reference to an unknown
    /// room, door or area, and [`ConfigError::Invalid`] for degenerate
    /// rectangles, zero iterations, empty or duplicate zones.
    pub fn build_registry(&self) -> Result<ZoneRegistry, ConfigError> {
        let mut builder = ZoneRegistry::builder();
        for zone in &self.zones {
            let mut regions = Vec::new();
            for name in &zone.rooms {
                let room = resolve(&self.rooms, "room", &zone.name, name)?;
                regions.push(CleaningRegion::room(self.rectangle(room)?, room.iterations)?);
            }
            for name in &zone.doors {
                let door = resolve(&self.doors, "door", &zone.name, name)?;
                regions.push(CleaningRegion::door(self.rectangle(door)?));
            }
            for name in &zone.areas {
                let area = resolve(&self.areas, "area", &zone.name, name)?;
                regions.push(CleaningRegion::area(self.rectangle(area)?, area.iterations)?);
            }
            builder = builder.zone(Zone::new(&zone.name, regions)?);
        }
        Ok(builder.build()?)
    }

    fn rectangle(&self, block: &RegionConfig) -> Result<Rectangle, ValidationError> {
        Rectangle::new(
            block.bottom_left.offset_by(self.offset)?,
            block.top_right.offset_by(self.offset)?,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "vacbotd=info,vacbot=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            simulation: true,
            link: MiioConfig::default(),
        }
    }
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            offset: Point::new(0, 0),
            rooms: Vec::new(),
            doors: Vec::new(),
            areas: Vec::new(),
            zones: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A domain value could not be built from the configuration.
    #[error("invalid configuration")]
    Invalid(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
