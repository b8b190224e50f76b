//! Registration parameters passed by the host on the command line.
//!
//! The host launches the plugin as
//!
//! ```text
//! spinclock-plugin -port 28196 -pluginUUID <uuid> -registerEvent registerPlugin -info '{...}'
//! ```
//!
//! Flags may come in any order and each takes exactly one value. `-info`
//! is a JSON blob describing the host application and attached devices;
//! it is optional and only used for logging.

use serde::Deserialize;

/// Errors that can occur while reading the launch arguments.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required flag was not supplied.
    #[error("missing required flag {flag}")]
    Missing {
        /// The absent flag.
        flag: &'static str,
    },

    /// A flag was given without a value.
    #[error("flag {flag} requires a value")]
    MissingValue {
        /// The flag missing its value.
        flag: String,
    },

    /// An unrecognized flag was supplied.
    #[error("unknown flag {flag}")]
    UnknownFlag {
        /// The unrecognized flag.
        flag: String,
    },

    /// `-port` is not a valid TCP port.
    #[error("invalid port {value:?}: {reason}")]
    InvalidPort {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// `-info` is not valid JSON of the expected shape.
    #[error("invalid -info payload: {source}")]
    Info {
        /// The underlying parse error.
        #[from]
        source: serde_json::Error,
    },
}

/// Everything needed to connect and register with the host.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Local port the host's WebSocket server listens on.
    pub port: u16,
    /// Identifier to register under.
    pub plugin_uuid: String,
    /// Event name for the registration message.
    pub register_event: String,
    /// Host and device description, when supplied.
    pub info: Option<RegistrationInfo>,
}

/// Host description from `-info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInfo {
    /// The host application.
    #[serde(default)]
    pub application: ApplicationInfo,
    /// This plugin as the host knows it.
    #[serde(default)]
    pub plugin: PluginInfo,
    /// Attached devices.
    #[serde(default)]
    pub devices: Vec<DeviceInfo>,
}

/// Host application details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    /// Host application version.
    #[serde(default)]
    pub version: String,
    /// Operating system (`mac` or `windows`).
    #[serde(default)]
    pub platform: String,
    /// UI language.
    #[serde(default)]
    pub language: Option<String>,
}

/// Plugin details as registered with the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluginInfo {
    /// Plugin identifier from the manifest.
    #[serde(default)]
    pub uuid: String,
    /// Plugin version from the manifest.
    #[serde(default)]
    pub version: String,
}

/// One attached device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceInfo {
    /// Device identifier.
    #[serde(default)]
    pub id: String,
    /// Human-readable device name.
    #[serde(default)]
    pub name: Option<String>,
    /// Key grid dimensions.
    #[serde(default)]
    pub size: Option<DeviceSize>,
}

/// Key grid dimensions of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceSize {
    /// Number of key columns.
    pub columns: u16,
    /// Number of key rows.
    pub rows: u16,
}

impl PluginConfig {
    /// Parse launch arguments, excluding the program name.
    ///
    /// Required flags:
    /// - `-port` -- host WebSocket port
    /// - `-pluginUUID` -- registration identifier
    /// - `-registerEvent` -- registration event name
    ///
    /// Optional flags:
    /// - `-info` -- JSON host description
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut port = None;
        let mut plugin_uuid = None;
        let mut register_event = None;
        let mut info = None;

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let value = args
                .next()
                .ok_or_else(|| ConfigError::MissingValue { flag: flag.clone() })?;
            match flag.as_str() {
                "-port" => port = Some(parse_port(&value)?),
                "-pluginUUID" => plugin_uuid = Some(value),
                "-registerEvent" => register_event = Some(value),
                "-info" => info = Some(serde_json::from_str::<RegistrationInfo>(&value)?),
                _ => return Err(ConfigError::UnknownFlag { flag }),
            }
        }

        Ok(Self {
            port: port.ok_or(ConfigError::Missing { flag: "-port" })?,
            plugin_uuid: plugin_uuid.ok_or(ConfigError::Missing {
                flag: "-pluginUUID",
            })?,
            register_event: register_event.ok_or(ConfigError::Missing {
                flag: "-registerEvent",
            })?,
            info,
        })
    }

    /// WebSocket URL of the host.
    pub fn socket_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port: u16 = value.parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::InvalidPort {
            value: value.to_owned(),
            reason: e.to_string(),
        }
    })?;
    if port == 0 {
        return Err(ConfigError::InvalidPort {
            value: value.to_owned(),
            reason: "port must be non-zero".to_owned(),
        });
    }
    Ok(port)
}
