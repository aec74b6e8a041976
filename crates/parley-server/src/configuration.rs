use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use parley::agent::Agent;
use parley::agents::{register_echo_tool, DemoAgent, EchoAgent};
use parley::emitter::DEFAULT_CHANNEL_CAPACITY;
use parley::tool::ToolRegistry;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                env_var: to_env_var("server.host"),
                reason: e.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum AgentSettings {
    Demo {
        #[serde(default)]
        delay_ms: u64,
    },
    Echo,
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings::Demo { delay_ms: 0 }
    }
}

impl AgentSettings {
    // Build the agent every request will be served by
    pub fn into_agent(self) -> Arc<dyn Agent> {
        match self {
            AgentSettings::Demo { delay_ms } => {
                Arc::new(DemoAgent::new().with_delay(Duration::from_millis(delay_ms)))
            }
            AgentSettings::Echo => {
                let mut tools = ToolRegistry::new();
                register_echo_tool(&mut tools);
                Arc::new(EchoAgent::new(Arc::new(tools)))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamSettings {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub stream: StreamSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("agent.type", "demo")?
            .set_default("stream.channel_capacity", default_channel_capacity() as u64)?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = match config.try_deserialize() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Unknown agent types surface as "unknown variant `x`, expected ..."
                let error_str = err.to_string();
                return if error_str.contains("unknown variant") {
                    Err(ConfigError::InvalidValue {
                        env_var: to_env_var("agent.type"),
                        reason: error_str,
                    })
                } else {
                    Err(ConfigError::Other(err))
                };
            }
        };

        if settings.stream.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("stream.channel_capacity"),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(settings)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("PARLEY_") {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.agent, AgentSettings::Demo { delay_ms: 0 });
        assert_eq!(settings.stream.channel_capacity, 100);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("PARLEY_SERVER__HOST", "0.0.0.0");
        env::set_var("PARLEY_SERVER__PORT", "8080");
        env::set_var("PARLEY_AGENT__TYPE", "demo");
        env::set_var("PARLEY_AGENT__DELAY_MS", "100");
        env::set_var("PARLEY_STREAM__CHANNEL_CAPACITY", "8");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent, AgentSettings::Demo { delay_ms: 100 });
        assert_eq!(settings.stream.channel_capacity, 8);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_echo_agent() {
        clean_env();
        env::set_var("PARLEY_AGENT__TYPE", "echo");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.agent, AgentSettings::Echo);
        assert_eq!(settings.agent.into_agent().name(), "echo");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_unknown_agent_type() {
        clean_env();
        env::set_var("PARLEY_AGENT__TYPE", "gpt");

        match Settings::new() {
            Err(ConfigError::InvalidValue { env_var, .. }) => {
                assert_eq!(env_var, "PARLEY_AGENT__TYPE")
            }
            other => panic!("Expected invalid agent type, got {:?}", other),
        }

        clean_env();
    }

    #[test]
    #[serial]
    fn test_zero_channel_capacity_is_rejected() {
        clean_env();
        env::set_var("PARLEY_STREAM__CHANNEL_CAPACITY", "0");

        match Settings::new() {
            Err(ConfigError::InvalidValue { env_var, reason }) => {
                assert_eq!(env_var, "PARLEY_STREAM__CHANNEL_CAPACITY");
                assert_eq!(reason, "must be greater than zero");
            }
            other => panic!("Expected invalid capacity, got {:?}", other),
        }

        clean_env();
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");

        let server_settings = ServerSettings {
            host: "not a host".to_string(),
            port: 8000,
        };
        assert!(server_settings.socket_addr().is_err());
    }
}
