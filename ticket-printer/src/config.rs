//! Printer connection settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PrintError, PrintResult};
use crate::printer::{AnyPrinter, DEFAULT_PORT, DEFAULT_TIMEOUT, NetworkPrinter, SpoolerPrinter};

/// How the printer is attached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Raw TCP
    #[default]
    Network,
    /// Local queue through the OS spooler
    Usb,
}

impl std::str::FromStr for ConnectionType {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "network" | "tcp" => Ok(Self::Network),
            "usb" | "spooler" => Ok(Self::Usb),
            other => Err(PrintError::InvalidConfig(format!(
                "unknown connection type: {}",
                other
            ))),
        }
    }
}

/// Printer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    pub connection_type: ConnectionType,
    /// Host or IP (network only)
    pub ip: Option<String>,
    /// TCP port (network only)
    pub port: u16,
    /// Connect and send timeout in seconds (network only)
    pub timeout: u64,
    /// Queue name (usb only)
    pub printer_name: Option<String>,
}

impl PrinterConfig {
    pub fn network(ip: impl Into<String>, port: u16) -> Self {
        Self {
            connection_type: ConnectionType::Network,
            ip: Some(ip.into()),
            port,
            ..Self::default()
        }
    }

    pub fn usb(printer_name: impl Into<String>) -> Self {
        Self {
            connection_type: ConnectionType::Usb,
            printer_name: Some(printer_name.into()),
            ..Self::default()
        }
    }

    /// Build the transport, checking that the fields it needs are present
    pub fn build(&self) -> PrintResult<AnyPrinter> {
        match self.connection_type {
            ConnectionType::Network => {
                let ip = non_empty(self.ip.as_deref()).ok_or_else(|| {
                    PrintError::InvalidConfig("'ip' is required for network printers".to_string())
                })?;
                let printer = NetworkPrinter::new(ip, self.port)?
                    .with_timeout(Duration::from_secs(self.timeout.max(1)));
                Ok(printer.into())
            }
            ConnectionType::Usb => {
                let name = non_empty(self.printer_name.as_deref()).ok_or_else(|| {
                    PrintError::InvalidConfig(
                        "'printer_name' is required for USB printers".to_string(),
                    )
                })?;
                Ok(SpoolerPrinter::new(name)?.into())
            }
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            connection_type: ConnectionType::Network,
            ip: None,
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT.as_secs(),
            printer_name: None,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::Printer;

    #[test]
    fn test_defaults() {
        let config = PrinterConfig::default();
        assert_eq!(config.connection_type, ConnectionType::Network);
        assert_eq!(config.port, 9100);
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_network_requires_ip() {
        let err = PrinterConfig::default().build().unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));

        let printer = PrinterConfig::network("10.0.0.7", 9100).build().unwrap();
        assert_eq!(printer.describe(), "10.0.0.7:9100");
    }

    #[test]
    fn test_usb_requires_name() {
        let config = PrinterConfig {
            connection_type: ConnectionType::Usb,
            printer_name: Some("   ".to_string()),
            ..PrinterConfig::default()
        };
        assert!(config.build().is_err());

        let printer = PrinterConfig::usb("EPSON_TM").build().unwrap();
        assert!(matches!(printer, AnyPrinter::Spooler(_)));
    }

    #[test]
    fn test_deserialize() {
        let config: PrinterConfig =
            serde_json::from_str(r#"{"connection_type":"usb","printer_name":"TM-T88"}"#).unwrap();
        assert_eq!(config.connection_type, ConnectionType::Usb);
        assert_eq!(config.port, 9100);
        assert_eq!(config.printer_name.as_deref(), Some("TM-T88"));
    }

    #[test]
    fn test_connection_type_from_str() {
        assert_eq!("USB".parse::<ConnectionType>().unwrap(), ConnectionType::Usb);
        assert_eq!(
            "network".parse::<ConnectionType>().unwrap(),
            ConnectionType::Network
        );
        assert!("bluetooth".parse::<ConnectionType>().is_err());
    }
}
