//! Command-line arguments
//!
//! Every printer option can also come from the environment (or `.env`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ticket_printer::{
    Charset, ConnectionType, DEFAULT_MAX_WIDTH, DEFAULT_PORT, DEFAULT_TIMEOUT, PrinterConfig,
};

/// Where `convert-logo` writes and where tickets look for a logo
pub const DEFAULT_LOGO_FILE: &str = "logo_escpos.bin";

/// Weigh-station ticket printing utility
#[derive(Parser, Debug)]
#[command(name = "ticket-tool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Also write daily rotating log files here
    #[arg(long, env = "LOG_DIR", global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a logo image into a pre-built raster block file
    ConvertLogo {
        /// PNG/JPEG/WebP image
        input: PathBuf,

        /// Destination .bin file
        #[arg(default_value = DEFAULT_LOGO_FILE)]
        output: PathBuf,

        /// Maximum logo width in dots
        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
        max_width: u32,
    },

    /// Render a ticket to a file instead of printing it
    Render {
        #[command(flatten)]
        ticket: TicketArgs,

        /// Output file for the raw ESC/POS bytes
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Print a ticket
    Print {
        #[command(flatten)]
        ticket: TicketArgs,

        #[command(flatten)]
        printer: PrinterArgs,

        /// Number of copies (1-100)
        #[arg(long, env = "TICKET_COPIES", default_value_t = 1)]
        copies: u32,

        /// Pause between copies in milliseconds
        #[arg(long, default_value_t = 500)]
        copy_pause_ms: u64,
    },
}

/// What goes on the ticket
#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    /// JSON file with the ticket fields ("-" reads stdin)
    #[arg(long, value_name = "FILE")]
    pub fields: PathBuf,

    /// Logo file: pre-built raster block or image; skipped if missing
    #[arg(long, env = "LOGO_PATH", value_name = "FILE", default_value = DEFAULT_LOGO_FILE)]
    pub logo: PathBuf,

    /// Base64 logo, tried before --logo
    #[arg(long, env = "LOGO_BASE64", hide_env_values = true)]
    pub logo_base64: Option<String>,

    /// Maximum width in dots when rasterizing an image logo
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    pub logo_max_width: u32,

    /// Text code page: cp850 or windows1252
    #[arg(long, env = "TICKET_CHARSET", default_value = "cp850", value_parser = parse_charset)]
    pub charset: Charset,

    /// Replace the two title lines
    #[arg(long, num_args = 2, value_names = ["LINE1", "LINE2"])]
    pub title: Option<Vec<String>>,
}

/// Where the ticket goes
#[derive(Args, Debug, Clone)]
pub struct PrinterArgs {
    /// network or usb
    #[arg(long, env = "PRINTER_CONNECTION", default_value = "network")]
    pub connection: ConnectionType,

    /// Printer host or IP (network)
    #[arg(long, env = "PRINTER_IP")]
    pub ip: Option<String>,

    /// Printer TCP port (network)
    #[arg(long, env = "PRINTER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connect and send timeout in seconds (network)
    #[arg(long, env = "PRINTER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Spooler queue name (usb)
    #[arg(long, env = "PRINTER_NAME")]
    pub printer_name: Option<String>,
}

impl From<PrinterArgs> for PrinterConfig {
    fn from(args: PrinterArgs) -> Self {
        Self {
            connection_type: args.connection,
            ip: args.ip,
            port: args.port,
            timeout: args.timeout,
            printer_name: args.printer_name,
        }
    }
}

fn parse_charset(s: &str) -> Result<Charset, String> {
    match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
        "cp850" | "850" => Ok(Charset::Cp850),
        "windows1252" | "cp1252" | "1252" => Ok(Charset::Windows1252),
        other => Err(format!("unsupported charset: {other}")),
    }
}
