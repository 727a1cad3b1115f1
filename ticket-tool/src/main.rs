//! # ticket-tool
//!
//! Converts logos and prints weigh tickets on ESC/POS thermal printers.
//!
//! ## Usage
//!
//! ```bash
//! # Pre-convert the logo once
//! ticket-tool convert-logo logo.png logo_escpos.bin --max-width 300
//!
//! # Print two copies on a network printer
//! ticket-tool print --fields boleta.json --logo logo_escpos.bin \
//!     --ip 192.168.1.50 --copies 2
//!
//! # Print through a USB queue
//! ticket-tool print --fields boleta.json --connection usb --printer-name TM-T20
//!
//! # Dump the raw bytes instead
//! ticket-tool render --fields boleta.json --out ticket.bin
//! ```

mod cli;
mod commands;
mod logger;

use std::time::Duration;

use clap::Parser;

use cli::{Cli, Commands};
use ticket_printer::PrinterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logger::init_logger(cli.log_level.as_deref(), cli.log_dir.as_deref())?;

    match cli.command {
        Commands::ConvertLogo {
            input,
            output,
            max_width,
        } => {
            let block = commands::convert_logo(&input, &output, max_width)?;
            println!(
                "{}: {}x{} dots, {} bytes",
                output.display(),
                block.width_px(),
                block.height(),
                block.encoded_len()
            );
        }
        Commands::Render { ticket, out } => {
            commands::render_to_file(&ticket, &out)?;
        }
        Commands::Print {
            ticket,
            printer,
            copies,
            copy_pause_ms,
        } => {
            let config = PrinterConfig::from(printer);
            let message = commands::print_ticket(
                &ticket,
                &config,
                copies,
                Duration::from_millis(copy_pause_ms),
            )
            .await
            .inspect_err(|e| tracing::error!("Print failed: {:#}", e))?;
            println!("{}", message);
        }
    }

    Ok(())
}
