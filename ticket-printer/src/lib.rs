//! # ticket-printer
//!
//! ESC/POS encoding and delivery for weigh-station tickets.
//!
//! ## Scope
//!
//! - ESC/POS command table and builder
//! - Single-byte code page encoding (CP850 / Windows-1252)
//! - Logo rasterization to `GS v 0` blocks
//! - The fixed ticket ("boleta") layout
//! - Network (TCP 9100) and spooler printing, multi-copy jobs
//!
//! Encoders are pure; transports only ever receive finished buffers.
//!
//! ## Example
//!
//! ```ignore
//! use ticket_printer::{
//!     DEFAULT_COPY_PAUSE, LogoSource, PrinterConfig, TicketEncoder, TicketFields, print_copies,
//! };
//!
//! let fields = TicketFields {
//!     producto: "MAIZ".into(),
//!     boleta: "123".into(),
//!     ..Default::default()
//! };
//! let logo = LogoSource::from_bytes(std::fs::read("logo_escpos.bin")?)?.resolve(384)?;
//! let data = TicketEncoder::new().build(&fields, logo.as_ref());
//!
//! let printer = PrinterConfig::network("192.168.1.100", 9100).build()?;
//! print_copies(&printer, &data, 2, DEFAULT_COPY_PAUSE).await?;
//! ```

mod config;
mod encoding;
mod error;
mod escpos;
mod job;
mod logo;
mod printer;
mod raster;
mod ticket;

// Re-exports
pub use config::{ConnectionType, PrinterConfig};
pub use encoding::{Charset, REPLACEMENT};
pub use error::{PrintError, PrintResult};
pub use escpos::{Command, EscPosBuilder, pad_label};
pub use job::{COPIES_RANGE, DEFAULT_COPY_PAUSE, print_copies};
pub use logo::LogoSource;
pub use printer::{AnyPrinter, DEFAULT_PORT, DEFAULT_TIMEOUT, NetworkPrinter, Printer, SpoolerPrinter};
pub use raster::{
    DEFAULT_MAX_WIDTH, HEADER_LEN, INK_THRESHOLD, RASTER_OPCODE, RasterBlock, encode as encode_raster,
    encode_bytes as encode_raster_bytes, encode_dynamic as encode_raster_dynamic, to_gray,
};
pub use ticket::{LABEL_WIDTH, TICKET_WIDTH, TicketEncoder, TicketFields, build_ticket};
