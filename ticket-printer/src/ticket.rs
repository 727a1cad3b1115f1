//! Weigh ticket ("boleta") layout
//!
//! The section order is fixed; printers in the field are set up for it.

use serde::{Deserialize, Serialize};

use crate::encoding::Charset;
use crate::escpos::EscPosBuilder;
use crate::raster::RasterBlock;

/// Characters per line on 80mm paper
pub const TICKET_WIDTH: usize = 48;

/// Minimum label column width before the colon
pub const LABEL_WIDTH: usize = 9;

/// Line feeds before the cut
const TRAILING_FEED: usize = 5;

const DEFAULT_TITLE: &str = "Aceites y Proteínas";
const DEFAULT_SUBTITLE: &str = "S.A. de C.V.";

/// Values printed on a ticket
///
/// Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFields {
    pub producto: String,
    pub fecha: String,
    pub boleta: String,
    pub cliente: String,
    pub destino: String,
    pub placas: String,
    pub vehiculo: String,
    pub chofer: String,
}

impl TicketFields {
    /// Product/date/ticket-number block
    fn header_rows(&self) -> [(&'static str, &str); 3] {
        [
            ("PRODUCTO", self.producto.as_str()),
            ("FECHA", self.fecha.as_str()),
            ("BOLETA", self.boleta.as_str()),
        ]
    }

    /// Customer/transport block
    fn transport_rows(&self) -> [(&'static str, &str); 5] {
        [
            ("CLIENTE", self.cliente.as_str()),
            ("DESTINO", self.destino.as_str()),
            ("PLACAS", self.placas.as_str()),
            ("VEHICULO", self.vehiculo.as_str()),
            ("CHOFER", self.chofer.as_str()),
        ]
    }
}

/// Renders [`TicketFields`] into a complete ESC/POS buffer
#[derive(Debug, Clone)]
pub struct TicketEncoder {
    title: String,
    subtitle: String,
    charset: Charset,
}

impl TicketEncoder {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            charset: Charset::default(),
        }
    }

    /// Override the two centered title lines
    pub fn with_title(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = title.into();
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Build the ticket
    ///
    /// Starts with ESC @ and ends with a full cut. The logo, when given, is
    /// embedded verbatim above the title.
    pub fn build(&self, fields: &TicketFields, logo: Option<&RasterBlock>) -> Vec<u8> {
        let mut b = EscPosBuilder::with_charset(TICKET_WIDTH, self.charset);

        if let Some(logo) = logo {
            b.center();
            b.raw(&logo.to_bytes());
            b.feed(1);
        }

        // Title
        b.center();
        b.bold();
        b.double_height();
        b.line(&self.title);
        b.normal_size();
        b.line(&self.subtitle);
        b.bold_off();
        b.feed(1);

        b.left();
        b.sep_double();
        for (label, value) in fields.header_rows() {
            b.label_value(label, LABEL_WIDTH, value);
        }
        b.sep_double();
        for (label, value) in fields.transport_rows() {
            b.label_value(label, LABEL_WIDTH, value);
        }
        b.sep_double();

        b.feed(TRAILING_FEED);
        b.cut();

        b.build()
    }
}

impl Default for TicketEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a ticket with the default title and charset
pub fn build_ticket(fields: &TicketFields, logo: Option<&RasterBlock>) -> Vec<u8> {
    TicketEncoder::new().build(fields, logo)
}
