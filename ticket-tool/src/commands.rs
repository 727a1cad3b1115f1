//! Subcommand implementations

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use ticket_printer::{
    LogoSource, Printer, PrinterConfig, RasterBlock, TicketEncoder, TicketFields,
    encode_raster_bytes, print_copies,
};

use crate::cli::TicketArgs;

/// Rasterize an image file and write the block next to the tickets
pub fn convert_logo(input: &Path, output: &Path, max_width: u32) -> anyhow::Result<RasterBlock> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let block = encode_raster_bytes(&bytes, max_width)
        .with_context(|| format!("converting {}", input.display()))?;

    fs::write(output, block.to_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        output = %output.display(),
        width = block.width_px(),
        height = block.height(),
        bytes = block.encoded_len(),
        "Logo converted"
    );
    Ok(block)
}

/// Read ticket fields from a JSON file, or stdin for "-"
pub fn load_fields(path: &Path) -> anyhow::Result<TicketFields> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading fields from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&json).context("parsing ticket fields")
}

/// Pick the logo: inline base64 first, then the logo file, else none
///
/// A bad inline logo or a missing file only costs the logo, not the
/// ticket. A logo file that exists but cannot be used is an error.
pub fn resolve_logo(args: &TicketArgs) -> anyhow::Result<Option<RasterBlock>> {
    if let Some(encoded) = args.logo_base64.as_deref().filter(|s| !s.trim().is_empty()) {
        match LogoSource::from_base64(encoded).and_then(|s| s.resolve(args.logo_max_width)) {
            Ok(block) => {
                info!("Logo loaded from inline data");
                return Ok(block);
            }
            Err(e) => warn!(error = %e, "Inline logo unusable, falling back to logo file"),
        }
    }

    let path = args.logo.as_path();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Logo file not found, printing without logo");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let block = LogoSource::from_bytes(bytes)
        .and_then(|s| s.resolve(args.logo_max_width))
        .with_context(|| format!("loading logo {}", path.display()))?;
    info!(path = %path.display(), "Logo loaded from file");
    Ok(block)
}

/// Build the ticket buffer described by `args`
pub fn render_ticket(args: &TicketArgs) -> anyhow::Result<Vec<u8>> {
    let fields = load_fields(&args.fields)?;
    let logo = resolve_logo(args)?;

    let mut encoder = TicketEncoder::new().with_charset(args.charset);
    if let Some([line1, line2]) = args.title.as_deref() {
        encoder = encoder.with_title(line1.as_str(), line2.as_str());
    }

    let data = encoder.build(&fields, logo.as_ref());
    info!(boleta = %fields.boleta, bytes = data.len(), "Ticket rendered");
    Ok(data)
}

/// Render to a file
pub fn render_to_file(args: &TicketArgs, out: &Path) -> anyhow::Result<()> {
    let data = render_ticket(args)?;
    fs::write(out, &data).with_context(|| format!("writing {}", out.display()))?;
    info!(out = %out.display(), "Ticket written");
    Ok(())
}

/// Render and send `copies` copies
pub async fn print_ticket(
    args: &TicketArgs,
    config: &PrinterConfig,
    copies: u32,
    pause: Duration,
) -> anyhow::Result<String> {
    // Config errors surface before any rendering work
    let printer = config.build()?;
    let data = render_ticket(args)?;

    print_copies(&printer, &data, copies, pause).await?;

    let target = printer.describe();
    info!(printer = %target, copies, "Ticket printed");
    Ok(format!(
        "Ticket impreso exitosamente ({} copia(s)) en {}",
        copies, target
    ))
}
