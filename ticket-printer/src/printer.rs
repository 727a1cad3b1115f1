//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Spooler printers (USB/local queues, raw job through the OS spooler)

use crate::error::{PrintError, PrintResult};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Default timeout for connecting and for sending a job
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;

    /// Human-readable target, used in logs and responses
    fn describe(&self) -> String;
}

/// Network printer (raw TCP)
///
/// Most thermal printers accept raw jobs on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer; `host` may be an IP or a hostname
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig(
                "network printer requires a host".to_string(),
            ));
        }
        if port == 0 {
            return Err(PrintError::InvalidConfig(format!("Invalid port for {}", host)));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create from an address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        let port: u16 = port
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        Self::new(host, port)
    }

    /// Set the connect and send timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn connect(&self, timeout: Duration) -> PrintResult<TcpStream> {
        tokio::time::timeout(timeout, TcpStream::connect((self.host.as_str(), self.port)))
            .await
            .map_err(|_| {
                PrintError::Timeout(format!("Connection timeout: {}:{}", self.host, self.port))
            })?
            .map_err(|e| PrintError::Connection(format!("{}:{}: {}", self.host, self.port, e)))
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(host = %self.host, port = self.port, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = self.connect(self.timeout).await?;

        info!("Connected, sending {} bytes", data.len());

        let send = async {
            stream.write_all(data).await.map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;
            stream.flush().await?;
            stream.shutdown().await?;
            Ok::<_, PrintError>(())
        };

        tokio::time::timeout(self.timeout, send).await.map_err(|_| {
            PrintError::Timeout(format!("Write timeout: {}:{}", self.host, self.port))
        })??;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(host = %self.host, port = self.port))]
    async fn is_online(&self) -> bool {
        match self.connect(Duration::from_millis(500)).await {
            Ok(_) => {
                info!("Printer online");
                true
            }
            Err(e) => {
                warn!(error = %e, "Printer offline");
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Printer behind the OS spooler
///
/// The job is submitted raw, so the spooler passes ESC/POS bytes through
/// untouched: `lp -o raw` on Unix, datatype `RAW` on Windows.
#[derive(Debug, Clone)]
pub struct SpoolerPrinter {
    name: String,
}

impl SpoolerPrinter {
    /// Create a printer with a specific queue name
    pub fn new(name: &str) -> PrintResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PrintError::InvalidConfig(
                "spooler printer requires a printer name".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Get the printer name
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(not(windows))]
    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        use std::process::Stdio;
        use tokio::process::Command;

        let mut child = Command::new("lp")
            .args(["-d", self.name.as_str(), "-o", "raw"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            // Dropping stdin closes the pipe so lp sees EOF
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let msg = stderr.trim();
        Err(PrintError::Spooler(if msg.is_empty() {
            format!("lp exited with {}", output.status)
        } else {
            msg.to_string()
        }))
    }

    #[cfg(windows)]
    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        // Windows printing is synchronous, run in blocking task
        let name = self.name.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || win32::write_raw(&name, &data))
            .await
            .map_err(|e| PrintError::Spooler(format!("Task join failed: {}", e)))?
    }
}

impl Printer for SpoolerPrinter {
    #[instrument(skip(self, data), fields(printer = %self.name, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        self.submit(data).await?;
        info!("Print job spooled");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        // Queues accept jobs while the device is away; nothing cheaper to probe
        true
    }

    fn describe(&self) -> String {
        format!("USB:{}", self.name)
    }
}

#[cfg(windows)]
mod win32 {
    use crate::error::{PrintError, PrintResult};

    pub(super) fn write_raw(name: &str, data: &[u8]) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
            StartDocPrinterW, StartPagePrinter, WritePrinter,
        };
        use windows::core::{PCWSTR, PWSTR};

        fn to_wide(s: &str) -> Vec<u16> {
            s.encode_utf16().chain(std::iter::once(0)).collect()
        }

        unsafe {
            let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
            let name_w = to_wide(name);

            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                .map_err(|_| PrintError::Spooler(format!("OpenPrinterW failed: {}", name)))?;

            let doc_name_w = to_wide("Ticket");
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartDocPrinter failed".to_string()));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::Spooler("StartPagePrinter failed".to_string()));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle);
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);

            if !ok.as_bool() {
                return Err(PrintError::Spooler("WritePrinter failed".to_string()));
            }

            if written != data.len() as u32 {
                return Err(PrintError::Spooler("Incomplete write".to_string()));
            }

            Ok(())
        }
    }
}

/// Either transport, chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyPrinter {
    Network(NetworkPrinter),
    Spooler(SpoolerPrinter),
}

impl Printer for AnyPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            AnyPrinter::Network(p) => p.print(data).await,
            AnyPrinter::Spooler(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        match self {
            AnyPrinter::Network(p) => p.is_online().await,
            AnyPrinter::Spooler(p) => p.is_online().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyPrinter::Network(p) => p.describe(),
            AnyPrinter::Spooler(p) => p.describe(),
        }
    }
}

impl From<NetworkPrinter> for AnyPrinter {
    fn from(p: NetworkPrinter) -> Self {
        AnyPrinter::Network(p)
    }
}

impl From<SpoolerPrinter> for AnyPrinter {
    fn from(p: SpoolerPrinter) -> Self {
        AnyPrinter::Spooler(p)
    }
}
