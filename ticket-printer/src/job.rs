//! Multi-copy print jobs

use std::ops::RangeInclusive;
use std::time::Duration;

use tracing::{error, info, instrument};

use crate::error::{PrintError, PrintResult};
use crate::printer::Printer;

/// Accepted number of copies per job
pub const COPIES_RANGE: RangeInclusive<u32> = 1..=100;

/// Pause between consecutive copies
pub const DEFAULT_COPY_PAUSE: Duration = Duration::from_millis(500);

/// Send `data` to `printer` `copies` times, pausing between copies
///
/// Stops at the first failed copy and reports its 1-based number.
#[instrument(skip(printer, data), fields(dest = %printer.describe(), data_len = data.len()))]
pub async fn print_copies<P: Printer>(
    printer: &P,
    data: &[u8],
    copies: u32,
    pause: Duration,
) -> PrintResult<()> {
    if !COPIES_RANGE.contains(&copies) {
        return Err(PrintError::InvalidConfig(format!(
            "copies must be between {} and {}, got {}",
            COPIES_RANGE.start(),
            COPIES_RANGE.end(),
            copies
        )));
    }

    for copy in 1..=copies {
        if let Err(e) = printer.print(data).await {
            error!(copy, error = %e, "Copy failed");
            return Err(PrintError::CopyFailed {
                copy,
                source: Box::new(e),
            });
        }
        if copy < copies {
            tokio::time::sleep(pause).await;
        }
    }

    info!(copies, "Print job complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records payloads; fails on the configured call
    struct RecordingPrinter {
        calls: Mutex<Vec<Vec<u8>>>,
        fail_on: Option<usize>,
    }

    impl RecordingPrinter {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Printer for RecordingPrinter {
        async fn print(&self, data: &[u8]) -> PrintResult<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(data.to_vec());
            if Some(calls.len()) == self.fail_on {
                return Err(PrintError::Connection("refused".to_string()));
            }
            Ok(())
        }

        async fn is_online(&self) -> bool {
            true
        }

        fn describe(&self) -> String {
            "recording".to_string()
        }
    }

    const PAUSE: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_sends_each_copy() {
        let printer = RecordingPrinter::new(None);
        print_copies(&printer, b"ticket", 3, PAUSE).await.unwrap();

        assert_eq!(printer.count(), 3);
        assert!(printer.calls.lock().unwrap().iter().all(|c| c == b"ticket"));
    }

    #[tokio::test]
    async fn test_copies_out_of_range() {
        let printer = RecordingPrinter::new(None);
        for copies in [0, 101] {
            assert!(matches!(
                print_copies(&printer, b"x", copies, PAUSE).await,
                Err(PrintError::InvalidConfig(_))
            ));
        }
        assert_eq!(printer.count(), 0);
    }

    #[tokio::test]
    async fn test_stops_at_failed_copy() {
        let printer = RecordingPrinter::new(Some(2));
        let err = print_copies(&printer, b"x", 5, PAUSE).await.unwrap_err();

        assert!(matches!(err, PrintError::CopyFailed { copy: 2, .. }));
        assert_eq!(err.to_string(), "Copy 2 failed: Connection failed: refused");
        assert_eq!(printer.count(), 2);
    }

    #[tokio::test]
    async fn test_pause_between_copies_only() {
        let printer = RecordingPrinter::new(None);
        let pause = Duration::from_millis(40);

        let start = std::time::Instant::now();
        print_copies(&printer, b"x", 1, pause).await.unwrap();
        assert!(start.elapsed() < pause);

        let start = std::time::Instant::now();
        print_copies(&printer, b"x", 3, pause).await.unwrap();
        assert!(start.elapsed() >= pause * 2);
    }
}
