//! ESC/POS command table and builder
//!
//! Provides the fixed control codes the tickets use and a fluent API for
//! assembling print data.

use crate::encoding::Charset;

/// ESC/POS control codes
///
/// Each variant is a fixed byte sequence; printers parse them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// ESC @ - initialize printer
    Init,
    /// ESC a 0
    AlignLeft,
    /// ESC a 1
    AlignCenter,
    /// ESC a 2
    AlignRight,
    /// ESC E 1
    BoldOn,
    /// ESC E 0
    BoldOff,
    /// ESC - 1
    UnderlineOn,
    /// ESC - 0
    UnderlineOff,
    /// ESC M 1 - font B
    FontSmall,
    /// ESC M 0 - font A
    FontNormal,
    /// LF
    LineFeed,
    /// GS V A 0 - full cut after feeding to the cutter
    CutPaper,
    /// ESC ! 0x10
    DoubleHeight,
    /// ESC ! 0x20
    DoubleWidth,
    /// ESC ! 0x00
    NormalSize,
}

impl Command {
    /// Every command, in declaration order
    pub const ALL: [Command; 15] = [
        Command::Init,
        Command::AlignLeft,
        Command::AlignCenter,
        Command::AlignRight,
        Command::BoldOn,
        Command::BoldOff,
        Command::UnderlineOn,
        Command::UnderlineOff,
        Command::FontSmall,
        Command::FontNormal,
        Command::LineFeed,
        Command::CutPaper,
        Command::DoubleHeight,
        Command::DoubleWidth,
        Command::NormalSize,
    ];

    /// Raw bytes for this command
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Command::Init => &[0x1B, 0x40],
            Command::AlignLeft => &[0x1B, 0x61, 0x00],
            Command::AlignCenter => &[0x1B, 0x61, 0x01],
            Command::AlignRight => &[0x1B, 0x61, 0x02],
            Command::BoldOn => &[0x1B, 0x45, 0x01],
            Command::BoldOff => &[0x1B, 0x45, 0x00],
            Command::UnderlineOn => &[0x1B, 0x2D, 0x01],
            Command::UnderlineOff => &[0x1B, 0x2D, 0x00],
            Command::FontSmall => &[0x1B, 0x4D, 0x01],
            Command::FontNormal => &[0x1B, 0x4D, 0x00],
            Command::LineFeed => &[0x0A],
            Command::CutPaper => &[0x1D, 0x56, 0x41, 0x00],
            Command::DoubleHeight => &[0x1B, 0x21, 0x10],
            Command::DoubleWidth => &[0x1B, 0x21, 0x20],
            Command::NormalSize => &[0x1B, 0x21, 0x00],
        }
    }
}

/// ESC/POS command builder
///
/// Text is encoded with the builder's [`Charset`] as it is appended, so the
/// buffer is ready to send as soon as it is built.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    charset: Charset,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        Self::with_charset(width, Charset::default())
    }

    /// Create a builder that encodes text with `charset`
    pub fn with_charset(width: usize, charset: Charset) -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(Command::Init.bytes());
        Self {
            buf,
            width,
            charset,
        }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Append a control code
    pub fn cmd(&mut self, command: Command) -> &mut Self {
        self.buf.extend_from_slice(command.bytes());
        self
    }

    // === Text Output ===

    /// Write text in the builder's charset
    pub fn text(&mut self, s: &str) -> &mut Self {
        let encoded = self.charset.encode(s);
        self.buf.extend_from_slice(&encoded);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write `lines` line-feed codes
    pub fn feed(&mut self, lines: usize) -> &mut Self {
        for _ in 0..lines {
            self.cmd(Command::LineFeed);
        }
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.cmd(Command::AlignCenter)
    }

    /// Align text to left
    pub fn left(&mut self) -> &mut Self {
        self.cmd(Command::AlignLeft)
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.cmd(Command::AlignRight)
    }

    // === Text Style ===

    /// Enable bold
    pub fn bold(&mut self) -> &mut Self {
        self.cmd(Command::BoldOn)
    }

    /// Disable bold
    pub fn bold_off(&mut self) -> &mut Self {
        self.cmd(Command::BoldOff)
    }

    /// Enable underline
    pub fn underline(&mut self) -> &mut Self {
        self.cmd(Command::UnderlineOn)
    }

    /// Disable underline
    pub fn underline_off(&mut self) -> &mut Self {
        self.cmd(Command::UnderlineOff)
    }

    /// Switch to the small font (font B)
    pub fn font_small(&mut self) -> &mut Self {
        self.cmd(Command::FontSmall)
    }

    /// Back to the normal font (font A)
    pub fn font_normal(&mut self) -> &mut Self {
        self.cmd(Command::FontNormal)
    }

    /// Double height text
    pub fn double_height(&mut self) -> &mut Self {
        self.cmd(Command::DoubleHeight)
    }

    /// Double width text
    pub fn double_width(&mut self) -> &mut Self {
        self.cmd(Command::DoubleWidth)
    }

    /// Reset to normal size
    pub fn normal_size(&mut self) -> &mut Self {
        self.cmd(Command::NormalSize)
    }

    // === Separators ===

    /// Print a full-width line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a full-width line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print a bold label column followed by a plain value
    ///
    /// The label is space-padded to at least `label_width` characters and
    /// never truncated.
    pub fn label_value(&mut self, label: &str, label_width: usize, value: &str) -> &mut Self {
        self.bold();
        self.text(&pad_label(label, label_width));
        self.bold_off();
        self.line(value)
    }

    // === Paper Control ===

    /// Full cut
    pub fn cut(&mut self) -> &mut Self {
        self.cmd(Command::CutPaper)
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // === Build ===

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}

/// Format a label column: `label` left-justified to `width`, then `": "`
pub fn pad_label(label: &str, width: usize) -> String {
    format!("{label:<width$}: ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes() {
        let expected: [(Command, &[u8]); 15] = [
            (Command::Init, b"\x1B\x40"),
            (Command::AlignLeft, b"\x1B\x61\x00"),
            (Command::AlignCenter, b"\x1B\x61\x01"),
            (Command::AlignRight, b"\x1B\x61\x02"),
            (Command::BoldOn, b"\x1B\x45\x01"),
            (Command::BoldOff, b"\x1B\x45\x00"),
            (Command::UnderlineOn, b"\x1B\x2D\x01"),
            (Command::UnderlineOff, b"\x1B\x2D\x00"),
            (Command::FontSmall, b"\x1B\x4D\x01"),
            (Command::FontNormal, b"\x1B\x4D\x00"),
            (Command::LineFeed, b"\x0A"),
            (Command::CutPaper, b"\x1D\x56\x41\x00"),
            (Command::DoubleHeight, b"\x1B\x21\x10"),
            (Command::DoubleWidth, b"\x1B\x21\x20"),
            (Command::NormalSize, b"\x1B\x21\x00"),
        ];

        assert_eq!(
            Command::ALL.to_vec(),
            expected.iter().map(|(c, _)| *c).collect::<Vec<_>>()
        );
        for (command, bytes) in expected {
            assert_eq!(command.bytes(), bytes, "{command:?}");
        }
    }

    #[test]
    fn test_style_helpers_emit_commands() {
        let mut b = EscPosBuilder::new(48);
        b.right().underline().underline_off().font_small().font_normal();

        assert_eq!(
            b.build(),
            b"\x1B\x40\x1B\x61\x02\x1B\x2D\x01\x1B\x2D\x00\x1B\x4D\x01\x1B\x4D\x00"
        );
    }

    #[test]
    fn test_commands_are_distinct() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.bytes(), b.bytes(), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_builder_starts_with_init() {
        let mut b = EscPosBuilder::new(32);
        b.center().double_height().line("TITULO").normal_size().left();

        let data = b.build();
        assert!(data.starts_with(b"\x1B\x40\x1B\x61\x01\x1B\x21\x10TITULO\n"));
    }

    #[test]
    fn test_text_is_charset_encoded() {
        let mut b = EscPosBuilder::with_charset(48, Charset::Cp850);
        b.text("Proteínas");
        assert!(b.build().ends_with(b"Prote\xA1nas"));
    }

    #[test]
    fn test_separators() {
        let mut b = EscPosBuilder::new(10);
        b.sep_double().sep_single();

        let data = b.build();
        assert!(data.ends_with(b"==========\n----------\n"));
    }

    #[test]
    fn test_pad_label() {
        assert_eq!(pad_label("PLACAS", 9), "PLACAS   : ");
        assert_eq!(pad_label("CONDUCTOR", 9), "CONDUCTOR: ");
        assert_eq!(pad_label("TRANSPORTE", 9), "TRANSPORTE: ");
    }

    #[test]
    fn test_feed() {
        let mut b = EscPosBuilder::new(48);
        b.feed(5).cut();
        assert!(b.build().ends_with(b"\n\n\n\n\n\x1D\x56\x41\x00"));
    }
}
