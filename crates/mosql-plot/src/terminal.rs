//! Inline terminal graphics
//!
//! Supports the kitty graphics protocol and the iTerm2 inline image protocol
//! (also understood by WezTerm). Detection follows the usual environment
//! variables each terminal sets.

use crate::raster::RasterImage;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use std::io::{self, Write};

/// Largest base64 payload per kitty escape sequence
const KITTY_CHUNK: usize = 4096;

/// A terminal's ability to show images inline
pub trait TerminalGraphics: Send + Sync {
    /// Protocol name for logs
    fn name(&self) -> &'static str;

    /// Whether images can be shown at all
    fn available(&self) -> bool;

    /// Write the escape sequences that display `image`
    fn encode(&self, out: &mut dyn Write, image: &RasterImage) -> io::Result<()>;
}

/// kitty graphics protocol (direct PNG transmission)
pub struct KittyGraphics;

impl TerminalGraphics for KittyGraphics {
    fn name(&self) -> &'static str {
        "kitty"
    }

    fn available(&self) -> bool {
        true
    }

    fn encode(&self, out: &mut dyn Write, image: &RasterImage) -> io::Result<()> {
        let encoded = BASE64_STANDARD.encode(&image.png);
        let chunks: Vec<&[u8]> = encoded.as_bytes().chunks(KITTY_CHUNK).collect();
        let last = chunks.len().saturating_sub(1);

        if chunks.is_empty() {
            write!(out, "\x1b_Gf=100,a=T,m=0;\x1b\\")?;
        }

        for (i, chunk) in chunks.iter().enumerate() {
            let more = u8::from(i < last);
            if i == 0 {
                write!(out, "\x1b_Gf=100,a=T,m={};", more)?;
            } else {
                write!(out, "\x1b_Gm={};", more)?;
            }
            out.write_all(chunk)?;
            write!(out, "\x1b\\")?;
        }

        writeln!(out)?;
        out.flush()
    }
}

/// iTerm2 inline images
pub struct ItermGraphics;

impl TerminalGraphics for ItermGraphics {
    fn name(&self) -> &'static str {
        "iterm"
    }

    fn available(&self) -> bool {
        true
    }

    fn encode(&self, out: &mut dyn Write, image: &RasterImage) -> io::Result<()> {
        let encoded = BASE64_STANDARD.encode(&image.png);
        writeln!(
            out,
            "\x1b]1337;File=inline=1;size={}:{}\x07",
            image.png.len(),
            encoded
        )?;
        out.flush()
    }
}

/// A terminal without image support
pub struct NoGraphics;

impl TerminalGraphics for NoGraphics {
    fn name(&self) -> &'static str {
        "none"
    }

    fn available(&self) -> bool {
        false
    }

    fn encode(&self, _out: &mut dyn Write, _image: &RasterImage) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "terminal does not support inline images",
        ))
    }
}

/// Pick the graphics protocol for the current terminal
pub fn detect_terminal_graphics() -> Box<dyn TerminalGraphics> {
    detect_terminal_graphics_from(|key| std::env::var(key).ok())
}

/// Pick the graphics protocol using an arbitrary environment lookup
pub fn detect_terminal_graphics_from<F>(lookup: F) -> Box<dyn TerminalGraphics>
where
    F: Fn(&str) -> Option<String>,
{
    let kitty = lookup("KITTY_WINDOW_ID").is_some()
        || lookup("TERM").is_some_and(|v| v.to_lowercase().contains("kitty"));
    let iterm = lookup("TERM_PROGRAM").is_some_and(|v| v == "iTerm.app")
        || lookup("WEZTERM_PANE").is_some();

    if kitty {
        Box::new(KittyGraphics)
    } else if iterm {
        Box::new(ItermGraphics)
    } else {
        Box::new(NoGraphics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn image(len: usize) -> RasterImage {
        RasterImage { width: 1, height: 1, png: vec![7u8; len] }
    }

    fn detect(vars: &[(&str, &str)]) -> &'static str {
        let env: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        detect_terminal_graphics_from(|key| env.get(key).cloned()).name()
    }

    #[test]
    fn detection() {
        assert_eq!(detect(&[("KITTY_WINDOW_ID", "1")]), "kitty");
        assert_eq!(detect(&[("TERM", "xterm-kitty")]), "kitty");
        assert_eq!(detect(&[("TERM_PROGRAM", "iTerm.app")]), "iterm");
        assert_eq!(detect(&[("WEZTERM_PANE", "0")]), "iterm");
        assert_eq!(detect(&[("TERM", "xterm-256color")]), "none");
        assert_eq!(detect(&[]), "none");
    }

    #[test]
    fn iterm_sequence() {
        let mut out = Vec::new();
        ItermGraphics.encode(&mut out, &image(3)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\x1b]1337;File=inline=1;size=3:BwcH\x07\n");
    }

    #[test]
    fn kitty_single_chunk() {
        let mut out = Vec::new();
        KittyGraphics.encode(&mut out, &image(3)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\x1b_Gf=100,a=T,m=0;BwcH\x1b\\\n");
    }

    #[test]
    fn kitty_chunks_large_payloads() {
        // 3 * 2048 bytes -> 8192 base64 chars -> two chunks
        let mut out = Vec::new();
        KittyGraphics.encode(&mut out, &image(6144)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("\x1b_Gf=100,a=T,m=1;"));
        assert_eq!(text.matches("\x1b_Gm=0;").count(), 1);
        assert_eq!(text.matches("\x1b\\").count(), 2);
    }

    #[test]
    fn no_graphics_refuses() {
        let mut out = Vec::new();
        assert!(!NoGraphics.available());
        assert!(NoGraphics.encode(&mut out, &image(1)).is_err());
        assert!(out.is_empty());
    }
}
