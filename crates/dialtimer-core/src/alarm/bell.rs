use std::io::{IsTerminal, Write};

use super::ClipSink;
use crate::error::AlarmError;

const BEL: &[u8] = b"\x07";

/// Rings the terminal bell on stderr.
///
/// Volume cannot be controlled; a volume of zero mutes it.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl ClipSink for TerminalBell {
    fn prepare(&mut self) -> Result<(), AlarmError> {
        if std::io::stderr().is_terminal() {
            Ok(())
        } else {
            Err(AlarmError::Unavailable("stderr is not a terminal".into()))
        }
    }

    fn emit(&mut self, volume: f32) -> Result<(), AlarmError> {
        ring(&mut std::io::stderr().lock(), volume)?;
        Ok(())
    }
}

fn ring<W: Write>(out: &mut W, volume: f32) -> std::io::Result<()> {
    if volume <= 0.0 {
        return Ok(());
    }
    out.write_all(BEL)?;
    out.flush()
}
