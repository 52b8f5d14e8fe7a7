use std::io::{self, Write};

/// BEL repeated so the cue is noticeable on terminals that coalesce bells
pub const ALARM_CUE: &[u8] = b"\x07\x07\x07";

/// Plays the expiry cue
pub trait AlarmSink {
    /// Play the cue once. Never loops.
    fn play(&mut self) -> io::Result<()>;

    /// Stop a cue that is still playing. Sinks with instantaneous cues
    /// have nothing to do.
    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AlarmSink + ?Sized> AlarmSink for Box<T> {
    fn play(&mut self) -> io::Result<()> {
        (**self).play()
    }

    fn stop(&mut self) -> io::Result<()> {
        (**self).stop()
    }
}

/// Rings the terminal bell
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlarmSink for TerminalBell<W> {
    fn play(&mut self) -> io::Result<()> {
        self.out.write_all(ALARM_CUE)?;
        self.out.flush()
    }
}

/// A sink that never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AlarmSink for Silent {
    fn play(&mut self) -> io::Result<()> {
        Ok(())
    }
}
