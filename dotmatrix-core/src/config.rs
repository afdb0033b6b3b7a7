use std::fmt::Formatter;
use std::path::PathBuf;

/// Emulator configuration supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Path to the ROM image. When absent, a zero-filled 32KB image is used.
    pub rom_path: Option<PathBuf>,
    /// Run uncapped instead of pacing frames to ~59.73 Hz.
    pub fast: bool,
    /// Trace every executed instruction.
    pub debug_cpu: bool,
    /// Trace timer overflow/reload events.
    pub debug_timer: bool,
    /// Tint window and sprite pixels in the frame buffer.
    pub debug_lcd: bool,
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "rom_path: {}",
            self.rom_path
                .as_deref()
                .map_or_else(|| "<none>".into(), |path| path.display().to_string())
        )?;
        writeln!(f, "fast: {}", self.fast)?;
        writeln!(f, "debug_cpu: {}", self.debug_cpu)?;
        writeln!(f, "debug_timer: {}", self.debug_timer)?;
        writeln!(f, "debug_lcd: {}", self.debug_lcd)?;

        Ok(())
    }
}
