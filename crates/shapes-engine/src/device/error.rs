/// What the render loop should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering resumes next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Unrecoverable (surface out of memory); the runtime exits.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
