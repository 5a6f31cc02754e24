/// Response to a failed surface texture acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering resumes next frame.
    Reconfigured,
    /// Transient error; the current frame draws nothing.
    SkipFrame,
    /// Out of memory. The runtime shuts down.
    Fatal,
}
