use crate::error::RenderError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchedulerState {
    #[default]
    Running,
    /// Host window hidden; frames are skipped until it is shown again.
    Paused,
    /// An update pass failed. Terminal for the session.
    Halted(RenderError),
}

/// Gatekeeper for per-frame update passes.
///
/// The host calls [`FrameScheduler::run_frame`] on every tick. A failed pass
/// halts the scheduler for good and the error is kept for display.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn halted(&self) -> Option<&RenderError> {
        match &self.state {
            SchedulerState::Halted(e) => Some(e),
            _ => None,
        }
    }

    /// Forwarded visibility change from the host.
    pub fn set_visible(&mut self, visible: bool) {
        self.state = match (&self.state, visible) {
            (SchedulerState::Halted(_), _) => return,
            (_, true) => SchedulerState::Running,
            (_, false) => SchedulerState::Paused,
        };
    }

    /// Run `frame` if the scheduler is running. Returns true if it ran and
    /// succeeded.
    pub fn run_frame<F>(&mut self, frame: F) -> bool
    where
        F: FnOnce() -> Result<(), RenderError>,
    {
        if !self.is_running() {
            return false;
        }
        match frame() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Update pass failed, stopping frame updates: {}", e);
                self.state = SchedulerState::Halted(e);
                false
            }
        }
    }
}
