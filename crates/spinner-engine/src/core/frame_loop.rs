use anyhow::{Result, anyhow};

use super::app::AppControl;

/// Outcome of recording and submitting one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameReport {
    /// The frame was submitted and its error scope came back clean.
    Presented,
    /// No surface texture was available (resize, timeout); nothing was drawn.
    Skipped,
    /// The frame was submitted but the validation scope captured an error.
    Invalid(String),
    /// The surface cannot recover.
    Fatal(String),
}

/// Where the frame loop currently stands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    /// Waiting for the next display refresh.
    Idle,
    /// Inside the recording callback.
    Recording,
    /// Work submitted; the error scope is being resolved.
    Submitted,
    /// A validation error was seen. No further frames are scheduled.
    Halted,
}

/// Per-frame state machine: `Idle -> Recording -> Submitted -> Idle`.
///
/// The caller waits for a refresh, calls [`tick`](Self::tick) and only
/// requests another refresh when it returns [`AppControl::Continue`]. The first
/// validation error moves the loop to [`FrameState::Halted`]; from there every
/// tick is refused until [`restart`](Self::restart). An unrecoverable surface
/// comes back as `Err`.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: FrameState,
    presented: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            presented: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Frames presented without error since the last restart.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn is_halted(&self) -> bool {
        self.state == FrameState::Halted
    }

    /// Runs one frame through `record` and decides whether another is wanted.
    pub fn tick(&mut self, record: impl FnOnce() -> FrameReport) -> Result<AppControl> {
        if self.is_halted() {
            return Ok(AppControl::Halt);
        }

        self.state = FrameState::Recording;
        let report = record();
        if matches!(report, FrameReport::Presented | FrameReport::Invalid(_)) {
            self.state = FrameState::Submitted;
        }

        match report {
            FrameReport::Presented => {
                self.presented += 1;
                self.state = FrameState::Idle;
                Ok(AppControl::Continue)
            }
            FrameReport::Skipped => {
                self.state = FrameState::Idle;
                Ok(AppControl::Continue)
            }
            FrameReport::Invalid(message) => {
                log::error!("error: {message}");
                self.state = FrameState::Halted;
                Ok(AppControl::Halt)
            }
            FrameReport::Fatal(message) => {
                self.state = FrameState::Halted;
                Err(anyhow!(message))
            }
        }
    }

    /// Starts over, as after a reload.
    pub fn restart(&mut self) {
        self.state = FrameState::Idle;
        self.presented = 0;
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_frames_keep_scheduling() {
        let mut fl = FrameLoop::new();
        for _ in 0..3 {
            assert_eq!(fl.tick(|| FrameReport::Presented).unwrap(), AppControl::Continue);
        }
        assert_eq!(fl.presented(), 3);
        assert_eq!(fl.state(), FrameState::Idle);
    }

    #[test]
    fn validation_error_halts_after_that_frame() {
        let mut fl = FrameLoop::new();
        let mut recorded = 0;
        let mut scheduled = 0;

        // Drive it like the runtime would: only tick again if asked to.
        let mut control = AppControl::Continue;
        let mut refresh = 0;
        while control == AppControl::Continue && refresh < 10 {
            refresh += 1;
            control = fl
                .tick(|| {
                    recorded += 1;
                    if recorded == 3 {
                        FrameReport::Invalid("bad bind group".into())
                    } else {
                        FrameReport::Presented
                    }
                })
                .unwrap();
            if control == AppControl::Continue {
                scheduled += 1;
            }
        }

        assert_eq!(control, AppControl::Halt);
        assert_eq!(recorded, 3);
        assert_eq!(scheduled, 2);
        assert!(fl.is_halted());
    }

    #[test]
    fn halted_loop_never_records_again() {
        let mut fl = FrameLoop::new();
        fl.tick(|| FrameReport::Invalid("x".into())).unwrap();

        let mut called = false;
        let control = fl
            .tick(|| {
                called = true;
                FrameReport::Presented
            })
            .unwrap();
        assert_eq!(control, AppControl::Halt);
        assert!(!called);
    }

    #[test]
    fn skipped_frames_are_not_counted() {
        let mut fl = FrameLoop::new();
        assert_eq!(fl.tick(|| FrameReport::Skipped).unwrap(), AppControl::Continue);
        assert_eq!(fl.presented(), 0);
    }

    #[test]
    fn fatal_surface_error_is_an_error() {
        let mut fl = FrameLoop::new();
        let err = fl.tick(|| FrameReport::Fatal("surface error: out of memory".into())).unwrap_err();
        assert_eq!(err.to_string(), "surface error: out of memory");
        assert!(fl.is_halted());
    }

    #[test]
    fn restart_resumes_after_halt() {
        let mut fl = FrameLoop::new();
        fl.tick(|| FrameReport::Invalid("x".into())).unwrap();
        fl.restart();
        assert_eq!(fl.tick(|| FrameReport::Presented).unwrap(), AppControl::Continue);
        assert_eq!(fl.presented(), 1);
    }
}
