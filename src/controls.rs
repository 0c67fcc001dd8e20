use std::time::{Duration, Instant};

use crate::config::{AUTO_ADVANCE_INTERVAL, AUTO_ADVANCE_STRIDE, STEP_SIZE, T_INIT, TIME_STEPS};

/// Whether automatic time advancement is conceptually active
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

/// Input produced by the control widgets
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlAction {
    /// Slider dragged to a new value
    Scrub(f64),
    Toggle,
    Reset,
    StepBack,
    StepForward,
}

/// Receives every change of the time value
pub trait TimeListener {
    fn on_time_changed(&mut self, t: f64);
}

/// Non-blocking replacement for a sleep loop: frame `n` shows `n * stride`
struct AutoAdvance {
    next_frame: usize,
    frame_count: usize,
    due: Instant,
}

/// Owns the time value and the play-state; every widget goes through here.
pub struct Controller {
    time: f64,
    max_time: f64,
    step: f64,
    stride: f64,
    interval: Duration,
    play: PlayState,
    auto: Option<AutoAdvance>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(TIME_STEPS, STEP_SIZE, AUTO_ADVANCE_STRIDE, AUTO_ADVANCE_INTERVAL)
    }
}

impl Controller {
    pub fn new(max_time: f64, step: f64, stride: f64, interval: Duration) -> Self {
        Self {
            time: T_INIT.clamp(0.0, max_time),
            max_time,
            step,
            stride,
            interval,
            play: PlayState::Idle,
            auto: None,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn play_state(&self) -> PlayState {
        self.play
    }

    pub fn is_playing(&self) -> bool {
        self.play == PlayState::Playing
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto.is_some()
    }

    /// Set the slider value and notify, even when the value is unchanged
    pub fn set_time(&mut self, t: f64, listener: &mut dyn TimeListener) {
        self.time = t.clamp(0.0, self.max_time);
        listener.on_time_changed(self.time);
    }

    /// Flip the play-state flag. Stopping also cancels a running auto-advance.
    pub fn toggle(&mut self) {
        self.play = match self.play {
            PlayState::Idle => PlayState::Playing,
            PlayState::Playing => {
                if self.auto.take().is_some() {
                    log::info!("Auto-advance cancelled at t={:.2}", self.time);
                }
                PlayState::Idle
            }
        };
        log::info!("Play-state: {:?}", self.play);
    }

    pub fn reset(&mut self, listener: &mut dyn TimeListener) {
        self.set_time(0.0, listener);
    }

    /// Move back one step; ignored at the lower bound or while playing
    pub fn step_back(&mut self, listener: &mut dyn TimeListener) -> bool {
        if self.time >= self.step && !self.is_playing() {
            self.set_time(self.time - self.step, listener);
            true
        } else {
            log::debug!("Step back ignored (t={:.2}, {:?})", self.time, self.play);
            false
        }
    }

    /// Move forward one step; ignored at the upper bound or while playing
    pub fn step_forward(&mut self, listener: &mut dyn TimeListener) -> bool {
        if self.time <= self.max_time - self.step && !self.is_playing() {
            self.set_time(self.time + self.step, listener);
            true
        } else {
            log::debug!("Step forward ignored (t={:.2}, {:?})", self.time, self.play);
            false
        }
    }

    pub fn apply(&mut self, action: ControlAction, listener: &mut dyn TimeListener) {
        match action {
            ControlAction::Scrub(t) => self.set_time(t, listener),
            ControlAction::Toggle => self.toggle(),
            ControlAction::Reset => self.reset(listener),
            ControlAction::StepBack => {
                self.step_back(listener);
            }
            ControlAction::StepForward => {
                self.step_forward(listener);
            }
        }
    }

    /// Start sweeping the slider from 0 to the end, one stride per interval.
    ///
    /// Shows the first frame immediately; `tick` drives the rest.
    pub fn start_auto_advance(&mut self, now: Instant, listener: &mut dyn TimeListener) {
        let frame_count = (self.max_time / self.stride).floor() as usize + 1;
        log::info!(
            "Auto-advance: {} frames, {:.0} s apart",
            frame_count,
            self.interval.as_secs_f64()
        );
        self.play = PlayState::Playing;
        self.auto = Some(AutoAdvance {
            next_frame: 1,
            frame_count,
            due: now + self.interval,
        });
        self.set_time(0.0, listener);
    }

    /// Advance the auto sequence if its deadline has passed.
    ///
    /// Returns true when the time value or the play-state changed.
    pub fn tick(&mut self, now: Instant, listener: &mut dyn TimeListener) -> bool {
        let Some(auto) = self.auto.as_mut() else {
            return false;
        };
        if now < auto.due {
            return false;
        }

        // Missed deadlines are not replayed
        auto.due = now + self.interval;

        if auto.next_frame < auto.frame_count {
            let t = auto.next_frame as f64 * self.stride;
            auto.next_frame += 1;
            log::debug!("Auto-advance frame t={:.0}", t);
            self.set_time(t, listener);
        } else {
            self.auto = None;
            self.play = PlayState::Idle;
            log::info!("Auto-advance complete");
        }
        true
    }

    /// When the event loop should wake for the next auto-advance frame
    pub fn next_deadline(&self) -> Option<Instant> {
        self.auto.as_ref().map(|auto| auto.due)
    }
}
