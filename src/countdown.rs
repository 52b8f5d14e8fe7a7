use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time_format::{edit_time, format_time, parse_time};
use crate::urgency::Urgency;

/// Feature set of the widget
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// No alarm or mute; duration edits are not clamped
    Basic,
    /// Alarm cue on expiry, mute toggle, duration edits clamp at one second
    #[default]
    Extended,
}

impl Variant {
    pub fn has_alarm(self) -> bool {
        matches!(self, Variant::Extended)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    /// Remaining time just hit zero; settles back to `Idle` in the same step
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    Start,
    Stop,
    /// The single Start/Stop control
    Toggle,
    /// One second elapsed; timer-driven
    Tick,
    /// Leave `Expired` and restore the configured duration; timer-driven
    Settle,
    Reset,
    Increment,
    Decrement,
    /// Text field contents, committed
    Edit(String),
    ToggleMute,
}

/// The countdown state machine. Transitions are pure: `apply` consumes the
/// current value and returns the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    configured: i64,
    remaining: i64,
    phase: Phase,
    alarm_armed: bool,
    muted: bool,
    variant: Variant,
}

impl Countdown {
    pub fn new(configured: i64, variant: Variant) -> Self {
        Self {
            configured,
            remaining: configured,
            phase: Phase::Idle,
            alarm_armed: false,
            muted: false,
            variant,
        }
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted && self.variant.has_alarm();
        self
    }

    pub fn configured(&self) -> i64 {
        self.configured
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn alarm_armed(&self) -> bool {
        self.alarm_armed
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Stopped with the full configured duration on the clock
    pub fn is_at_rest(&self) -> bool {
        self.phase == Phase::Idle && self.remaining == self.configured
    }

    /// True while the alarm cue should be audible
    pub fn should_sound(&self) -> bool {
        self.alarm_armed && !self.muted
    }

    pub fn display(&self) -> String {
        format_time(self.remaining)
    }

    /// Seed text for the duration field; parses back to `remaining`
    pub fn edit_text(&self) -> String {
        edit_time(self.remaining)
    }

    /// Urgency is only shown while the countdown is running
    pub fn urgency(&self) -> Option<Urgency> {
        self.is_running().then(|| Urgency::for_remaining(self.remaining))
    }

    pub fn apply(self, event: CountdownEvent) -> Self {
        match event {
            CountdownEvent::Start => self.start(),
            CountdownEvent::Stop => self.stop(),
            CountdownEvent::Toggle => {
                if self.is_running() {
                    self.stop()
                } else {
                    self.start()
                }
            }
            CountdownEvent::Tick => self.tick(),
            CountdownEvent::Settle => self.settle(),
            CountdownEvent::Reset => Self {
                remaining: self.configured,
                phase: Phase::Idle,
                alarm_armed: false,
                ..self
            },
            CountdownEvent::Increment => {
                let configured = self.configured.saturating_add(1);
                self.reconfigure(configured)
            }
            CountdownEvent::Decrement => {
                let configured = match self.variant {
                    Variant::Basic => self.configured.saturating_sub(1),
                    Variant::Extended => self.configured.saturating_sub(1).max(1),
                };
                self.reconfigure(configured)
            }
            CountdownEvent::Edit(text) => match parse_time(&text) {
                Ok(configured) => {
                    let configured = match self.variant {
                        Variant::Basic => configured,
                        Variant::Extended => configured.max(1),
                    };
                    self.reconfigure(configured)
                }
                Err(err) => {
                    debug!(input = %text, error = %err, "ignoring duration edit");
                    self
                }
            },
            CountdownEvent::ToggleMute => {
                if self.variant.has_alarm() {
                    Self {
                        muted: !self.muted,
                        ..self
                    }
                } else {
                    self
                }
            }
        }
    }

    fn start(self) -> Self {
        if self.phase != Phase::Idle || self.remaining <= 0 {
            return self;
        }
        Self {
            phase: Phase::Running,
            alarm_armed: false,
            ..self
        }
    }

    // Manual stop keeps the remaining time on the clock.
    fn stop(self) -> Self {
        if !self.is_running() {
            return self;
        }
        Self {
            phase: Phase::Idle,
            ..self
        }
    }

    fn tick(self) -> Self {
        if !self.is_running() {
            return self;
        }
        let remaining = self.remaining - 1;
        if remaining > 0 {
            return Self { remaining, ..self };
        }
        Self {
            remaining: 0,
            phase: Phase::Expired,
            alarm_armed: self.variant.has_alarm(),
            ..self
        }
    }

    fn settle(self) -> Self {
        if self.phase != Phase::Expired {
            return self;
        }
        Self {
            remaining: self.configured,
            phase: Phase::Idle,
            ..self
        }
    }

    fn reconfigure(self, configured: i64) -> Self {
        if !self.is_at_rest() {
            debug!(
                remaining = self.remaining,
                configured = self.configured,
                "duration is locked until reset"
            );
            return self;
        }
        Self {
            configured,
            remaining: configured,
            ..self
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(60, Variant::default())
    }
}
