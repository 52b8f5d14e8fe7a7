use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::alarm::AlarmSink;
use crate::countdown::{Countdown, CountdownEvent, Phase};
use crate::scheduler::TickTimer;

/// Wall-clock delay between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the countdown state, its single tick timer and the alarm sink.
///
/// Time is passed in explicitly so the controller can be driven by a real
/// clock or by virtual instants in tests.
#[derive(Debug)]
pub struct Controller<A: AlarmSink> {
    countdown: Countdown,
    timer: TickTimer,
    alarm: A,
}

impl<A: AlarmSink> Controller<A> {
    pub fn new(countdown: Countdown, alarm: A) -> Self {
        Self {
            countdown,
            timer: TickTimer::new(),
            alarm,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    pub fn has_pending_tick(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Apply a user event. `Tick` and `Settle` belong to the timer and are
    /// ignored here.
    pub fn handle(&mut self, event: CountdownEvent, now: Instant) {
        if matches!(event, CountdownEvent::Tick | CountdownEvent::Settle) {
            debug!(?event, "ignoring timer-driven event from input");
            return;
        }
        self.transition(event, now);
    }

    /// Fire every tick that is due by `now`, returning how many fired.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(token) = self.timer.due(now) {
            let Some(deadline) = self.timer.fire(token) else {
                break;
            };
            fired += 1;
            self.transition(CountdownEvent::Tick, deadline);
            if self.countdown.phase() == Phase::Expired {
                self.transition(CountdownEvent::Settle, deadline);
            }
        }
        fired
    }

    fn transition(&mut self, event: CountdownEvent, at: Instant) {
        let before = self.countdown.clone();
        let resets = matches!(event, CountdownEvent::Reset);
        let ticks = matches!(event, CountdownEvent::Tick);
        self.countdown = before.clone().apply(event);
        let after = self.countdown.clone();

        if before.phase() != after.phase() {
            debug!(
                from = %before.phase(),
                to = %after.phase(),
                remaining = after.remaining(),
                "phase change"
            );
        }

        match (before.is_running(), after.is_running()) {
            (false, true) => {
                info!(remaining = after.remaining(), "countdown started");
                self.timer.schedule(at, TICK_INTERVAL);
            }
            (true, true) if ticks => {
                self.timer.schedule(at, TICK_INTERVAL);
            }
            (true, false) => self.timer.cancel(),
            _ => {}
        }

        if resets {
            self.timer.cancel();
            info!(configured = after.configured(), "countdown reset");
        }

        if after.phase() == Phase::Expired {
            info!(configured = after.configured(), "countdown expired");
        }

        if !before.alarm_armed() && after.alarm_armed() {
            if after.should_sound() {
                if let Err(err) = self.alarm.play() {
                    warn!(error = %err, "failed to play alarm");
                }
            } else {
                debug!("alarm muted");
            }
        } else if before.alarm_armed() && !after.alarm_armed() {
            if let Err(err) = self.alarm.stop() {
                warn!(error = %err, "failed to stop alarm");
            }
        }
    }
}

// The pending tick dies with the timer; a cue that may still be sounding is
// cut off explicitly.
impl<A: AlarmSink> Drop for Controller<A> {
    fn drop(&mut self) {
        if self.timer.is_pending() {
            debug!("dropping pending tick on teardown");
        }
        if self.countdown.should_sound() {
            if let Err(err) = self.alarm.stop() {
                warn!(error = %err, "failed to stop alarm on teardown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::Variant;
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct RecordingAlarm {
        plays: usize,
        stops: usize,
    }

    impl AlarmSink for RecordingAlarm {
        fn play(&mut self) -> io::Result<()> {
            self.plays += 1;
            Ok(())
        }

        fn stop(&mut self) -> io::Result<()> {
            self.stops += 1;
            Ok(())
        }
    }

    /// Counts stops in a cell that outlives the controller
    #[derive(Default)]
    struct SharedStops {
        stops: Rc<Cell<usize>>,
    }

    impl AlarmSink for SharedStops {
        fn play(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> io::Result<()> {
            self.stops.set(self.stops.get() + 1);
            Ok(())
        }
    }

    fn shared_controller(countdown: Countdown) -> (Controller<SharedStops>, Rc<Cell<usize>>) {
        let alarm = SharedStops::default();
        let stops = alarm.stops.clone();
        (Controller::new(countdown, alarm), stops)
    }

    struct FailingAlarm;

    impl AlarmSink for FailingAlarm {
        fn play(&mut self) -> io::Result<()> {
            Err(io::Error::other("no audio device"))
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn controller(configured: i64, variant: Variant) -> Controller<RecordingAlarm> {
        Controller::new(Countdown::new(configured, variant), RecordingAlarm::default())
    }

    #[test]
    fn test_start_schedules_first_tick_one_second_out() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        assert!(!c.has_pending_tick());

        c.handle(CountdownEvent::Toggle, t0);
        assert!(c.countdown().is_running());
        assert_eq!(c.next_tick_at(), Some(t0 + TICK_INTERVAL));
    }

    #[test]
    fn test_poll_before_deadline_does_nothing() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);

        assert_eq!(c.poll(t0 + Duration::from_millis(999)), 0);
        assert_eq!(c.countdown().remaining(), 60);
    }

    #[test]
    fn test_one_tick_per_second() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);

        assert_eq!(c.poll(t0 + secs(1)), 1);
        assert_eq!(c.countdown().remaining(), 59);
        assert_eq!(c.next_tick_at(), Some(t0 + secs(2)));

        // polling again at the same instant fires nothing
        assert_eq!(c.poll(t0 + secs(1)), 0);
        assert_eq!(c.countdown().remaining(), 59);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);

        assert_eq!(c.poll(t0 + Duration::from_millis(3500)), 3);
        assert_eq!(c.countdown().remaining(), 57);
        assert_eq!(c.next_tick_at(), Some(t0 + secs(4)));
    }

    #[test]
    fn test_sixty_second_run_returns_to_idle() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);

        for n in 1..=60 {
            c.poll(t0 + secs(n));
        }

        assert_eq!(c.countdown().phase(), Phase::Idle);
        assert_eq!(c.countdown().remaining(), 60);
        assert!(c.countdown().alarm_armed());
        assert!(!c.has_pending_tick());
        assert_eq!(c.alarm().plays, 1);
    }

    #[test]
    fn test_expiry_plays_alarm_once() {
        let t0 = Instant::now();
        let mut c = controller(5, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);

        assert_eq!(c.poll(t0 + secs(5)), 5);
        assert!(c.countdown().alarm_armed());
        assert_eq!(c.countdown().phase(), Phase::Idle);
        assert_eq!(c.countdown().remaining(), 5);
        assert_eq!(c.alarm().plays, 1);

        // nothing further happens once expired
        assert_eq!(c.poll(t0 + secs(60)), 0);
        assert_eq!(c.alarm().plays, 1);
    }

    #[test]
    fn test_muted_expiry_is_silent() {
        let t0 = Instant::now();
        let mut c = Controller::new(
            Countdown::new(5, Variant::Extended).with_muted(true),
            RecordingAlarm::default(),
        );
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(5));

        assert!(c.countdown().alarm_armed());
        assert_eq!(c.alarm().plays, 0);
    }

    #[test]
    fn test_basic_variant_expiry_is_silent() {
        let t0 = Instant::now();
        let mut c = controller(3, Variant::Basic);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(3));

        assert_eq!(c.countdown().phase(), Phase::Idle);
        assert_eq!(c.countdown().remaining(), 3);
        assert!(!c.countdown().alarm_armed());
        assert_eq!(c.alarm().plays, 0);
    }

    #[test]
    fn test_muting_after_expiry_does_not_stop_cue() {
        let t0 = Instant::now();
        let mut c = controller(1, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));
        c.handle(CountdownEvent::ToggleMute, t0 + secs(2));

        assert_eq!(c.alarm().plays, 1);
        assert_eq!(c.alarm().stops, 0);
    }

    #[test]
    fn test_restart_stops_cue() {
        let t0 = Instant::now();
        let mut c = controller(1, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));
        c.handle(CountdownEvent::Start, t0 + secs(2));

        assert!(!c.countdown().alarm_armed());
        assert_eq!(c.alarm().stops, 1);
    }

    #[test]
    fn test_reset_mid_run_cancels_ticks() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(23));
        assert_eq!(c.countdown().remaining(), 37);

        c.handle(CountdownEvent::Reset, t0 + Duration::from_millis(23_500));
        assert_eq!(c.countdown().phase(), Phase::Idle);
        assert_eq!(c.countdown().remaining(), 60);
        assert!(!c.has_pending_tick());

        assert_eq!(c.poll(t0 + secs(120)), 0);
        assert_eq!(c.countdown().remaining(), 60);
    }

    #[test]
    fn test_stop_cancels_and_restart_reschedules_from_now() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Basic);
        c.handle(CountdownEvent::Toggle, t0);
        c.poll(t0 + secs(2));
        c.handle(CountdownEvent::Toggle, t0 + Duration::from_millis(2500));

        assert!(!c.has_pending_tick());
        assert_eq!(c.countdown().remaining(), 58);
        assert_eq!(c.poll(t0 + secs(10)), 0);

        c.handle(CountdownEvent::Toggle, t0 + secs(10));
        assert_eq!(c.next_tick_at(), Some(t0 + secs(11)));
    }

    #[test]
    fn test_edit_while_running_has_no_effect() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));
        c.handle(CountdownEvent::Edit("00:00:10".into()), t0 + secs(1));
        c.handle(CountdownEvent::Increment, t0 + secs(1));

        assert_eq!(c.countdown().configured(), 60);
    }

    #[test]
    fn test_input_cannot_inject_ticks() {
        let t0 = Instant::now();
        let mut c = controller(60, Variant::Extended);
        c.handle(CountdownEvent::Start, t0);
        c.handle(CountdownEvent::Tick, t0);
        c.handle(CountdownEvent::Settle, t0);

        assert_eq!(c.countdown().remaining(), 60);
        assert_eq!(c.next_tick_at(), Some(t0 + TICK_INTERVAL));
    }

    #[test]
    fn test_failing_alarm_does_not_break_the_countdown() {
        let t0 = Instant::now();
        let mut c = Controller::new(Countdown::new(1, Variant::Extended), FailingAlarm);
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));

        assert_eq!(c.countdown().phase(), Phase::Idle);
        assert!(c.countdown().alarm_armed());
    }

    #[test]
    fn test_drop_after_expiry_stops_cue() {
        let t0 = Instant::now();
        let (mut c, stops) = shared_controller(Countdown::new(1, Variant::Extended));
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));
        assert!(c.countdown().should_sound());

        drop(c);
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_drop_muted_expiry_has_nothing_to_stop() {
        let t0 = Instant::now();
        let (mut c, stops) =
            shared_controller(Countdown::new(1, Variant::Extended).with_muted(true));
        c.handle(CountdownEvent::Start, t0);
        c.poll(t0 + secs(1));

        drop(c);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn test_drop_while_running_leaves_sink_alone() {
        let t0 = Instant::now();
        let (mut c, stops) = shared_controller(Countdown::new(60, Variant::Extended));
        c.handle(CountdownEvent::Start, t0);
        assert!(c.has_pending_tick());

        drop(c);
        assert_eq!(stops.get(), 0);
    }
}
