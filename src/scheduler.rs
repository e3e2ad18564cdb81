//! Cooperative scheduling: per-frame callbacks, one-shot timers and a clock.
//!
//! Callbacks are plain values rather than closures. The host pulls due work
//! out of the scheduler and hands it back to whoever queued it, which keeps
//! ownership simple and lets tests count exactly what is outstanding.

use std::time::Instant;

/// Handle of a queued frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Handle of a queued one-shot timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Environment services consumed by a wall
pub trait Scheduler<T> {
    /// Monotonic clock reading in seconds
    fn now(&self) -> f64;

    /// Queues `job` for the next frame
    fn request_frame(&mut self, job: T) -> FrameHandle;

    /// Returns `true` if the callback was still pending
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;

    /// Queues `job` to fire `delay` seconds from now
    fn set_timeout(&mut self, delay: f64, job: T) -> TimerHandle;

    /// Returns `true` if the timer was still pending
    fn clear_timeout(&mut self, handle: TimerHandle) -> bool;

    /// Starts a frame: removes every callback queued so far, in request order.
    /// Callbacks requested while running these belong to the following frame.
    fn take_frame(&mut self) -> Vec<(FrameHandle, T)>;

    /// Removes timers whose deadline has passed, earliest first
    fn take_due_timers(&mut self) -> Vec<(TimerHandle, T)>;

    /// Pending frame callbacks plus pending timers
    fn outstanding(&self) -> usize;
}

#[derive(Clone, Copy, Debug)]
enum Clock {
    /// Reads `base` plus the time elapsed since `since`
    Running { since: Instant, base: f64 },
    /// Monotonic clock held at a fixed reading
    Paused(f64),
    Manual(f64),
}

/// In-process [`Scheduler`] backed by either the system clock or a manual one
#[derive(Debug)]
pub struct TaskQueue<T> {
    clock: Clock,
    next_id: u64,
    frames: Vec<(FrameHandle, T)>,
    timers: Vec<(TimerHandle, f64, T)>,
}

impl<T> TaskQueue<T> {
    /// Clock starts at zero when the queue is created
    pub fn monotonic() -> Self {
        Self::with_clock(Clock::Running {
            since: Instant::now(),
            base: 0.0,
        })
    }

    /// Clock only moves through [`advance_by`](Self::advance_by) and
    /// [`set_time`](Self::set_time)
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual(0.0))
    }

    fn with_clock(clock: Clock) -> Self {
        TaskQueue {
            clock,
            next_id: 0,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// Moves a manual clock forward. No effect on a monotonic clock.
    pub fn advance_by(&mut self, seconds: f64) {
        if let Clock::Manual(t) = &mut self.clock {
            *t += seconds;
        }
    }

    /// Sets a manual clock. No effect on a monotonic clock.
    pub fn set_time(&mut self, seconds: f64) {
        if let Clock::Manual(t) = &mut self.clock {
            *t = seconds;
        }
    }

    /// Freezes a monotonic clock at its current reading. No effect on a
    /// manual clock.
    pub fn pause(&mut self) {
        if let Clock::Running { .. } = self.clock {
            self.clock = Clock::Paused(self.now());
        }
    }

    /// Restarts a paused clock from where it stopped
    pub fn resume(&mut self) {
        if let Clock::Paused(base) = self.clock {
            self.clock = Clock::Running {
                since: Instant::now(),
                base,
            };
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.clock, Clock::Paused(_))
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|(_, deadline, _)| *deadline)
            .min_by(f64::total_cmp)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl<T> Scheduler<T> for TaskQueue<T> {
    fn now(&self) -> f64 {
        match self.clock {
            Clock::Running { since, base } => base + since.elapsed().as_secs_f64(),
            Clock::Paused(t) | Clock::Manual(t) => t,
        }
    }

    fn request_frame(&mut self, job: T) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push((handle, job));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(h, _)| *h != handle);
        self.frames.len() != before
    }

    fn set_timeout(&mut self, delay: f64, job: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        let deadline = self.now() + delay.max(0.0);
        self.timers.push((handle, deadline, job));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|(h, _, _)| *h != handle);
        self.timers.len() != before
    }

    fn take_frame(&mut self) -> Vec<(FrameHandle, T)> {
        std::mem::take(&mut self.frames)
    }

    fn take_due_timers(&mut self) -> Vec<(TimerHandle, T)> {
        let now = self.now();
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|(_, deadline, _)| *deadline <= now);
        self.timers = pending;
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        due.into_iter().map(|(handle, _, job)| (handle, job)).collect()
    }

    fn outstanding(&self) -> usize {
        self.frames.len() + self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn frames_run_in_request_order_and_defer_new_requests() {
        let mut queue = TaskQueue::manual();
        queue.request_frame("a");
        queue.request_frame("b");
        let frame = queue.take_frame();
        assert_eq!(frame.iter().map(|(_, j)| *j).collect::<Vec<_>>(), ["a", "b"]);

        queue.request_frame("c");
        assert_eq!(queue.pending_frames(), 1);
        assert_eq!(queue.take_frame().len(), 1);
        assert!(queue.take_frame().is_empty());
    }

    #[test]
    fn cancelled_frame_never_runs() {
        let mut queue = TaskQueue::manual();
        let first = queue.request_frame(1);
        queue.request_frame(2);
        assert!(queue.cancel_frame(first));
        assert!(!queue.cancel_frame(first));
        let jobs: Vec<i32> = queue.take_frame().into_iter().map(|(_, j)| j).collect();
        assert_eq!(jobs, vec![2]);
    }

    #[test]
    fn timers_fire_at_deadline_in_order() {
        let mut queue = TaskQueue::manual();
        queue.set_timeout(0.5, "late");
        queue.set_timeout(0.1, "early");
        let cleared = queue.set_timeout(0.2, "cleared");
        assert!(queue.clear_timeout(cleared));
        assert_eq!(queue.next_deadline(), Some(0.1));

        queue.advance_by(0.05);
        assert!(queue.take_due_timers().is_empty());

        queue.set_time(1.0);
        let fired: Vec<&str> = queue.take_due_timers().into_iter().map(|(_, j)| j).collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert_eq!(queue.outstanding(), 0);
    }

    #[test]
    fn outstanding_counts_frames_and_timers() {
        let mut queue = TaskQueue::manual();
        queue.request_frame(());
        queue.set_timeout(1.0, ());
        queue.set_timeout(2.0, ());
        assert_eq!(queue.outstanding(), 3);
    }

    #[test]
    fn paused_clock_holds_still_and_resumes_from_there() {
        let mut queue: TaskQueue<()> = TaskQueue::monotonic();
        queue.pause();
        assert!(queue.is_paused());
        let frozen = queue.now();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(queue.now(), frozen);

        queue.resume();
        assert!(!queue.is_paused());
        let resumed = queue.now();
        assert!(resumed >= frozen);
        assert!(resumed - frozen < 0.015);
    }

    #[test]
    fn pause_leaves_manual_clock_alone() {
        let mut queue: TaskQueue<()> = TaskQueue::manual();
        queue.pause();
        assert!(!queue.is_paused());
        queue.advance_by(1.0);
        assert_eq!(queue.now(), 1.0);
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let queue: TaskQueue<()> = TaskQueue::monotonic();
        let a = queue.now();
        let b = queue.now();
        assert!(b >= a);
    }
}
