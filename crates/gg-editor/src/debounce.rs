use std::time::{Duration, Instant};

/// Délai de quiescence du seuil avant re-calcul.
pub const THRESHOLD_DEBOUNCE: Duration = Duration::from_millis(100);

/// Trailing-edge debouncer with an injected clock.
///
/// Each `queue` restarts the quiet period; `take_ready` fires once the
/// period has elapsed since the last `queue`.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
/// use gg_editor::debounce::Debouncer;
///
/// let t0 = Instant::now();
/// let mut d = Debouncer::new(Duration::from_millis(100));
/// d.queue(t0);
/// assert!(!d.take_ready(t0 + Duration::from_millis(99)));
/// assert!(d.take_ready(t0 + Duration::from_millis(100)));
/// assert_eq!(d.deadline(), None);
/// ```
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    queued_at: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            queued_at: None,
        }
    }

    /// (Re)start the quiet period at `now`, replacing any earlier request.
    pub fn queue(&mut self, now: Instant) {
        self.queued_at = Some(now);
    }

    /// `true` exactly once when the quiet period has elapsed.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.queued_at {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.queued_at = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        self.queued_at = None;
    }

    /// When the pending request becomes ready.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.queued_at.map(|at| at + self.delay)
    }
}
