//! Haptic/notification feedback seam.
//!
//! Feedback is purely cosmetic: fired on flips, countdown ticks, and
//! completion, with no return value consumed by the session logic. The
//! default methods are no-ops so implementations only override what they
//! care about.

/// Fire-and-forget feedback hooks
pub trait FeedbackSink {
    /// A group of cards was revealed
    fn flip(&self) {}

    /// One second of the pre-workout countdown elapsed
    fn countdown_tick(&self) {}

    /// The final card was consumed
    fn complete(&self) {}
}

/// Feedback sink that does nothing
pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {}
