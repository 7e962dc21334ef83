use tracing::warn;

/// Splits wall-clock time into bounded animation sub-steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: f64,
    max_step: f64,
}

impl FrameClock {
    /// Creates a clock starting at time zero.
    #[must_use]
    pub fn new(max_step: f64) -> Self {
        Self {
            last: 0.0,
            max_step,
        }
    }

    /// Time reached by the previous [`advance`](Self::advance).
    #[must_use]
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Moves the clock to `now`, returning the sub-steps `(t, t + dt)`
    /// covering `[last, now)` with `dt <= max_step`.
    ///
    /// Yields nothing if time did not move forward. A non-finite `now` is
    /// ignored and leaves the clock where it was. A non-positive or
    /// non-finite `max_step` covers the whole interval in one step.
    pub fn advance(&mut self, now: f64) -> SubSteps {
        let start = self.last;
        if !now.is_finite() {
            warn!(now, last = start, "ignoring non-finite frame time");
            return SubSteps {
                start,
                end: start,
                step: f64::INFINITY,
                index: 0,
            };
        }
        self.last = now;
        let step = if self.max_step > 0.0 && self.max_step.is_finite() {
            self.max_step
        } else {
            f64::INFINITY
        };
        SubSteps {
            start,
            end: now,
            step,
            index: 0,
        }
    }
}

/// Iterator over the sub-steps of one [`FrameClock::advance`].
#[derive(Debug, Clone)]
pub struct SubSteps {
    start: f64,
    end: f64,
    step: f64,
    index: u32,
}

impl Iterator for SubSteps {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let t = if self.step.is_finite() {
            self.start + f64::from(self.index) * self.step
        } else if self.index == 0 {
            self.start
        } else {
            return None;
        };
        if t < self.end {
            self.index += 1;
            Some((t, (t + self.step).min(self.end)))
        } else {
            None
        }
    }
}
