//! Navigation state machine over a resolved step plan.
//!
//! States are step indices `0..N-1`, the initial state is 0 and the last step
//! replaces Next with Submit.

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// The cursor changed step.
    Moved,
    /// The request was refused; stay on the current step.
    Repeat,
    /// Nothing to navigate.
    NoOp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WizardCursor {
    index: usize,
    total: usize,
}

impl WizardCursor {
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.total > 0 && self.index + 1 == self.total
    }

    /// Advances when the current step is valid. The last step never advances.
    pub fn next(&mut self, step_valid: bool) -> WizardEvent {
        if self.total == 0 || self.is_last() {
            return WizardEvent::NoOp;
        }
        if !step_valid {
            return WizardEvent::Repeat;
        }
        self.index += 1;
        WizardEvent::Moved
    }

    pub fn back(&mut self) -> WizardEvent {
        if self.total == 0 {
            return WizardEvent::NoOp;
        }
        if self.is_first() {
            return WizardEvent::Repeat;
        }
        self.index -= 1;
        WizardEvent::Moved
    }

    /// Jumps to `index` when it lies before the current step.
    pub fn rewind_to(&mut self, index: usize) -> WizardEvent {
        if index < self.index {
            self.index = index;
            WizardEvent::Moved
        } else {
            WizardEvent::NoOp
        }
    }

    /// Adopts a new plan length, clamping the current position.
    pub fn resize(&mut self, total: usize) {
        self.total = total;
        self.index = self.index.min(total.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
