//! Character-by-character text reveal for offer descriptions.
//!
//! Cosmetic only: the form engine never depends on it. A [`TypingReveal`] yields
//! growing prefixes of its text, each tagged with the offset at which it should be
//! shown, and stops early once its [`RevealHandle`] is cancelled.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

/// One step of the reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    pub text: String,
    /// Delay from the start of the reveal.
    pub at: Duration,
}

/// Cancels a running reveal from another owner, e.g. when the description is replaced.
#[derive(Debug, Clone, Default)]
pub struct RevealHandle(Arc<AtomicBool>);

impl RevealHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct TypingReveal {
    chars: Vec<char>,
    shown: usize,
    interval: Duration,
    handle: RevealHandle,
}

impl TypingReveal {
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        Self {
            chars: text.into().chars().collect(),
            shown: 0,
            interval,
            handle: RevealHandle::default(),
        }
    }

    pub fn handle(&self) -> RevealHandle {
        self.handle.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.chars.len()
    }

    /// Total time to reveal the whole text.
    pub fn duration(&self) -> Duration {
        self.interval
            .saturating_mul(u32::try_from(self.chars.len()).unwrap_or(u32::MAX))
    }

    /// Drives the reveal in real time, handing each prefix to `show`.
    /// Returns false when cancelled before the text was complete.
    pub fn play(mut self, mut show: impl FnMut(&str)) -> bool {
        let mut elapsed = Duration::ZERO;
        while let Some(frame) = self.next() {
            if let Some(wait) = frame.at.checked_sub(elapsed) {
                thread::sleep(wait);
            }
            elapsed = frame.at;
            if self.handle.is_cancelled() {
                return false;
            }
            show(&frame.text);
        }
        !self.handle.is_cancelled()
    }
}

impl Iterator for TypingReveal {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<RevealFrame> {
        if self.handle.is_cancelled() || self.is_finished() {
            return None;
        }
        self.shown += 1;
        Some(RevealFrame {
            text: self.chars[..self.shown].iter().collect(),
            at: self
                .interval
                .saturating_mul(u32::try_from(self.shown).unwrap_or(u32::MAX)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_grow_one_character_at_a_time() {
        let frames: Vec<RevealFrame> =
            TypingReveal::new("Umrah", Duration::from_millis(10)).collect();

        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0].text, "U");
        assert_eq!(frames[4].text, "Umrah");
        assert_eq!(frames[4].at, Duration::from_millis(50));
    }

    #[test]
    fn multibyte_text_is_split_on_characters() {
        let frames: Vec<String> = TypingReveal::new("Zürich", Duration::ZERO)
            .map(|frame| frame.text)
            .collect();
        assert_eq!(frames[1], "Zü");
        assert_eq!(frames.last().map(String::as_str), Some("Zürich"));
    }

    #[test]
    fn cancelling_stops_the_sequence() {
        let mut reveal = TypingReveal::new("Istanbul", Duration::ZERO);
        let handle = reveal.handle();
        assert!(reveal.next().is_some());
        handle.cancel();
        assert!(reveal.next().is_none());
    }

    #[test]
    fn play_reports_cancellation() {
        let reveal = TypingReveal::new("Makkah", Duration::ZERO);
        let handle = reveal.handle();
        let mut shown = Vec::new();
        let completed = reveal.play(|text| {
            shown.push(text.to_string());
            if shown.len() == 2 {
                handle.cancel();
            }
        });
        assert!(!completed);
        assert_eq!(shown, vec!["M", "Ma"]);

        let full = TypingReveal::new("Ok", Duration::ZERO);
        assert!(full.play(|_| {}));
        assert_eq!(
            TypingReveal::new("abc", Duration::from_millis(4)).duration(),
            Duration::from_millis(12)
        );
    }
}
