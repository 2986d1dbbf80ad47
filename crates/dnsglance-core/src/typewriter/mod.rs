//! Typewriter text sequence
//!
//! Cycles through a word list forever, typing each word one character at a
//! time, holding it, then deleting it at double speed.
//!
//! ```rust
//! use dnsglance_core::typewriter::Typewriter;
//! use std::time::Duration;
//!
//! let typewriter = Typewriter::new(
//!     vec!["AB".to_string()],
//!     Duration::from_millis(90),
//!     Duration::from_millis(1500),
//! )
//! .unwrap();
//!
//! let texts: Vec<String> = typewriter.take(4).map(|frame| frame.text).collect();
//! assert_eq!(texts, ["A", "AB", "A", ""]);
//! ```

use crate::config::TypewriterConfig;
use crate::error::{Error, Result};
use std::time::Duration;
use tokio_stream::Stream;

/// One display state of the typewriter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text to display
    pub text: String,
    /// Wait before this frame replaces the previous one
    pub delay: Duration,
}

/// Infinite, restartable typewriter sequence
///
/// Implements [`Iterator`] and never returns `None`. Characters are Unicode
/// scalar values.
#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<String>,
    speed: Duration,
    pause: Duration,
    index: usize,
    shown: usize,
    deleting: bool,
    holding: bool,
}

impl Typewriter {
    /// Create a typewriter over `words`
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `words` is empty.
    pub fn new(words: Vec<String>, speed: Duration, pause: Duration) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::invalid_input("Typewriter needs at least one word"));
        }

        Ok(Self {
            words,
            speed,
            pause,
            index: 0,
            shown: 0,
            deleting: false,
            holding: false,
        })
    }

    /// Create a typewriter from configuration
    pub fn from_config(config: &TypewriterConfig) -> Result<Self> {
        Self::new(
            config.words.clone(),
            Duration::from_millis(config.speed_ms),
            Duration::from_millis(config.pause_ms),
        )
    }

    /// Restart from the first word with nothing typed
    pub fn reset(&mut self) {
        self.index = 0;
        self.shown = 0;
        self.deleting = false;
        self.holding = false;
    }

    /// Word currently being typed or deleted
    pub fn current_word(&self) -> &str {
        &self.words[self.index]
    }

    /// Length in characters of the longest word
    pub fn max_len(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Advance one tick
    pub fn next_frame(&mut self) -> Frame {
        let word_len = self.current_word().chars().count();

        let delay = if self.deleting {
            let delay = if self.holding {
                self.pause + self.speed / 2
            } else {
                self.speed / 2
            };
            self.holding = false;
            self.shown = self.shown.saturating_sub(1);
            delay
        } else {
            self.shown = (self.shown + 1).min(word_len);
            self.speed
        };

        let text: String = self.current_word().chars().take(self.shown).collect();

        if !self.deleting && self.shown == word_len {
            self.deleting = true;
            self.holding = true;
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.index = (self.index + 1) % self.words.len();
        }

        Frame { text, delay }
    }

    /// Turn the sequence into a timed stream of display strings
    ///
    /// Each item is yielded after its frame's delay has elapsed.
    pub fn into_stream(self) -> impl Stream<Item = String> + Send + 'static {
        futures::stream::unfold(self, |mut typewriter| async move {
            let frame = typewriter.next_frame();
            tokio::time::sleep(frame.delay).await;
            Some((frame.text, typewriter))
        })
    }
}

impl Iterator for Typewriter {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        Some(self.next_frame())
    }
}
