//! Re-chunking of streamed model text into speech-sized fragments.
//!
//! Text-to-speech sounds best when fed whole sentences, so deltas are
//! buffered and released at sentence ends, at clause breaks once the buffer
//! gets long, or unconditionally once it gets very long. Concatenating every
//! emitted fragment reproduces the input exactly.

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];
const CLAUSE_TERMINATORS: [char; 3] = [',', ';', ':'];

/// Buffer length (chars) above which a clause break may be used.
const CLAUSE_SPLIT_THRESHOLD: usize = 150;
/// A clause break must sit past this many chars to be used.
const CLAUSE_MIN_POSITION: usize = 50;
/// Buffer length (chars) above which everything is flushed.
const HARD_FLUSH_THRESHOLD: usize = 200;

#[derive(Debug, Default)]
pub struct SpeechChunker {
    buffer: String,
}

impl SpeechChunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a delta; returns the fragments that became ready, in order.
    pub fn push(&mut self, delta: &str) -> Vec<String> {
        self.buffer.push_str(delta);
        let mut ready = Vec::new();

        if let Some(idx) = self.buffer.rfind(SENTENCE_TERMINATORS) {
            ready.push(self.take_through(idx));
        }

        loop {
            let len = self.buffer.chars().count();
            if len > CLAUSE_SPLIT_THRESHOLD {
                if let Some(idx) = self.buffer.rfind(CLAUSE_TERMINATORS) {
                    if self.buffer[..idx].chars().count() > CLAUSE_MIN_POSITION {
                        ready.push(self.take_through(idx));
                        continue;
                    }
                }
            }
            if len > HARD_FLUSH_THRESHOLD {
                ready.push(std::mem::take(&mut self.buffer));
                continue;
            }
            break;
        }

        ready
    }

    /// Release whatever is left once the stream ends.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Split off everything up to and including the ASCII char at `idx`.
    fn take_through(&mut self, idx: usize) -> String {
        let rest = self.buffer.split_off(idx + 1);
        std::mem::replace(&mut self.buffer, rest)
    }
}
