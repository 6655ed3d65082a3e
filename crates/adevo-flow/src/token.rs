/// Correlation id for one outstanding external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallToken(u64);

impl CallToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tokens in increasing order, never repeating within a machine.
#[derive(Debug, Default)]
pub(crate) struct TokenSource {
    last: u64,
}

impl TokenSource {
    pub(crate) fn issue(&mut self) -> CallToken {
        self.last += 1;
        CallToken(self.last)
    }
}

/// What happened to a call result handed back to a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The machine was waiting on this call and moved on.
    Applied,
    /// The machine had moved on already; the result was dropped.
    Stale,
}
