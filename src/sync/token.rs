/// Opaque token identifying one submission to a [`Device`](crate::Device).
///
/// Tokens are handed out by [`Device::submit()`](crate::Device::submit) and can be queried through
/// [`Device::is_complete()`](crate::Device::is_complete). The graph never interprets the value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionToken(pub u64);

impl CompletionToken {
    /// Get the raw token value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for CompletionToken {
    fn from(value: u64) -> Self {
        CompletionToken(value)
    }
}
