use blake3::Hash;

/// Text element owned by a view. Content is fingerprinted so setting the
/// same text again does not count as a render.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
    hash: Option<Hash>,
    renders: u64,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the text changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let new_hash = blake3::hash(text.as_bytes());
        if self.hash.map(|h| h != new_hash).unwrap_or(true) {
            self.text = text;
            self.hash = Some(new_hash);
            self.renders = self.renders.saturating_add(1);
            return true;
        }
        false
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}
