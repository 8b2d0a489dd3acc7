use crate::identity::ScreenId;

/// Back-stack of visited screens. Each screen appears at most once; the last
/// element is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<ScreenId>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `id` on top, dropping any earlier occurrence first.
    pub fn record(&mut self, id: ScreenId) {
        self.entries.retain(|entry| *entry != id);
        self.entries.push(id);
    }

    pub fn top(&self) -> Option<&ScreenId> {
        self.entries.last()
    }

    pub fn pop(&mut self) -> Option<ScreenId> {
        self.entries.pop()
    }

    /// Drop everything above position `index`, leaving it on top.
    pub fn truncate_to(&mut self, index: usize) {
        self.entries.truncate(index + 1);
    }

    /// Nearest entry below the top accepted by `is_live`, scanning downwards.
    pub fn find_below_top(&self, mut is_live: impl FnMut(&ScreenId) -> bool) -> Option<usize> {
        let below = self.entries.len().checked_sub(1)?;
        self.entries[..below].iter().rposition(|id| is_live(id))
    }

    pub fn contains(&self, id: &ScreenId) -> bool {
        self.entries.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bottom-to-top view of the stack.
    pub fn as_slice(&self) -> &[ScreenId] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenId> {
        self.entries.iter()
    }
}
