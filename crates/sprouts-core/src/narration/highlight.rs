/// Character span of the word being read, within the current page's text.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct HighlightRange {
    pub offset: u32,
    pub length: u32,
}

impl HighlightRange {
    pub const EMPTY: Self = Self {
        offset: 0,
        length: 0,
    };

    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub const fn end(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }
}
