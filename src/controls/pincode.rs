/// Which characters a pincode cell accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PincodeKind {
    #[default]
    Numeric,
    Alphanumeric,
}

impl PincodeKind {
    fn accept(self, c: char) -> Option<char> {
        match self {
            Self::Numeric => c.is_ascii_digit().then_some(c),
            Self::Alphanumeric => c.is_ascii_alphanumeric().then(|| c.to_ascii_uppercase()),
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Fixed-length code input split into blocks, e.g. `123 456`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PincodeControl {
    kind: PincodeKind,
    block_count: usize,
    block_size: usize,
    cells: Vec<char>,
}

impl Default for PincodeControl {
    fn default() -> Self {
        Self::new(PincodeKind::Numeric, 2, 3)
    }
}

impl PincodeControl {
    #[must_use]
    pub fn new(kind: PincodeKind, block_count: usize, block_size: usize) -> Self {
        let block_count = block_count.max(1);
        let block_size = block_size.max(1);
        Self {
            kind,
            block_count,
            block_size,
            cells: Vec::with_capacity(block_count * block_size),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.block_count * self.block_size
    }

    #[must_use]
    pub fn kind(&self) -> PincodeKind {
        self.kind
    }

    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Appends one character. Returns `false` if it was rejected.
    pub fn push(&mut self, c: char) -> bool {
        if self.is_complete() {
            return false;
        }
        match self.kind.accept(c) {
            Some(c) => {
                self.cells.push(c);
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) {
        self.cells.pop();
    }

    /// Replaces the value. Spaces and dashes in pasted codes are skipped.
    /// Any other rejected character, or more characters than fit, leaves the
    /// control empty and returns `false`.
    pub fn set(&mut self, value: &str) -> bool {
        self.cells.clear();
        for c in value.chars().filter(|c| !is_separator(*c)) {
            if !self.push(c) {
                self.cells.clear();
                return false;
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.cells.iter().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.capacity()
    }

    /// Cells grouped per block; unfilled cells are `None`.
    #[must_use]
    pub fn blocks(&self) -> Vec<Vec<Option<char>>> {
        (0..self.block_count)
            .map(|block| {
                (0..self.block_size)
                    .map(|cell| self.cells.get(block * self.block_size + cell).copied())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_rejects_letters_and_stops_at_capacity() {
        let mut pin = PincodeControl::default();
        assert_eq!(pin.capacity(), 6);
        assert!(!pin.push('a'));
        for c in "1234567".chars() {
            pin.push(c);
        }
        assert_eq!(pin.value(), "123456");
        assert!(pin.is_complete());
        assert!(!pin.push('8'));
    }

    #[test]
    fn paste_ignores_separators() {
        let mut pin = PincodeControl::default();
        assert!(pin.set("123-456"));
        assert_eq!(pin.value(), "123456");
        assert!(pin.set(" 12 3"));
        assert_eq!(pin.value(), "123");
        assert!(!pin.is_complete());
    }

    #[test]
    fn paste_that_does_not_fit_is_rejected() {
        let mut pin = PincodeControl::default();
        assert!(!pin.set("1234567"));
        assert!(pin.is_empty());
        assert!(!pin.set("12a456"));
        assert!(pin.is_empty());
        assert!(pin.set("123 456"));
        assert!(pin.is_complete());
    }

    #[test]
    fn alphanumeric_uppercases() {
        let mut pin = PincodeControl::new(PincodeKind::Alphanumeric, 2, 4);
        pin.set("ab12-cd34");
        assert_eq!(pin.value(), "AB12CD34");
        assert!(pin.is_complete());
    }

    #[test]
    fn backspace_and_blocks() {
        let mut pin = PincodeControl::default();
        pin.set("1234");
        pin.backspace();
        assert_eq!(pin.len(), 3);
        assert_eq!(
            pin.blocks(),
            vec![
                vec![Some('1'), Some('2'), Some('3')],
                vec![None, None, None]
            ]
        );
        pin.clear();
        assert!(pin.is_empty());
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let pin = PincodeControl::new(PincodeKind::Numeric, 0, 0);
        assert_eq!(pin.capacity(), 1);
    }
}
