/// Iterator over the non-empty prefixes of a word, yielding them in order of increasing length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes<'a, S> {
    buf: &'a [S],
    length: usize,
}

impl<'a, S> Prefixes<'a, S> {
    /// Creates a new iterator over the prefixes of `buf`.
    pub fn new(buf: &'a [S]) -> Self {
        Self { buf, length: 0 }
    }
}

impl<'a, S> Iterator for Prefixes<'a, S> {
    type Item = &'a [S];

    fn next(&mut self) -> Option<Self::Item> {
        if self.length < self.buf.len() {
            self.length += 1;
            Some(&self.buf[..self.length])
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.length;
        (remaining, Some(remaining))
    }
}

impl<'a, S> ExactSizeIterator for Prefixes<'a, S> {}

/// Iterator over the non-empty suffixes of a word, yielding them in order of increasing length.
/// So for `abc` we first obtain `c`, then `bc` and finally `abc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffixes<'a, S> {
    buf: &'a [S],
    length: usize,
}

impl<'a, S> Suffixes<'a, S> {
    /// Creates a new iterator over the suffixes of `buf`.
    pub fn new(buf: &'a [S]) -> Self {
        Self { buf, length: 0 }
    }
}

impl<'a, S> Iterator for Suffixes<'a, S> {
    type Item = &'a [S];

    fn next(&mut self) -> Option<Self::Item> {
        if self.length < self.buf.len() {
            self.length += 1;
            Some(&self.buf[(self.buf.len() - self.length)..])
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.length;
        (remaining, Some(remaining))
    }
}

impl<'a, S> ExactSizeIterator for Suffixes<'a, S> {}
