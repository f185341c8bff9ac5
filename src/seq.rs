use std::fmt;

/// Generate [sequential][Seq] message numbers, starting from zero.
///
/// A fresh counter always begins at `0`; nothing is persisted between runs.
#[derive(Copy, Clone, Default, Debug)]
#[repr(transparent)]
pub struct Counter(u64);

impl Counter {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Take the current [`Seq`] and advance the counter.
    #[inline]
    pub fn next(&mut self) -> Seq {
        let (c, n) = (self.0, self.0.wrapping_add(1));
        self.0 = n;
        Seq::new(c)
    }

    /// The [`Seq`] the next call to [`next`][Counter::next] will return.
    ///
    /// Since counting starts at zero, this is also the number of values
    /// issued so far.
    #[inline]
    pub const fn peek(&self) -> Seq {
        Seq::new(self.0)
    }
}

impl Iterator for Counter {
    type Item = Seq;

    fn next(&mut self) -> Option<Self::Item> {
        Some(Counter::next(self))
    }
}

/// A sequential [`u64`] message number.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Seq(u64);

impl Seq {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<Seq> for u64 {
    fn from(value: Seq) -> Self {
        value.value()
    }
}

impl From<u64> for Seq {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
