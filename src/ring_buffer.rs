use std::fmt;
use std::iter::FusedIterator;
use std::mem;

/// Fixed-capacity ring buffer. Oldest entry is overwritten when full.
///
/// Storage is an inline `[T; N]`, so nothing is allocated after construction.
/// The buffer is move-only: it implements neither `Clone` nor `Copy`.
///
/// ```
/// use circbuf::RingBuffer;
///
/// let mut buf: RingBuffer<i32, 4> = RingBuffer::new();
/// for v in 1..=5 {
///     buf.write(v);
/// }
/// assert!(buf.is_full());
/// assert_eq!(buf.to_string(), "2 3 4 5");
/// assert_eq!(buf.read(), Some(2));
/// ```
///
/// `N` must be at least 4:
///
/// ```compile_fail
/// let _buf: circbuf::RingBuffer<u8, 3> = circbuf::RingBuffer::new();
/// ```
pub struct RingBuffer<T, const N: usize> {
    storage: [T; N],
    head: usize, // oldest element
    tail: usize, // next write
    count: usize,
}

impl<T: Default, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        const { assert!(N >= 4, "RingBuffer capacity N must be at least 4") };
        Self {
            storage: std::array::from_fn(|_| T::default()),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Removes and returns the oldest element, or `None` when empty.
    ///
    /// The vacated slot is left holding `T::default()`.
    pub fn read(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = mem::take(&mut self.storage[self.head]);
        self.head = advance::<N>(self.head);
        self.count -= 1;
        Some(value)
    }

    /// Like [`clear`](Self::clear), but also resets every slot to
    /// `T::default()` so stale values are dropped right away. O(N).
    pub fn wipe(&mut self) {
        self.storage.iter_mut().for_each(|slot| *slot = T::default());
        self.clear();
    }
}

impl<T: Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    pub const CAPACITY: usize = N;

    /// Writes `value` as the newest element, evicting the oldest when full.
    pub fn write(&mut self, value: T) {
        self.storage[self.tail] = value;
        if self.count == N {
            self.head = advance::<N>(self.head);
        } else {
            self.count += 1;
        }
        self.tail = advance::<N>(self.tail);
    }

    /// Forgets all stored elements. Slots are not reset: stale values stay
    /// alive until overwritten or until the buffer is dropped.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize { self.count }
    pub fn is_empty(&self) -> bool { self.count == 0 }
    pub fn is_full(&self) -> bool { self.count == N }
    pub fn capacity(&self) -> usize { N }

    /// The element the next [`read`](Self::read) would return.
    pub fn peek_oldest(&self) -> Option<&T> {
        if self.count == 0 { None } else { Some(&self.storage[self.head]) }
    }

    /// The most recently written element still stored.
    pub fn peek_newest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        Some(&self.storage[(self.tail + N - 1) % N])
    }

    /// Iterates over the stored elements, oldest first.
    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter { buf: self, pos: self.head, remaining: self.count }
    }

    /// Space-separated rendering of the contents, oldest first.
    pub fn render(&self) -> String
    where
        T: fmt::Display,
    {
        self.to_string()
    }
}

fn advance<const N: usize>(index: usize) -> usize {
    (index + 1) % N
}

impl<T: fmt::Display, const N: usize> fmt::Display for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &N)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T, const N: usize> Extend<T> for RingBuffer<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.write(value);
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a RingBuffer<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`RingBuffer`], oldest first.
pub struct Iter<'a, T, const N: usize> {
    buf: &'a RingBuffer<T, N>,
    pos: usize,
    remaining: usize,
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.buf.storage[self.pos];
        self.pos = advance::<N>(self.pos);
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, const N: usize> ExactSizeIterator for Iter<'_, T, N> {}
impl<T, const N: usize> FusedIterator for Iter<'_, T, N> {}
