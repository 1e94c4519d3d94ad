use std::iter;
use std::ops::Deref;

/// Fixed-length history of the most recent `size()` values.
///
/// Writes land at a cursor that wraps around, so pushing is O(1). Reading
/// the history in arrival order starts at the cursor and wraps once.
#[derive(Debug, Clone)]
pub struct Fifo<T> {
    buf: Vec<T>,
    cursor: usize,
}

impl<T> Fifo<T> {
    pub fn new(sz: usize) -> Fifo<T> where T: Default + Clone {
        let mut buffer = Vec::with_capacity(sz);
        buffer.extend(iter::repeat(Default::default()).take(sz));
        Fifo { buf: buffer, cursor: 0 }
    }

    /// Overwrite the oldest value. Returns `true` when the cursor wrapped
    /// back to the start, i.e. a whole `size()` block has been written.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.buf[self.cursor] = value;
        self.cursor += 1;
        if self.cursor == self.buf.len() {
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn cursor(&self) -> usize { self.cursor }

    pub fn size(&self) -> usize { self.buf.len() }

    /// Copy the history into `dst`, oldest value first.
    pub fn unroll_into(&self, dst: &mut [T]) where T: Copy {
        assert_eq!(dst.len(), self.buf.len());
        let (newer, older) = self.buf.split_at(self.cursor);
        let split = older.len();
        dst[..split].copy_from_slice(older);
        dst[split..].copy_from_slice(newer);
    }
}

/// Raw storage order, not arrival order.
impl<T> Deref for Fifo<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { &self.buf }
}
