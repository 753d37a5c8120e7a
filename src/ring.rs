use crate::error::{Error, Result};

/// Circular seating: seat `i` sits between `left(i)` and `right(i)`.
///
/// Neighbors are plain indices into whatever arena the table keeps, so no
/// philosopher ever holds a reference to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    len: usize,
}

// never empty, `new` rejects fewer than 2 seats
#[allow(clippy::len_without_is_empty)]
impl Ring {
    pub fn new(len: usize) -> Result<Self> {
        // a lone philosopher would need the same chopstick in both hands
        if len < 2 {
            return Err(Error::TooFewPhilosophers { count: len });
        }
        Ok(Ring { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn left(&self, seat: usize) -> usize {
        debug_assert!(seat < self.len);
        (seat + self.len - 1) % self.len
    }

    pub fn right(&self, seat: usize) -> usize {
        debug_assert!(seat < self.len);
        (seat + 1) % self.len
    }

    pub fn seats(&self) -> std::ops::Range<usize> {
        0..self.len
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_neighbors_invert() {
        for n in 2..=9 {
            let ring = Ring::new(n).unwrap();
            for i in ring.seats() {
                assert_eq!(ring.left(ring.right(i)), i);
                assert_eq!(ring.right(ring.left(i)), i);
            }
        }
    }

    #[test]
    fn test_wraps_around() {
        let ring = Ring::new(5).unwrap();
        assert_eq!(ring.left(0), 4);
        assert_eq!(ring.right(4), 0);
        assert_eq!(ring.right(2), 3);
    }

    #[test]
    fn test_two_seats_share_both_sides() {
        let ring = Ring::new(2).unwrap();
        assert_eq!(ring.left(0), 1);
        assert_eq!(ring.right(0), 1);
        assert_eq!(ring.left(1), ring.right(1));
    }

    #[test]
    fn test_too_few_seats() {
        assert!(matches!(
            Ring::new(1),
            Err(Error::TooFewPhilosophers { count: 1 })
        ));
        assert!(Ring::new(0).is_err());
    }
}
