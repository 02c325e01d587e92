use std::{thread, time::Duration};

/// Iterator adapter that waits `delay` before handing out every item but the
/// first, so a computed path can be shown one step at a time.
#[derive(Debug)]
pub struct Paced<I> {
    inner: I,
    delay: Duration,
    started: bool,
}

impl<I: Iterator> Iterator for Paced<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if self.started && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.started = true;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub fn paced<I: IntoIterator>(items: I, delay: Duration) -> Paced<I::IntoIter> {
    Paced {
        inner: items.into_iter(),
        delay,
        started: false,
    }
}

/// Growing prefixes of `path`: the first cell, the first two, ... up to all of it
pub fn prefixes<T>(path: &[T]) -> impl Iterator<Item = &[T]> {
    (1..=path.len()).map(move |n| &path[..n])
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_prefixes() {
        let path = [1, 2, 3];
        let all: Vec<&[i32]> = prefixes(&path).collect();
        assert_eq!(all, vec![&[1][..], &[1, 2][..], &[1, 2, 3][..]]);
        assert_eq!(prefixes::<i32>(&[]).count(), 0);
    }

    #[test]
    fn test_paced_keeps_items() {
        let items: Vec<_> = paced(vec!['a', 'b', 'c'], Duration::ZERO).collect();
        assert_eq!(items, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_paced_waits_between_items() {
        let delay = Duration::from_millis(5);
        let began = Instant::now();
        assert_eq!(paced(0..3, delay).count(), 3);
        // two pauses for three items
        assert!(began.elapsed() >= delay * 2);
    }

    #[test]
    fn test_paced_first_item_is_immediate() {
        let mut it = paced(0..2, Duration::from_secs(60));
        let began = Instant::now();
        assert_eq!(it.next(), Some(0));
        assert!(began.elapsed() < Duration::from_secs(60));
    }
}
