//! Random names and numbers for test resources

use rand::distributions::{Alphanumeric, Uniform};
use rand::Rng;

const NAME_LENGTH: usize = 12;

/// Random resource name: lower-case letters and digits
pub fn name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NAME_LENGTH)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Random string of `len` letters in `a..=z`
pub fn lowercase(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(Uniform::new_inclusive(b'a', b'z'))
        .take(len)
        .map(char::from)
        .collect()
}

/// Random number in `1..=100`
pub fn number() -> i64 {
    number_between(1, 100)
}

/// Random number between `a` and `b`, both inclusive, in either order
pub fn number_between(a: i64, b: i64) -> i64 {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    rand::thread_rng().gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        let n = name();
        assert_eq!(n.len(), NAME_LENGTH);
        assert!(n.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_lowercase() {
        let s = lowercase(10);
        assert_eq!(s.len(), 10);
        assert!(s.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_number_range() {
        for _ in 0..200 {
            let n = number();
            assert!((1..=100).contains(&n));
        }
        assert_eq!(number_between(7, 7), 7);
    }

    #[test]
    fn test_number_between_inverted_bounds() {
        for _ in 0..50 {
            let n = number_between(10, 1);
            assert!((1..=10).contains(&n));
        }
    }
}
