use crate::error::KeyError;
use std::cmp::Ordering;
use std::fmt;

/// A finite `f64` usable as a tree key.
///
/// NaN and the infinities are rejected at construction, and `-0.0` is folded
/// into `0.0`, so equality and ordering agree everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct Key(f64);

impl Key {
    /// Sentinel substituted for values that cannot be keyed.
    pub const ZERO: Key = Key(0.0);

    pub fn new(value: f64) -> Result<Self, KeyError> {
        if !value.is_finite() {
            return Err(KeyError::NotFinite(value));
        }
        // -0.0 + 0.0 == +0.0
        Ok(Self(value + 0.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Key {
    type Error = KeyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Key> for f64 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(Key::new(f64::NAN).map_err(|_| ()), Err(()));
        assert_eq!(
            Key::new(f64::INFINITY),
            Err(KeyError::NotFinite(f64::INFINITY))
        );
        assert!(Key::try_from(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        let neg = Key::new(-0.0).unwrap();
        assert_eq!(neg, Key::ZERO);
        assert_eq!(neg.cmp(&Key::ZERO), Ordering::Equal);
        assert!(neg.get().is_sign_positive());
    }

    #[test]
    fn test_ordering() {
        let mut keys: Vec<Key> = [3.5, -2.0, 0.0, 1e9, -1e-9]
            .into_iter()
            .map(|v| Key::new(v).unwrap())
            .collect();
        keys.sort();
        let values: Vec<f64> = keys.into_iter().map(f64::from).collect();
        assert_eq!(values, vec![-2.0, -1e-9, 0.0, 3.5, 1e9]);
    }
}
