use std::fmt::Display;

/// An inclusive range of integers `[min..max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub min: i32,
    pub max: i32,
}

impl Interval {
    pub fn new(min: i32, max: i32) -> Self {
        Interval { min, max }
    }

    pub fn singleton(value: i32) -> Self {
        Interval::new(value, value)
    }

    pub fn size(&self) -> u64 {
        (self.max as i64 - self.min as i64 + 1) as u64
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn values(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "[{}..{}]", self.min, self.max)
        }
    }
}
