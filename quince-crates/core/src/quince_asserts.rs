//! Leveled assertions for the internal invariants of the propagation core.
//!
//! The active level is fixed at compile time; the `debug-checks` feature raises it so that the
//! expensive checks (e.g. verifying the queues after every drain) are executed as well.

#[cfg(not(feature = "debug-checks"))]
pub(crate) const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_SIMPLE;
#[cfg(feature = "debug-checks")]
pub(crate) const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_ADVANCED;

/// Cheap checks which are always performed.
pub(crate) const QUINCE_ASSERT_SIMPLE: u8 = 1;
/// Checks which are linear in the size of a single queue or domain.
pub(crate) const QUINCE_ASSERT_MODERATE: u8 = 2;
/// Checks which may traverse the whole graph.
pub(crate) const QUINCE_ASSERT_ADVANCED: u8 = 3;

macro_rules! quince_assert_simple {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! quince_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! quince_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! quince_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::quince_asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::quince_asserts::QUINCE_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

pub(crate) use quince_assert_advanced;
pub(crate) use quince_assert_eq_simple;
pub(crate) use quince_assert_moderate;
pub(crate) use quince_assert_simple;
