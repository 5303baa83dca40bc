use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;

/// Admission checks applied to keys and values by the checked map
/// operations.
///
/// Both predicates default to `false`, so opting a custom type in is a
/// single empty impl:
///
/// ```rust
/// use chain_hash::Argument;
///
/// #[derive(Hash, PartialEq, Eq)]
/// struct UserId(u64);
///
/// impl Argument for UserId {}
/// ```
///
/// The provided impls treat `None` as the absent (null) argument and the
/// empty string as the disallowed empty sentinel. Keys are rejected if they
/// are either; values are only rejected if they are the empty sentinel, so
/// `None` is a perfectly good value.
pub trait Argument {
    /// Returns `true` if this value stands in for a missing argument.
    fn is_absent(&self) -> bool {
        false
    }

    /// Returns `true` if this value is the disallowed empty sentinel.
    fn is_empty_sentinel(&self) -> bool {
        false
    }
}

macro_rules! plain_arguments {
    ($($ty:ty),* $(,)?) => {
        $(impl Argument for $ty {})*
    };
}

plain_arguments!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

impl<A, B> Argument for (A, B) {}

impl<A, B, C> Argument for (A, B, C) {}

impl<T> Argument for Vec<T> {}

impl Argument for str {
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl Argument for String {
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl Argument for Cow<'_, str> {
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Argument> Argument for Option<T> {
    fn is_absent(&self) -> bool {
        match self {
            Some(value) => value.is_absent(),
            None => true,
        }
    }

    fn is_empty_sentinel(&self) -> bool {
        self.as_ref().is_some_and(Argument::is_empty_sentinel)
    }
}

impl<T: Argument + ?Sized> Argument for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn is_empty_sentinel(&self) -> bool {
        (**self).is_empty_sentinel()
    }
}

impl<T: Argument + ?Sized> Argument for Box<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn is_empty_sentinel(&self) -> bool {
        (**self).is_empty_sentinel()
    }
}

pub(crate) fn check_key<Q: Argument + ?Sized>(key: &Q) -> Result<()> {
    if key.is_absent() {
        log::trace!("rejecting absent key");
        return Err(Error::InvalidArgument("key cannot be null"));
    }
    if key.is_empty_sentinel() {
        log::trace!("rejecting empty key");
        return Err(Error::InvalidArgument("key cannot be empty"));
    }
    Ok(())
}

pub(crate) fn check_value<V: Argument + ?Sized>(value: &V) -> Result<()> {
    if value.is_empty_sentinel() {
        log::trace!("rejecting empty value");
        return Err(Error::InvalidArgument("value cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn keys() {
        assert_eq!(check_key(&5u64), Ok(()));
        assert_eq!(check_key("key"), Ok(()));
        assert_eq!(check_key(&Some(0i32)), Ok(()));
        assert_eq!(
            check_key(&None::<i32>),
            Err(Error::InvalidArgument("key cannot be null"))
        );
        assert_eq!(
            check_key(""),
            Err(Error::InvalidArgument("key cannot be empty"))
        );
        assert_eq!(
            check_key(&Some(String::new())),
            Err(Error::InvalidArgument("key cannot be empty"))
        );
        assert_eq!(
            check_key(&Some(None::<u8>)),
            Err(Error::InvalidArgument("key cannot be null"))
        );
    }

    #[test]
    fn values() {
        assert_eq!(check_value(&None::<&str>), Ok(()));
        assert_eq!(check_value(&' '), Ok(()));
        assert_eq!(check_value(&" ".to_string()), Ok(()));
        assert_eq!(check_value(&Vec::<u8>::new()), Ok(()));
        assert_eq!(
            check_value(&Box::new(String::new())),
            Err(Error::InvalidArgument("value cannot be empty"))
        );
        assert_eq!(
            check_value(&Cow::Borrowed("")),
            Err(Error::InvalidArgument("value cannot be empty"))
        );
    }
}
