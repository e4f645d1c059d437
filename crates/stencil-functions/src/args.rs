//! Argument unpacking for capabilities
//!
//! The lowerer validates arity before any capability runs, so a mismatch
//! here is an internal error.

use stencil_plugin::{LowerError, LowerResult};

/// Move exactly `N` arguments into an array
pub(crate) fn take<const N: usize, T>(function: &str, args: Vec<T>) -> LowerResult<[T; N]> {
    let actual = args.len();
    args.try_into().map_err(|_| mismatch(function, N, actual))
}

/// Borrow exactly `N` arguments as an array
pub(crate) fn borrow<'a, const N: usize, T>(
    function: &str,
    args: &'a [T],
) -> LowerResult<&'a [T; N]> {
    args.try_into().map_err(|_| mismatch(function, N, args.len()))
}

/// Check that `args` has one of the declared arities
pub(crate) fn between<T>(function: &str, args: &[T], min: usize, max: usize) -> LowerResult<()> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(LowerError::internal(format!(
            "'{}' lowered with {} argument(s), expected {} to {}",
            function,
            args.len(),
            min,
            max
        )))
    }
}

fn mismatch(function: &str, expected: usize, actual: usize) -> LowerError {
    LowerError::internal(format!(
        "'{}' lowered with {} argument(s), expected {}",
        function, actual, expected
    ))
}
