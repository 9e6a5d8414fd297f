use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{CborError, ErrorCode};

/// Grow `v` by `additional` elements without aborting on failure.
///
/// Sizes that overflow `isize` report `LengthOverflow`; a refused allocation reports
/// `AllocationFailed`. Both carry `offset`.
pub(crate) fn try_reserve<T>(
    v: &mut Vec<T>,
    additional: usize,
    offset: usize,
) -> Result<(), CborError> {
    if v.capacity() - v.len() >= additional {
        return Ok(());
    }
    let needed = v
        .len()
        .checked_add(additional)
        .filter(|&n| Layout::array::<T>(n).is_ok())
        .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, offset))?;
    v.try_reserve(needed - v.len())
        .map_err(|_| CborError::new(ErrorCode::AllocationFailed, offset))
}
