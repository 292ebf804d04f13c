use thiserror::Error;

/// Failure while generating CPU-side geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Parameters violate a length or shape rule of the builder.
    #[error("malformed {shape} parameters: {reason}")]
    Malformed { shape: &'static str, reason: String },

    /// An output array could not be allocated.
    #[error("out of memory building {shape} ({bytes} bytes requested)")]
    Allocation { shape: &'static str, bytes: usize },

    /// Indexed geometry needs more vertices than a u16 index can address.
    #[error("{vertices} vertices cannot be addressed with 16-bit indices")]
    IndexOverflow { vertices: usize },
}

impl GeometryError {
    pub(crate) fn malformed(shape: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed { shape, reason: reason.into() }
    }

    /// True for failures caused by memory exhaustion.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}

/// Allocates an empty vector with room for exactly `len` elements.
///
/// Allocation failure is reported instead of aborting the process.
pub(crate) fn try_vec<T>(shape: &'static str, len: usize) -> Result<Vec<T>, GeometryError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| GeometryError::Allocation {
        shape,
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    Ok(v)
}

/// Multiplies element counts, treating overflow as an allocation failure.
pub(crate) fn checked_len(shape: &'static str, factors: &[usize]) -> Result<usize, GeometryError> {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or(GeometryError::Allocation { shape, bytes: usize::MAX })
}
