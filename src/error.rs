use allocator_api2::alloc::AllocError;
use thiserror::Error;

/// Errors surfaced by fallible bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The allocation strategy could not provide a node block.
    ///
    /// The operation that failed left the list as it was before the element being inserted.
    #[error("allocator could not provide a node block")]
    Alloc,
}

impl From<AllocError> for Error {
    fn from(_: AllocError) -> Self {
        Self::Alloc
    }
}

/// Returned by single-element insertions when a node block could not be allocated.
///
/// The list is unchanged and the value is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("allocator could not provide a node block for the inserted value")]
pub struct TryInsertError<T> {
    pub(crate) value: T,
}

impl<T> TryInsertError<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns a reference to the value that could not be inserted.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> From<TryInsertError<T>> for Error {
    fn from(_: TryInsertError<T>) -> Self {
        Self::Alloc
    }
}
