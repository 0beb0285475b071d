use {
    static_assertions::const_assert_eq,
    std::mem::{align_of, size_of},
};

/// Number of bytes available for inline (small) callable storage: one pointer.
///
/// x86: 4b
/// x64: 8b
pub const INLINE_CAPACITY: usize = size_of::<*mut ()>();

/// Alignment of the inline callable storage: that of a pointer.
pub const INLINE_ALIGN: usize = align_of::<*mut ()>();

const_assert_eq!(INLINE_CAPACITY, size_of::<usize>());
const_assert_eq!(INLINE_ALIGN, align_of::<usize>());

/// Returns `true` if values of type `T` are stored inline in the [`Function`],
/// `false` if they are boxed.
///
/// A type is small if it fits in one pointer and its alignment divides the pointer's.
/// Rust moves never fail, so every small type is safely relocatable.
///
/// [`Function`]: struct.Function.html
pub const fn is_small<T>() -> bool {
    size_of::<T>() <= INLINE_CAPACITY && INLINE_ALIGN % align_of::<T>() == 0
}

/// How a [`Function`] currently holds its callable.
///
/// [`Function`]: struct.Function.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoragePolicy {
    /// Nothing is held.
    Empty,
    /// The callable lives in the wrapper's own pointer-sized buffer.
    Inline,
    /// The buffer holds a pointer to a boxed callable.
    Heap,
}

impl StoragePolicy {
    /// The policy permanently bound to values of type `T`.
    pub const fn of<T>() -> Self {
        if is_small::<T>() {
            StoragePolicy::Inline
        } else {
            StoragePolicy::Heap
        }
    }
}
