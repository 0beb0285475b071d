use {
    crate::{Operations, Signature, StoragePolicy, BadFunctionCall},
    static_assertions::assert_eq_size,
    std::{
        cell::UnsafeCell,
        mem::{self, MaybeUninit},
        ptr,
    },
};

/// Type-erased callable storage.
///
/// The buffer is one pointer wide and pointer aligned.
/// It holds either the callable itself (`StoragePolicy::Inline`),
/// a pointer to the boxed callable (`StoragePolicy::Heap`) or nothing.
/// Which one is decided solely by the installed operation table.
#[repr(C)]
pub(crate) struct Storage<S: Signature + ?Sized> {
    pub(crate) ops: &'static Operations<S>, // offs 0b          size 4b / 8b
    buffer: UnsafeCell<MaybeUninit<*mut ()>>, // offs 4b / 8b     size 4b / 8b
}

assert_eq_size!(Storage<dyn Fn()>, [usize; 2]);
assert_eq_size!(Storage<dyn Fn(String, u64) -> Vec<u8>>, [usize; 2]);
assert_eq_size!(Storage<dyn Fn(u8) -> u8 + Send + Sync>, [usize; 2]);

// Only callables satisfying the auto trait bounds of `S` can be stored under `S`
// (see the `Callable` impls), and the tables are immutable.
unsafe impl<S: Signature + ?Sized + Send> Send for Storage<S> {}
unsafe impl<S: Signature + ?Sized + Sync> Sync for Storage<S> {}

impl<S: Signature + ?Sized> Storage<S> {
    pub(crate) fn empty() -> Self {
        Storage {
            ops: Operations::empty(),
            buffer: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Only the empty table carries `StoragePolicy::Empty`,
    /// so this needs no table lookup.
    pub(crate) fn is_empty(&self) -> bool {
        self.ops.policy == StoragePolicy::Empty
    }

    pub(crate) fn policy(&self) -> StoragePolicy {
        self.ops.policy
    }

    /// Moves `value` into the (empty) storage and installs `ops`.
    ///
    /// # Safety
    ///
    /// `ops` must be the table registered for `T` under the signature `S`.
    pub(crate) unsafe fn emplace<T>(&mut self, ops: &'static Operations<S>, value: T) {
        debug_assert!(self.is_empty());

        match ops.policy {
            StoragePolicy::Inline => self.inline::<T>().write(value),
            StoragePolicy::Heap => self.set_heap(Box::into_raw(Box::new(value))),
            StoragePolicy::Empty => unreachable!("tried to store a value under the empty table"),
        }

        self.ops = ops;
    }

    /// Invokes the held callable through the installed table.
    pub(crate) fn invoke(&self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        unsafe { (self.ops.invoke)(self, args) }
    }

    /// Returns a new storage holding a clone of this one's value.
    pub(crate) fn duplicate(&self) -> Self {
        let mut copy = Self::empty();
        unsafe { (self.ops.copy)(self, &mut copy) };
        copy
    }

    /// Moves the value out of `source` into this (empty) storage.
    /// `source` is left empty.
    pub(crate) fn adopt(&mut self, source: &mut Self) {
        debug_assert!(self.is_empty());
        unsafe { (source.ops.relocate)(source, self) };
    }

    /// Drops the held value, if any, leaving the storage empty.
    pub(crate) fn clear(&mut self) {
        mem::drop(mem::replace(self, Self::empty()));
    }

    /// Pointer to the held value.
    ///
    /// # Safety
    ///
    /// The caller guarantees the installed table is the one registered for `T`.
    pub(crate) unsafe fn value<T>(&self) -> *mut T {
        match self.ops.policy {
            StoragePolicy::Inline => self.inline::<T>(),
            StoragePolicy::Heap => self.heap::<T>(),
            StoragePolicy::Empty => ptr::null_mut(),
        }
    }

    /// Moves the held value out, leaving the storage empty.
    ///
    /// # Safety
    ///
    /// The caller guarantees the installed table is the one registered for `T`.
    pub(crate) unsafe fn take_value<T>(&mut self) -> T {
        let value = match self.ops.policy {
            StoragePolicy::Inline => self.inline::<T>().read(),
            StoragePolicy::Heap => *Box::from_raw(self.heap::<T>()),
            StoragePolicy::Empty => unreachable!("tried to take a value out of an empty storage"),
        };

        self.ops = Operations::empty();

        value
    }

    /// The buffer itself, viewed as an inline `T`.
    pub(crate) fn inline<T>(&self) -> *mut T {
        self.buffer.get().cast()
    }

    /// The boxed `T` the buffer points to.
    ///
    /// # Safety
    ///
    /// The buffer must have been initialized with [`set_heap`].
    ///
    /// [`set_heap`]: #method.set_heap
    pub(crate) unsafe fn heap<T>(&self) -> *mut T {
        (*self.buffer.get()).assume_init().cast()
    }

    pub(crate) fn set_heap<T>(&mut self, ptr: *mut T) {
        *self.buffer.get_mut() = MaybeUninit::new(ptr.cast());
    }
}

impl<S: Signature + ?Sized> Drop for Storage<S> {
    fn drop(&mut self) {
        unsafe { (self.ops.destroy)(self) }
    }
}
