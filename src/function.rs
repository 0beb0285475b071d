use {
    crate::{BadFunctionCall, Callable, Operations, Signature, Storage, StoragePolicy},
    static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any},
    std::fmt,
};

/// Type-erased, clonable wrapper for any callable with the signature `S`.
///
/// `S` is spelled as a trait object type: `Function<dyn Fn(i32) -> i32>`,
/// `Function<dyn Fn()>`, `Function<dyn Fn(String, u8) -> Vec<u8>>` (up to eight arguments).
///
/// Internally uses the small function optimization: callables which fit in a pointer
/// (see [`is_small`]) are stored inline, larger ones are boxed.
/// The wrapper itself is always two pointers wide.
///
/// Every lifecycle event (clone, move-out, call, drop) is forwarded to an operation table
/// shared by all wrappers holding the same callable type.
///
/// # Thread safety
///
/// Follows the signature, not the stored callable:
/// `Function<dyn Fn(..) -> R>` is neither `Send` nor `Sync`,
/// `Function<dyn Fn(..) -> R + Send>` is `Send` and only accepts `Send` callables,
/// `Function<dyn Fn(..) -> R + Send + Sync>` is `Send + Sync` and only accepts `Send + Sync` callables.
/// The wrapper itself does no synchronization.
///
/// # Example
///
/// ```
/// use minifunction::{BadFunctionCall, Function};
///
/// let k = 41;
/// let f = Function::<dyn Fn(i32) -> i32>::new(move |x: i32| x + k + 1);
/// assert_eq!(f.call(0), Ok(42));
///
/// let empty = Function::<dyn Fn()>::empty();
/// assert!(empty.is_none());
/// assert_eq!(empty.call(), Err(BadFunctionCall));
/// ```
///
/// [`is_small`]: fn.is_small.html
pub struct Function<S: Signature + ?Sized> {
    storage: Storage<S>,
}

assert_eq_size!(Function<dyn Fn(i32) -> i32>, [usize; 2]);
assert_eq_size!(Function<dyn Fn()>, Option<Function<dyn Fn()>>);

assert_not_impl_any!(Function<dyn Fn(i32) -> i32>: Send, Sync);
assert_impl_all!(Function<dyn Fn(i32) -> i32 + Send>: Send);
assert_not_impl_any!(Function<dyn Fn(i32) -> i32 + Send>: Sync);
assert_impl_all!(Function<dyn Fn(i32) -> i32 + Send + Sync>: Send, Sync);

impl<S: Signature + ?Sized> Function<S> {
    /// Creates an empty [`Function`].
    ///
    /// [`Function`]: #struct.Function.html
    pub fn empty() -> Self {
        Function {
            storage: Storage::empty(),
        }
    }

    /// Creates a [`Function`] which holds the callable `f`.
    ///
    /// `f` is stored inline if it [`is_small`], boxed otherwise.
    ///
    /// [`Function`]: #struct.Function.html
    /// [`is_small`]: fn.is_small.html
    pub fn new<F>(f: F) -> Self
    where
        F: Callable<S> + Clone + 'static,
    {
        let mut storage = Storage::empty();

        unsafe {
            storage.emplace(Operations::<S>::of::<F>(), f);
        }

        Function { storage }
    }

    /// Invokes the held callable with the packed arguments tuple.
    ///
    /// Returns [`BadFunctionCall`] if the [`Function`] is empty.
    /// Panics raised by the callable propagate unchanged.
    ///
    /// [`BadFunctionCall`]: struct.BadFunctionCall.html
    /// [`Function`]: #struct.Function.html
    pub fn call_with(&self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        self.storage.invoke(args)
    }

    /// If the [`Function`] holds a callable, returns `true`; otherwise returns `false`.
    ///
    /// [`Function`]: #struct.Function.html
    pub fn is_some(&self) -> bool {
        !self.storage.is_empty()
    }

    /// If the [`Function`] is empty, returns `true`; otherwise returns `false`.
    ///
    /// [`Function`]: #struct.Function.html
    pub fn is_none(&self) -> bool {
        self.storage.is_empty()
    }

    /// How the callable is currently held.
    pub fn storage_policy(&self) -> StoragePolicy {
        self.storage.policy()
    }

    /// Returns a reference to the held callable if it is of type `T`.
    pub fn target<T: 'static>(&self) -> Option<&T> {
        if self.storage.ops.is::<T>() {
            Some(unsafe { &*self.storage.value::<T>() })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the held callable if it is of type `T`.
    pub fn target_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if self.storage.ops.is::<T>() {
            Some(unsafe { &mut *self.storage.value::<T>() })
        } else {
            None
        }
    }

    /// Moves the held callable out into a new [`Function`], leaving this one empty.
    ///
    /// The source becomes empty regardless of whether the callable was stored inline or boxed.
    ///
    /// [`Function`]: #struct.Function.html
    pub fn take(&mut self) -> Self {
        let mut taken = Self::empty();
        taken.storage.adopt(&mut self.storage);
        taken
    }

    /// Drops the held callable, if any. The [`Function`] becomes empty.
    ///
    /// [`Function`]: #struct.Function.html
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Moves the held callable out if it is of type `T`;
    /// otherwise returns the unchanged [`Function`].
    ///
    /// [`Function`]: #struct.Function.html
    pub fn downcast<T: 'static>(mut self) -> Result<T, Self> {
        if self.storage.ops.is::<T>() {
            Ok(unsafe { self.storage.take_value::<T>() })
        } else {
            Err(self)
        }
    }
}

impl<S: Signature + ?Sized> Default for Function<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature + ?Sized> Clone for Function<S> {
    fn clone(&self) -> Self {
        Function {
            storage: self.storage.duplicate(),
        }
    }

    /// Replaces the held callable with a clone of `source`'s.
    ///
    /// The clone is made before the current callable is dropped,
    /// so `self` is left unchanged if cloning panics.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.storage.duplicate();

        self.storage.clear();
        self.storage.adopt(&mut copy);
    }
}

impl<S: Signature + ?Sized> fmt::Debug for Function<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("policy", &self.storage_policy())
            .finish()
    }
}
