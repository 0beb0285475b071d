//! Type-erased, clonable function wrapper with small function optimization.
//!
//! [`Function<S>`] holds any closure, function item or function pointer matching the
//! call signature `S` (spelled `dyn Fn(A1, .., An) -> R`) and calls it uniformly.
//! Callables no larger than a pointer are stored inline; larger ones are boxed.
//!
//! [`Function<S>`]: struct.Function.html

mod error;
mod function;
mod operations;
mod policy;
mod registry;
mod signature;
mod storage;

pub use {
    error::BadFunctionCall,
    function::Function,
    policy::{is_small, StoragePolicy, INLINE_ALIGN, INLINE_CAPACITY},
    signature::{Callable, Signature},
};

pub(crate) use {operations::Operations, storage::Storage};
