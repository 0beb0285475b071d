use crate::{BadFunctionCall, Function};

/// A call signature, spelled as the trait object type `dyn Fn(A1, .., An) -> R`.
///
/// Maps the signature to the tuple of its argument types and its return type.
/// Implemented for up to eight arguments, in three flavours:
///
/// - `dyn Fn(..) -> R`: any callable; the [`Function`] is neither `Send` nor `Sync`;
/// - `dyn Fn(..) -> R + Send`: `Send` callables; the [`Function`] is `Send`;
/// - `dyn Fn(..) -> R + Send + Sync`: `Send + Sync` callables; the [`Function`] is `Send + Sync`.
///
/// Argument and return types must be `'static`. Borrowed arguments are only
/// supported as `&'static T`; higher-ranked signatures such as
/// `dyn for<'a> Fn(&'a str)` cannot be wrapped.
///
/// [`Function`]: struct.Function.html
pub trait Signature: 'static {
    /// Argument types packed in a tuple, e.g. `(i32, &'static str)`.
    type Args: 'static;
    /// Return type.
    type Output: 'static;
}

/// Anything that can be invoked with the arguments of the signature `S`.
///
/// Implemented for every closure, function item and function pointer whose
/// `Fn` signature matches `S` and which satisfies the auto trait bounds of `S`.
pub trait Callable<S: Signature + ?Sized> {
    fn invoke(&self, args: S::Args) -> S::Output;
}

macro_rules! signature {
    (@variant [$($bounds:tt)*] $($arg:ident $val:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Signature for dyn Fn($($arg),*) -> R $($bounds)* {
            type Args = ($($arg,)*);
            type Output = R;
        }

        impl<F, R: 'static, $($arg: 'static),*> Callable<dyn Fn($($arg),*) -> R $($bounds)*> for F
        where
            F: Fn($($arg),*) -> R $($bounds)*,
        {
            #[inline]
            fn invoke(&self, ($($val,)*): ($($arg,)*)) -> R {
                self($($val),*)
            }
        }

        impl<R: 'static, $($arg: 'static),*> Function<dyn Fn($($arg),*) -> R $($bounds)*> {
            /// Invokes the held callable with the given arguments.
            ///
            /// Returns [`BadFunctionCall`] if the wrapper is empty.
            ///
            /// [`BadFunctionCall`]: struct.BadFunctionCall.html
            #[inline]
            pub fn call(&self, $($val: $arg),*) -> Result<R, BadFunctionCall> {
                self.call_with(($($val,)*))
            }
        }
    };
    ($($arg:ident $val:ident),*) => {
        signature!(@variant [] $($arg $val),*);
        signature!(@variant [+ Send] $($arg $val),*);
        signature!(@variant [+ Send + Sync] $($arg $val),*);
    };
}

signature!();
signature!(A1 a1);
signature!(A1 a1, A2 a2);
signature!(A1 a1, A2 a2, A3 a3);
signature!(A1 a1, A2 a2, A3 a3, A4 a4);
signature!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
signature!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
signature!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
signature!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
