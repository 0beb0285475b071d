use thiserror::Error;

/// Returned when a [`Function`] holding no callable is invoked.
///
/// Carries no payload. Panics raised by the held callable itself are never
/// translated into this error.
///
/// [`Function`]: struct.Function.html
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Error)]
#[error("called an empty function wrapper")]
pub struct BadFunctionCall;
