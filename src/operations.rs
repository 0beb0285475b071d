use {
    crate::{is_small, registry, BadFunctionCall, Callable, Signature, Storage, StoragePolicy},
    std::{mem, ptr},
    tracing::trace,
};

/// Copies the value held in the first storage into the second, empty one.
/// Installs the source's table in the destination.
type CopyFn<S> = unsafe fn(&Storage<S>, &mut Storage<S>);

/// Moves the value held in the first storage into the second, empty one.
/// Swaps the two tables, leaving the source with the destination's empty table.
type RelocateFn<S> = unsafe fn(&mut Storage<S>, &mut Storage<S>);

/// Calls the held value with the packed arguments.
type InvokeFn<S> = unsafe fn(
    &Storage<S>,
    <S as Signature>::Args,
) -> Result<<S as Signature>::Output, BadFunctionCall>;

/// Drops the held value. Does not reinstall the empty table.
type DestroyFn<S> = unsafe fn(&mut Storage<S>);

/// Operation table for a concrete callable type stored under the signature `S`,
/// which knows
/// 1) how to clone the value into another storage;
/// 2) how to move it into another storage;
/// 3) how to invoke it;
/// 4) how to drop it;
/// 5) whether it is stored inline or boxed.
///
/// One `'static` table exists per (signature, stored type), see [`registry`].
/// A pointer to it is stored in every [`Storage`] and compared by address.
///
/// [`registry`]: ../registry/index.html
/// [`Storage`]: ../storage/struct.Storage.html
pub(crate) struct Operations<S: Signature + ?Sized> {
    pub(crate) copy: CopyFn<S>,
    pub(crate) relocate: RelocateFn<S>,
    pub(crate) invoke: InvokeFn<S>,
    pub(crate) destroy: DestroyFn<S>,
    pub(crate) policy: StoragePolicy,
}

/// Key under which the empty table of each signature is registered.
struct Empty;

impl<S: Signature + ?Sized> Operations<S> {
    /// The table representing "no callable held" for the signature `S`.
    pub(crate) fn empty() -> &'static Self {
        registry::get_or_register::<S, Empty>(|| Operations {
            copy: empty_copy::<S>,
            relocate: empty_relocate::<S>,
            invoke: empty_invoke::<S>,
            destroy: empty_destroy::<S>,
            policy: StoragePolicy::Empty,
        })
    }

    /// The table bound to values of type `T` under the signature `S`.
    pub(crate) fn of<T: Callable<S> + Clone + 'static>() -> &'static Self {
        registry::get_or_register::<S, T>(|| {
            if is_small::<T>() {
                Operations {
                    copy: inline_copy::<S, T>,
                    relocate: inline_relocate::<S, T>,
                    invoke: inline_invoke::<S, T>,
                    destroy: inline_destroy::<S, T>,
                    policy: StoragePolicy::Inline,
                }
            } else {
                Operations {
                    copy: heap_copy::<S, T>,
                    relocate: heap_relocate::<S, T>,
                    invoke: heap_invoke::<S, T>,
                    destroy: heap_destroy::<S, T>,
                    policy: StoragePolicy::Heap,
                }
            }
        })
    }

    /// The table bound to `T` under the signature `S`, if one was ever created.
    pub(crate) fn find<T: 'static>() -> Option<&'static Self> {
        registry::lookup::<S, T>()
    }

    pub(crate) fn is<T: 'static>(&'static self) -> bool {
        Self::find::<T>().map_or(false, |ops| ptr::eq(self, ops))
    }
}

unsafe fn empty_copy<S: Signature + ?Sized>(source: &Storage<S>, destination: &mut Storage<S>) {
    destination.ops = source.ops;
}

unsafe fn empty_relocate<S: Signature + ?Sized>(
    source: &mut Storage<S>,
    destination: &mut Storage<S>,
) {
    destination.ops = source.ops;
}

unsafe fn empty_invoke<S: Signature + ?Sized>(
    _: &Storage<S>,
    _: S::Args,
) -> Result<S::Output, BadFunctionCall> {
    trace!(signature = std::any::type_name::<S>(), "invoked an empty function wrapper");
    Err(BadFunctionCall)
}

unsafe fn empty_destroy<S: Signature + ?Sized>(_: &mut Storage<S>) {}

unsafe fn inline_copy<S, T>(source: &Storage<S>, destination: &mut Storage<S>)
where
    S: Signature + ?Sized,
    T: Clone,
{
    let value = (*source.inline::<T>()).clone();
    destination.inline::<T>().write(value);
    destination.ops = source.ops;
}

unsafe fn inline_relocate<S, T>(source: &mut Storage<S>, destination: &mut Storage<S>)
where
    S: Signature + ?Sized,
{
    destination.inline::<T>().write(source.inline::<T>().read());
    // The destination is empty on entry: hand its table to the source,
    // whose bytes are now a stale copy and must never be dropped.
    mem::swap(&mut source.ops, &mut destination.ops);
}

unsafe fn inline_invoke<S, T>(
    storage: &Storage<S>,
    args: S::Args,
) -> Result<S::Output, BadFunctionCall>
where
    S: Signature + ?Sized,
    T: Callable<S>,
{
    Ok((*storage.inline::<T>()).invoke(args))
}

unsafe fn inline_destroy<S: Signature + ?Sized, T>(storage: &mut Storage<S>) {
    ptr::drop_in_place(storage.inline::<T>());
}

unsafe fn heap_copy<S, T>(source: &Storage<S>, destination: &mut Storage<S>)
where
    S: Signature + ?Sized,
    T: Clone,
{
    let value = Box::new((*source.heap::<T>()).clone());
    destination.set_heap(Box::into_raw(value));
    destination.ops = source.ops;
}

unsafe fn heap_relocate<S, T>(source: &mut Storage<S>, destination: &mut Storage<S>)
where
    S: Signature + ?Sized,
{
    destination.set_heap(source.heap::<T>());
    mem::swap(&mut source.ops, &mut destination.ops);
}

unsafe fn heap_invoke<S, T>(storage: &Storage<S>, args: S::Args) -> Result<S::Output, BadFunctionCall>
where
    S: Signature + ?Sized,
    T: Callable<S>,
{
    Ok((*storage.heap::<T>()).invoke(args))
}

unsafe fn heap_destroy<S: Signature + ?Sized, T>(storage: &mut Storage<S>) {
    drop(Box::from_raw(storage.heap::<T>()));
}
