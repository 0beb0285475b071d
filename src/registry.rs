//! Process-wide operation tables.
//!
//! Every (signature, stored type) pair gets exactly one leaked, immutable
//! [`Operations`] table, created on first use. Tables are never freed, so
//! their addresses are stable and usable as type identity.
//!
//! [`Operations`]: ../operations/struct.Operations.html

use {
    crate::{Operations, Signature},
    once_cell::sync::Lazy,
    parking_lot::RwLock,
    std::{
        any::{type_name, Any, TypeId},
        collections::HashMap,
    },
    tracing::trace,
};

/// (signature, stored type)
type TableKey = (TypeId, TypeId);

type Table = &'static (dyn Any + Send + Sync);

static TABLES: Lazy<RwLock<HashMap<TableKey, Table>>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn key<S: Signature + ?Sized, T: ?Sized + 'static>() -> TableKey {
    (TypeId::of::<S>(), TypeId::of::<T>())
}

/// Returns the table registered for `T` under the signature `S`, if any.
pub(crate) fn lookup<S, T>() -> Option<&'static Operations<S>>
where
    S: Signature + ?Sized,
    T: ?Sized + 'static,
{
    let table = *TABLES.read().get(&key::<S, T>())?;
    table.downcast_ref()
}

/// Returns the table registered for `T` under the signature `S`,
/// registering the one built by `make` if there is none yet.
///
/// Concurrent first calls for the same key build and publish at most one table.
pub(crate) fn get_or_register<S, T>(make: impl FnOnce() -> Operations<S>) -> &'static Operations<S>
where
    S: Signature + ?Sized,
    T: ?Sized + 'static,
{
    if let Some(table) = lookup::<S, T>() {
        return table;
    }

    let table = *TABLES.write().entry(key::<S, T>()).or_insert_with(|| {
        let table: &'static Operations<S> = Box::leak(Box::new(make()));

        trace!(
            signature = type_name::<S>(),
            stored = type_name::<T>(),
            policy = ?table.policy,
            "registered operation table"
        );

        table as Table
    });

    table
        .downcast_ref()
        .expect("operation table registered under a mismatched key")
}
