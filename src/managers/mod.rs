// MarkWarden stateful components
// Managers own persisted or injected state: the validity/aggregate cache and
// the bookmark store boundary.

pub mod bookmark_store;
pub mod validity_cache;
