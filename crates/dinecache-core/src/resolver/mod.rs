//! Identifier resolution and menu fetching.
//!
//! `IdentifierResolver` turns a school slug and location name into the
//! opaque ids the menu endpoint needs, memoizing each for the lifetime of
//! the resolver. `MenuFetcher` uses it to fetch period menus and holds the
//! session state the display layer reads back.

pub mod identifier;
pub mod menu;

#[cfg(test)]
pub(crate) mod testing;

pub use identifier::IdentifierResolver;
pub use menu::{MenuFetcher, ResolverState, CONNECT_FAILED_MESSAGE, RESOLVE_FAILED_MESSAGE};
