//! Typed context propagation for credref
//!
//! A [`Context`] is an immutable chain of frames. Each
//! [`with_value`](Context::with_value) call derives a new context carrying one
//! additional value for a [`Slot`]; the original context is left untouched and
//! can keep being used. Values are looked up by slot type, so unrelated slots
//! never collide and the value type is fixed at compile time.
//!
//! The slots this system threads through a reconciliation live in [`slots`]
//! and have dedicated accessors on [`Context`]:
//!
//! ```ignore
//! use credref_context::Context;
//!
//! let ctx = Context::new()
//!     .with_tenant_namespace("tenant-a")
//!     .with_secret_resolver(cache.bind());
//!
//! let resolve = ctx.secret_resolver()?;
//! let reference = resolve(&key)?;
//! ```

mod context;
mod error;
pub mod slots;

pub use context::{Context, Slot};
pub use error::{ContextError, Result};
