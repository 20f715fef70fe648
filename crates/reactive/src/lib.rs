//! Single-threaded reactive primitives for the tabula engine.
//!
//! Two small building blocks:
//!
//! - [`Observer`]: fan-out event notification. Subscribers register a
//!   callback and receive every emitted value by reference.
//! - [`Interceptor`]: pre/post hook lists wrapping one operation, able to
//!   rewrite or veto its input and result.
//!
//! Both are `Rc`/`RefCell` based and intended for use on one thread.

mod interceptor;
mod observer;

pub use interceptor::{HookId, HookList, Interceptor, Priority};
pub use observer::{Observer, SubscriptionId};
