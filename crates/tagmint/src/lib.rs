#![doc = include_str!("../README.md")]

mod allocator;
mod backfill;
mod error;
mod identifier;
mod memory;
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
mod runtime;
#[cfg(feature = "serde")]
mod serde;
mod sleep;
mod store;
mod symbology;
mod time;

pub use crate::allocator::*;
pub use crate::backfill::*;
pub use crate::error::*;
pub use crate::identifier::*;
pub use crate::memory::*;
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
pub use crate::runtime::*;
pub use crate::sleep::*;
pub use crate::store::*;
pub use crate::symbology::*;
pub use crate::time::*;
