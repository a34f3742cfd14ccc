//! # GPIO module
//!
//! The UETRV32 GPIO peripheral is a single 32-pin module with a direction
//! register and a data register. Pins are addressed with pre-shifted
//! bitmasks (bit *i* selects pin *i*), **not** with bit indices, and a mask
//! may select several pins at once. This convention comes straight from the
//! vendor SDK and is preserved across every layer of this module.
//!
//! Three APIs are provided:
//!
//! - [`port`]: a value-level driver owning the whole register block and
//!   exposing the raw mask-based operations of the SDK.
//! - [`pins`]: a type-level API that tracks the mode of each pin at
//!   compile-time, so the compiler can detect logic errors such as writing
//!   to an input pin.
//! - [`dynpins`]: a type-erased, value-level API that tracks the mode of
//!   each pin at run-time, for storing pins in homogeneous data structures.
//!
//! The hardware provides no set/clear mask registers, so all writes are
//! read-modify-write sequences and are not atomic; concurrent access from an
//! interrupt context can lose updates unless the caller supplies a critical
//! section.
pub mod dynpins;
pub use dynpins::*;

pub mod pins;
pub use pins::*;

pub mod port;
pub use port::*;

pub mod reg;
pub use reg::{RegisterBlock, GPIO_BASE};
