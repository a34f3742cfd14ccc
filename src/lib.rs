//! # HAL for the UETRV32 RISC-V SoC
//!
//! Hardware abstraction layer for the GPIO module of the UETRV32 SoC. The
//! register-level access model mirrors the vendor SDK: a single memory-mapped
//! register block with a direction register and a data register, addressed by
//! pre-shifted pin bitmasks.
#![cfg_attr(not(test), no_std)]

pub mod gpio;
pub mod prelude;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;
