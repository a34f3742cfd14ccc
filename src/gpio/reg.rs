//! # Register definitions for the GPIO module
//!
//! The UETRV32 has no published peripheral access crate, so the register
//! block is defined here directly, in the same [`vcell`] based layout an
//! svd2rust PAC would generate.
use super::dynpins::DynPinId;
use vcell::VolatileCell;

/// Base address of the GPIO module in the device segment of the SoC
/// memory map.
pub const GPIO_BASE: usize = 0x9400_0000;

/// GPIO register block.
///
/// Five consecutive 32-bit registers. Bit *i* of a register always refers to
/// pin *i*. The three interrupt registers are part of the hardware layout but
/// are not driven by this HAL; the interrupt protocol of the module is not
/// finalized in the SDK.
#[repr(C)]
pub struct RegisterBlock {
    /// Direction bitmask. Bit *i* = 1 configures pin *i* as an output.
    pub dir: VolatileCell<u32>,
    /// Pin level bitmask, shared by input sampling and output drive.
    pub data: VolatileCell<u32>,
    /// Interrupt enable (reserved, never driven).
    pub ie: VolatileCell<u32>,
    /// Interrupt level (reserved, never driven).
    pub int_lvl: VolatileCell<u32>,
    /// Interrupt pending (reserved, never driven).
    pub ip: VolatileCell<u32>,
}

#[cfg(test)]
impl RegisterBlock {
    /// In-memory register block in its reset state, for host unit tests.
    pub(crate) const fn mock() -> Self {
        RegisterBlock {
            dir: VolatileCell::new(0),
            data: VolatileCell::new(0),
            ie: VolatileCell::new(0),
            int_lvl: VolatileCell::new(0),
            ip: VolatileCell::new(0),
        }
    }
}

//==================================================================================================
// Register Interface
//==================================================================================================

/// Provide a safe register interface for pin objects
///
/// The GPIO module is a single shared register block, so handing out one
/// object per pin requires a discipline: each pin object may only touch the
/// bit of `dir` and `data` selected by its own pin number. This trait
/// provides that discipline. Implementers supply a pin ID through [`id`] and
/// the register block pointer through [`regs_ptr`]; the remaining methods
/// are masked single-bit accesses derived from them. Any modification of the
/// registers requires `&mut self`, which rules out interior mutability.
///
/// # Safety
///
/// Users should only implement the [`id`] and [`regs_ptr`] functions. No
/// default function implementations should be overridden. The implementing
/// type must guarantee that each pin ID is a singleton for the register
/// block it points to, and that [`regs_ptr`] stays valid for the lifetime of
/// the object.
///
/// [`id`]: Self::id
/// [`regs_ptr`]: Self::regs_ptr
pub(super) unsafe trait RegisterInterface {
    /// Provide a [`DynPinId`] identifying the bit controlled by this type.
    fn id(&self) -> DynPinId;

    /// Pointer to the register block this pin belongs to.
    fn regs_ptr(&self) -> *const RegisterBlock;

    #[inline]
    fn port_reg(&self) -> &RegisterBlock {
        // Safety: implementers guarantee the pointer is valid
        unsafe { &*self.regs_ptr() }
    }

    #[inline]
    fn mask_32(&self) -> u32 {
        1 << self.id().num
    }

    /// Change the pin mode. The only per-pin configuration of this module is
    /// the direction bit.
    #[inline]
    fn change_mode(&mut self, mode: super::dynpins::DynPinMode) {
        self.set_dir(mode == super::dynpins::DynPinMode::Output);
    }

    /// Set the direction of a pin
    #[inline]
    fn set_dir(&mut self, output: bool) {
        let portreg = self.port_reg();
        let mask = self.mask_32();
        // Only the bit for this pin ID is modified
        if output {
            portreg.dir.set(portreg.dir.get() | mask);
        } else {
            portreg.dir.set(portreg.dir.get() & !mask);
        }
    }

    /// Read the logic level of a pin
    ///
    /// Input sampling and output drive share the `data` register, so this
    /// works for both directions; for an output pin it reads back the
    /// commanded level.
    #[inline]
    fn read_pin(&self) -> bool {
        let portreg = self.port_reg();
        ((portreg.data.get() >> self.id().num) & 0x01) == 1
    }

    /// Write the logic level of an output pin
    ///
    /// The module has no set/clear mask registers, so this is a
    /// read-modify-write of `data` and is not atomic with respect to
    /// concurrent callers on other pins.
    #[inline]
    fn write_pin(&mut self, bit: bool) {
        let portreg = self.port_reg();
        let mask = self.mask_32();
        if bit {
            portreg.data.set(portreg.data.get() | mask);
        } else {
            portreg.data.set(portreg.data.get() & !mask);
        }
    }

    /// Toggle the logic level of an output pin
    #[inline]
    fn toggle(&mut self) {
        let portreg = self.port_reg();
        let mask = self.mask_32();
        portreg.data.set(portreg.data.get() ^ mask);
    }
}
