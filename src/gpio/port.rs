//! # Value-level, whole-port GPIO driver
//!
//! [`Gpio`] is the owned handle to the GPIO register block and exposes the
//! raw mask-based operations of the vendor SDK: set direction, write data,
//! read data. The pin parameter of every operation is a pre-shifted bitmask
//! (bit *i* selects pin *i*), **not** a bit index, and may select several
//! pins in one call. No validation is performed on the mask.
//!
//! ```no_run
//! # use uetrv32_hal::gpio::{Gpio, PinDirection, PinState};
//! let mut gpio = Gpio::take().unwrap();
//! gpio.set_direction(0x0000_0001, PinDirection::Output);
//! gpio.write_data(0x0000_0001, PinState::High);
//! assert_eq!(gpio.read_data(0x0000_0001), 0x0000_0001);
//! ```
//!
//! For per-pin ownership and embedded-hal trait support, the handle can be
//! split into the type-level [`Pins`] struct with [`Gpio::split`].
use super::pins::Pins;
use super::reg::{RegisterBlock, GPIO_BASE};

/// Direction of a pin or a group of pins.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinDirection {
    Input = 0,
    Output = 1,
}

/// Logic level of a pin or a group of pins.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinState {
    Low = 0,
    High = 1,
}

/// Tracks whether the hardware register block singleton was already handed
/// out by [`Gpio::take`].
static mut GPIO_TAKEN: bool = false;

/// Owned handle to the GPIO register block.
///
/// The register block is a fixed hardware resource; this handle makes its
/// ownership explicit instead of going through a process-wide global. At
/// most one handle to the hardware block exists at any time (enforced by
/// [`take`](Gpio::take), circumvented only by the unsafe constructors).
///
/// The read-modify-write sequences in [`set_direction`](Gpio::set_direction)
/// and [`write_data`](Gpio::write_data) are not atomic. If an interrupt
/// handler and the main context both access the port, updates can be lost;
/// callers must provide their own critical section in that case.
pub struct Gpio {
    regs: *const RegisterBlock,
}

unsafe impl Send for Gpio {}

impl Gpio {
    /// Pointer to the hardware register block.
    pub const fn ptr() -> *const RegisterBlock {
        GPIO_BASE as *const _
    }

    /// Acquire the singleton handle to the hardware register block.
    ///
    /// Returns `None` if the handle was taken before.
    pub fn take() -> Option<Self> {
        riscv::interrupt::free(|| unsafe {
            if GPIO_TAKEN {
                None
            } else {
                GPIO_TAKEN = true;
                Some(Gpio { regs: Self::ptr() })
            }
        })
    }

    /// Create a handle to the hardware register block, bypassing the
    /// singleton check.
    ///
    /// # Safety
    ///
    /// Aliases any handle returned by [`take`](Gpio::take). The caller must
    /// ensure accesses do not race.
    pub unsafe fn steal() -> Self {
        Gpio { regs: Self::ptr() }
    }

    /// Create a handle over an arbitrary register block, e.g. an in-memory
    /// mock for host tests.
    ///
    /// # Safety
    ///
    /// `regs` must point to a [`RegisterBlock`] that stays valid and
    /// unaliased by other handles for the lifetime of the returned `Gpio`.
    pub unsafe fn from_ptr(regs: *const RegisterBlock) -> Self {
        Gpio { regs }
    }

    #[inline]
    fn regs(&self) -> &RegisterBlock {
        // Safety: the constructors guarantee a valid pointer
        unsafe { &*self.regs }
    }

    pub(crate) fn register_block_ptr(&self) -> *const RegisterBlock {
        self.regs
    }

    /// Initialize the GPIO module.
    ///
    /// Reserved bring-up hook from the SDK; the current hardware revision
    /// needs no initialization, so this performs no register access.
    #[inline]
    pub fn init(&mut self) {}

    /// Set the direction of all pins selected by `pins`.
    ///
    /// `pins` is a bitmask, not a pin index. Bits outside the mask are left
    /// untouched.
    #[inline]
    pub fn set_direction(&mut self, pins: u32, dir: PinDirection) {
        let regs = self.regs();
        match dir {
            PinDirection::Output => regs.dir.set(regs.dir.get() | pins),
            PinDirection::Input => regs.dir.set(regs.dir.get() & !pins),
        }
    }

    /// Write the logic level of all pins selected by `pins`.
    ///
    /// The driver does not check that the selected pins were configured as
    /// outputs; like the SDK, it trusts the caller.
    #[inline]
    pub fn write_data(&mut self, pins: u32, state: PinState) {
        let regs = self.regs();
        match state {
            PinState::High => regs.data.set(regs.data.get() | pins),
            PinState::Low => regs.data.set(regs.data.get() & !pins),
        }
    }

    /// Read the logic level of the pins selected by `pins`.
    ///
    /// Returns the residual mask `data & pins`, i.e. the subset of the
    /// requested bits that are currently high. Callers interested in a
    /// single pin still have to test the corresponding bit.
    #[inline]
    pub fn read_data(&self, pins: u32) -> u32 {
        self.regs().data.get() & pins
    }

    /// Consume the port-level handle and split it into individually owned
    /// [`Pin`](super::pins::Pin)s.
    #[inline]
    pub fn split(self) -> Pins {
        Pins::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_direction_sets_and_clears_masked_bits() {
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.set_direction(0x0000_00f0, PinDirection::Output);
        assert_eq!(regs.dir.get(), 0x0000_00f0);
        gpio.set_direction(0x0000_0030, PinDirection::Input);
        assert_eq!(regs.dir.get(), 0x0000_00c0);
    }

    #[test]
    fn set_direction_is_idempotent() {
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.set_direction(0x8000_0001, PinDirection::Output);
        let once = regs.dir.get();
        gpio.set_direction(0x8000_0001, PinDirection::Output);
        assert_eq!(regs.dir.get(), once);
    }

    #[test]
    fn operations_leave_disjoint_masks_untouched() {
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.set_direction(0x0000_000f, PinDirection::Output);
        gpio.write_data(0x0000_000f, PinState::High);
        // Disjoint mask: neither register may change under it
        gpio.set_direction(0x0000_0f00, PinDirection::Output);
        gpio.write_data(0x0000_0f00, PinState::Low);
        assert_eq!(regs.dir.get() & 0x0000_000f, 0x0000_000f);
        assert_eq!(gpio.read_data(0x0000_000f), 0x0000_000f);
    }

    #[test]
    fn write_then_read_returns_residual_mask() {
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.write_data(0x0000_0005, PinState::High);
        // Only the requested subset of high bits comes back
        assert_eq!(gpio.read_data(0x0000_0007), 0x0000_0005);
        assert_eq!(gpio.read_data(0x0000_0004), 0x0000_0004);
        assert_eq!(gpio.read_data(0x0000_0002), 0x0000_0000);
        gpio.write_data(0x0000_0005, PinState::Low);
        assert_eq!(gpio.read_data(0x0000_0007), 0x0000_0000);
    }

    #[test]
    fn multi_bit_masks_are_written_in_one_call() {
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.write_data(0xffff_ffff, PinState::High);
        assert_eq!(regs.data.get(), 0xffff_ffff);
        gpio.write_data(0x5555_5555, PinState::Low);
        assert_eq!(regs.data.get(), 0xaaaa_aaaa);
    }

    #[test]
    fn init_performs_no_register_access() {
        let regs = RegisterBlock::mock();
        regs.dir.set(0xdead_beef);
        regs.data.set(0x1234_5678);
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.init();
        assert_eq!(regs.dir.get(), 0xdead_beef);
        assert_eq!(regs.data.get(), 0x1234_5678);
    }

    #[test]
    fn sdk_reference_sequence() {
        // The worked example of the SDK documentation: configure pin 0 as
        // output, drive it high, read it back, drive it low.
        let regs = RegisterBlock::mock();
        let mut gpio = unsafe { Gpio::from_ptr(&regs) };
        gpio.init();
        gpio.set_direction(0x0000_0001, PinDirection::Output);
        assert_eq!(regs.dir.get(), 0x0000_0001);
        gpio.write_data(0x0000_0001, PinState::High);
        assert_eq!(regs.data.get(), 0x0000_0001);
        assert_eq!(gpio.read_data(0x0000_0001), 0x0000_0001);
        gpio.write_data(0x0000_0001, PinState::Low);
        assert_eq!(regs.data.get(), 0x0000_0000);
    }
}
