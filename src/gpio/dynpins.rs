//! # Type-erased, value-level module for GPIO pins
//!
//! Although the type-level API is generally preferred, it is not suitable in
//! all cases. Because each pin is represented by a distinct type, it is not
//! possible to store multiple pins in a homogeneous data structure. The
//! value-level API solves this problem by erasing the type information and
//! tracking the pin at run-time.
//!
//! Value-level pins are represented by the [`DynPin`] type. [`DynPin`] has
//! two fields, `id` and `mode`, with types [`DynPinId`] and [`DynPinMode`]
//! respectively. The implementation of these types closely mirrors the
//! type-level API.
//!
//! Instances of [`DynPin`] cannot be created directly. Rather, they must be
//! created from their type-level equivalents using [`From`]/[`Into`].
//!
//! ```no_run
//! # use uetrv32_hal::gpio::{DynPin, Gpio};
//! # let pins = Gpio::take().unwrap().split();
//! // Move a pin out of the Pins struct and convert to a DynPin
//! let p0: DynPin = pins.p0.into();
//! ```
//!
//! Conversions between pin modes use a value-level version of the type-level
//! API.
//!
//! ```no_run
//! # use uetrv32_hal::gpio::{DynPin, DynPinMode, Gpio};
//! # let pins = Gpio::take().unwrap().split();
//! # let mut p0: DynPin = pins.p0.into();
//! // Use one of the literal function names
//! p0.into_output();
//! // Use a method and a DynPinMode variant
//! p0.into_mode(DynPinMode::Input);
//! ```
//!
//! Because the pin state cannot be tracked at compile-time, write operations
//! become fallible. Run-time checks are inserted to ensure that users don't
//! try to set the output level of an input pin. Reads go through the shared
//! `data` register and are valid in any mode.
//!
//! Users may try to convert value-level pins back to their type-level
//! equivalents. However, this option is fallible, because the compiler
//! cannot guarantee the pin has the correct ID or is in the correct mode at
//! compile-time. Use [`TryFrom`](core::convert::TryFrom)/
//! [`TryInto`](core::convert::TryInto) for this conversion.
//!
//! ```no_run
//! # use uetrv32_hal::gpio::{DynPin, Gpio, Output, Pin, P0};
//! # let pins = Gpio::take().unwrap().split();
//! // Convert to a `DynPin`
//! let mut p0: DynPin = pins.p0.into();
//! // Change pin mode
//! p0.into_output();
//! // Convert back to a `Pin`
//! let p0: Pin<P0, Output> = p0.try_into().unwrap();
//! ```
//!
//! # Embedded HAL traits
//!
//! This module implements the embedded HAL GPIO traits for [`DynPin`].
//! Whereas the type-level API uses `Error = core::convert::Infallible`, the
//! value-level API can return a real error. If the [`DynPin`] is not in the
//! correct [`DynPinMode`] for the operation, the trait functions will return
//! [`InvalidPinType`](super::pins::PinError::InvalidPinType).
use super::pins::{Pin, PinError, PinId, PinMode};
use super::reg::{RegisterBlock, RegisterInterface};
use embedded_hal::digital::v2::{InputPin, OutputPin, ToggleableOutputPin};

//==================================================================================================
//  DynPinMode
//==================================================================================================

/// Value-level `enum` representing pin modes
///
/// The only per-pin configuration of the UETRV32 GPIO module is the
/// direction bit, so the mode space has exactly two variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DynPinMode {
    Input,
    Output,
}

//==================================================================================================
//  DynPinId
//==================================================================================================

/// Value-level `struct` representing pin IDs
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DynPinId {
    pub num: u8,
}

//==================================================================================================
//  DynRegisters
//==================================================================================================

/// Provide a safe register interface for [`DynPin`]s
///
/// This `struct` takes ownership of a [`DynPinId`] and provides an API to
/// access the corresponding registers.
struct DynRegisters {
    ptr: *const RegisterBlock,
    id: DynPinId,
}

// [`DynRegisters`] takes ownership of the [`DynPinId`], and [`DynPin`]
// guarantees that each pin is a singleton, so this implementation is safe.
unsafe impl RegisterInterface for DynRegisters {
    #[inline]
    fn id(&self) -> DynPinId {
        self.id
    }

    #[inline]
    fn regs_ptr(&self) -> *const RegisterBlock {
        self.ptr
    }
}

impl DynRegisters {
    /// Create a new instance of [`DynRegisters`]
    ///
    /// # Safety
    ///
    /// Users must never create two simultaneous instances of this `struct`
    /// with the same [`DynPinId`] over the same register block
    #[inline]
    unsafe fn new(ptr: *const RegisterBlock, id: DynPinId) -> Self {
        DynRegisters { ptr, id }
    }
}

//==================================================================================================
//  DynPin
//==================================================================================================

/// A value-level pin, parameterized by [`DynPinId`] and [`DynPinMode`]
///
/// This type acts as a type-erased version of [`Pin`]. Every pin is
/// represented by the same type, and pins are tracked and distinguished at
/// run-time.
pub struct DynPin {
    regs: DynRegisters,
    mode: DynPinMode,
}

// Each pin has exclusive control over its own register bit, so moving it to
// another execution context is fine.
unsafe impl Send for DynPin {}

impl DynPin {
    /// Create a new [`DynPin`]
    ///
    /// # Safety
    ///
    /// Each [`DynPin`] must be a singleton. For a given [`DynPinId`], there
    /// must be at most one corresponding [`DynPin`] in existence at any
    /// given time. Violating this requirement is `unsafe`.
    #[inline]
    unsafe fn new(ptr: *const RegisterBlock, id: DynPinId, mode: DynPinMode) -> Self {
        DynPin {
            regs: DynRegisters::new(ptr, id),
            mode,
        }
    }

    /// Return a copy of the pin ID
    #[inline]
    pub fn id(&self) -> DynPinId {
        self.regs.id
    }

    /// Return a copy of the pin mode
    #[inline]
    pub fn mode(&self) -> DynPinMode {
        self.mode
    }

    /// Convert the pin to the requested [`DynPinMode`]
    #[inline]
    pub fn into_mode(&mut self, mode: DynPinMode) {
        // Only modify registers if we are actually changing pin mode
        if mode != self.mode {
            self.regs.change_mode(mode);
            self.mode = mode;
        }
    }

    /// Configure the pin to operate as an input
    #[inline]
    pub fn into_input(&mut self) {
        self.into_mode(DynPinMode::Input);
    }

    /// Configure the pin to operate as an output
    #[inline]
    pub fn into_output(&mut self) {
        self.into_mode(DynPinMode::Output);
    }

    #[inline]
    fn _read(&self) -> bool {
        self.regs.read_pin()
    }

    #[inline]
    fn _write(&mut self, bit: bool) -> Result<(), PinError> {
        match self.mode {
            DynPinMode::Output => {
                self.regs.write_pin(bit);
                Ok(())
            }
            _ => Err(PinError::InvalidPinType),
        }
    }

    #[inline]
    fn _toggle(&mut self) -> Result<(), PinError> {
        match self.mode {
            DynPinMode::Output => {
                self.regs.toggle();
                Ok(())
            }
            _ => Err(PinError::InvalidPinType),
        }
    }

    #[inline]
    fn _is_low(&self) -> Result<bool, PinError> {
        Ok(!self._read())
    }

    #[inline]
    fn _is_high(&self) -> Result<bool, PinError> {
        Ok(self._read())
    }

    #[inline]
    fn _set_low(&mut self) -> Result<(), PinError> {
        self._write(false)
    }

    #[inline]
    fn _set_high(&mut self) -> Result<(), PinError> {
        self._write(true)
    }
}

//==================================================================================================
//  Convert between Pin and DynPin
//==================================================================================================

impl<I: PinId, M: PinMode> From<Pin<I, M>> for DynPin {
    /// Erase the type-level information in a [`Pin`] and return a
    /// value-level [`DynPin`]
    #[inline]
    fn from(pin: Pin<I, M>) -> Self {
        // The `Pin` is consumed, so it is safe to replace it with the
        // corresponding `DynPin`
        unsafe { DynPin::new(pin.regs.regs_ptr(), I::DYN, M::DYN) }
    }
}

impl<I: PinId, M: PinMode> TryFrom<DynPin> for Pin<I, M> {
    type Error = PinError;

    /// Try to recreate a type-level [`Pin`] from a value-level [`DynPin`]
    ///
    /// There is no way for the compiler to know if the conversion will be
    /// successful at compile-time. We must verify the conversion at run-time
    /// or refuse to perform it.
    #[inline]
    fn try_from(pin: DynPin) -> Result<Self, PinError> {
        if pin.regs.id == I::DYN && pin.mode == M::DYN {
            // The `DynPin` is consumed, so it is safe to replace it with the
            // corresponding `Pin`
            Ok(unsafe { Self::new(pin.regs.ptr) })
        } else {
            Err(PinError::InvalidPinType)
        }
    }
}

//==================================================================================================
// Embedded HAL traits
//==================================================================================================

impl OutputPin for DynPin {
    type Error = PinError;
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self._set_high()
    }
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self._set_low()
    }
}

impl InputPin for DynPin {
    type Error = PinError;
    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        self._is_high()
    }
    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self._is_low()
    }
}

impl ToggleableOutputPin for DynPin {
    type Error = PinError;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self._toggle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::pins::{Output, P1};
    use crate::gpio::port::Gpio;

    #[test]
    fn write_on_input_pin_is_rejected() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut dyn_pin: DynPin = pins.p1.into();
        assert_eq!(dyn_pin.mode(), DynPinMode::Input);
        assert_eq!(dyn_pin.set_high(), Err(PinError::InvalidPinType));
        assert_eq!(dyn_pin.toggle(), Err(PinError::InvalidPinType));
        assert_eq!(regs.data.get(), 0);
    }

    #[test]
    fn output_conversion_enables_writes() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut dyn_pin: DynPin = pins.p1.into();
        dyn_pin.into_output();
        assert_eq!(regs.dir.get(), 1 << 1);
        dyn_pin.set_high().unwrap();
        assert_eq!(regs.data.get(), 1 << 1);
        assert!(dyn_pin.is_high().unwrap());
    }

    #[test]
    fn reads_are_valid_in_any_mode() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let dyn_pin: DynPin = pins.p2.into();
        regs.data.set(1 << 2);
        assert!(dyn_pin.is_high().unwrap());
    }

    #[test]
    fn try_from_checks_id_and_mode() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut dyn_pin: DynPin = pins.p1.into();
        dyn_pin.into_output();
        let typed: Pin<P1, Output> = dyn_pin.try_into().unwrap();
        let mut dyn_pin: DynPin = typed.into();
        dyn_pin.into_input();
        let wrong_mode: Result<Pin<P1, Output>, _> = dyn_pin.try_into();
        assert!(wrong_mode.is_err());
    }
}
