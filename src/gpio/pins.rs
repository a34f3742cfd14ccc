//! # Type-level module for GPIO pins
//!
//! This module provides a type-level API for the 32 pins of the GPIO module.
//! It uses the type system to track the mode of each pin at compile-time,
//! in the manner of the
//! [ATSAMD HAL implementation](https://docs.rs/atsamd-hal/0.13.0/atsamd_hal/gpio/v2/index.html).
//!
//! The UETRV32 GPIO has no pull resistors, no open-drain control and no
//! alternate functions; the only per-pin configuration is the direction bit.
//! The mode space therefore collapses to two type-level variants, [`Input`]
//! and [`Output`].
//!
//! Type-level [`Pin`]s are parameterized by the [`PinId`] and [`PinMode`]
//! type-level enums:
//!
//! ```ignore
//! pub struct Pin<I, M>
//! where
//!     I: PinId,
//!     M: PinMode,
//! {
//!     // ...
//! }
//! ```
//!
//! A `PinId` identifies a pin by its number, [`P0`] to [`P31`]. It is not
//! possible for users to create new instances of a [`Pin`]. Singleton
//! instances of each pin are made available through the [`Pins`] struct,
//! created by consuming the port-level driver:
//!
//! ```no_run
//! # use uetrv32_hal::gpio::Gpio;
//! let gpio = Gpio::take().unwrap();
//! let pins = gpio.split();
//! ```
//!
//! Pins can be converted between modes using several different methods.
//!
//! ```no_run
//! # use uetrv32_hal::gpio::{Gpio, Output};
//! # let pins = Gpio::take().unwrap().split();
//! // Use one of the literal function names
//! let p0 = pins.p0.into_output();
//! // Use a generic method and one of the `PinMode` variant types
//! let p0 = p0.into_mode::<Output>();
//! ```
//!
//! # Embedded HAL traits
//!
//! This module implements the embedded HAL GPIO traits for each [`Pin`] in
//! the corresponding [`PinMode`], namely: [`InputPin`] for input pins, and
//! [`OutputPin`], [`StatefulOutputPin`] and [`ToggleableOutputPin`] for
//! output pins. Input sampling and output drive share the single `data`
//! register, so an output pin can read back its commanded level through the
//! stateful trait.
use super::dynpins::{DynPinId, DynPinMode};
use super::port::Gpio;
use super::reg::{RegisterBlock, RegisterInterface};
use crate::Sealed;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};
use paste::paste;

//==================================================================================================
//  Errors and Definitions
//==================================================================================================

/// GPIO error type
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinError {
    /// The pin did not have the correct mode for the requested operation.
    /// [`DynPin`](super::dynpins::DynPin)s are not tracked and verified at
    /// compile-time, so run-time operations are fallible.
    InvalidPinType,
}

//==================================================================================================
//  Pin modes
//==================================================================================================

/// Type-level enum representing pin modes
///
/// The valid options are [`Input`] and [`Output`].
pub trait PinMode: Sealed {
    /// Corresponding [`DynPinMode`](super::dynpins::DynPinMode)
    const DYN: DynPinMode;
}

/// Type-level variant of [`PinMode`] for input mode
pub enum Input {}
/// Type-level variant of [`PinMode`] for output mode
pub enum Output {}

impl Sealed for Input {}
impl Sealed for Output {}

impl PinMode for Input {
    const DYN: DynPinMode = DynPinMode::Input;
}
impl PinMode for Output {
    const DYN: DynPinMode = DynPinMode::Output;
}

/// Type alias for the [`PinMode`] at reset. The direction register resets to
/// zero, so every pin starts out as an input.
pub type Reset = Input;

//==================================================================================================
//  Pin IDs
//==================================================================================================

/// Type-level enum for pin IDs
pub trait PinId: Sealed {
    /// Corresponding [`DynPinId`](super::dynpins::DynPinId)
    const DYN: DynPinId;
}

macro_rules! pin_id {
    ($Id:ident, $NUM:literal) => {
        // Need paste macro to use ident in doc attribute
        paste! {
            #[doc = "Pin ID representing pin " $Id]
            pub enum $Id {}
            impl Sealed for $Id {}
            impl PinId for $Id {
                const DYN: DynPinId = DynPinId { num: $NUM };
            }
        }
    };
}

//==================================================================================================
//  Pin
//==================================================================================================

/// A type-level GPIO pin, parameterized by [`PinId`] and [`PinMode`] types
///
/// Each pin stores only the register block pointer; the pin number and mode
/// are carried in the type.
pub struct Pin<I: PinId, M: PinMode> {
    pub(in crate::gpio) regs: Registers<I>,
    mode: PhantomData<M>,
}

impl<I: PinId, M: PinMode> Sealed for Pin<I, M> {}

// Each pin has exclusive control over its own register bit, so moving it to
// another execution context is fine.
unsafe impl<I: PinId, M: PinMode> Send for Pin<I, M> {}

impl<I: PinId, M: PinMode> Pin<I, M> {
    /// Create a new [`Pin`]
    ///
    /// # Safety
    ///
    /// Each [`Pin`] must be a singleton. For a given [`PinId`] and register
    /// block, there must be at most one corresponding [`Pin`] in existence
    /// at any given time. Violating this requirement is `unsafe`.
    #[inline]
    pub(crate) unsafe fn new(ptr: *const RegisterBlock) -> Pin<I, M> {
        Pin {
            regs: Registers::new(ptr),
            mode: PhantomData,
        }
    }

    /// Convert the pin to the requested [`PinMode`]
    #[inline]
    pub fn into_mode<N: PinMode>(mut self) -> Pin<I, N> {
        // Only modify registers if we are actually changing pin mode
        // This check should compile away
        if N::DYN != M::DYN {
            self.regs.change_mode::<N>();
        }
        // Safe because we drop the existing Pin
        unsafe { Pin::new(self.regs.regs_ptr()) }
    }

    /// Configure the pin to operate as an input
    #[inline]
    pub fn into_input(self) -> Pin<I, Input> {
        self.into_mode()
    }

    /// Configure the pin to operate as an output
    #[inline]
    pub fn into_output(self) -> Pin<I, Output> {
        self.into_mode()
    }

    #[inline]
    pub(crate) fn _set_high(&mut self) {
        self.regs.write_pin(true)
    }

    #[inline]
    pub(crate) fn _set_low(&mut self) {
        self.regs.write_pin(false)
    }

    #[inline]
    pub(crate) fn _toggle(&mut self) {
        self.regs.toggle();
    }

    #[inline]
    pub(crate) fn _is_low(&self) -> bool {
        !self.regs.read_pin()
    }

    #[inline]
    pub(crate) fn _is_high(&self) -> bool {
        self.regs.read_pin()
    }
}

impl<I: PinId, M: PinMode> AsRef<Self> for Pin<I, M> {
    #[inline]
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<I: PinId, M: PinMode> AsMut<Self> for Pin<I, M> {
    #[inline]
    fn as_mut(&mut self) -> &mut Self {
        self
    }
}

//==================================================================================================
//  Embedded HAL traits
//==================================================================================================

impl<I: PinId> OutputPin for Pin<I, Output> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self._set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self._set_low();
        Ok(())
    }
}

impl<I: PinId> StatefulOutputPin for Pin<I, Output> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self._is_high())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(self._is_low())
    }
}

impl<I: PinId> ToggleableOutputPin for Pin<I, Output> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self._toggle();
        Ok(())
    }
}

impl<I: PinId> InputPin for Pin<I, Input> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self._is_high())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self._is_low())
    }
}

//==================================================================================================
//  Registers
//==================================================================================================

/// Provide a safe register interface for [`Pin`]s
///
/// This `struct` takes ownership of a [`PinId`] and provides an API to
/// access the corresponding registers.
pub(in crate::gpio) struct Registers<I: PinId> {
    ptr: *const RegisterBlock,
    id: PhantomData<I>,
}

// [`Registers`] takes ownership of the [`PinId`], and [`Pin`] guarantees that
// each pin is a singleton, so this implementation is safe.
unsafe impl<I: PinId> RegisterInterface for Registers<I> {
    #[inline]
    fn id(&self) -> DynPinId {
        I::DYN
    }

    #[inline]
    fn regs_ptr(&self) -> *const RegisterBlock {
        self.ptr
    }
}

impl<I: PinId> Registers<I> {
    /// Create a new instance of [`Registers`]
    ///
    /// # Safety
    ///
    /// Users must never create two simultaneous instances of this `struct`
    /// with the same [`PinId`] over the same register block
    #[inline]
    unsafe fn new(ptr: *const RegisterBlock) -> Self {
        Registers {
            ptr,
            id: PhantomData,
        }
    }

    /// Provide a type-level equivalent for the
    /// [`RegisterInterface::change_mode`] method.
    #[inline]
    pub(in crate::gpio) fn change_mode<M: PinMode>(&mut self) {
        RegisterInterface::change_mode(self, M::DYN);
    }
}

//==================================================================================================
//  Pin definitions
//==================================================================================================

macro_rules! pins {
    (
        $PinsName:ident, $($Id:ident,)+,
    ) => {
        paste!(
            /// Collection of all the individual [`Pin`]s of the GPIO module
            pub struct $PinsName {
                port: Gpio,
                $(
                    #[doc = "Pin " $Id]
                    pub [<$Id:lower>]: Pin<$Id, Reset>,
                )+
            }

            impl $PinsName {
                /// Create a new struct containing all the pins, consuming the
                /// port-level driver. The pins are handed out in the hardware
                /// reset mode; no registers are touched.
                #[inline]
                pub fn new(port: Gpio) -> $PinsName {
                    let regs = port.register_block_ptr();
                    $PinsName {
                        port,
                        // Safe because we only create one `Pin` per `PinId`
                        $(
                            [<$Id:lower>]: unsafe { Pin::new(regs) },
                        )+
                    }
                }

                /// Consumes the Pins struct and returns the port-level driver
                pub fn release(self) -> Gpio {
                    self.port
                }
            }
        );
    }
}

macro_rules! declare_pins {
    (
        $PinsName:ident, [$(($Id:ident, $NUM:literal),)+]
    ) => {
        pins!($PinsName, $($Id,)+,);
        $(
            pin_id!($Id, $NUM);
        )+
    }
}

declare_pins!(
    Pins,
    [
        (P0, 0),
        (P1, 1),
        (P2, 2),
        (P3, 3),
        (P4, 4),
        (P5, 5),
        (P6, 6),
        (P7, 7),
        (P8, 8),
        (P9, 9),
        (P10, 10),
        (P11, 11),
        (P12, 12),
        (P13, 13),
        (P14, 14),
        (P15, 15),
        (P16, 16),
        (P17, 17),
        (P18, 18),
        (P19, 19),
        (P20, 20),
        (P21, 21),
        (P22, 22),
        (P23, 23),
        (P24, 24),
        (P25, 25),
        (P26, 26),
        (P27, 27),
        (P28, 28),
        (P29, 29),
        (P30, 30),
        (P31, 31),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::port::{PinDirection, PinState};

    #[test]
    fn output_pin_drives_its_own_bit() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut led = pins.p3.into_output();
        assert_eq!(regs.dir.get(), 1 << 3);
        led.set_high().unwrap();
        assert_eq!(regs.data.get(), 1 << 3);
        led.set_low().unwrap();
        assert_eq!(regs.data.get(), 0);
    }

    #[test]
    fn toggle_flips_only_the_own_bit() {
        let regs = RegisterBlock::mock();
        regs.data.set(0x0000_00ff);
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut out = pins.p0.into_output();
        out.toggle().unwrap();
        assert_eq!(regs.data.get(), 0x0000_00fe);
        out.toggle().unwrap();
        assert_eq!(regs.data.get(), 0x0000_00ff);
    }

    #[test]
    fn input_pin_samples_data_register() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let key = pins.p5;
        assert!(key.is_low().unwrap());
        regs.data.set(1 << 5);
        assert!(key.is_high().unwrap());
    }

    #[test]
    fn output_pin_reads_back_commanded_level() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut out = pins.p7.into_output();
        assert!(out.is_set_low().unwrap());
        out.set_high().unwrap();
        assert!(out.is_set_high().unwrap());
    }

    #[test]
    fn mode_conversion_only_touches_the_direction_bit() {
        let regs = RegisterBlock::mock();
        regs.dir.set(0x0000_ff00);
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let out = pins.p0.into_output();
        assert_eq!(regs.dir.get(), 0x0000_ff01);
        let _back_to_input = out.into_input();
        assert_eq!(regs.dir.get(), 0x0000_ff00);
    }

    #[test]
    fn release_returns_the_port_driver() {
        let regs = RegisterBlock::mock();
        let pins = unsafe { Gpio::from_ptr(&regs) }.split();
        let mut gpio = pins.release();
        gpio.set_direction(0x0000_0001, PinDirection::Output);
        gpio.write_data(0x0000_0001, PinState::High);
        assert_eq!(gpio.read_data(0x0000_0001), 0x0000_0001);
    }
}
