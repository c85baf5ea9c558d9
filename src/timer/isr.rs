use crate::driver::Rfm69;
use core::cell::RefCell;
use critical_section::Mutex;

/// A driver slot that thread code and an interrupt handler can both reach.
///
/// The slot is owned by the application (usually as a `static`); the driver
/// itself keeps no global state.
pub type SharedRadio<SPI> = Mutex<RefCell<Option<Rfm69<SPI>>>>;

/// Creates an empty [`SharedRadio`] slot.
///
/// # Example
/// ```rust,ignore
/// use rfm69_link::timer::{shared_radio_init, SharedRadio};
///
/// static RADIO: SharedRadio<MySpiDevice> = shared_radio_init();
/// ```
pub const fn shared_radio_init<SPI>() -> SharedRadio<SPI> {
    Mutex::new(RefCell::new(None))
}

/// Moves a configured driver into the shared slot.
///
/// # Returns
/// The driver that previously occupied the slot, if any.
///
/// # Example
/// ```rust,ignore
/// radio.configure(0x05)?;
/// let _ = shared_radio_install(&RADIO, radio);
/// ```
pub fn shared_radio_install<SPI>(
    shared: &SharedRadio<SPI>,
    radio: Rfm69<SPI>,
) -> Option<Rfm69<SPI>> {
    critical_section::with(|cs| shared.borrow(cs).replace(Some(radio)))
}

/// Takes the driver back out of the shared slot.
pub fn shared_radio_take<SPI>(shared: &SharedRadio<SPI>) -> Option<Rfm69<SPI>> {
    critical_section::with(|cs| shared.borrow(cs).borrow_mut().take())
}

/// Runs `f` against the shared driver inside a critical section.
///
/// Typically called from the DIO0 (PayloadReady) interrupt to drain a packet,
/// or from thread code to send one. Keep `f` short: interrupts stay masked
/// for its whole duration, so a blocking `send` does not belong here.
///
/// # Returns
/// `None` if no driver has been installed yet.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI0() {
///     let _ = with_radio(&RADIO, |radio| {
///         if radio.packet_available()? {
///             radio.receive(64).map(Some)
///         } else {
///             Ok(None)
///         }
///     });
/// }
/// ```
pub fn with_radio<SPI, R, F>(shared: &SharedRadio<SPI>, f: F) -> Option<R>
where
    F: FnOnce(&mut Rfm69<SPI>) -> R,
{
    critical_section::with(|cs| shared.borrow(cs).borrow_mut().as_mut().map(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Register;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn test_empty_slot_skips_closure() {
        let shared: SharedRadio<SpiMock<u8>> = shared_radio_init();

        assert!(with_radio(&shared, |radio| radio.mode()).is_none());
        assert!(shared_radio_take(&shared).is_none());
    }

    #[test]
    fn test_installed_radio_is_reachable() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write(Register::IrqFlags2.addr()),
            SpiTransaction::read(0x04),
            SpiTransaction::transaction_end(),
        ];
        let shared: SharedRadio<SpiMock<u8>> = shared_radio_init();

        let previous = shared_radio_install(&shared, Rfm69::new(SpiMock::new(&expectations)));
        assert!(previous.is_none());
        let available = with_radio(&shared, |radio| radio.packet_available());
        assert!(matches!(available, Some(Ok(true))));

        let radio = shared_radio_take(&shared).unwrap();
        assert!(shared_radio_take(&shared).is_none());
        radio.release().done();
    }
}
