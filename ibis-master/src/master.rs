//! Bus-master link management and send path
//!
//! The master holds the transport behind a typed open/closed state.
//! Sending on a closed link is not an error: the bus is fire-and-forget
//! broadcast, so the frame is dropped and, when the `defmt` feature is
//! enabled, a diagnostic is logged. Encoding errors are always
//! reported, open link or not.

use ibis_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartTx};
use ibis_protocol::{DelaySign, EncodeError, NextStopWidth, Telegram};

/// Bus baud rate fixed by VDV 300
pub const BUS_BAUDRATE: u32 = 1200;

/// Line configuration an IBIS transport must apply (1200 baud, 7E2)
pub fn bus_config() -> UartConfig {
    UartConfig {
        baudrate: BUS_BAUDRATE,
        data_bits: DataBits::Seven,
        parity: Parity::Even,
        stop_bits: StopBits::Two,
    }
}

/// Errors from a send operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// The telegram could not be encoded
    Encode(EncodeError),
    /// The transport failed while writing the frame
    Transport(E),
}

/// Result of a send operation, parameterized over the transport error
pub type SendResult<E> = Result<(), SendError<E>>;

/// Link state: the transport is only reachable while open
enum Link<U> {
    Closed,
    Open(U),
}

/// The IBIS bus master
///
/// Owns the transmit transport and exposes one operation per telegram
/// in the catalog, plus [`Master::send`] for pre-built telegrams.
pub struct Master<U: UartTx> {
    link: Link<U>,
}

impl<U: UartTx> Master<U> {
    /// Create a master with the link closed
    pub const fn new() -> Self {
        Self { link: Link::Closed }
    }

    /// Attach an initialized transport, opening the link
    ///
    /// The transport arrives already configured for the bus (see
    /// [`bus_config`]); port initialization failures are the
    /// transport's to report before it gets here. If a link is already
    /// open the new transport is handed back unchanged.
    pub fn attach(&mut self, uart: U) -> Result<(), U> {
        match self.link {
            Link::Open(_) => Err(uart),
            Link::Closed => {
                self.link = Link::Open(uart);
                Ok(())
            }
        }
    }

    /// Close the link and return the transport, if one was attached
    pub fn detach(&mut self) -> Option<U> {
        match core::mem::replace(&mut self.link, Link::Closed) {
            Link::Open(uart) => Some(uart),
            Link::Closed => None,
        }
    }

    /// Whether a transport is attached
    pub fn is_open(&self) -> bool {
        matches!(self.link, Link::Open(_))
    }

    /// Encode a telegram, frame it and write it to the bus
    ///
    /// With the link closed the frame is silently dropped.
    pub fn send(&mut self, telegram: &Telegram<'_>) -> SendResult<U::Error> {
        let frame = telegram.to_frame().map_err(SendError::Encode)?;

        match &mut self.link {
            Link::Closed => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ibis: link closed, dropping {} byte frame", frame.len());
                Ok(())
            }
            Link::Open(uart) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("ibis: sending {} byte frame", frame.len());
                uart.write_blocking(&frame).map_err(SendError::Transport)?;
                uart.flush().map_err(SendError::Transport)
            }
        }
    }

    /// Announce the line number, 1-3 digits (DS001)
    pub fn line_number(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumber(number))
    }

    /// Announce the alphanumeric line id, 1-4 digits (DS001neu)
    pub fn line_number_alpha(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumberAlpha(number))
    }

    /// Announce the line number symbol, 1-2 digits (DS001a)
    pub fn line_symbol(&mut self, symbol: u8) -> SendResult<U::Error> {
        self.send(&Telegram::LineSymbol(symbol))
    }

    /// Announce the radio channel, 1-5 digits (DS001b)
    pub fn radio_channel(&mut self, channel: u16) -> SendResult<U::Error> {
        self.send(&Telegram::RadioChannel(channel))
    }

    /// Announce the line tape reel position, 1-3 digits (DS001c)
    pub fn line_reel_position(&mut self, position: u16) -> SendResult<U::Error> {
        self.send(&Telegram::LineReelPosition(position))
    }

    /// Announce the 4-digit composite line number (DS001d)
    pub fn line_number_composite4(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumberComposite4(number))
    }

    /// Announce the 7-digit composite line number (DS001f)
    pub fn line_number_composite7(&mut self, number: u32) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumberComposite7(number))
    }

    /// Announce the 8-digit composite line number (DS001e)
    pub fn line_number_composite8(&mut self, number: u32) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumberComposite8(number))
    }

    /// Announce the course number, 1-2 digits (DS002)
    pub fn course_number(&mut self, number: u8) -> SendResult<U::Error> {
        self.send(&Telegram::CourseNumber(number))
    }

    /// Announce the train number, 1-5 digits (DS002a)
    pub fn train_number(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::TrainNumber(number))
    }

    /// Select an indexed destination text, 1-3 digits (DS003)
    pub fn destination_id(&mut self, id: u16) -> SendResult<U::Error> {
        self.send(&Telegram::DestinationId(id))
    }

    /// Select a destination id on IMU equipment, 1-3 digits (DS003b)
    pub fn destination_id_imu(&mut self, id: u16) -> SendResult<U::Error> {
        self.send(&Telegram::DestinationIdImu(id))
    }

    /// Announce the route number, 1-3 digits (DS003d)
    pub fn route_number(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::RouteNumber(number))
    }

    /// Announce the destination tape reel position, 1-3 digits (DS003e)
    pub fn destination_reel_position(&mut self, position: u16) -> SendResult<U::Error> {
        self.send(&Telegram::DestinationReelPosition(position))
    }

    /// Announce the wide route number, 1-6 digits (DS003f)
    pub fn route_number_wide(&mut self, number: u32) -> SendResult<U::Error> {
        self.send(&Telegram::RouteNumberWide(number))
    }

    /// Announce the wide line number, 1-4 digits (DS003g)
    pub fn line_number_wide(&mut self, number: u16) -> SendResult<U::Error> {
        self.send(&Telegram::LineNumberWide(number))
    }

    /// Set ticket validator attributes, 6 digits (DS004)
    pub fn validator_attributes(&mut self, attributes: u32) -> SendResult<U::Error> {
        self.send(&Telegram::ValidatorAttributes(attributes))
    }

    /// Set additional ticket validator attributes, 4 digits (DS004a)
    pub fn validator_extra_attributes(&mut self, attributes: u16) -> SendResult<U::Error> {
        self.send(&Telegram::ValidatorExtraAttributes(attributes))
    }

    /// Set the ticket validator stop number, 1-7 digits (DS004b)
    pub fn validator_stop_number(&mut self, number: u32) -> SendResult<U::Error> {
        self.send(&Telegram::ValidatorStopNumber(number))
    }

    /// Broadcast the time of day as packed HHMM (DS005)
    pub fn time(&mut self, hhmm: u16) -> SendResult<U::Error> {
        self.send(&Telegram::Time(hhmm))
    }

    /// Broadcast the date as packed DDMMY (DS006)
    pub fn date(&mut self, ddmmy: u32) -> SendResult<U::Error> {
        self.send(&Telegram::Date(ddmmy))
    }

    /// Announce the train length, 1 digit (DS007)
    pub fn train_length(&mut self, length: u8) -> SendResult<U::Error> {
        self.send(&Telegram::TrainLength(length))
    }

    /// Announce the next stop as fixed-width text (DS009/DS009a/DS009b)
    pub fn next_stop(&mut self, text: &str, width: NextStopWidth) -> SendResult<U::Error> {
        self.send(&Telegram::NextStop { text, width })
    }

    /// Set the line progress display stop id, 1-4 digits (DS010)
    pub fn stop_index(&mut self, index: u16) -> SendResult<U::Error> {
        self.send(&Telegram::StopIndex(index))
    }

    /// Set the auxiliary line progress stop id, 1-4 digits (DS010a)
    pub fn stop_index_aux(&mut self, index: u16) -> SendResult<U::Error> {
        self.send(&Telegram::StopIndexAux(index))
    }

    /// Set the short line progress stop id, 1-2 digits (DS010b)
    pub fn stop_index_short(&mut self, index: u8) -> SendResult<U::Error> {
        self.send(&Telegram::StopIndexShort(index))
    }

    /// Broadcast the year, 4 digits (DS010d)
    pub fn year(&mut self, year: u16) -> SendResult<U::Error> {
        self.send(&Telegram::Year(year))
    }

    /// Announce a delay in minutes (DS010e)
    pub fn delay(&mut self, sign: DelaySign, minutes: u16) -> SendResult<U::Error> {
        self.send(&Telegram::Delay { sign, minutes })
    }

    /// Send free destination text in 16-character blocks (DS003a)
    pub fn destination_text(&mut self, text: &str) -> SendResult<U::Error> {
        self.send(&Telegram::DestinationText(text))
    }

    /// Send a free next-stop name in 4-character blocks (DS003c)
    pub fn next_stop_text(&mut self, text: &str) -> SendResult<U::Error> {
        self.send(&Telegram::NextStopText(text))
    }

    /// Send destination text to one device address (DS021)
    pub fn addressed_text(&mut self, address: u8, text: &str) -> SendResult<U::Error> {
        self.send(&Telegram::AddressedText { address, text })
    }

    /// Send a line progress display record (DS021a)
    pub fn line_progress(
        &mut self,
        address: u8,
        stop_id: u8,
        stop_text: &str,
        change_text: &str,
    ) -> SendResult<U::Error> {
        self.send(&Telegram::LineProgress {
            address,
            stop_id,
            stop_text,
            change_text,
        })
    }

    /// Send a two-line general screen page (GSP)
    pub fn screen_page(&mut self, address: u8, line1: &str, line2: &str) -> SendResult<U::Error> {
        self.send(&Telegram::ScreenPage {
            address,
            line1,
            line2,
        })
    }
}

impl<U: UartTx> Default for Master<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingUart {
        written: heapless::Vec<u8, 512>,
        flushes: usize,
    }

    impl UartTx for RecordingUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.written.extend_from_slice(data)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct FailingUart;

    impl UartTx for FailingUart {
        type Error = u8;

        fn write_blocking(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Err(42)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_bus_config_is_1200_7e2() {
        let config = bus_config();
        assert_eq!(config.baudrate, 1200);
        assert_eq!(config.data_bits, DataBits::Seven);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, StopBits::Two);
    }

    #[test]
    fn test_send_writes_complete_frame() {
        let mut master = Master::new();
        master.attach(RecordingUart::default()).ok().unwrap();

        master.line_number(12).unwrap();

        let uart = master.detach().unwrap();
        let expected = Telegram::LineNumber(12).to_frame().unwrap();
        assert_eq!(uart.written.as_slice(), expected.as_slice());
        assert_eq!(uart.flushes, 1);
    }

    #[test]
    fn test_closed_link_drops_frame() {
        let mut master: Master<RecordingUart> = Master::new();
        assert!(!master.is_open());

        // Not an error, the frame is simply dropped
        assert_eq!(master.next_stop_text("Rathaus"), Ok(()));
    }

    #[test]
    fn test_detach_closes_link() {
        let mut master = Master::new();
        master.attach(RecordingUart::default()).ok().unwrap();
        assert!(master.is_open());

        let uart = master.detach().unwrap();
        assert!(uart.written.is_empty());
        assert!(!master.is_open());
        assert!(master.detach().is_none());
    }

    #[test]
    fn test_attach_refused_while_open() {
        let mut master = Master::new();
        master.attach(RecordingUart::default()).ok().unwrap();

        // The second transport comes back unchanged
        assert!(master.attach(RecordingUart::default()).is_err());
    }

    #[test]
    fn test_encode_error_reported_even_when_closed() {
        let mut master: Master<RecordingUart> = Master::new();
        assert_eq!(
            master.line_number(5000),
            Err(SendError::Encode(EncodeError::FieldOverflow))
        );
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut master = Master::new();
        master.attach(FailingUart).ok().unwrap();
        assert_eq!(master.course_number(3), Err(SendError::Transport(42)));
    }

    #[test]
    fn test_multiple_telegrams_in_sequence() {
        let mut master = Master::new();
        master.attach(RecordingUart::default()).ok().unwrap();

        master.line_number(5).unwrap();
        master.next_stop_text("Markt").unwrap();

        let uart = master.detach().unwrap();
        let first = Telegram::LineNumber(5).to_frame().unwrap();
        let second = Telegram::NextStopText("Markt").to_frame().unwrap();
        assert_eq!(&uart.written[..first.len()], first.as_slice());
        assert_eq!(&uart.written[first.len()..], second.as_slice());
        assert_eq!(uart.flushes, 2);
    }
}
