//! Telegram catalog
//!
//! One [`Telegram`] variant per VDV 300 message type. Two families:
//!
//! - **Fixed-format telegrams** are described by a declarative field
//!   list ([`Field`]) interpreted by one generic formatter, instead of
//!   one hand-written encoder per type.
//! - **Block-structured telegrams** carry an address and a hex block
//!   count ahead of block-padded text. Their quirks are deliberately
//!   reproduced per type: DS021 clips to `blocks * 16` without padding,
//!   DS021a announces the final partial block in an explicit remainder
//!   field, the others leave the receiver to infer it.
//!
//! Doc comments name the telegram's DS number from VDV 300.

use core::fmt::Write;

use crate::block::{self, STOP_BLOCK, TEXT_BLOCK};
use crate::frame::{self, EncodeError, Payload, WireFrame};
use crate::hex;

/// Width variants of the next-stop text telegram (DS009/DS009a/DS009b)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NextStopWidth {
    Sixteen,
    Twenty,
    TwentyFour,
}

impl NextStopWidth {
    /// Field width in characters
    pub fn chars(self) -> usize {
        match self {
            NextStopWidth::Sixteen => 16,
            NextStopWidth::Twenty => 20,
            NextStopWidth::TwentyFour => 24,
        }
    }
}

/// Sign of a delay announcement (DS010e)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DelaySign {
    /// Running behind schedule, transmitted as `+`
    Late,
    /// Running ahead of schedule, transmitted as `-`
    Early,
}

impl DelaySign {
    /// The sign character as transmitted
    pub fn symbol(self) -> &'static str {
        match self {
            DelaySign::Late => "+",
            DelaySign::Early => "-",
        }
    }
}

/// One protocol message, identified by its type code
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Telegram<'a> {
    /// Line number, 1-3 digits (DS001)
    LineNumber(u16),
    /// Line number, alphanumeric id, 1-4 digits (DS001neu)
    LineNumberAlpha(u16),
    /// Line number symbol, 1-2 digits (DS001a)
    LineSymbol(u8),
    /// Radio channel, 1-5 digits (DS001b)
    RadioChannel(u16),
    /// Line tape reel position id, 1-3 digits (DS001c)
    LineReelPosition(u16),
    /// Composite line number, 4 digits (DS001d)
    LineNumberComposite4(u16),
    /// Composite line number, 7 digits (DS001f)
    LineNumberComposite7(u32),
    /// Composite line number, 8 digits (DS001e)
    LineNumberComposite8(u32),
    /// Course number, 1-2 digits (DS002)
    CourseNumber(u8),
    /// Train number, 1-5 digits (DS002a)
    TrainNumber(u16),
    /// Indexed destination text id, 1-3 digits (DS003)
    DestinationId(u16),
    /// Destination id for IMU equipment, 1-3 digits (DS003b)
    DestinationIdImu(u16),
    /// Route number, 1-3 digits (DS003d)
    RouteNumber(u16),
    /// Destination tape reel position id, 1-3 digits (DS003e)
    DestinationReelPosition(u16),
    /// Route number, 1-6 digits (DS003f)
    RouteNumberWide(u32),
    /// Line number, 1-4 digits (DS003g)
    LineNumberWide(u16),
    /// Ticket validator attributes, 6 digits (DS004)
    ValidatorAttributes(u32),
    /// Additional ticket validator attributes, 4 digits (DS004a)
    ValidatorExtraAttributes(u16),
    /// Ticket validator stop number, 1-7 digits (DS004b)
    ValidatorStopNumber(u32),
    /// Time of day as packed HHMM (DS005)
    Time(u16),
    /// Date as packed DDMMY (DS006)
    Date(u32),
    /// Train length, 1 digit (DS007)
    TrainLength(u8),
    /// Announced next stop, left-justified text (DS009/DS009a/DS009b)
    NextStop { text: &'a str, width: NextStopWidth },
    /// Line progress display stop id, 1-4 digits (DS010)
    StopIndex(u16),
    /// Line progress display stop id, auxiliary variant, 1-4 digits (DS010a)
    StopIndexAux(u16),
    /// Line progress display stop id, short variant, 1-2 digits (DS010b)
    StopIndexShort(u8),
    /// Year, 4 digits (DS010d)
    Year(u16),
    /// Delay announcement, sign plus minutes (DS010e)
    Delay { sign: DelaySign, minutes: u16 },
    /// Free destination text in 16-character blocks (DS003a)
    DestinationText(&'a str),
    /// Free next-stop name in 4-character blocks (DS003c)
    NextStopText(&'a str),
    /// Destination text targeted at one device address (DS021)
    AddressedText { address: u8, text: &'a str },
    /// Line progress display record (DS021a)
    LineProgress {
        address: u8,
        stop_id: u8,
        stop_text: &'a str,
        change_text: &'a str,
    },
    /// Two-line general screen page (GSP)
    ScreenPage {
        address: u8,
        line1: &'a str,
        line2: &'a str,
    },
}

/// One field of a fixed-format telegram
#[derive(Debug, Clone, Copy)]
enum Field<'a> {
    /// Literal protocol text, emitted as-is
    Literal(&'static str),
    /// Zero-padded decimal of fixed width
    Decimal { value: u32, width: usize },
    /// Left-justified text, space-padded to a minimum width
    ///
    /// Longer text passes through unmodified; the width is a minimum,
    /// never a truncation point.
    LeftText { value: &'a str, width: usize },
}

impl<'a> Telegram<'a> {
    /// Build the raw (unframed) payload for this telegram
    pub fn payload(&self) -> Result<Payload, EncodeError> {
        use Field::Literal;

        match *self {
            Telegram::LineNumber(n) => format_fields(&[Literal("l"), dec(n.into(), 3)]),
            Telegram::LineNumberAlpha(n) => format_fields(&[Literal("q"), dec(n.into(), 4)]),
            Telegram::LineSymbol(n) => format_fields(&[Literal("lE"), dec(n.into(), 2)]),
            Telegram::RadioChannel(n) => format_fields(&[Literal("lF"), dec(n.into(), 5)]),
            Telegram::LineReelPosition(n) => format_fields(&[Literal("lP"), dec(n.into(), 3)]),
            Telegram::LineNumberComposite4(n) => format_fields(&[Literal("lC"), dec(n.into(), 4)]),
            Telegram::LineNumberComposite7(n) => format_fields(&[Literal("lC"), dec(n, 7)]),
            Telegram::LineNumberComposite8(n) => format_fields(&[Literal("lC"), dec(n, 8)]),
            Telegram::CourseNumber(n) => format_fields(&[Literal("k"), dec(n.into(), 2)]),
            Telegram::TrainNumber(n) => format_fields(&[Literal("k"), dec(n.into(), 5)]),
            Telegram::DestinationId(n) => format_fields(&[Literal("z"), dec(n.into(), 3)]),
            Telegram::DestinationIdImu(n) => format_fields(&[Literal("zR"), dec(n.into(), 3)]),
            Telegram::RouteNumber(n) => format_fields(&[Literal("zN"), dec(n.into(), 3)]),
            Telegram::DestinationReelPosition(n) => format_fields(&[Literal("zP"), dec(n.into(), 3)]),
            Telegram::RouteNumberWide(n) => format_fields(&[Literal("zN"), dec(n, 6)]),
            Telegram::LineNumberWide(n) => format_fields(&[Literal("zL"), dec(n.into(), 4)]),
            Telegram::ValidatorAttributes(n) => format_fields(&[Literal("e"), dec(n, 6)]),
            Telegram::ValidatorExtraAttributes(n) => format_fields(&[Literal("eA"), dec(n.into(), 4)]),
            Telegram::ValidatorStopNumber(n) => format_fields(&[Literal("eH"), dec(n, 7)]),
            Telegram::Time(hhmm) => format_fields(&[Literal("u"), dec(hhmm.into(), 4)]),
            Telegram::Date(ddmmy) => format_fields(&[Literal("d"), dec(ddmmy, 5)]),
            Telegram::TrainLength(n) => format_fields(&[Literal("w"), dec(n.into(), 1)]),
            Telegram::NextStop { text, width } => format_fields(&[
                Literal("v"),
                Field::LeftText {
                    value: text,
                    width: width.chars(),
                },
            ]),
            Telegram::StopIndex(n) => format_fields(&[Literal("x"), dec(n.into(), 4)]),
            Telegram::StopIndexAux(n) => format_fields(&[Literal("xH"), dec(n.into(), 4)]),
            Telegram::StopIndexShort(n) => format_fields(&[Literal("xI"), dec(n.into(), 2)]),
            Telegram::Year(n) => format_fields(&[Literal("xJ"), dec(n.into(), 4)]),
            Telegram::Delay { sign, minutes } => format_fields(&[
                Literal("xV"),
                Literal(sign.symbol()),
                dec(minutes.into(), 3),
            ]),
            Telegram::DestinationText(text) => block_text("zA", text, TEXT_BLOCK),
            Telegram::NextStopText(text) => block_text("zI", text, STOP_BLOCK),
            Telegram::AddressedText { address, text } => addressed_text(address, text),
            Telegram::LineProgress {
                address,
                stop_id,
                stop_text,
                change_text,
            } => line_progress(address, stop_id, stop_text, change_text),
            Telegram::ScreenPage {
                address,
                line1,
                line2,
            } => screen_page(address, line1, line2),
        }
    }

    /// Encode this telegram into a complete wire frame
    pub fn to_frame(&self) -> Result<WireFrame, EncodeError> {
        frame::frame(&self.payload()?)
    }
}

/// Shorthand for a decimal field descriptor
fn dec(value: u32, width: usize) -> Field<'static> {
    Field::Decimal { value, width }
}

/// Interpret a fixed-format field descriptor into a payload
fn format_fields(fields: &[Field<'_>]) -> Result<Payload, EncodeError> {
    let mut out = Payload::new();
    for field in fields {
        match *field {
            Field::Literal(text) => push_str(&mut out, text)?,
            Field::Decimal { value, width } => push_decimal(&mut out, value, width)?,
            Field::LeftText { value, width } => {
                push_str(&mut out, value)?;
                let len = value.chars().count();
                pad_spaces(&mut out, width.saturating_sub(len))?;
            }
        }
    }
    Ok(out)
}

/// Generic block-structured telegram: type code, hex block count, text,
/// space padding up to the block boundary (DS003a, DS003c)
fn block_text(code: &'static str, text: &str, block_size: usize) -> Result<Payload, EncodeError> {
    let layout = block::layout(text.chars().count(), block_size);
    let blocks = u8::try_from(layout.blocks).map_err(|_| EncodeError::PayloadTooLarge)?;

    let mut out = Payload::new();
    push_str(&mut out, code)?;
    hex::push(&mut out, blocks)?;
    push_str(&mut out, text)?;
    pad_spaces(&mut out, layout.padding)?;
    Ok(out)
}

/// Addressed destination text (DS021)
///
/// The block count runs over 4-character blocks while the clip capacity
/// is `blocks * 16`, and no padding is appended. Deployed equipment
/// expects exactly this pairing.
fn addressed_text(address: u8, text: &str) -> Result<Payload, EncodeError> {
    let layout = block::layout(text.chars().count(), STOP_BLOCK);
    let blocks = u8::try_from(layout.blocks).map_err(|_| EncodeError::PayloadTooLarge)?;
    let capacity = layout.blocks * 16;

    let mut out = Payload::new();
    push_str(&mut out, "aA")?;
    hex::push(&mut out, address)?;
    hex::push(&mut out, blocks)?;
    for c in text.chars().take(capacity) {
        out.push(c).map_err(|_| EncodeError::PayloadTooLarge)?;
    }
    Ok(out)
}

/// Line progress display record (DS021a)
///
/// The only telegram that announces a partial final block explicitly:
/// the record length modulo the block size travels as its own hex field
/// instead of being inferred from padding.
fn line_progress(
    address: u8,
    stop_id: u8,
    stop_text: &str,
    change_text: &str,
) -> Result<Payload, EncodeError> {
    let mut record = Payload::new();
    push_str(&mut record, "\x03")?;
    push_decimal(&mut record, stop_id.into(), 2)?;
    push_str(&mut record, "\x04")?;
    push_str(&mut record, stop_text)?;
    push_str(&mut record, "\x05")?;
    push_str(&mut record, change_text)?;

    let layout = block::layout(record.chars().count(), STOP_BLOCK);
    let blocks = u8::try_from(layout.blocks).map_err(|_| EncodeError::PayloadTooLarge)?;

    let mut out = Payload::new();
    push_str(&mut out, "aL")?;
    hex::push(&mut out, address)?;
    hex::push(&mut out, blocks)?;
    hex::push(&mut out, layout.remainder as u8)?;
    push_str(&mut out, &record)?;
    Ok(out)
}

/// Two-line general screen page (GSP)
///
/// The line separator is only inserted when the second line is
/// non-empty; two trailing line feeds mark the end of the page.
fn screen_page(address: u8, line1: &str, line2: &str) -> Result<Payload, EncodeError> {
    let mut lines = Payload::new();
    push_str(&mut lines, line1)?;
    if !line2.is_empty() {
        push_str(&mut lines, "\n")?;
    }
    push_str(&mut lines, line2)?;
    push_str(&mut lines, "\n\n")?;

    let layout = block::layout(lines.chars().count(), TEXT_BLOCK);
    let blocks = u8::try_from(layout.blocks).map_err(|_| EncodeError::PayloadTooLarge)?;

    let mut out = Payload::new();
    push_str(&mut out, "aA")?;
    hex::push(&mut out, address)?;
    hex::push(&mut out, blocks)?;
    push_str(&mut out, &lines)?;
    pad_spaces(&mut out, layout.padding)?;
    Ok(out)
}

fn push_str(out: &mut Payload, text: &str) -> Result<(), EncodeError> {
    out.push_str(text).map_err(|_| EncodeError::PayloadTooLarge)
}

fn push_decimal(out: &mut Payload, value: u32, width: usize) -> Result<(), EncodeError> {
    if decimal_digits(value) > width {
        return Err(EncodeError::FieldOverflow);
    }
    write!(out, "{value:0width$}").map_err(|_| EncodeError::PayloadTooLarge)
}

fn pad_spaces(out: &mut Payload, count: usize) -> Result<(), EncodeError> {
    for _ in 0..count {
        out.push(' ').map_err(|_| EncodeError::PayloadTooLarge)?;
    }
    Ok(())
}

fn decimal_digits(mut value: u32) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}
