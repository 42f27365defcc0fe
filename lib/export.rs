use core::fmt::{self, Write};
use core::ops::Range;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{IntoStorage, Point};
use heapless::String;

use crate::config::{Export, Screen};
use crate::error::{Error, Result};
use crate::hw::{Lcd, OpenMode, Peer, Storage};
use crate::session::StorageSession;

/// Plain-text monochrome bitmap.
pub struct Pbm;

impl Pbm {
    pub const MAGIC: &'static str = "P1";

    pub fn header<const N: usize>(width: i32, height: i32, out: &mut String<N>) -> fmt::Result {
        write!(out, "{}\n{} {}\n", Pbm::MAGIC, width, height)
    }

    /// Any lit pixel is written as `0`, only pure black becomes `1`.
    pub fn token(color: Rgb565) -> char {
        if color.into_storage() > 0 {
            '0'
        } else {
            '1'
        }
    }
}

/// Splits `0..height` into consecutive row ranges of at most `size` rows.
#[derive(Debug, Clone)]
pub struct RowBatches {
    next: u32,
    end: u32,
    size: u32,
}

impl RowBatches {
    pub fn new(height: u32, size: u32) -> Self {
        RowBatches {
            next: 0,
            end: height,
            size: size.max(1),
        }
    }
}

impl Iterator for RowBatches {
    type Item = Range<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let start = self.next;
        self.next = self.end.min(start + self.size);
        Some(start..self.next)
    }
}

/// Appends one text line per row in `rows`, tokens separated by spaces.
pub fn encode_rows<L, SDER, const N: usize>(
    lcd: &mut L,
    rows: Range<u32>,
    out: &mut String<N>,
) -> Result<(), L::Error, SDER>
where
    L: Lcd,
{
    let overflow = |_| Error::<L::Error, SDER>::BufferWrite;
    for y in rows {
        for x in 0..Screen::WIDTH {
            if x > 0 {
                out.push(' ').map_err(overflow)?;
            }
            let color = lcd
                .pixel(Point::new(x, y as i32))
                .map_err(Error::<L::Error, SDER>::Lcd)?;
            out.push(Pbm::token(color)).map_err(overflow)?;
        }
        out.push('\n').map_err(overflow)?;
    }
    Ok(())
}

/// Saves the whole screen to `path`.
///
/// The file is created with just the header first, then reopened for append
/// and filled one batch of rows at a time so only a single chunk is ever
/// held in memory.
pub fn export<L, SD, P>(
    lcd: &mut L,
    storage: &mut SD,
    peer: &mut P,
    path: &str,
) -> Result<(), L::Error, SD::Error>
where
    L: Lcd,
    SD: Storage,
    P: Peer,
{
    let mut session = StorageSession::open(storage, peer)
        .map_err(Error::<L::Error, SD::Error>::StorageUnavailable)?;

    let mut header = String::<16>::new();
    Pbm::header(Screen::WIDTH, Screen::HEIGHT, &mut header)
        .map_err(|_| Error::<L::Error, SD::Error>::BufferWrite)?;
    let mut file = session
        .open_file(path, OpenMode::Truncate, true)
        .map_err(Error::<L::Error, SD::Error>::FileOpen)?;
    let written = session.write(&mut file, header.as_bytes());
    session
        .close(file)
        .and(written)
        .map_err(Error::<L::Error, SD::Error>::Storage)?;

    let mut file = session
        .open_file(path, OpenMode::Append, true)
        .map_err(Error::<L::Error, SD::Error>::FileOpen)?;
    let written = write_rows(lcd, &mut session, &mut file);
    let closed = session.close(file).map_err(Error::Storage);
    written.and(closed)
}

fn write_rows<L, SD, P>(
    lcd: &mut L,
    session: &mut StorageSession<'_, SD, P>,
    file: &mut SD::File,
) -> Result<(), L::Error, SD::Error>
where
    L: Lcd,
    SD: Storage,
    P: Peer,
{
    let mut chunk = String::<{ Export::CHUNK_BYTES }>::new();
    for rows in RowBatches::new(Screen::HEIGHT as u32, Export::ROWS_PER_CHUNK) {
        trace!("encoding rows {}..{}", rows.start, rows.end);
        chunk.clear();
        encode_rows::<L, SD::Error, { Export::CHUNK_BYTES }>(lcd, rows, &mut chunk)?;
        session
            .write(file, chunk.as_bytes())
            .map_err(Error::<L::Error, SD::Error>::Storage)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EventLog, FakeLcd, FakeSerial, FakeStorage, StorageFault};
    use embedded_graphics::pixelcolor::RgbColor;
    use embedded_graphics::primitives::{
        Circle, ContainsPoint, PointsIter, Primitive, PrimitiveStyle,
    };

    fn fixtures() -> (FakeStorage, FakeSerial) {
        let log = EventLog::default();
        (FakeStorage::new(log.clone()), FakeSerial::new(log))
    }

    fn data_rows(contents: &str) -> Vec<Vec<&str>> {
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("P1"));
        assert_eq!(lines.next(), Some("320 240"));
        lines.map(|line| line.split(' ').collect()).collect()
    }

    #[test]
    fn batches_cover_every_row_once() {
        let batches: Vec<_> = RowBatches::new(10, 4).collect();
        assert_eq!(batches, vec![0..4, 4..8, 8..10]);

        let batches: Vec<_> = RowBatches::new(240, 8).collect();
        assert_eq!(batches.len(), 30);
        assert_eq!(batches.last(), Some(&(232..240)));

        assert_eq!(RowBatches::new(0, 8).count(), 0);
    }

    #[test]
    fn black_is_the_only_set_bit() {
        assert_eq!(Pbm::token(Rgb565::BLACK), '1');
        assert_eq!(Pbm::token(Rgb565::WHITE), '0');
        assert_eq!(Pbm::token(Rgb565::new(0, 0, 1)), '0');
    }

    #[test]
    fn blank_canvas_exports_all_zero() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let (mut storage, mut serial) = fixtures();

        export(&mut lcd, &mut storage, &mut serial, Export::PATH).unwrap();

        let contents = storage.file(Export::PATH).unwrap();
        let rows = data_rows(&contents);
        assert_eq!(rows.len(), Screen::HEIGHT as usize);
        for row in rows {
            assert_eq!(row.len(), Screen::WIDTH as usize);
            assert!(row.iter().all(|token| *token == "0"));
        }
    }

    #[test]
    fn drawn_circle_shows_up_as_set_bits() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let circle = Circle::with_center(Point::new(100, 120), 11);
        lcd.draw(&circle.into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK)))
            .unwrap();
        let (mut storage, mut serial) = fixtures();

        export(&mut lcd, &mut storage, &mut serial, Export::PATH).unwrap();

        let contents = storage.file(Export::PATH).unwrap();
        let mut set = 0;
        for (y, row) in data_rows(&contents).iter().enumerate() {
            for (x, token) in row.iter().enumerate() {
                if *token == "1" {
                    set += 1;
                    assert!(circle.contains(Point::new(x as i32, y as i32)));
                }
            }
        }
        assert_eq!(set, circle.points().count());
    }

    #[test]
    fn rows_are_written_in_batches() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let (mut storage, mut serial) = fixtures();

        export(&mut lcd, &mut storage, &mut serial, Export::PATH).unwrap();

        let batches = (Screen::HEIGHT as u32 + Export::ROWS_PER_CHUNK - 1) / Export::ROWS_PER_CHUNK;
        assert_eq!(storage.writes(), 1 + batches as usize);
    }

    #[test]
    fn unavailable_storage_writes_nothing() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let (mut storage, mut serial) = fixtures();
        storage.fail_mount();

        let result = export(&mut lcd, &mut storage, &mut serial, Export::PATH);

        assert_eq!(result, Err(Error::StorageUnavailable(StorageFault::Mount)));
        assert_eq!(storage.file(Export::PATH), None);
        assert!(serial.is_active());
    }

    #[test]
    fn failed_reopen_leaves_header_only() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let (mut storage, mut serial) = fixtures();
        storage.fail_append();

        let result = export(&mut lcd, &mut storage, &mut serial, Export::PATH);

        assert_eq!(result, Err(Error::FileOpen(StorageFault::Open)));
        assert_eq!(storage.file(Export::PATH).as_deref(), Some("P1\n320 240\n"));
        assert!(serial.is_active());
        assert!(!storage.is_mounted());
    }

    #[test]
    fn previous_image_is_replaced() {
        let mut lcd = FakeLcd::new(Rgb565::WHITE);
        let (mut storage, mut serial) = fixtures();
        storage.insert(Export::PATH, "P1\n1 1\n1\n");

        export(&mut lcd, &mut storage, &mut serial, Export::PATH).unwrap();

        let contents = storage.file(Export::PATH).unwrap();
        assert_eq!(data_rows(&contents).len(), Screen::HEIGHT as usize);
    }
}
