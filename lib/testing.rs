//! Host-side stand-ins for the board peripherals.

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{
    DrawTarget, Drawable, OriginDimensions, Pixel, Point, Size,
};

use crate::config::Screen;
use crate::hw::{Lcd, OpenMode, Peer, Storage, Touch};
use crate::input::TouchSample;

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

pub struct Frame {
    pixels: Vec<Rgb565>,
}

impl Frame {
    fn index(point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 || point.x >= Screen::WIDTH || point.y >= Screen::HEIGHT {
            return None;
        }
        Some((point.y * Screen::WIDTH + point.x) as usize)
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(Screen::WIDTH as u32, Screen::HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = Frame::index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

/// RAM framebuffer with read-back; clones share the same pixels.
#[derive(Clone)]
pub struct FakeLcd {
    frame: Rc<RefCell<Frame>>,
    draws: Rc<Cell<usize>>,
}

impl FakeLcd {
    pub fn new(color: Rgb565) -> Self {
        let pixels = vec![color; (Screen::WIDTH * Screen::HEIGHT) as usize];
        FakeLcd {
            frame: Rc::new(RefCell::new(Frame { pixels })),
            draws: Rc::new(Cell::new(0)),
        }
    }

    pub fn at(&self, x: i32, y: i32) -> Rgb565 {
        let i = Frame::index(Point::new(x, y)).expect("on screen");
        self.frame.borrow().pixels[i]
    }

    pub fn draws(&self) -> usize {
        self.draws.get()
    }

    /// Pixels inside the given box that differ from `color`.
    pub fn count_not(&self, color: Rgb565, top_left: Point, bottom_right: Point) -> usize {
        let mut count = 0;
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                if self.at(x, y) != color {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn snapshot(&self) -> Vec<Rgb565> {
        self.frame.borrow().pixels.clone()
    }
}

impl Lcd for FakeLcd {
    type Error = Infallible;

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.frame.borrow_mut().clear(color)
    }

    fn draw<D: Drawable<Color = Rgb565>>(&mut self, drawable: &D) -> Result<D::Output, Self::Error> {
        self.draws.set(self.draws.get() + 1);
        let mut frame = self.frame.borrow_mut();
        drawable.draw(&mut *frame)
    }

    fn pixel(&mut self, point: Point) -> Result<Rgb565, Self::Error> {
        Ok(Frame::index(point)
            .map(|i| self.frame.borrow().pixels[i])
            .unwrap_or(Rgb565::BLACK))
    }
}

#[derive(Debug, PartialEq)]
pub struct TouchFault;

#[derive(Clone, Default)]
pub struct FakeTouch {
    script: Rc<RefCell<VecDeque<Result<TouchSample, TouchFault>>>>,
    broken: bool,
}

impl FakeTouch {
    pub fn broken() -> Self {
        FakeTouch {
            broken: true,
            ..FakeTouch::default()
        }
    }

    pub fn press(&self, sample: TouchSample) {
        self.script.borrow_mut().push_back(Ok(sample));
    }

    /// Makes the next poll fail with a bus error.
    pub fn glitch(&self) {
        self.script.borrow_mut().push_back(Err(TouchFault));
    }
}

impl Touch for FakeTouch {
    type Error = TouchFault;

    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.broken {
            Err(TouchFault)
        } else {
            Ok(())
        }
    }

    fn point(&mut self) -> Result<TouchSample, Self::Error> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(TouchSample::default()))
    }
}

#[derive(Debug, PartialEq)]
pub enum StorageFault {
    Mount,
    Open,
    NotMounted,
}

#[derive(Default)]
struct Card {
    files: HashMap<String, Vec<u8>>,
    mounted: bool,
    fail_mount: bool,
    fail_append: bool,
    writes: usize,
}

pub struct FakeFile {
    path: String,
}

/// In-memory card; clones share the same files.
#[derive(Clone)]
pub struct FakeStorage {
    card: Rc<RefCell<Card>>,
    log: EventLog,
}

impl FakeStorage {
    pub fn new(log: EventLog) -> Self {
        FakeStorage {
            card: Rc::new(RefCell::new(Card::default())),
            log,
        }
    }

    pub fn fail_mount(&mut self) {
        self.card.borrow_mut().fail_mount = true;
    }

    pub fn fail_append(&mut self) {
        self.card.borrow_mut().fail_append = true;
    }

    pub fn insert(&self, path: &str, contents: &str) {
        self.card
            .borrow_mut()
            .files
            .insert(path.into(), contents.as_bytes().to_vec());
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.card
            .borrow()
            .files
            .get(path)
            .map(|bytes| String::from_utf8(bytes.clone()).expect("text file"))
    }

    pub fn is_mounted(&self) -> bool {
        self.card.borrow().mounted
    }

    pub fn writes(&self) -> usize {
        self.card.borrow().writes
    }
}

impl Storage for FakeStorage {
    const NAME: &'static str = "sd";
    type Error = StorageFault;
    type File = FakeFile;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.log.push("sd.begin");
        let mut card = self.card.borrow_mut();
        if card.fail_mount {
            return Err(StorageFault::Mount);
        }
        card.mounted = true;
        Ok(())
    }

    fn open(
        &mut self,
        path: &str,
        mode: OpenMode,
        create: bool,
    ) -> Result<Self::File, Self::Error> {
        self.log.push(format!("sd.open {}", path));
        let mut card = self.card.borrow_mut();
        if !card.mounted {
            return Err(StorageFault::NotMounted);
        }
        match mode {
            OpenMode::Truncate => {
                card.files.insert(path.into(), Vec::new());
            }
            OpenMode::Append => {
                if card.fail_append {
                    return Err(StorageFault::Open);
                }
                if !card.files.contains_key(path) {
                    if !create {
                        return Err(StorageFault::Open);
                    }
                    card.files.insert(path.into(), Vec::new());
                }
            }
        }
        Ok(FakeFile { path: path.into() })
    }

    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error> {
        let mut card = self.card.borrow_mut();
        card.writes += 1;
        card.files
            .get_mut(&file.path)
            .ok_or(StorageFault::Open)?
            .extend_from_slice(data);
        Ok(())
    }

    fn close(&mut self, file: Self::File) -> Result<(), Self::Error> {
        self.log.push(format!("sd.close {}", file.path));
        Ok(())
    }

    fn end(&mut self) {
        self.log.push("sd.end");
        self.card.borrow_mut().mounted = false;
    }
}

#[derive(Clone)]
pub struct FakeSerial {
    active: Rc<Cell<bool>>,
    log: EventLog,
}

impl FakeSerial {
    pub fn new(log: EventLog) -> Self {
        FakeSerial {
            active: Rc::new(Cell::new(true)),
            log,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Peer for FakeSerial {
    const NAME: &'static str = "serial";

    fn suspend(&mut self) {
        self.log.push("serial.suspend");
        self.active.set(false);
    }

    fn resume(&mut self) {
        self.log.push("serial.resume");
        self.active.set(true);
    }
}
