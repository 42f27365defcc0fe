use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;

use crate::config::{RawBounds, Screen, Toolbar};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TouchSample {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl TouchSample {
    pub fn new(x: u16, y: u16, z: u16) -> Self {
        TouchSample { x, y, z }
    }

    pub fn is_contact(&self) -> bool {
        self.z != 0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Calibration {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            min_x: RawBounds::MIN_X,
            max_x: RawBounds::MAX_X,
            min_y: RawBounds::MIN_Y,
            max_y: RawBounds::MAX_Y,
        }
    }
}

impl Calibration {
    /// Maps a raw sample onto screen pixels. Samples outside the calibrated
    /// range are not clamped and land off screen.
    pub fn to_screen(&self, sample: &TouchSample) -> Point {
        Point::new(
            map(sample.x as i32, self.min_x, self.max_x, 0, Screen::WIDTH - 1),
            map(sample.y as i32, self.min_y, self.max_y, 0, Screen::HEIGHT - 1),
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ToolbarButton {
    Save,
    White,
    Black,
}

impl ToolbarButton {
    /// Resolves the button under a toolbar tap at column `x`, checked from the
    /// leftmost band. Gaps between bands hit nothing.
    pub fn at(x: i32) -> Option<ToolbarButton> {
        if x < Toolbar::SAVE_BAND_END {
            Some(ToolbarButton::Save)
        } else if x > Toolbar::WHITE_BAND_START && x < Toolbar::WHITE_BAND_END {
            Some(ToolbarButton::White)
        } else if x > Toolbar::BLACK_BAND_START {
            Some(ToolbarButton::Black)
        } else {
            None
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Action {
    /// Touch ignored: no contact, export running or an empty toolbar spot.
    None,
    Draw(Point),
    SelectPen(Rgb565),
    Export,
}

/// Decides what a tap at screen position `point` does.
pub fn route(point: Point) -> Action {
    if point.y > Toolbar::HEIGHT {
        return Action::Draw(point);
    }
    match ToolbarButton::at(point.x) {
        Some(ToolbarButton::Save) => Action::Export,
        Some(ToolbarButton::White) => Action::SelectPen(Rgb565::WHITE),
        Some(ToolbarButton::Black) => Action::SelectPen(Rgb565::BLACK),
        None => Action::None,
    }
}

fn map(to_map: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (to_map - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}
