use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{Point, Primitive};
use embedded_graphics::primitives::PrimitiveStyle;

use crate::config::{Export, Pen};
use crate::error::{Error, Result};
use crate::export;
use crate::hw::{Lcd, Peer, Storage, Touch};
use crate::input::{route, Action, Calibration, TouchSample};
use crate::toolbar::{self, Notice};

/// Drawing session: owns the peripherals, the pen and the export flag.
pub struct Painter<LCD, TS, SD, SER> {
    lcd: LCD,
    touch: TS,
    storage: SD,
    serial: SER,
    calibration: Calibration,
    pen: Rgb565,
    exporting: bool,
    notice: Option<Notice>,
}

impl<LCD, TS, SD, SER> Painter<LCD, TS, SD, SER>
where
    LCD: Lcd,
    TS: Touch,
    SD: Storage,
    SER: Peer,
{
    /// Brings up the touch controller and draws the initial screen.
    ///
    /// A touch controller that does not start leaves an error on screen and
    /// yields [`Error::Touch`]; the caller is expected to halt.
    pub fn new(
        lcd: LCD,
        touch: TS,
        storage: SD,
        serial: SER,
    ) -> Result<Self, LCD::Error, SD::Error> {
        let mut painter = Painter {
            lcd,
            touch,
            storage,
            serial,
            calibration: Calibration::default(),
            pen: Pen::DEFAULT,
            exporting: false,
            notice: None,
        };
        painter.init()?;
        Ok(painter)
    }

    pub fn pen(&self) -> Rgb565 {
        self.pen
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice.as_ref().map(Notice::message)
    }

    /// One scheduler step: ages the notice, then polls and handles the touch panel.
    pub fn tick(&mut self) -> Result<Action, LCD::Error, SD::Error> {
        crate::advance_ticks();
        self.age_notice()?;
        let sample = match self.touch.point() {
            Ok(sample) => sample,
            Err(_) => {
                warn!("touch read failed");
                return Ok(Action::None);
            }
        };
        self.handle(sample)
    }

    /// Acts on one touch sample and reports what it did.
    pub fn handle(&mut self, sample: TouchSample) -> Result<Action, LCD::Error, SD::Error> {
        if !sample.is_contact() || self.exporting {
            return Ok(Action::None);
        }
        let point = self.calibration.to_screen(&sample);
        let action = route(point);
        match action {
            Action::Draw(point) => self.draw(point)?,
            Action::SelectPen(color) => self.select(color),
            Action::Export => self.export()?,
            Action::None => {}
        }
        Ok(action)
    }

    fn init(&mut self) -> Result<(), LCD::Error, SD::Error> {
        Self::screen(toolbar::draw_booting(&mut self.lcd))?;
        if self.touch.begin().is_err() {
            error!("touch controller did not start");
            Self::screen(toolbar::draw_touch_failure(&mut self.lcd))?;
            return Err(Error::Touch);
        }
        Self::screen(toolbar::draw(&mut self.lcd))?;
        info!("painter ready");
        Ok(())
    }

    fn draw(&mut self, point: Point) -> Result<(), LCD::Error, SD::Error> {
        trace!("dot at {} {}", point.x, point.y);
        let dot = toolbar::dot(point, Pen::RADIUS).into_styled(PrimitiveStyle::with_fill(self.pen));
        Self::screen(self.lcd.draw(&dot))
    }

    fn select(&mut self, color: Rgb565) {
        if color != self.pen {
            debug!("pen {}", if color == Rgb565::BLACK { "black" } else { "white" });
            self.pen = color;
        }
    }

    fn export(&mut self) -> Result<(), LCD::Error, SD::Error> {
        self.exporting = true;
        let result = self.save();
        self.exporting = false;
        result
    }

    fn save(&mut self) -> Result<(), LCD::Error, SD::Error> {
        // notices must not end up in the image
        self.clear_notice()?;
        info!("saving {}", Export::PATH);
        let saved = export::export(
            &mut self.lcd,
            &mut self.storage,
            &mut self.serial,
            Export::PATH,
        );
        match saved {
            Ok(()) => {
                info!("saved {}", Export::PATH);
                self.post(Notice::new("Done!", Rgb565::BLACK))
            }
            Err(Error::StorageUnavailable(_)) => {
                warn!("storage unavailable");
                self.post(Notice::new("Storage unavailable!", Rgb565::RED))
            }
            Err(err) if err.is_recoverable() => {
                warn!("could not write {}", Export::PATH);
                self.post(Notice::new("Cannot save!", Rgb565::RED))
            }
            Err(err) => Err(err),
        }
    }

    fn post(&mut self, notice: Notice) -> Result<(), LCD::Error, SD::Error> {
        self.clear_notice()?;
        Self::screen(notice.show(&mut self.lcd))?;
        self.notice = Some(notice);
        Ok(())
    }

    fn clear_notice(&mut self) -> Result<(), LCD::Error, SD::Error> {
        match self.notice.take() {
            Some(notice) => Self::screen(notice.hide(&mut self.lcd)),
            None => Ok(()),
        }
    }

    fn age_notice(&mut self) -> Result<(), LCD::Error, SD::Error> {
        let expired = self.notice.as_mut().map_or(false, Notice::tick);
        if expired {
            self.clear_notice()?;
        }
        Ok(())
    }

    fn screen<T>(result: core::result::Result<T, LCD::Error>) -> Result<T, LCD::Error, SD::Error> {
        result.map_err(Error::Lcd)
    }
}
