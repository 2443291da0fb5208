//! The drawing surface the render projector writes to.
//!
//! [`DisplaySurface`] is the narrow, imperative contract of the display collaborator: move a
//! cursor, pick a text size and color, fill a rectangle, print text. [`GraphicsSurface`]
//! implements it over any `embedded-graphics` draw target; on the device that target is the
//! ST7789 panel built in [`panel`].

use core::fmt::{self, Write as _};

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Point, Primitive, Size};
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use crate::{Error, Result};

/// An axis-aligned rectangle on the panel, in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn rectangle(&self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }
}

/// Imperative draw primitives. Implementations keep whatever pixel state they need; callers
/// keep none.
pub trait DisplaySurface {
    fn set_cursor(&mut self, x: i32, y: i32);

    /// 1 is the small font, 2 the medium one, 3 and up the large clock font.
    fn set_text_size(&mut self, size: u8);

    fn set_text_color(&mut self, foreground: Rgb565, background: Rgb565);

    /// # Errors
    ///
    /// Returns [`Error::Display`] if the underlying target rejects the draw.
    fn fill_rect(&mut self, region: Region, color: Rgb565) -> Result<()>;

    /// Print at the cursor and advance it past the text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the underlying target rejects the draw.
    fn print(&mut self, text: &str) -> Result<()>;

    /// Format into a small line buffer, then [`print`](Self::print) it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the line does not fit, otherwise as [`print`](Self::print).
    fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let mut line = heapless::String::<64>::new();
        line.write_fmt(args)?;
        self.print(&line)
    }
}

/// A [`DisplaySurface`] over an `embedded-graphics` draw target.
pub struct GraphicsSurface<D> {
    target: D,
    cursor: Point,
    text_size: u8,
    foreground: Rgb565,
    background: Rgb565,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    #[must_use]
    pub const fn new(target: D) -> Self {
        Self {
            target,
            cursor: Point::zero(),
            text_size: 1,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &D {
        &self.target
    }

    #[must_use]
    pub const fn cursor(&self) -> Point {
        self.cursor
    }
}

const fn font_for_size(size: u8) -> &'static MonoFont<'static> {
    match size {
        0 | 1 => &FONT_6X10,
        2 => &FONT_10X20,
        _ => &profont::PROFONT_24_POINT,
    }
}

impl<D> DisplaySurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size;
    }

    fn set_text_color(&mut self, foreground: Rgb565, background: Rgb565) {
        self.foreground = foreground;
        self.background = background;
    }

    fn fill_rect(&mut self, region: Region, color: Rgb565) -> Result<()> {
        region
            .rectangle()
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
            .map_err(|_| Error::Display)
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let style = MonoTextStyleBuilder::new()
            .font(font_for_size(self.text_size))
            .text_color(self.foreground)
            .background_color(self.background)
            .build();
        self.cursor = Text::with_baseline(text, self.cursor, style, Baseline::Top)
            .draw(&mut self.target)
            .map_err(|_| Error::Display)?;
        Ok(())
    }
}

#[cfg(feature = "device")]
pub mod panel {
    //! Pimoroni-style ST7789 pack on SPI0.
    //!
    //! - CS: GPIO17
    //! - DC: GPIO16
    //! - CLK: GPIO18 (SPI0 CLK)
    //! - MOSI: GPIO19 (SPI0 TX)
    //! - Backlight: GPIO20

    use embassy_rp::gpio::Output;
    use embassy_rp::peripherals::SPI0;
    use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
    use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
    use mipidsi::interface::SpiInterface;
    use mipidsi::models::ST7789;
    use mipidsi::options::{ColorInversion, Orientation, Rotation};
    use mipidsi::{Builder, NoResetPin};

    use crate::{Error, Result};

    pub type St7789Panel = mipidsi::Display<
        SpiInterface<
            'static,
            ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>,
            Output<'static>,
        >,
        ST7789,
        NoResetPin,
    >;

    /// Bring up the panel in 320x240 landscape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisplayInit`] if the controller does not accept the init sequence.
    pub fn init_panel(
        spi: Spi<'static, SPI0, Blocking>,
        cs: Output<'static>,
        dc: Output<'static>,
        buffer: &'static mut [u8],
    ) -> Result<St7789Panel> {
        let spi_device = ExclusiveDevice::new_no_delay(spi, cs)?;
        let interface = SpiInterface::new(spi_device, dc, buffer);
        // Native panel is 240x320 portrait; rotate for landscape.
        Builder::new(ST7789, interface)
            .display_size(240, 320)
            .orientation(Orientation::new().rotate(Rotation::Deg90))
            .invert_colors(ColorInversion::Inverted)
            .init(&mut embassy_time::Delay)
            .map_err(|_| Error::DisplayInit)
    }

    /// The ST7789 is rated to 62.5 MHz; 40 MHz is reliable on jumper wires.
    #[must_use]
    pub fn spi_config() -> SpiConfig {
        let mut config = SpiConfig::default();
        config.frequency = 40_000_000;
        config
    }
}
