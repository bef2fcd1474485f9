//! Canvas trait
//!
//! The drawing surface the GPU renders into. Implementations wrap whatever
//! graphics library drives the actual video output.

/// Drawing surface driven by received commands
///
/// Coordinates are in pixels with the origin at the top-left corner.
/// Colors are passed through unchanged; their meaning (palette index,
/// RGB565, ...) is up to the implementation.
pub trait Canvas {
    /// Present the back buffer
    fn swap(&mut self);

    /// Fill the entire canvas
    fn fill_screen(&mut self, color: u16);

    /// Fill a rectangle
    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16);

    /// Draw a rectangle outline
    fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16);

    /// Select a font by id
    ///
    /// Unknown ids are the implementation's business; the protocol does not
    /// validate them.
    fn set_font(&mut self, font: u8);

    /// Text scale factor
    fn set_text_size(&mut self, size: u8);

    /// Text foreground color
    fn set_text_color(&mut self, color: u16);

    /// Move the text cursor
    fn set_cursor(&mut self, x: i16, y: i16);

    /// Print text at the cursor
    fn print(&mut self, text: &str);

    /// Print text followed by a line break
    fn println(&mut self, text: &str);
}

impl<T: Canvas + ?Sized> Canvas for &mut T {
    fn swap(&mut self) {
        T::swap(self)
    }

    fn fill_screen(&mut self, color: u16) {
        T::fill_screen(self, color)
    }

    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) {
        T::fill_rect(self, x, y, w, h, color)
    }

    fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) {
        T::draw_rect(self, x, y, w, h, color)
    }

    fn set_font(&mut self, font: u8) {
        T::set_font(self, font)
    }

    fn set_text_size(&mut self, size: u8) {
        T::set_text_size(self, size)
    }

    fn set_text_color(&mut self, color: u16) {
        T::set_text_color(self, color)
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        T::set_cursor(self, x, y)
    }

    fn print(&mut self, text: &str) {
        T::print(self, text)
    }

    fn println(&mut self, text: &str) {
        T::println(self, text)
    }
}
