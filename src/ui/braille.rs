/// Braille canvas for high-resolution terminal rendering
/// Each terminal cell holds a 2×4 grid of Braille dots,
/// giving 2× horizontal and 4× vertical resolution

pub struct BrailleCanvas {
    width: usize,       // Width in terminal cells
    height: usize,      // Height in terminal cells
    dots: Vec<Vec<u8>>, // Dot pattern per cell
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![vec![0; width]; height],
        }
    }

    /// Set a dot at pixel coordinates; out-of-range pixels are dropped
    pub fn set_pixel(&mut self, pixel_x: usize, pixel_y: usize) {
        let cell_x = pixel_x / 2;
        let cell_y = pixel_y / 4;

        if cell_x >= self.width || cell_y >= self.height {
            return;
        }

        // Braille dot numbering:
        // 1 4
        // 2 5
        // 3 6
        // 7 8
        let bit = match (pixel_x % 2, pixel_y % 4) {
            (0, 3) => 6,
            (0, row) => row,
            (_, 3) => 7,
            (_, row) => row + 3,
        };

        self.dots[cell_y][cell_x] |= 1 << bit;
    }

    /// Fill a rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        let right = x.saturating_add(width).min(self.pixel_width());
        let bottom = y.saturating_add(height).min(self.pixel_height());
        for py in y..bottom {
            for px in x..right {
                self.set_pixel(px, py);
            }
        }
    }

    pub fn draw_horizontal_line(&mut self, pixel_y: usize) {
        for px in 0..self.pixel_width() {
            self.set_pixel(px, pixel_y);
        }
    }

    /// Dashed vertical line: two dots on, two off
    pub fn draw_dashed_vertical_line(&mut self, pixel_x: usize, from_y: usize, to_y: usize) {
        for py in (from_y..to_y).filter(|py| (py - from_y) % 4 < 2) {
            self.set_pixel(pixel_x, py);
        }
    }

    /// One row of cells as Braille characters (U+2800 + dot pattern)
    pub fn row_string(&self, cell_y: usize) -> String {
        match self.dots.get(cell_y) {
            Some(row) => row
                .iter()
                .map(|pattern| char::from_u32(0x2800 + *pattern as u32).unwrap_or(' '))
                .collect(),
            None => String::new(),
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    pub fn rows(&self) -> usize {
        self.height
    }
}
