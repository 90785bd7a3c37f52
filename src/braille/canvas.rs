use crate::color::Rgb;

/// One terminal cell of the canvas: up to 8 Braille dots sharing a colour,
/// an optional background fill and an optional glyph drawn instead of the dots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    pub dots: u8,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub glyph: Option<char>,
}

impl Cell {
    /// Braille character for the dot pattern (U+2800 when empty)
    pub fn braille(&self) -> char {
        char::from_u32(0x2800 + self.dots as u32).unwrap_or(' ')
    }
}

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<Cell>,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a pixel at the given coordinates; the cell takes `color`.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        let cell = &mut self.cells[cy * self.width + cx];
        cell.dots |= bit;
        cell.fg = Some(color);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Paint the background of a whole character cell
    pub fn fill_cell(&mut self, cx: usize, cy: usize, color: Rgb) {
        if let Some(cell) = self.cell_mut(cx, cy) {
            cell.bg = Some(color);
        }
    }

    /// Paint every cell's background
    pub fn fill_all(&mut self, color: Rgb) {
        for cell in &mut self.cells {
            cell.bg = Some(color);
        }
    }

    /// Place a glyph in a character cell, replacing its dots when rendered
    pub fn put_glyph(&mut self, cx: usize, cy: usize, glyph: char, color: Rgb) {
        if let Some(cell) = self.cell_mut(cx, cy) {
            cell.glyph = Some(glyph);
            cell.fg = Some(color);
        }
    }

    pub fn cell(&self, cx: usize, cy: usize) -> Option<&Cell> {
        if cx < self.width && cy < self.height {
            self.cells.get(cy * self.width + cx)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, cx: usize, cy: usize) -> Option<&mut Cell> {
        if cx < self.width && cy < self.height {
            self.cells.get_mut(cy * self.width + cx)
        } else {
            None
        }
    }

    /// Get all rows as slices of cells (for line-by-line rendering)
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Convert the dot patterns to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(Cell::braille).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
