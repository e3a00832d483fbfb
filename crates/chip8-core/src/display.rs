//! Monochrome 64×32 framebuffer with XOR sprite compositing.

/// Framebuffer width in cells.
pub const DISPLAY_WIDTH: usize = 64;
/// Framebuffer height in cells.
pub const DISPLAY_HEIGHT: usize = 32;
/// Total number of cells.
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;
/// Width in cells of one sprite row.
pub const SPRITE_WIDTH: usize = 8;

/// Row-major (`y * 64 + x`) grid of lit cells plus a level-triggered dirty
/// flag.
///
/// Every mutation raises the dirty flag; the renderer clears it with
/// [`Framebuffer::clear_draw_request`] after painting, so several changes
/// between renders collapse into one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Framebuffer {
    cells: Box<[bool]>,
    draw_requested: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            cells: vec![false; DISPLAY_CELLS].into_boxed_slice(),
            draw_requested: false,
        }
    }
}

impl Framebuffer {
    /// Turns every cell off and raises the dirty flag.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.draw_requested = true;
    }

    /// Restores the power-on state: all cells off, dirty flag clear.
    pub fn reset(&mut self) {
        self.cells.fill(false);
        self.draw_requested = false;
    }

    /// Returns `true` when the cell at `(x, y)` is lit. Out-of-range
    /// coordinates read as unlit.
    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.cells[y * DISPLAY_WIDTH + x]
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(DISPLAY_WIDTH)
    }

    /// Number of lit cells.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// XOR-composites an 8-wide sprite with its top-left corner at `(x, y)`.
    ///
    /// Cells that would land at `x >= 64` or `y >= 32` are clipped. Returns
    /// `true` when at least one lit cell was turned off. Raises the dirty flag
    /// even when nothing changes.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, row_bits) in rows.iter().enumerate() {
            let row = usize::from(y) + dy;
            if row >= DISPLAY_HEIGHT {
                continue;
            }
            for dx in 0..SPRITE_WIDTH {
                if row_bits & (0x80 >> dx) == 0 {
                    continue;
                }
                let col = usize::from(x) + dx;
                if col >= DISPLAY_WIDTH {
                    continue;
                }
                let cell = &mut self.cells[row * DISPLAY_WIDTH + col];
                collision |= *cell;
                *cell = !*cell;
            }
        }
        self.draw_requested = true;
        collision
    }

    /// Returns `true` when the framebuffer changed since the last render.
    #[must_use]
    pub const fn draw_requested(&self) -> bool {
        self.draw_requested
    }

    /// Acknowledges a render.
    pub const fn clear_draw_request(&mut self) {
        self.draw_requested = false;
    }

    /// Renders the framebuffer as text, one line per row.
    #[must_use]
    pub fn to_text(&self, lit: char, unlit: char) -> String {
        let mut out = String::with_capacity(DISPLAY_CELLS + DISPLAY_HEIGHT);
        for row in self.rows() {
            out.extend(row.iter().map(|cell| if *cell { lit } else { unlit }));
            out.push('\n');
        }
        out
    }
}
