//! Static glyph-width table and page geometry for PDF output.
//!
//! Widths are the standard Helvetica AFM advances in thousandths of an em, covering
//! ASCII 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.
//! Helvetica is one of the base-14 fonts, so no font program is embedded.

/// Millimetres → PDF points.
const MM: f32 = 72.0 / 25.4;

/// Geometry of the single text cell the résumé is poured into, in points.
///
/// A4 portrait, 10 mm page margins, a 190 mm wide cell with 1 mm inner padding,
/// 10 mm line height, and an automatic page break 15 mm above the bottom edge.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub cell_width: f32,
    pub cell_padding: f32,
    pub line_height: f32,
    pub break_margin: f32,
    pub font_size: f32,
}

impl PageLayout {
    pub fn a4() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin_left: 10.0 * MM,
            margin_top: 10.0 * MM,
            cell_width: 190.0 * MM,
            cell_padding: 1.0 * MM,
            line_height: 10.0 * MM,
            break_margin: 15.0 * MM,
            font_size: 12.0,
        }
    }

    /// Usable text width inside the cell.
    pub fn text_width(&self) -> f32 {
        self.cell_width - 2.0 * self.cell_padding
    }

    /// Lines that fit between the top margin and the page-break trigger (at least one).
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - self.break_margin - self.margin_top;
        ((usable / self.line_height).floor() as usize).max(1)
    }

    /// Baseline of the `index`-th line on a page, in PDF user space (origin bottom-left).
    pub fn baseline(&self, index: usize) -> f32 {
        let top = self.margin_top + index as f32 * self.line_height;
        self.page_height - (top + 0.5 * self.line_height + 0.3 * self.font_size)
    }
}

pub struct FontMetricTable {
    pub base_font: &'static str,
    widths: [u16; 95],
}

impl FontMetricTable {
    /// Width of `s` in points at `font_size`. Characters outside the table count as a space.
    pub fn measure_str(&self, s: &str, font_size: f32) -> f32 {
        let units: u32 = s.chars().map(|c| self.char_units(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    fn char_units(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.widths[0]
        }
    }
}

#[rustfmt::skip]
pub static HELVETICA: FontMetricTable = FontMetricTable {
    base_font: "Helvetica",
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-Z
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-z
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
};
