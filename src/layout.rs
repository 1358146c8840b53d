//! Page layout calculations
//!
//! Everything here is pure arithmetic in PDF points with the origin at the
//! bottom-left corner of the page. The output page is split into a slides
//! column on the left and a notes column on the right; the slides column is
//! divided into `slides_per_page` equal slots stacked top to bottom.

/// Fraction of a slot a slide may fill, leaving a small visual margin
pub const SLOT_FILL: f64 = 0.98;

/// Length in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 72.0)
    }

    /// Get the value in points
    pub fn pt(&self) -> f64 {
        self.0
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11"), the only output size
    pub fn letter() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(11.0),
        }
    }
}

/// Axis-aligned rectangle, `(x, y)` being the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Y coordinate of the top edge
    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// Where and how large a slide is drawn inside its slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Uniform scale applied to the original slide
    pub scale: f64,
    /// Lower-left corner of the scaled slide
    pub x: f64,
    pub y: f64,
    /// Size of the scaled slide
    pub width: f64,
    pub height: f64,
}

/// Geometry shared by every output page of a run
///
/// The slot height always uses the nominal `slides_per_page`, so a shorter
/// final batch keeps the same slot size as the full pages before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page: PageDimensions,
    pub slides_per_page: usize,
    pub slides_width: f64,
    pub notes_width: f64,
    pub slot_height: f64,
}

impl PageGeometry {
    /// Compute the column split and slot height
    ///
    /// Callers are expected to have validated `slides_per_page >= 1` and
    /// `0 < note_space_ratio < 1`.
    pub fn new(page: PageDimensions, slides_per_page: usize, note_space_ratio: f64) -> Self {
        let width = page.width.pt();
        let height = page.height.pt();

        Self {
            page,
            slides_per_page,
            slides_width: width * (1.0 - note_space_ratio),
            notes_width: width * note_space_ratio,
            slot_height: height / slides_per_page as f64,
        }
    }

    pub fn page_width(&self) -> f64 {
        self.page.width.pt()
    }

    pub fn page_height(&self) -> f64 {
        self.page.height.pt()
    }

    /// Slot `index` (0-based from the top) as a rectangle in the slides column
    pub fn slot(&self, index: usize) -> Rect {
        Rect {
            x: 0.0,
            y: self.page_height() - (index + 1) as f64 * self.slot_height,
            width: self.slides_width,
            height: self.slot_height,
        }
    }

    /// Y coordinate of the bottom edge of the last occupied slot
    pub fn occupied_bottom(&self, slides_in_batch: usize) -> f64 {
        self.page_height() - slides_in_batch as f64 * self.slot_height
    }

    /// Scale a slide of the given size into slot `index`, centered both ways
    pub fn place(&self, index: usize, orig_width: f64, orig_height: f64) -> Placement {
        let slot = self.slot(index);

        let scale_x = (self.slides_width / orig_width) * SLOT_FILL;
        let scale_y = (self.slot_height / orig_height) * SLOT_FILL;
        let scale = scale_x.min(scale_y);

        let width = orig_width * scale;
        let height = orig_height * scale;

        Placement {
            scale,
            x: (self.slides_width - width) / 2.0,
            y: slot.y + (self.slot_height - height) / 2.0,
            width,
            height,
        }
    }
}

/// A contiguous run of slides that lands on one output page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// 0-based output page index
    pub index: usize,
    /// 0-based index of the first slide in the batch
    pub start: usize,
    /// Number of slides in the batch
    pub len: usize,
}

impl Batch {
    /// 0-based index one past the last slide
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// 1-based output page number
    pub fn page_number(&self) -> usize {
        self.index + 1
    }

    /// "Slides 6-10", or "Slide 11" for a single-slide batch
    pub fn slide_range_label(&self) -> String {
        if self.len > 1 {
            format!("Slides {}-{}", self.start + 1, self.end())
        } else {
            format!("Slide {}", self.start + 1)
        }
    }
}

/// Number of output pages needed for `total_slides`
pub fn batch_count(total_slides: usize, slides_per_page: usize) -> usize {
    total_slides.div_ceil(slides_per_page)
}

/// Partition `total_slides` into consecutive batches of `slides_per_page`
pub fn batches(total_slides: usize, slides_per_page: usize) -> impl Iterator<Item = Batch> {
    (0..batch_count(total_slides, slides_per_page)).map(move |index| {
        let start = index * slides_per_page;
        Batch {
            index,
            start,
            len: slides_per_page.min(total_slides - start),
        }
    })
}
