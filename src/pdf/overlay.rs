//! Overlay drawing for one notes page
//!
//! Produces the content-stream operators for the borders, the separator line
//! and the text in the notes column. Slides are drawn afterwards on top of it.

use crate::layout::{Batch, PageGeometry};
use crate::options::{NotesOptions, Rgb};
use super::text::{fmt_num, EncodedText, Font};

/// Header ("NOTES") font size in points
pub const HEADER_FONT_SIZE: f64 = 9.0;
/// Slide range font size in points
pub const SLIDE_RANGE_FONT_SIZE: f64 = 7.0;
/// Page number font size in points
pub const PAGE_NUMBER_FONT_SIZE: f64 = 8.0;

/// Header baseline, measured down from the top of the page
const HEADER_OFFSET: f64 = 20.0;
/// Slide range baseline, measured down from the top of the page
const SLIDE_RANGE_OFFSET: f64 = 35.0;
/// Page number distance from the right and bottom edges
const PAGE_NUMBER_INSET: f64 = 10.0;

const BORDER_GRAY: f64 = 0.8;
const BORDER_WIDTH: f64 = 0.5;
const SEPARATOR_WIDTH: f64 = 1.0;
const HEADER_GRAY: f64 = 0.3;
const CAPTION_GRAY: f64 = 0.5;

/// Generate the overlay operators for the page holding `batch`
///
/// `header` is the pre-encoded "{label} NOTES" text; it is the same on every
/// page, so callers encode it once.
pub fn overlay_content(
    geometry: &PageGeometry,
    options: &NotesOptions,
    header: &EncodedText,
    batch: &Batch,
) -> String {
    let mut content = String::new();

    let page_width = geometry.page_width();
    let page_height = geometry.page_height();

    if options.show_borders {
        content.push_str("q\n");
        content.push_str(&format!("{} G\n", fmt_num(BORDER_GRAY)));
        content.push_str(&format!("{} w\n", fmt_num(BORDER_WIDTH)));
        for i in 0..batch.len {
            let slot = geometry.slot(i);
            content.push_str(&format!(
                "{} {} {} {} re S\n",
                fmt_num(slot.x),
                fmt_num(slot.y),
                fmt_num(slot.width),
                fmt_num(slot.height)
            ));
        }
        content.push_str("Q\n");
    }

    // The separator stops at the bottom of the last occupied slot
    if options.show_separator {
        let x = fmt_num(geometry.slides_width);
        content.push_str("q\n");
        content.push_str(&format!("{} RG\n", rgb_operands(options.separator_color())));
        content.push_str(&format!("{} w\n", fmt_num(SEPARATOR_WIDTH)));
        content.push_str(&format!(
            "{} {} m {} {} l S\n",
            x,
            fmt_num(geometry.occupied_bottom(batch.len)),
            x,
            fmt_num(page_height)
        ));
        content.push_str("Q\n");
    }

    let header_x = notes_column_center(geometry, header.width(Font::Bold, HEADER_FONT_SIZE));
    push_text(
        &mut content,
        header,
        Font::Bold,
        HEADER_FONT_SIZE,
        HEADER_GRAY,
        header_x,
        page_height - HEADER_OFFSET,
    );

    if options.show_slide_numbers {
        let range = EncodedText::new(&batch.slide_range_label());
        let x = notes_column_center(geometry, range.width(Font::Regular, SLIDE_RANGE_FONT_SIZE));
        push_text(
            &mut content,
            &range,
            Font::Regular,
            SLIDE_RANGE_FONT_SIZE,
            CAPTION_GRAY,
            x,
            page_height - SLIDE_RANGE_OFFSET,
        );
    }

    if options.show_page_numbers {
        let page = EncodedText::new(&format!("Page {}", batch.page_number()));
        // Right-aligned with margin
        let x = page_width - PAGE_NUMBER_INSET - page.width(Font::Regular, PAGE_NUMBER_FONT_SIZE);
        push_text(
            &mut content,
            &page,
            Font::Regular,
            PAGE_NUMBER_FONT_SIZE,
            CAPTION_GRAY,
            x,
            PAGE_NUMBER_INSET,
        );
    }

    content
}

/// X position that centers text of the given width in the notes column
fn notes_column_center(geometry: &PageGeometry, text_width: f64) -> f64 {
    geometry.slides_width + (geometry.notes_width - text_width) / 2.0
}

fn rgb_operands(color: Rgb) -> String {
    format!("{} {} {}", fmt_num(color.r), fmt_num(color.g), fmt_num(color.b))
}

fn push_text(
    content: &mut String,
    text: &EncodedText,
    font: Font,
    size: f64,
    gray: f64,
    x: f64,
    y: f64,
) {
    if text.bytes.is_empty() {
        return;
    }

    content.push_str("BT\n");
    content.push_str(&format!("{} g\n", fmt_num(gray)));
    content.push_str(&format!("/{} {} Tf\n", font.resource_name(), fmt_num(size)));
    content.push_str(&format!("1 0 0 1 {} {} Tm\n", fmt_num(x), fmt_num(y)));
    content.push_str(&format!("{} Tj\n", text.to_pdf_literal()));
    content.push_str("ET\n");
}
