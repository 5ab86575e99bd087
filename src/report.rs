//! Human-readable and JSON rendering of an image inventory

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::pdf::{ImageRecord, Inventory};

const RULE_WIDTH: usize = 81;

/// Write the text report: pages with images, then the total
pub fn write_text<W: Write>(out: &mut W, source: &Path, inventory: &Inventory) -> Result<()> {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "PDF: {}", source.display())?;
    writeln!(out, "Pages: {}", inventory.page_count)?;
    writeln!(out, "{}", heavy_rule)?;

    for page in inventory.pages_with_images() {
        let noun = if page.images.len() == 1 { "image" } else { "images" };
        writeln!(out)?;
        writeln!(out, "Page {}: found {} {}", page.page_number, page.images.len(), noun)?;
        writeln!(out, "{}", light_rule)?;
        for (i, image) in page.images.iter().enumerate() {
            write_record(out, i + 1, image)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", heavy_rule)?;
    writeln!(out, "Total images found: {}", inventory.total_images)?;

    Ok(())
}

fn write_record<W: Write>(out: &mut W, index: usize, image: &ImageRecord) -> Result<()> {
    writeln!(out, "  Image #{}:", index)?;
    writeln!(out, "    Name: {}", image.name)?;
    writeln!(out, "    Object: {} {} R", image.object_number, image.generation_number)?;
    writeln!(
        out,
        "    Dimensions: {} x {} pixels",
        image.width.unwrap_or(0),
        image.height.unwrap_or(0)
    )?;
    if let Some(color_space) = image.color_space.as_deref().filter(|cs| !cs.is_empty()) {
        writeln!(out, "    Color space: {}", color_space)?;
    }
    if let Some(bpc) = image.bits_per_component.filter(|bpc| *bpc > 0) {
        writeln!(out, "    Bits per component: {}", bpc)?;
    }
    if !image.filter_chain.is_empty() {
        writeln!(out, "    Filter: {}", image.filter_display())?;
    }
    writeln!(out, "    Stored size: {} bytes", image.raw_byte_length)?;
    writeln!(out)?;
    Ok(())
}

/// Write the inventory as pretty-printed JSON
pub fn write_json<W: Write>(out: &mut W, inventory: &Inventory) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, inventory)?;
    writeln!(out)?;
    Ok(())
}
