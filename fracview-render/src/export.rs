//! PNG export with embedded view metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fracview_core::{Raster, View, WorldRect};

use crate::error::RenderError;

fn format_rect(r: &WorldRect) -> String {
    format!("top={} bottom={} left={} right={}", r.top, r.bottom, r.left, r.right)
}

fn metadata_pairs(view: &View) -> Vec<(String, String)> {
    vec![
        ("Fracview.Look".into(), format_rect(&view.look())),
        ("Fracview.See".into(), format_rect(&view.see())),
        ("Fracview.MaxIterations".into(), view.limit().to_string()),
        (
            "Fracview.Resolution".into(),
            format!("{}x{}", view.h_res(), view.v_res()),
        ),
    ]
}

/// Write `raster` (rendered for `view`) as an 8-bit RGB PNG.
///
/// Uses the `png` crate directly so the view's rectangles and iteration limit
/// can travel along as tEXt chunks.
pub fn export_png(view: &View, raster: &Raster, path: &Path) -> crate::Result<()> {
    if raster.width != view.h_res() || raster.height != view.v_res() {
        return Err(RenderError::SizeMismatch {
            raster_width: raster.width,
            raster_height: raster.height,
            view_width: view.h_res(),
            view_height: view.v_res(),
        });
    }

    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, raster.width, raster.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "Fracview".to_string())?;
    for (key, value) in metadata_pairs(view) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&raster.to_rgb8())?;
    png_writer.finish()?;

    debug!(
        view = view.id(),
        "Exported PNG {}x{} to {}",
        raster.width,
        raster.height,
        path.display()
    );
    Ok(())
}
