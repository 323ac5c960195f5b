use crate::error::{Error, Result};
use image::{GrayImage, RgbaImage};
use log::info;
use std::path::Path;

/// Mask value that selects the edited pixel. Anything lower keeps the original.
pub const MASK_SELECT: u8 = 255;

/// Takes each pixel from `edited` where `mask` is fully white, else from `original`.
pub fn blend(original: &RgbaImage, edited: &RgbaImage, mask: &GrayImage) -> Result<RgbaImage> {
    if original.dimensions() != edited.dimensions() || original.dimensions() != mask.dimensions() {
        return Err(Error::DimensionMismatch {
            original: original.dimensions(),
            edited: edited.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let mut blended = original.clone();
    for (x, y, pixel) in blended.enumerate_pixels_mut() {
        if mask.get_pixel(x, y).0[0] == MASK_SELECT {
            *pixel = *edited.get_pixel(x, y);
        }
    }
    Ok(blended)
}

/// Blends `edited` into `original` through `mask` and saves the result to
/// `output`, which may be the original itself.
pub fn apply_mask(original: &Path, edited: &Path, mask: &Path, output: &Path) -> Result<()> {
    let original_image = image::open(original)?.to_rgba8();
    let edited_image = image::open(edited)?.to_rgba8();
    let mask_image = image::open(mask)?.to_luma8();

    let blended = blend(&original_image, &edited_image, &mask_image)?;
    blended.save(output)?;
    info!("Saved blended image to: {}", output.display());
    Ok(())
}

/// Rewrites the image at `path` as 8-bit RGBA.
pub fn force_rgba(path: &Path) -> Result<()> {
    let rgba = image::open(path)?.to_rgba8();
    rgba.save(path)?;
    info!("Converted {} to RGBA", path.display());
    Ok(())
}
