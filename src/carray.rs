//! C source emission for data the engine embeds directly: raw RGBA texture
//! data, per-tile opacity tables and the brightness ramp.

use crate::{
    error::{Error, Result},
    file,
};
use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Edge length of the tiles scanned by [`alpha_array`].
pub const TILE_SIZE: u32 = 16;

/// An `unsigned char` array definition plus the header that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CArray {
    symbol: String,
    constant: bool,
    body: String,
}

impl CArray {
    pub fn new(symbol: impl Into<String>, constant: bool, body: impl Into<String>) -> CArray {
        CArray {
            symbol: symbol.into(),
            constant,
            body: body.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Contents of `<symbol>.c`.
    pub fn source(&self) -> String {
        let qualifier = if self.constant { "const " } else { "" };
        format!(
            "#include \"{symbol}.h\"\n{qualifier}unsigned char {symbol}[] = {{\n{body}}};\n",
            symbol = self.symbol,
            body = self.body,
        )
    }

    /// Contents of `<symbol>.h`.
    pub fn header(&self) -> String {
        let guard = format!("{}_H", self.symbol.to_uppercase());
        let qualifier = if self.constant { "const extern" } else { "extern" };
        format!(
            "#ifndef {guard}\n#define {guard}\n{qualifier} unsigned char {}[];\n#endif\n",
            self.symbol
        )
    }

    /// Writes `<symbol>.c` and `<symbol>.h` into `dir`.
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let source_path = dir.join(format!("{}.c", self.symbol));
        let header_path = dir.join(format!("{}.h", self.symbol));
        file::write(self.source().as_bytes(), &source_path)?;
        file::write(self.header().as_bytes(), &header_path)?;
        Ok((source_path, header_path))
    }
}

/// File name up to the first `.`, used as the symbol prefix.
pub fn image_name(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(Error::InvalidFilename)?;
    let name = file_name.split('.').next().unwrap_or_default();
    if name.is_empty() {
        return Err(Error::InvalidFilename);
    }
    Ok(name.to_owned())
}

/// Every pixel as `r,g,b,a,` in row-major order.
pub fn rgba_array(image: &RgbaImage, name: &str) -> CArray {
    let mut body: String = image
        .pixels()
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            format!("{r},{g},{b},{a},")
        })
        .collect();
    body.push('\n');
    CArray::new(format!("{name}_rgba"), true, body)
}

/// One entry per 16x16 tile: `1` if every pixel is fully opaque, `0` otherwise.
/// Also returns the tile grid size (columns, rows).
pub fn alpha_array(image: &RgbaImage, name: &str) -> (CArray, (u32, u32)) {
    let columns = image.width() / TILE_SIZE;
    let rows = image.height() / TILE_SIZE;

    let mut body = String::new();
    for tile_y in 0..rows {
        body.push_str("    \n");
        for tile_x in 0..columns {
            let opaque = tile_is_opaque(image, tile_x * TILE_SIZE, tile_y * TILE_SIZE);
            body.push_str(if opaque { "1," } else { "0," });
        }
        body.push('\n');
    }
    (
        CArray::new(format!("{name}_alpha"), true, body),
        (columns, rows),
    )
}

fn tile_is_opaque(image: &RgbaImage, left: u32, top: u32) -> bool {
    (top..top + TILE_SIZE)
        .all(|y| (left..left + TILE_SIZE).all(|x| image.get_pixel(x, y).0[3] == u8::MAX))
}

/// Grey ramp `b,b,b,255,` for every brightness level.
pub fn brightness_array() -> CArray {
    let mut body: String = (0..=u8::MAX)
        .map(|b| format!("{b},{b},{b},255,"))
        .collect();
    body.push('\n');
    CArray::new("brightness_values", false, body)
}

pub fn convert_rgba(path: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = image_name(path)?;
    let image = image::open(path)?.to_rgba8();
    rgba_array(&image, &name).write(out_dir)
}

pub fn convert_alpha(path: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = image_name(path)?;
    let image = image::open(path)?.to_rgba8();
    let (array, (columns, rows)) = alpha_array(&image, &name);
    info!("{}: {columns}x{rows} tiles", path.display());
    array.write(out_dir)
}

/// Runs `convert` over every path, logging failures and carrying on.
/// Returns how many files converted cleanly.
pub fn convert_all<F>(paths: &[PathBuf], out_dir: &Path, convert: F) -> usize
where
    F: Fn(&Path, &Path) -> Result<(PathBuf, PathBuf)>,
{
    let mut converted = 0;
    for path in paths {
        match convert(path, out_dir) {
            Ok((source, _)) => {
                info!("Wrote {}", source.display());
                converted += 1;
            }
            Err(e) => warn!("Error processing {}: {e}", path.display()),
        }
    }
    converted
}
