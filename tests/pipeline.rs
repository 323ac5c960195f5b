use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use resgen::{config::Config, pipeline};
use std::{fs, io::Cursor, path::Path};
use tempfile::TempDir;

fn png_bytes(img: impl Into<image::DynamicImage>) -> Vec<u8> {
    let img: image::DynamicImage = img.into();
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn write(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn full_build() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    // installation: terrain (RGBA) and particles (RGB) in the object store
    let terrain_hash = "0a1b000000000000000000000000000000000000";
    let particles_hash = "ffee000000000000000000000000000000000000";
    write(
        &root.join("mc/assets/indexes/pre-1.6.json"),
        format!(
            r#"{{"objects": {{"terrain.png": {{"hash": "{terrain_hash}"}}, "particles.png": {{"hash": "{particles_hash}"}}}}}}"#
        )
        .as_bytes(),
    );
    write(
        &root.join("mc/assets/objects/0a").join(terrain_hash),
        &png_bytes(RgbaImage::from_pixel(2, 1, Rgba([1, 1, 1, 255]))),
    );
    write(
        &root.join("mc/assets/objects/ff").join(particles_hash),
        &png_bytes(RgbImage::from_pixel(1, 1, Rgb([7, 8, 9]))),
    );
    write(
        &root.join("resourcelist.txt"),
        b"terrain.png>textures/terrain.png\nparticles.png>textures/particles.png\nmissing.png\n",
    );

    // hand edits
    write(
        &root.join("edited/textures/terrain_masked.png"),
        &png_bytes(RgbaImage::from_pixel(2, 1, Rgba([200, 0, 0, 255]))),
    );
    let mut mask = GrayImage::new(2, 1);
    mask.put_pixel(1, 0, Luma([255]));
    write(&root.join("edited/textures/terrain_mask.png"), &png_bytes(mask));

    let config = Config::from_toml(
        r#"
        minecraft_dir = "mc"
        overlay = "edited"
        rgba = ["resources/textures/particles.png"]

        [[masks]]
        original = "resources/textures/terrain.png"
        edited = "resources/textures/terrain_masked.png"
        mask = "resources/textures/terrain_mask.png"
        output = "resources/textures/terrain.png"
        "#,
    )
    .unwrap()
    .relative_to(root);

    let summary = pipeline::run(&config).unwrap();
    assert_eq!(summary.extraction.found(), 2);
    assert_eq!(summary.extraction.not_found(), 1);
    assert_eq!(summary.overlaid, 2);
    assert_eq!(summary.masked, 1);
    assert!(summary.sounds.converted.is_empty());

    let terrain = image::open(root.join("resources/textures/terrain.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(*terrain.get_pixel(0, 0), Rgba([1, 1, 1, 255]));
    assert_eq!(*terrain.get_pixel(1, 0), Rgba([200, 0, 0, 255]));

    let particles = image::open(root.join("resources/textures/particles.png")).unwrap();
    assert_eq!(particles.color(), image::ColorType::Rgba8);
}

#[test]
fn failing_mask_aborts_build() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(&root.join("resourcelist.txt"), b"");
    fs::create_dir_all(root.join("mc")).unwrap();

    // default config masks files that were never extracted
    let config = Config::from_toml("minecraft_dir = \"mc\"")
        .unwrap()
        .relative_to(root);
    assert!(pipeline::run(&config).is_err());
}
