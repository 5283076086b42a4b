use std::fs;
use std::path::PathBuf;

use binqr::config::GeneratorConfig;
use binqr::qrcode::QrCode;
use binqr::version::QrCodeEcc;
use binqr::{EncodeError, Error};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("binqr-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_for(input: PathBuf, ecl: QrCodeEcc, deflate: bool) -> GeneratorConfig {
    GeneratorConfig {
        input,
        ecl,
        width: 300,
        quiet_zone: 4,
        deflate,
    }
}

#[test]
fn writes_png_next_to_input() {
    let dir = scratch_dir("png");
    let input = dir.join("test.bin");
    fs::write(&input, [0u8, 1, 2, 3, 254, 255]).unwrap();

    let written = binqr::generate(&config_for(input.clone(), QrCodeEcc::Medium, false)).unwrap();
    assert_eq!(written, dir.join("test.bin.png"));

    let img = image::open(&written).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (300, 300));
    // 21 + 8 = 29 modules, factor 10, padding (300 - 210) / 2 = 45
    assert_eq!(img.get_pixel(44, 44).0, [255]);
    assert_eq!(img.get_pixel(45, 45).0, [0]);
    fs::remove_dir_all(&dir).unwrap();
}

// Pixels per module, measured on the top edge of the top-left finder (7 dark modules).
fn module_pitch(img: &image::GrayImage) -> u32 {
    let corner = (0..img.width()).find(|&i| img.get_pixel(i, i).0 == [0]).unwrap();
    let edge = (corner..img.width())
        .take_while(|&x| img.get_pixel(x, corner).0 == [0])
        .count() as u32;
    edge / 7
}

#[test]
fn deflate_shrinks_symbol() {
    let dir = scratch_dir("deflate");
    let input = dir.join("text.txt");
    let text = "abcdefgh".repeat(100);
    fs::write(&input, &text).unwrap();

    let raw = QrCode::encode_binary(text.as_bytes(), QrCodeEcc::Low).unwrap();
    let prepared = binqr::payload::prepare_payload(text.clone().into_bytes(), true);
    assert!(prepared.compressed);
    let packed = QrCode::encode_binary(&prepared.bytes, QrCodeEcc::Low).unwrap();
    assert!(packed.version() < raw.version());

    let plain = binqr::generate(&config_for(input.clone(), QrCodeEcc::Low, false)).unwrap();
    let plain_img = image::open(&plain).unwrap().to_luma8();
    fs::remove_file(&plain).unwrap();

    let squeezed = binqr::generate(&config_for(input, QrCodeEcc::Low, true)).unwrap();
    let squeezed_img = image::open(&squeezed).unwrap().to_luma8();
    assert_eq!(plain_img.dimensions(), squeezed_img.dimensions());

    // Fewer modules on the same canvas means larger modules
    let plain_pitch = module_pitch(&plain_img);
    let squeezed_pitch = module_pitch(&squeezed_img);
    assert_eq!(plain_pitch, 300 / (raw.size() as u32 + 8));
    assert_eq!(squeezed_pitch, 300 / (packed.size() as u32 + 8));
    assert!(squeezed_pitch > plain_pitch);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn oversized_input_writes_nothing() {
    let dir = scratch_dir("oversized");
    let input = dir.join("big.bin");
    let data: Vec<u8> = (0..4000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
    fs::write(&input, &data).unwrap();

    let config = config_for(input, QrCodeEcc::High, false);
    let err = binqr::generate(&config).unwrap_err();
    assert!(matches!(err, Error::Encode(EncodeError::CapacityExceeded { .. })));
    assert!(!config.output_path().exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn oversized_quiet_zone_writes_nothing() {
    let dir = scratch_dir("quiet-zone");
    let input = dir.join("small.bin");
    fs::write(&input, [1u8, 2, 3]).unwrap();

    let config = GeneratorConfig {
        quiet_zone: 2_147_483_648,
        ..config_for(input, QrCodeEcc::Low, false)
    };
    assert!(matches!(binqr::generate(&config), Err(Error::InvalidArgument(_))));
    assert!(!config.output_path().exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_io_error() {
    let config = config_for(PathBuf::from("/nonexistent/binqr/input.bin"), QrCodeEcc::Low, false);
    assert!(matches!(binqr::generate(&config), Err(Error::Io(_))));
}
