use std::fs;
use std::path::PathBuf;

use chatshot::adapter::adapter_for_host;
use chatshot::capture::run_capture;
use chatshot::rendering::{detect_background, TextRasterizer};
use chatshot::segment::segment;
use chatshot::{CancelToken, CaptureConfig, CaptureMode, CaptureOutcome, CaptureSession};
use scraper::Html;
use sha2::{Digest, Sha256};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn compose_fixture(mode: CaptureMode) -> image::RgbaImage {
    let page = fs::read_to_string("tests/goldens/pages/transcript.html").expect("read fixture");
    let doc = Html::parse_document(&page);

    let adapter = adapter_for_host("chat.deepseek.com");
    let responses = adapter.responses(&doc);
    assert_eq!(responses.len(), 1);
    let blocks = segment(adapter, responses[0]);
    assert!(blocks.len() >= 2);

    let session = CaptureSession::new(blocks, mode).unwrap();
    let mut rasterizer = TextRasterizer::new(detect_background(&doc));
    let outcome = run_capture(
        &doc,
        &session,
        "deepseek",
        &mut rasterizer,
        &CaptureConfig::default(),
        &CancelToken::new(),
    )
    .expect("capture");

    match outcome {
        CaptureOutcome::Image(composite) => composite.image,
        other => panic!("expected an image, got {:?}", other),
    }
}

fn check_golden(name: &str, image: &image::RgbaImage) {
    // Golden is a hex sha256 of the raw RGBA pixels, not the PNG bytes, so
    // it is stable across encoder versions
    let digest = hex::encode(Sha256::digest(image.as_raw()));

    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim());
}

#[test]
fn golden_vertical_capture_matches_fixture() {
    let image = compose_fixture(CaptureMode::Vertical);
    check_golden("transcript_vertical.hash", &image);
}

#[test]
fn golden_horizontal_capture_matches_fixture() {
    let image = compose_fixture(CaptureMode::Horizontal);
    check_golden("transcript_horizontal.hash", &image);
}
