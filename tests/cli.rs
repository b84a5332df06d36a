// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use predicates::str;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 5 % 256) as u8])
    })
    .save(path)
    .unwrap();
}

fn imgseam() -> Command {
    let mut cmd = Command::cargo_bin("imgseam").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn requires_an_input() {
    imgseam()
        .assert()
        .failure()
        .stderr(str::contains("USAGE"));
}

#[test]
fn carves_to_the_requested_size() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 20, 12);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    imgseam()
        .args(&["--carve", "-w", "14", "-H", "9", "--seed", "5", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    let written = image::open(out.join("in.png")).unwrap();
    assert_eq!(written.dimensions(), (14, 9));
}

#[test]
fn fixed_seeds_give_identical_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 16, 10);

    let mut outputs = Vec::new();
    for name in &["first", "second"] {
        let out = dir.path().join(name);
        imgseam()
            .args(&["--carve", "--width", "9", "--seed", "1234", "-o"])
            .arg(&out)
            .arg(&input)
            .assert()
            .success();
        outputs.push(fs::read(out.with_extension("png")).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn scales_and_converts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 10, 10);
    let out = dir.path().join("small");

    imgseam()
        .args(&["--scale", "0.5", "--type", "jpg", "--quality", "70", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    let written = image::open(dir.path().join("small.jpg")).unwrap();
    assert_eq!(written.dimensions(), (5, 5));
}

#[test]
fn clamps_out_of_range_quality() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 4);

    for &(quality, name) in &[("300", "high"), ("-5", "low")] {
        imgseam()
            .args(&["--type", "jpg", "--quality", quality, "-o"])
            .arg(dir.path().join(name))
            .arg(&input)
            .assert()
            .success();
        let written = image::open(dir.path().join(format!("{}.jpg", name))).unwrap();
        assert_eq!(written.dimensions(), (6, 4));
    }
}

#[test]
fn keeps_alpha() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 0, 128]))
        .save(&input)
        .unwrap();
    let out = dir.path().join("out");

    imgseam()
        .args(&["--carve", "-H", "5", "--seed", "2", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    let written = image::open(out.with_extension("png")).unwrap();
    assert_eq!(written.dimensions(), (8, 5));
    assert!(written.color().has_alpha());
}

#[test]
fn refuses_to_grow_by_carving() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 6);
    let out = dir.path().join("out");

    imgseam()
        .args(&["--carve", "-w", "8", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .failure()
        .stderr(str::contains("cannot grow the width from 6 to 8"));
    assert!(!out.with_extension("png").exists());
}

#[test]
fn scale_excludes_width() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 6);

    imgseam()
        .args(&["--scale", "0.5", "-w", "3"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(str::contains("cannot be combined"));
}

#[test]
fn rejects_negative_sizes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 6);

    imgseam()
        .args(&["-w", "-4"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(str::contains("width must be positive"));
}

#[test]
fn rejects_unknown_types() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 6);

    imgseam()
        .args(&["--type", "gif"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(str::contains("supported types are"));
}

#[test]
fn processes_wildcards_into_a_directory() {
    let dir = tempdir().unwrap();
    write_png(&dir.path().join("one.png"), 9, 7);
    write_png(&dir.path().join("two.png"), 11, 7);
    fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    imgseam()
        .args(&["--carve", "-H", "4", "--type", "bmp", "-o"])
        .arg(&out)
        .arg(dir.path().join("*.png"))
        .assert()
        .success();

    assert_eq!(image::open(out.join("one.bmp")).unwrap().dimensions(), (9, 4));
    assert_eq!(image::open(out.join("two.bmp")).unwrap().dimensions(), (11, 4));
    assert!(!out.join("notes.bmp").exists());
}

#[test]
fn will_not_overwrite() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 6, 6);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("in.png"), "precious").unwrap();

    imgseam()
        .args(&["-w", "3", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .failure()
        .stderr(str::contains("already a file"));
    assert_eq!(fs::read_to_string(out.join("in.png")).unwrap(), "precious");
}

#[test]
fn many_inputs_need_a_directory() {
    let dir = tempdir().unwrap();
    let (a, b) = (dir.path().join("a.png"), dir.path().join("b.png"));
    write_png(&a, 4, 4);
    write_png(&b, 4, 4);

    imgseam()
        .arg("-o")
        .arg(dir.path().join("single.png"))
        .arg(&a)
        .arg(&b)
        .assert()
        .failure()
        .stderr(str::contains("is not a directory"));
}
