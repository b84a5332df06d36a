// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Output formats
//!
//! Anything the `image` crate can decode is accepted as input; output
//! is restricted to the four formats below.

use crate::buffer::PixelBuffer;
use failure::{format_err, Error, Fail};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use num_traits::clamp;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Seek, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputType {
    Bmp,
    Jpg,
    Png,
    Tga,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [
        OutputType::Bmp,
        OutputType::Jpg,
        OutputType::Png,
        OutputType::Tga,
    ];

    /// The file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputType::Bmp => "bmp",
            OutputType::Jpg => "jpg",
            OutputType::Png => "png",
            OutputType::Tga => "tga",
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            OutputType::Bmp => ImageFormat::Bmp,
            OutputType::Jpg => ImageFormat::Jpeg,
            OutputType::Png => ImageFormat::Png,
            OutputType::Tga => ImageFormat::Tga,
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let wanted = s.trim_start_matches('.').to_ascii_lowercase();
        OutputType::ALL
            .iter()
            .copied()
            .find(|t| t.extension() == wanted)
            .ok_or_else(|| {
                format_err!(
                    "invalid output type '{}', supported types are: bmp, jpg, png, tga",
                    s
                )
            })
    }
}

/// Write `image` to a new file at `path` in the given format.  An
/// existing file is never replaced.  `quality` only matters for JPEG,
/// which also has no alpha channel to write.
pub fn encode(
    path: &Path,
    image: PixelBuffer,
    output: OutputType,
    quality: u8,
) -> Result<(), Error> {
    let image = image.into_dynamic()?;
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| {
            if err.kind() == ErrorKind::AlreadyExists {
                format_err!("there is already a file at {}, not overwriting it", path.display())
            } else {
                Error::from(err.context(format!("could not create {}", path.display())))
            }
        })?;

    let mut writer = BufWriter::new(file);
    let written = write_image(&mut writer, &image, output, quality)
        .and_then(|_| writer.flush().map_err(Error::from));
    if let Err(err) = written {
        // The file is ours; don't leave a truncated image behind.
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(Error::from(
            err.context(format!("could not write {}", path.display())),
        ));
    }
    Ok(())
}

fn write_image<W: Write + Seek>(
    writer: &mut W,
    image: &DynamicImage,
    output: OutputType,
    quality: u8,
) -> Result<(), Error> {
    match output {
        OutputType::Jpg => JpegEncoder::new_with_quality(writer, clamp(quality, 1, 100))
            .encode_image(&image.to_rgb8())?,
        _ => image.write_to(writer, output.format())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use tempfile::tempdir;

    #[test]
    fn parses_extensions() {
        assert_eq!("png".parse::<OutputType>().unwrap(), OutputType::Png);
        assert_eq!(".JPG".parse::<OutputType>().unwrap(), OutputType::Jpg);
        assert!("gif".parse::<OutputType>().is_err());
        assert_eq!(OutputType::Tga.to_string(), "tga");
    }

    #[test]
    fn writes_every_format() {
        let dir = tempdir().unwrap();
        for &kind in OutputType::ALL.iter() {
            let image = PixelBuffer::from_raw(3, 2, 4, vec![90; 24]).unwrap();
            let path = dir.path().join(format!("out.{}", kind.extension()));
            encode(&path, image, kind, 80).unwrap();
            let back = image::open(&path).unwrap();
            assert_eq!(back.dimensions(), (3, 2));
        }
    }

    #[test]
    fn existing_files_are_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.png");
        fs::write(&path, b"keep me").unwrap();
        let image = PixelBuffer::from_raw(2, 2, 3, vec![40; 12]).unwrap();
        let err = encode(&path, image, OutputType::Png, 100).unwrap_err();
        assert!(err.to_string().contains("already a file"));
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
    }
}
