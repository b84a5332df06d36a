// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate imgseam;

use clap::{crate_version, App, Arg, ArgMatches};
use failure::{bail, format_err, Error};
use imgseam::batch::{self, BatchSettings};
use imgseam::filetype::OutputType;
use imgseam::ResizeConfig;
use log::{debug, LevelFilter};
use num_traits::clamp;
use std::fmt::Display;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

fn optional<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    matches
        .value_of(name)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| format_err!("invalid value '{}' for --{}: {}", v, name, e))
        })
        .transpose()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut resize = ResizeConfig::from_options(
        matches.is_present("carve"),
        optional(matches, "width")?,
        optional(matches, "height")?,
        optional(matches, "scale")?,
    )?;
    if let Some(seed) = optional(matches, "seed")? {
        resize = resize.with_seed(seed);
    }

    let settings = BatchSettings {
        output: PathBuf::from(matches.value_of("output").unwrap_or(".")),
        output_type: matches.value_of("type").unwrap_or("png").parse::<OutputType>()?,
        quality: optional::<i64>(matches, "quality")?
            .map_or(100, |quality| clamp(quality, 1, 100) as u8),
        resize,
    };
    debug!("{:?}", settings);

    let inputs: Vec<String> = matches
        .values_of("input")
        .map(|values| values.map(String::from).collect())
        .unwrap_or_default();

    let summary = batch::run(&inputs, &settings)?;
    if summary.processed == 0 && summary.failed > 0 {
        bail!("none of the {} inputs could be processed", summary.failed);
    }
    Ok(())
}

fn main() {
    let matches = App::new("imgseam")
        .version(crate_version!())
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Batch resize and convert images, optionally by seam carving")
        .arg(
            Arg::with_name("type")
                .short("t")
                .long("type")
                .takes_value(true)
                .default_value("png")
                .help("The file type of the output images: bmp, jpg, png or tga"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value(".")
                .help("The output file, or a directory to write every output into"),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("The width to resize to (unchanged if not given)"),
        )
        .arg(
            Arg::with_name("height")
                .short("H")
                .long("height")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("The height to resize to (unchanged if not given)"),
        )
        .arg(
            Arg::with_name("scale")
                .short("s")
                .long("scale")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("The factor to scale both axes by; excludes --width and --height"),
        )
        .arg(
            Arg::with_name("quality")
                .short("q")
                .long("quality")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("The encoding quality, 1-100, for jpg output [default: 100]"),
        )
        .arg(
            Arg::with_name("carve")
                .short("c")
                .long("carve")
                .help("Shrink by seam carving instead of scaling"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("A fixed seed for breaking seam ties, for reproducible output"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("More logging; repeat for more still"),
        )
        .arg(
            Arg::with_name("input")
                .help("The images to convert; a single '*' in a file name matches many")
                .required(true)
                .multiple(true)
                .index(1),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(&matches) {
        eprintln!("imgseam: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}
