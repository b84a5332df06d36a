// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Batch processing
//!
//! Turn the command line's inputs into (input, output) pairs and run
//! each through decode, resize and encode.  A file that can't be
//! handled is reported and skipped; it never stops the rest of the
//! batch.  Every image is independent of every other, so with the
//! `threaded` feature the files are spread across worker threads.

use crate::buffer::PixelBuffer;
use crate::config::ResizeConfig;
use crate::filetype::{encode, OutputType};
use crate::resize::resize;
use failure::{bail, format_err, Error, ResultExt};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a batch needs besides the list of inputs.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// An existing directory, or a single output file.
    pub output: PathBuf,
    pub output_type: OutputType,
    pub quality: u8,
    pub resize: ResizeConfig,
}

/// One image to convert.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Summary {
    pub processed: usize,
    pub failed: usize,
}

/// Expand one input argument.  A plain path is returned as is; a path
/// whose file name holds a single `*` is matched against the entries of
/// its directory.  Matching directories are skipped with a warning.
pub fn expand_input(arg: &str) -> Result<Vec<PathBuf>, Error> {
    let stars = arg.matches('*').count();
    if stars == 0 {
        return Ok(vec![PathBuf::from(arg)]);
    }
    if stars > 1 {
        bail!("input '{}' holds more than one wildcard", arg);
    }

    let path = Path::new(arg);
    let pattern = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| name.contains('*'))
        .ok_or_else(|| format_err!("input '{}' has a wildcard outside its file name", arg))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let star = pattern.find('*').unwrap_or(0);
    let (prefix, suffix) = (&pattern[..star], &pattern[star + 1..]);

    let entries =
        fs::read_dir(dir).with_context(|_| format!("could not open directory {}", dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|_| format!("could not read {}", dir.display()))?;
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(name) => name,
            None => continue,
        };
        if name.len() < prefix.len() + suffix.len()
            || !name.starts_with(prefix)
            || !name.ends_with(suffix)
        {
            continue;
        }
        let candidate = entry.path();
        if candidate.is_dir() {
            warn!(
                "{} matches '{}' but is a directory, skipping",
                candidate.display(),
                arg
            );
            continue;
        }
        found.push(candidate);
    }
    found.sort();
    Ok(found)
}

/// Where the result for `input` goes.  Into a directory, it keeps its
/// name and takes the new extension; otherwise `output` names the file.
pub fn output_path(input: &Path, output: &Path, output_type: OutputType) -> Result<PathBuf, Error> {
    if output.is_dir() {
        let stem = input
            .file_stem()
            .ok_or_else(|| format_err!("input {} has no file name", input.display()))?;
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(output_type.extension());
        Ok(output.join(name))
    } else {
        Ok(output.with_extension(output_type.extension()))
    }
}

/// Turn the input arguments into jobs.  Bad arguments are warned about
/// and counted in the returned number of skipped inputs.
pub fn plan(inputs: &[String], settings: &BatchSettings) -> Result<(Vec<Job>, usize), Error> {
    if !settings.output.is_dir() && inputs.len() > 1 {
        bail!(
            "{} is not a directory and {} inputs were given; \
             give a directory as output or a single input",
            settings.output.display(),
            inputs.len()
        );
    }

    let mut jobs = Vec::new();
    let mut skipped = 0;
    for arg in inputs {
        match expand_input(arg) {
            Ok(found) => {
                if found.is_empty() {
                    warn!("nothing matches '{}'", arg);
                }
                for input in found {
                    let output = output_path(&input, &settings.output, settings.output_type)?;
                    jobs.push(Job { input, output });
                }
            }
            Err(err) => {
                warn!("{}, skipping", err);
                skipped += 1;
            }
        }
    }
    Ok((jobs, skipped))
}

/// Decode, resize and encode a single image.  Refuses to overwrite an
/// existing file, including one another job wrote while this one was
/// being resized.
pub fn process_file(job: &Job, settings: &BatchSettings) -> Result<(), Error> {
    // Saves decoding and carving for nothing.  `encode` makes the real
    // check when it creates the file.
    if job.output.exists() {
        bail!(
            "there is already a file at {}, not overwriting it with {}",
            job.output.display(),
            job.input.display()
        );
    }

    let decoded = image::open(&job.input)
        .with_context(|_| format!("could not read image {}", job.input.display()))?;
    let buffer = PixelBuffer::from_dynamic(decoded)?;
    let resized = resize(&buffer, &settings.resize)
        .with_context(|_| format!("could not resize {}", job.input.display()))?;
    encode(&job.output, resized, settings.output_type, settings.quality)?;
    Ok(())
}

// Process and report.  Returns true on success.
fn process_logged(job: &Job, settings: &BatchSettings) -> bool {
    match process_file(job, settings) {
        Ok(()) => {
            info!(
                "processed {} -> {}",
                job.input.display(),
                job.output.display()
            );
            true
        }
        Err(err) => {
            let causes: Vec<String> = err.iter_chain().map(|c| c.to_string()).collect();
            warn!("{}, skipping", causes.join(": "));
            false
        }
    }
}

#[cfg(not(feature = "threaded"))]
fn process_all(jobs: Vec<Job>, settings: &BatchSettings) -> Result<usize, Error> {
    Ok(jobs
        .iter()
        .filter(|job| !process_logged(job, settings))
        .count())
}

#[cfg(feature = "threaded")]
fn process_all(jobs: Vec<Job>, settings: &BatchSettings) -> Result<usize, Error> {
    use crossbeam_deque::{Injector, Steal};
    use std::sync::atomic::{AtomicUsize, Ordering};

    let queue = Injector::new();
    let workers = num_cpus::get().max(1).min(jobs.len());
    jobs.into_iter().for_each(|job| queue.push(job));
    let failed = AtomicUsize::new(0);

    crossbeam::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|_| loop {
                match queue.steal() {
                    Steal::Success(job) => {
                        if !process_logged(&job, settings) {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Steal::Retry => continue,
                    Steal::Empty => break,
                }
            });
        }
    })
    .map_err(|_| format_err!("a worker thread panicked"))?;

    Ok(failed.into_inner())
}

/// Run a whole batch.
pub fn run(inputs: &[String], settings: &BatchSettings) -> Result<Summary, Error> {
    let (jobs, skipped) = plan(inputs, settings)?;
    let total = jobs.len();
    let failed = process_all(jobs, settings)?;
    Ok(Summary {
        processed: total - failed,
        failed: failed + skipped,
    })
}
