use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{App, Arg};
use log::{error, info};
use walkdir::WalkDir;

use savpak::prelude::*;

fn main() {
	if env::var("RUST_LOG").is_err() {
		// log level not explicitly set by the user
		env::set_var("RUST_LOG", "info");
	}
	pretty_env_logger::init();

	let matches = App::new("savpak")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Converts between .sav save archives and plain directory trees")
		.arg(
			Arg::with_name("input")
				.help("An existing .sav archive (extract) or a directory (pack)")
				.required(true)
				.index(1),
		)
		.arg(
			Arg::with_name("output")
				.help("Destination directory (extract) or archive file (pack)")
				.required(true)
				.index(2),
		)
		.get_matches();

	let input = PathBuf::from(matches.value_of("input").unwrap());
	let output = PathBuf::from(matches.value_of("output").unwrap());

	if let Err(err) = run(&input, &output) {
		error!("An error occurred while executing the command: {}", err);
		std::process::exit(1);
	}
}

fn run(input: &Path, output: &Path) -> anyhow::Result<()> {
	if input.is_file() && has_archive_extension(input) {
		extract(input, output)
	} else if input.is_dir() {
		pack(input, output)
	} else {
		Err(InternalError::InvalidInputPath(input.to_path_buf()).into())
	}
}

fn has_archive_extension(path: &Path) -> bool {
	path.extension()
		.map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(savpak::EXTENSION))
		.unwrap_or(false)
}

/// Extract `input` into the `output` directory, creating parent directories
/// ahead of every file write.
fn extract(input: &Path, output: &Path) -> anyhow::Result<()> {
	let file = File::open(input).with_context(|| format!("unable to open archive {:?}", input))?;
	let archive = Archive::new(file)?;

	fs::create_dir_all(output)?;

	for entry in archive.entries() {
		let target = match entry_destination(output, &entry.id) {
			Some(target) => target,
			None => anyhow::bail!("entry {:?} escapes the output directory", entry.id),
		};

		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent)?;
		}

		fs::write(&target, &entry.data).with_context(|| format!("unable to write {:?}", target))?;
	}

	info!(
		"Extraction completed: {} files extracted to {:?}.",
		archive.len(),
		output
	);
	Ok(())
}

/// Resolve an archive-supplied name against the output directory.
///
/// Names are untrusted: one holding a root or `..` component could place a
/// file outside the output directory, so those resolve to `None` and abort
/// the extraction.
fn entry_destination(output: &Path, id: &str) -> Option<PathBuf> {
	use std::path::Component;

	let relative = Path::new(id);
	let contained = relative
		.components()
		.all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

	contained.then(|| output.join(relative))
}

/// Pack every regular file under the `input` directory into the `output`
/// archive, named by its path relative to `input`.
fn pack(input: &Path, output: &Path) -> anyhow::Result<()> {
	let mut leaves = Vec::new();

	// Traversal order is whatever the filesystem yields, same as the archives
	// found in the wild
	for entry in WalkDir::new(input) {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}

		let relative = entry
			.path()
			.strip_prefix(input)
			.expect("walkdir yielded a path outside its root")
			.to_string_lossy()
			.into_owned();

		let file =
			File::open(entry.path()).with_context(|| format!("unable to read {:?}", entry.path()))?;
		leaves.push(Leaf::new(file, relative));
	}

	let target = File::create(output).with_context(|| format!("unable to create {:?}", output))?;
	dump(target, &mut leaves)?;

	info!(
		"Packing completed: {} files written to {:?}.",
		leaves.len(),
		output
	);
	Ok(())
}
