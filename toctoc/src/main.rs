/*!
# Toc Toc
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]



mod cli;

use cli::Input;
use fyi_msg::Msg;
use std::process::ExitCode;
use toctoc_core::{
	Device,
	Disc,
	ReadOptions,
	TocTocError,
};



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() -> ExitCode {
	match main__() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e @ (TocTocError::PrintHelp | TocTocError::PrintVersion)) => {
			println!("{e}");
			ExitCode::SUCCESS
		},
		Err(e) => {
			Msg::from(e).eprint();
			ExitCode::FAILURE
		},
	}
}

#[inline]
/// # Actual Main.
///
/// This does all the stuff.
fn main__() -> Result<(), TocTocError> {
	let (opts, input) = cli::parse()?;
	let disc = match input {
		Input::Dumps(mut dev) => read(&mut dev, opts)?,
		Input::Drive(dev) => read_drive(dev.as_deref(), opts)?,
	};

	println!("{disc}");

	// Mention anything asked for but not found.
	if opts.cdtext() && disc.cdtext().is_none() {
		Msg::warning("The disc has no CD-Text.").eprint();
	}

	Ok(())
}

/// # Read.
fn read<D: Device>(dev: &mut D, opts: ReadOptions) -> Result<Disc, TocTocError> {
	let disc = Disc::read(dev, opts)?;
	Msg::success(format!(
		"Read {} track(s), {} session(s).",
		disc.toc().len(),
		disc.sessions().map_or(1, toctoc_core::Sessions::last_session),
	)).eprint();
	Ok(disc)
}

#[cfg(feature = "libcdio")]
/// # Read Drive.
fn read_drive(dev: Option<&std::path::Path>, opts: ReadOptions)
-> Result<Disc, TocTocError> {
	let mut dev = toctoc_core::LibcdioDevice::open(dev)?;
	read(&mut dev, opts)
}

#[cfg(not(feature = "libcdio"))]
/// # Read Drive.
///
/// Without `libcdio`, there is no way to talk to a drive.
fn read_drive(dev: Option<&std::path::Path>, _opts: ReadOptions)
-> Result<Disc, TocTocError> {
	if dev.is_some() { Err(TocTocError::NoDevice) }
	else { Err(TocTocError::CliArg) }
}
