#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "oleprop", about = "OLE property value and property store tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Deserialize one hex-encoded value and print its type and value.
	Decode(cmd::decode::Args),
	/// Build a value from a literal and print its serialized bytes as hex.
	Encode(cmd::encode::Args),
	/// List the sets and properties of a serialized property store file.
	Store(cmd::store::Args),
}

fn main() {
	env_logger::init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> oleprop::prop::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Store(args) => cmd::store::run(args),
	}
}
