use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use oleprop::prop::{Property, PropertyStore, Result};

use crate::cmd::util::{emit_json, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// List every set and property of a serialized property store file.
pub fn run(args: Args) -> Result<()> {
	let store = PropertyStore::read_from(BufReader::new(File::open(&args.path)?))?;

	if args.json {
		let sets = store
			.sets()
			.iter()
			.map(|set| {
				let properties = store.set_properties(set.format_id()).map(|prop| prop.map(|prop| property_json(&prop))).collect::<Result<_>>()?;
				Ok(SetJson {
					format_id: set.format_id().braced().to_string(),
					properties,
				})
			})
			.collect::<Result<_>>()?;
		emit_json(&StoreJson {
			path: args.path.display().to_string(),
			sets,
		});
		return Ok(());
	}

	println!("path: {}", args.path.display());
	println!("sets: {}", store.sets().len());
	for set in store.sets() {
		println!("set {} ({} properties)", set.format_id().braced(), set.len());
		println!("key\ttype\tvalue");
		for prop in store.set_properties(set.format_id()) {
			let prop = prop?;
			println!("{}\t{}\t{}", prop.spec(), prop.var_type, prop.value);
		}
	}
	Ok(())
}

fn property_json(prop: &Property) -> PropertyJson {
	PropertyJson {
		id: prop.id,
		name: prop.name.clone(),
		var_type: prop.var_type.to_string(),
		value: value_json(&prop.value),
	}
}

#[derive(serde::Serialize)]
struct PropertyJson {
	id: u32,
	name: Option<String>,
	#[serde(rename = "type")]
	var_type: String,
	value: serde_json::Value,
}

#[derive(serde::Serialize)]
struct SetJson {
	format_id: String,
	properties: Vec<PropertyJson>,
}

#[derive(serde::Serialize)]
struct StoreJson {
	path: String,
	sets: Vec<SetJson>,
}
