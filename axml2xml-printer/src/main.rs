use std::{env, fs};

use anyhow::{bail, Result};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() <= 1 {
        bail!("usage: axml2xml-printer <AndroidManifest.xml> [...]");
    }

    for fname in &args[1..] {
        let buf = fs::read(fname)?;
        let xml = axml2xml::convert(&buf)?;
        print!("{}", xml);
    }

    Ok(())
}
