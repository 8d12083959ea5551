use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Models the showcase loads at start-up, relative to assets/
const FRUIT_MODELS: [&str; 5] = [
    "banana.glb",
    "strawberry.glb",
    "pear.glb",
    "orange.glb",
    "apple.glb",
];

fn main() -> Result<()> {
    // This tells Cargo to rerun this script if something in /assets/ changes.
    println!("cargo:rerun-if-changed=assets");

    let out_dir = env::var("OUT_DIR")?;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    // A missing model is not a build error, the showcase runs without models then.
    for model in FRUIT_MODELS {
        if !assets_src.join(model).exists() {
            println!("cargo:warning=assets/{model} is missing, the carousel will stay empty");
        }
    }

    if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], out_dir, &copy_options)
            .context("cannot copy the assets next to the build output")?;
    }

    Ok(())
}
