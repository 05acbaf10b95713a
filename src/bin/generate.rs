use clap::Parser;
use std::path::PathBuf;

/// Build a Minecraft resource pack zip from a texture, an item model and a
/// custom model data value.
#[derive(Parser, Debug)]
#[command(name = "pack-creator")]
struct Args {
    /// Texture file (copied under assets/minecraft/textures/item)
    #[arg(short, long)]
    texture: PathBuf,

    /// Item model file (copied under assets/minecraft/models/item and patched
    /// to reference the texture)
    #[arg(short, long)]
    model: PathBuf,

    /// Item name; used verbatim as the override document's file name
    #[arg(short, long)]
    name: String,

    /// Custom model data value the override predicate matches on
    #[arg(short, long)]
    custom_model_data: String,

    /// Staging directory for the pack tree (deleted and recreated every run)
    #[arg(long, default_value = pack_creator::DEFAULT_PACK_ROOT)]
    pack_root: PathBuf,

    /// Output zip path
    #[arg(short, long, default_value = pack_creator::DEFAULT_ARCHIVE_PATH)]
    out: PathBuf,
}

fn main() {
    let args = Args::parse();

    for p in [&args.texture, &args.model] {
        if !p.exists() {
            eprintln!("input file does not exist: {}", p.display());
            std::process::exit(2);
        }
    }

    let request = pack_creator::PackRequest {
        texture_path: args.texture,
        model_path: args.model,
        item_name: args.name,
        custom_model_data: args.custom_model_data,
    };
    let opts = pack_creator::PackOptions {
        pack_root: args.pack_root,
        archive_path: args.out,
    };

    match pack_creator::generate_pack_with_options(&request, &opts) {
        Ok(archive) => println!("Resource pack generated: {}", archive.display()),
        Err(pack_creator::PackError::InvalidInput(msg)) => {
            eprintln!("input error: {}", msg);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("error generating pack: {}", e);
            std::process::exit(1);
        }
    }
}
