use pack_creator::{generate_pack_with_options, PackOptions, PackRequest};
use std::fs::write;

fn main() -> anyhow::Result<()> {
    // Example: stage a texture/model pair in a scratch directory and build a pack
    let scratch = tempfile::tempdir()?;
    let texture = scratch.path().join("ruby_sword.png");
    let model = scratch.path().join("ruby_sword.json");
    write(&texture, b"\x89PNG\r\n\x1a\n")?;
    write(&model, br#"{"parent": "item/handheld"}"#)?;

    let request = PackRequest {
        texture_path: texture,
        model_path: model,
        item_name: "ruby_sword".to_string(),
        custom_model_data: "1001".to_string(),
    };
    let archive = generate_pack_with_options(&request, &PackOptions::default())?;
    println!("Wrote {}", archive.display());
    Ok(())
}
