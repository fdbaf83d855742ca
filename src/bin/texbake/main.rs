// texbake - Bake the procedural textures to PNG and summarize an effect
//
// Pipeline:
//   1. Load an effect preset, optionally overridden by a JSON file
//   2. Build the scene, synthesizing every texture it references
//   3. Write each texture as <out>/<kind>.png
//   4. Print a part census and the camera path at a few scroll positions
//
// Usage: cargo run --bin texbake -- [--kind gate|tunnel] [--seed N] [--out DIR] [--config FILE]

#[cfg(not(target_arch = "wasm32"))]
mod export;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::env;
    use std::path::PathBuf;

    use anyhow::{Context, bail};
    use portal_engine::{EffectConfig, EffectKind, TextureBank, scene};

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut kind = EffectKind::Gate;
    let mut seed: Option<u64> = None;
    let mut out = PathBuf::from("textures");
    let mut config: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--kind", Some(v)) => {
                kind = EffectKind::parse(v).with_context(|| format!("unknown effect {:?}", v))?;
                i += 2;
            }
            ("--seed", Some(v)) => {
                seed = Some(parse_seed(v).with_context(|| format!("bad seed {:?}", v))?);
                i += 2;
            }
            ("--out", Some(v)) => { out = PathBuf::from(v); i += 2; }
            ("--config", Some(v)) => { config = Some(PathBuf::from(v)); i += 2; }
            ("-h" | "--help", _) => {
                println!("Usage: {} [--kind gate|tunnel] [--seed N] [--out DIR] [--config FILE]", args[0]);
                return Ok(());
            }
            (flag, _) => bail!("unexpected argument {:?}", flag),
        }
    }

    let mut cfg = match &config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EffectConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => EffectConfig::preset(kind),
    };
    if let Some(seed) = seed {
        cfg.texture_seed = seed;
    }

    println!("Baking {} effect (seed {:#x})...", cfg.kind().name(), cfg.texture_seed);

    let mut bank = TextureBank::new(cfg.texture_seed);
    let scene = scene::build(&cfg, &mut bank)?;

    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    for (_, tex) in bank.iter() {
        let path = export::write_png(&out, tex)?;
        println!("  {} {}x{} -> {}", tex.kind.name(), tex.width, tex.height, path.display());
    }
    println!("  Texture memory: ~{} KB", bank.byte_size() / 1024);

    export::print_census(&scene);
    export::print_camera_path(&cfg);

    println!("Done!");
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_seed(s: &str) -> Option<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
