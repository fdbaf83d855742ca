// export.rs - PNG output and console summaries for texbake

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

use portal_engine::anim::targets;
use portal_engine::config::{EffectConfig, Family};
use portal_engine::input::PointerState;
use portal_engine::scene::{Group, SceneRoot};
use portal_engine::texture::Texture;

const GROUPS: [Group; 6] = [
    Group::Rig,
    Group::DoorPanel,
    Group::Frame,
    Group::RoomShell,
    Group::Arch,
    Group::InteriorReveal,
];

const PATH_SAMPLES: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

pub fn write_png(dir: &Path, tex: &Texture) -> Result<PathBuf> {
    let path = dir.join(format!("{}.png", tex.kind.name()));
    let img = RgbaImage::from_raw(tex.width, tex.height, tex.rgba().to_vec())
        .context("texture buffer does not match its dimensions")?;
    img.save(&path).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn print_census(scene: &SceneRoot) {
    println!("  Parts: {} ({} drawable)", scene.len(), scene.drawable_count());
    for group in GROUPS {
        let n = scene.count(group);
        if n > 0 {
            println!("    {:<16} {}", format!("{:?}", group), n);
        }
    }
}

pub fn print_camera_path(cfg: &EffectConfig) {
    println!("  Camera path:");
    let pointer = PointerState::default();
    for p in PATH_SAMPLES {
        match &cfg.family {
            Family::Gate(g) => {
                let t = targets::door(&g.motion, p, pointer);
                println!(
                    "    p={:.2} pos=({:.2}, {:.2}, {:.2}) doors={:.1}°",
                    p,
                    t.camera_position.x,
                    t.camera_position.y,
                    t.camera_position.z,
                    t.right.to_degrees()
                );
            }
            Family::Tunnel(c) => {
                let t = targets::tunnel(c, p, pointer);
                let faded = (0..c.layout.ring_count as usize)
                    .filter(|&i| targets::ring_faded(i, p, c.layout.ring_count as usize))
                    .count();
                println!(
                    "    p={:.2} pos=({:.2}, {:.2}, {:.2}) faded={} room={:.2}",
                    p,
                    t.camera_position.x,
                    t.camera_position.y,
                    t.camera_position.z,
                    faded,
                    t.interior_opacity
                );
            }
        }
    }
}
