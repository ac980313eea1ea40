use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use strata_blocks::{BlockRegistry, BlockType};
use strata_edit::WorldSave;
use strata_mesh_cpu::MeshOptions;
use strata_runtime::ChunkWorld;
use strata_world::{CellUnloader, ChunkCoord, Terrain, WorldCell, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Generate, edit and mesh a chunked voxel world")]
struct Args {
    /// World configuration (TOML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding materials.toml and blocks.toml
    #[arg(long, default_value = "assets/voxels")]
    assets: PathBuf,
    /// Load radius in chunks around --center
    #[arg(long, default_value_t = 1)]
    radius: i32,
    /// Center chunk as "cx,cz"
    #[arg(long, default_value = "0,0", value_parser = parse_chunk, allow_hyphen_values = true)]
    center: ChunkCoord,
    /// Block edit "x,y,z,block" where block is a name or numeric id (repeatable)
    #[arg(long = "edit", value_parser = parse_edit, allow_hyphen_values = true)]
    edits: Vec<EditArg>,
    /// Merge edits from a save file before loading chunks
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write all edits to a save file at the end
    #[arg(long)]
    save: Option<PathBuf>,
    /// Also build collision meshes
    #[arg(long)]
    collider: bool,
    /// Debug-level logging (RUST_LOG still wins)
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct EditArg {
    cell: WorldCell,
    block: String,
}

fn parse_chunk(s: &str) -> Result<ChunkCoord, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [cx, cz] = parts.as_slice() else {
        return Err(format!("expected \"cx,cz\", got \"{}\"", s));
    };
    let cx = cx.parse::<i32>().map_err(|e| format!("bad cx: {}", e))?;
    let cz = cz.parse::<i32>().map_err(|e| format!("bad cz: {}", e))?;
    Ok(ChunkCoord::new(cx, cz))
}

fn parse_edit(s: &str) -> Result<EditArg, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z, block] = parts.as_slice() else {
        return Err(format!("expected \"x,y,z,block\", got \"{}\"", s));
    };
    let coord = |v: &str, axis: &str| v.parse::<i32>().map_err(|e| format!("bad {}: {}", axis, e));
    if block.is_empty() {
        return Err("missing block".to_string());
    }
    Ok(EditArg {
        cell: (coord(*x, "x")?, coord(*y, "y")?, coord(*z, "z")?),
        block: block.to_string(),
    })
}

fn resolve_block(reg: &BlockRegistry, name: &str) -> Option<BlockType> {
    match name.parse::<u16>() {
        Ok(code) => reg.get(BlockType(code)).map(|d| d.id),
        Err(_) => reg.id_by_name(name),
    }
}

/// Counts cells released by unloaded chunks.
#[derive(Default)]
struct ReleaseCounter {
    cells: usize,
}

impl CellUnloader for ReleaseCounter {
    fn unload_cells(&mut self, cells: &[WorldCell], owner: ChunkCoord) {
        log::debug!(target: "runtime", "chunk ({}, {}) released {} cells", owner.cx, owner.cz, cells.len());
        self.cells += cells.len();
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = match &args.config {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig::default(),
    };
    let reg = BlockRegistry::load_from_paths(
        args.assets.join("materials.toml"),
        args.assets.join("blocks.toml"),
    )?;
    let terrain = Terrain::from_config(&cfg.generation, &reg)?;
    let mut world = ChunkWorld::new(&cfg, reg, Box::new(terrain))?.with_mesh_options(MeshOptions {
        build_collider: args.collider,
    });

    if let Some(path) = &args.load {
        let save = WorldSave::load_from_path(path)?;
        let n = world.import_save(save)?;
        log::info!("merged edits for {} chunk(s) from {}", n, path.display());
    }

    let mut released = ReleaseCounter::default();
    let (loaded, _) = world.update_radius(args.center, args.radius, &mut released);
    log::info!("loaded {} chunk(s) around ({}, {})", loaded, args.center.cx, args.center.cz);

    for edit in &args.edits {
        let block = resolve_block(world.registry(), &edit.block)
            .ok_or_else(|| format!("unknown block '{}'", edit.block))?;
        let (x, y, z) = edit.cell;
        if !world.set_block(x, y, z, block) {
            log::warn!("edit at ({}, {}, {}) is outside the world column", x, y, z);
        }
    }
    let rebuilt = world.flush_rebuilds();
    log::info!("applied {} edit(s), rebuilt {} chunk(s)", args.edits.len(), rebuilt);

    let (mut quads, mut tris, mut dropped) = (0, 0, 0);
    for coord in world.loaded_coords() {
        let Some(mesh) = world.mesh(coord) else {
            continue;
        };
        println!(
            "chunk ({:>3}, {:>3}) quads={:<6} tris={:<6} submeshes={:<2} cells={:<6} dropped={}{}",
            coord.cx,
            coord.cz,
            mesh.quad_count(),
            mesh.triangle_count(),
            mesh.submeshes.len(),
            mesh.rendered_cells.len(),
            mesh.dropped_faces,
            mesh.collider
                .as_ref()
                .map(|c| format!(" collider_tris={}", c.triangle_count()))
                .unwrap_or_default()
        );
        quads += mesh.quad_count();
        tris += mesh.triangle_count();
        dropped += mesh.dropped_faces;
    }
    println!(
        "total: chunks={} quads={} tris={} dropped={}",
        world.loaded_count(),
        quads,
        tris,
        dropped
    );

    if let Some(path) = &args.save {
        let save = world.save();
        save.save_to_path(path)?;
        log::info!("saved {} changed cell(s) to {}", save.cell_count(), path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_chunk() {
        assert_eq!(parse_chunk("-2, 5"), Ok(ChunkCoord::new(-2, 5)));
        assert!(parse_chunk("1").is_err());
        assert!(parse_chunk("a,b").is_err());
    }

    #[test]
    fn parses_edit() {
        assert_eq!(
            parse_edit("-1,3,17,glass"),
            Ok(EditArg {
                cell: (-1, 3, 17),
                block: "glass".to_string()
            })
        );
        assert!(parse_edit("1,2,3").is_err());
        assert!(parse_edit("1,2,3,").is_err());
    }

    #[test]
    fn args_accept_repeated_edits() {
        let args = Args::try_parse_from([
            "strata", "--radius", "2", "--edit", "0,10,0,stone", "--edit", "1,10,0,7", "--center", "-1,-1",
        ])
        .unwrap();
        assert_eq!(args.edits.len(), 2);
        assert_eq!(args.center, ChunkCoord::new(-1, -1));
        assert_eq!(args.radius, 2);
    }

    #[test]
    fn blocks_resolve_by_name_or_code() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/voxels");
        let reg = BlockRegistry::load_from_paths(root.join("materials.toml"), root.join("blocks.toml")).unwrap();
        assert_eq!(resolve_block(&reg, "glass"), Some(BlockType(7)));
        assert_eq!(resolve_block(&reg, "7"), Some(BlockType(7)));
        assert_eq!(resolve_block(&reg, "0"), Some(BlockType::EMPTY));
        assert_eq!(resolve_block(&reg, "999"), None);
        assert_eq!(resolve_block(&reg, "lava"), None);
    }
}
