use strata_blocks::BlockType;
use strata_chunk::{Chunk, generate_chunk};
use strata_edit::{ChangedCell, ChunkDelta, DeltaError, EditStore, WorldSave, load_chunk};
use strata_world::{ChunkCoord, ChunkDims};

const STONE: BlockType = BlockType(1);
const DIRT: BlockType = BlockType(2);
const SAND: BlockType = BlockType(4);

fn layered(_: i32, wy: i32, _: i32) -> BlockType {
    match wy {
        0 => STONE,
        1 | 2 => DIRT,
        _ => BlockType::EMPTY,
    }
}

fn dims() -> ChunkDims {
    ChunkDims::new(4, 8, 4).unwrap()
}

fn generated(coord: ChunkCoord) -> Chunk {
    generate_chunk(coord, dims(), &layered).0
}

/// Edits a loaded chunk the way the runtime does: write the block, record the delta.
fn edit(store: &mut EditStore, chunk: &mut Chunk, cell: (i32, i32, i32), ty: BlockType) {
    assert!(chunk.set_world(cell.0, cell.1, cell.2, ty));
    store.record_change(cell, ty, layered(cell.0, cell.1, cell.2));
}

#[test]
fn unedited_chunk_saves_nothing_and_reloads_identically() {
    let store = EditStore::new(dims());
    let coord = ChunkCoord::new(3, -1);
    let chunk = generated(coord);
    let delta = store.save_chunk(&chunk);
    assert!(delta.is_empty());
    assert_eq!(delta.coord, coord);
    assert_eq!(delta.size, dims());

    let mut reloaded = generated(coord);
    assert_eq!(load_chunk(&delta, &mut reloaded).unwrap(), 0);
    assert_eq!(reloaded.blocks(), chunk.blocks());
}

#[test]
fn edit_survives_regenerate_and_replay() {
    let mut store = EditStore::new(dims());
    let coord = ChunkCoord::new(0, 0);
    let mut chunk = generated(coord);
    assert_eq!(chunk.get_world(1, 1, 1), Some(DIRT));
    edit(&mut store, &mut chunk, (1, 1, 1), SAND);
    edit(&mut store, &mut chunk, (2, 5, 3), STONE);
    let delta = store.save_chunk(&chunk);
    assert_eq!(
        delta.cells,
        vec![
            ChangedCell { x: 1, y: 1, z: 1, block: SAND },
            ChangedCell { x: 2, y: 5, z: 3, block: STONE },
        ]
    );

    let mut fresh = generated(coord);
    assert_eq!(fresh.get_world(1, 1, 1), Some(DIRT));
    load_chunk(&delta, &mut fresh).unwrap();
    assert_eq!(fresh.get_world(1, 1, 1), Some(SAND));
    assert_eq!(fresh.blocks(), chunk.blocks());
}

#[test]
fn repeated_edits_keep_one_entry() {
    let mut store = EditStore::new(dims());
    let mut chunk = generated(ChunkCoord::new(0, 0));
    edit(&mut store, &mut chunk, (0, 3, 0), STONE);
    edit(&mut store, &mut chunk, (0, 3, 0), SAND);
    let delta = store.save_chunk(&chunk);
    assert_eq!(delta.cells, vec![ChangedCell { x: 0, y: 3, z: 0, block: SAND }]);
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let store = EditStore::new(dims());
    let mut other = Chunk::with_size(ChunkCoord::new(0, 0), 4, 16, 4).unwrap();
    let delta = store.delta_for(ChunkCoord::new(0, 0));
    match load_chunk(&delta, &mut other) {
        Err(DeltaError::DimensionMismatch { expected, found }) => {
            assert_eq!(expected, other.dims());
            assert_eq!(found, dims());
        }
        other => panic!("expected dimension mismatch, got {:?}", other),
    }
}

#[test]
fn delta_for_another_chunk_is_rejected() {
    let delta = ChunkDelta::new(ChunkCoord::new(1, 0), dims());
    let mut chunk = generated(ChunkCoord::new(0, 0));
    assert!(matches!(
        load_chunk(&delta, &mut chunk),
        Err(DeltaError::CoordMismatch { .. })
    ));
}

#[test]
fn out_of_range_cells_are_skipped_on_replay() {
    let coord = ChunkCoord::new(0, 0);
    let mut delta = ChunkDelta::new(coord, dims());
    delta.cells.push(ChangedCell { x: 9, y: 0, z: 0, block: SAND });
    delta.cells.push(ChangedCell { x: 0, y: 7, z: 0, block: SAND });
    let mut chunk = generated(coord);
    assert_eq!(load_chunk(&delta, &mut chunk).unwrap(), 1);
    assert_eq!(chunk.get_local(0, 7, 0), SAND);
}

#[test]
fn world_save_round_trips_through_a_file() {
    let mut store = EditStore::new(dims());
    store.record_change((-3, 4, 9), SAND, BlockType::EMPTY);
    store.record_change((5, 0, 0), BlockType::EMPTY, STONE);
    let save = store.to_world_save();
    assert_eq!(save.cell_count(), 2);

    let dir = std::env::temp_dir().join(format!("strata-edit-{}", std::process::id()));
    let path = dir.join("world.json");
    save.save_to_path(&path).unwrap();
    let loaded = WorldSave::load_from_path(&path).unwrap();
    std::fs::remove_dir_all(&dir).ok();
    assert_eq!(loaded, save);

    let mut restored = EditStore::new(dims());
    let imported = restored.import_save(loaded).unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(restored.get(-3, 4, 9), Some(SAND));
    assert_eq!(restored.get(5, 0, 0), Some(BlockType::EMPTY));
}

#[test]
fn import_drops_records_with_wrong_dimensions() {
    let mut save = WorldSave {
        chunk_size: dims(),
        chunks: vec![
            ChunkDelta {
                coord: ChunkCoord::new(0, 0),
                size: dims(),
                cells: vec![ChangedCell { x: 1, y: 1, z: 1, block: SAND }],
            },
            ChunkDelta {
                coord: ChunkCoord::new(1, 0),
                size: ChunkDims::new(8, 8, 8).unwrap(),
                cells: vec![ChangedCell { x: 1, y: 1, z: 1, block: SAND }],
            },
        ],
    };
    let mut store = EditStore::new(dims());
    let imported = store.import_save(save.clone()).unwrap();
    assert_eq!(imported, vec![ChunkCoord::new(0, 0)]);
    assert!(!store.has_changes(ChunkCoord::new(1, 0)));

    save.chunk_size = ChunkDims::new(16, 8, 16).unwrap();
    assert!(matches!(
        EditStore::new(dims()).import_save(save),
        Err(DeltaError::DimensionMismatch { .. })
    ));
}

#[test]
fn save_file_stores_block_codes_as_integers() {
    let mut store = EditStore::new(dims());
    store.record_change((0, 0, 0), SAND, STONE);
    let json = store.to_world_save().to_json().unwrap();
    let parsed = WorldSave::from_json(&json).unwrap();
    assert_eq!(parsed.chunks[0].cells[0].block, SAND);
    assert!(json.contains("\"block\": 4"));
    assert!(json.contains("\"chunk_size\": ["));
}
