//! Integration tests for tessera-tile
//!
//! Tiles are assembled from the public record encoders, written into a
//! temporary tile directory using the on-disk path scheme, then loaded back
//! through `FsTileStorage` and the `tessera-inspect` binary.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use tessera_tile::calendar::dow;
use tessera_tile::formats::header::HEADER_SIZE;
use tessera_tile::formats::{
    access, AccessRestriction, AccessType, DirectedEdge, NodeInfo, Sign, SignType, TileHeader,
    TransitDeparture, TransitRoute, TransitSchedule, TransitStop,
};
use tessera_tile::{
    Config, DepartureFilter, FsTileStorage, GraphId, GraphTile, ServiceDay, TileHierarchy,
    TileStorage, ZipTileStorage,
};
use tessera_tile::storage::file_suffix;

/// Text pool under construction; offset 0 is the empty string
struct TextPool(Vec<u8>);

impl TextPool {
    fn new() -> Self {
        TextPool(vec![0])
    }

    fn add(&mut self, text: &str) -> u32 {
        let offset = self.0.len() as u32;
        self.0.extend_from_slice(text.as_bytes());
        self.0.push(0);
        offset
    }
}

#[derive(Default)]
struct Sections {
    nodes: Vec<NodeInfo>,
    edges: Vec<DirectedEdge>,
    restrictions: Vec<AccessRestriction>,
    departures: Vec<TransitDeparture>,
    stops: Vec<TransitStop>,
    routes: Vec<TransitRoute>,
    schedules: Vec<TransitSchedule>,
    signs: Vec<Sign>,
    edge_info: Vec<u8>,
}

fn assemble(id: GraphId, date_created: u32, s: &Sections, text: &TextPool) -> Vec<u8> {
    let mut body = Vec::new();
    s.nodes.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.edges.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.restrictions.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.departures.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.stops.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.routes.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.schedules.iter().for_each(|r| body.extend_from_slice(&r.encode()));
    s.signs.iter().for_each(|r| body.extend_from_slice(&r.encode()));

    let edgeinfo_offset = (HEADER_SIZE + body.len()) as u32;
    let header = TileHeader {
        graph_id: id,
        date_created,
        node_count: s.nodes.len() as u32,
        directed_edge_count: s.edges.len() as u32,
        access_restriction_count: s.restrictions.len() as u32,
        departure_count: s.departures.len() as u32,
        stop_count: s.stops.len() as u32,
        route_count: s.routes.len() as u32,
        schedule_count: s.schedules.len() as u32,
        sign_count: s.signs.len() as u32,
        edgeinfo_offset,
        textlist_offset: edgeinfo_offset + s.edge_info.len() as u32,
        ..Default::default()
    };

    let mut buf = header.encode().to_vec();
    buf.extend_from_slice(&body);
    buf.extend_from_slice(&s.edge_info);
    buf.extend_from_slice(&text.0);
    buf
}

fn edge_info_block(way_id: u64, names: &[u32]) -> Vec<u8> {
    let mut block = way_id.to_le_bytes().to_vec();
    block.extend_from_slice(&(names.len() as u32).to_le_bytes());
    for name in names {
        block.extend_from_slice(&name.to_le_bytes());
    }
    block
}

/// Two nodes joined by a pair of edges, with a sign and restrictions
fn road_tile(id: GraphId) -> Vec<u8> {
    let mut text = TextPool::new();
    let street = text.add("Market Street");
    let exit = text.add("Exit 12");

    let node = |edge_index| NodeInfo {
        lat_fxp: 405_000_000,
        lon_fxp: -765_000_000,
        edge_index,
        edge_count: 1,
        admin_index: 0,
        access: access::ALL,
        node_type: 0,
        flags: 0,
    };
    let edge = |end: u64| DirectedEdge {
        endnode: id.with_id(end),
        edgeinfo_offset: 0,
        length_m: 120,
        forward_access: access::ALL,
        reverse_access: access::ALL,
        speed_kph: 40,
        ..Default::default()
    };
    let restriction = |edge_index, modes| AccessRestriction {
        edge_index,
        access_type: AccessType::MaxWeight,
        days_of_week: dow::ALL,
        modes,
        value: 3500,
    };

    let sections = Sections {
        nodes: vec![node(0), node(1)],
        edges: vec![edge(1), edge(0)],
        restrictions: vec![restriction(0, access::TRUCK), restriction(0, access::BUS)],
        signs: vec![Sign {
            edge_index: 1,
            sign_type: SignType::ExitNumber,
            text_offset: exit,
        }],
        edge_info: edge_info_block(123_456, &[street]),
        ..Default::default()
    };
    assemble(id, 0, &sections, &text)
}

/// One route run by one operator, one line departing three times a day
fn transit_tile(id: GraphId) -> Vec<u8> {
    let mut text = TextPool::new();
    let stop_a = text.add("s-dr4e3-market");
    let stop_b = text.add("s-dr4e3-cityhall");
    let route = text.add("r-dr4-l");
    let operator = text.add("o-dr4-septa");

    let departure = |trip_id, time, schedule_index| TransitDeparture {
        line_id: 5,
        trip_id,
        departure_time: time,
        schedule_index,
        ..Default::default()
    };
    let sections = Sections {
        departures: vec![
            departure(1, 6 * 3600, 0),
            departure(2, 7 * 3600, 1),
            departure(3, 8 * 3600, 0),
        ],
        stops: vec![
            TransitStop {
                one_stop_offset: stop_a,
                ..Default::default()
            },
            TransitStop {
                one_stop_offset: stop_b,
                ..Default::default()
            },
        ],
        routes: vec![TransitRoute {
            one_stop_offset: route,
            op_one_stop_offset: operator,
            ..Default::default()
        }],
        schedules: vec![
            TransitSchedule {
                days: u64::MAX,
                days_of_week: dow::ALL & !(dow::SATURDAY | dow::SUNDAY),
                end_day: 60,
            },
            TransitSchedule {
                days: u64::MAX,
                days_of_week: dow::SATURDAY | dow::SUNDAY,
                end_day: 60,
            },
        ],
        ..Default::default()
    };
    // created 2016-01-04, a Monday
    let created = (NaiveDate::from_ymd_opt(2016, 1, 4).unwrap()
        - NaiveDate::from_ymd_opt(2014, 1, 1).unwrap())
    .num_days() as u32;
    assemble(id, created, &sections, &text)
}

fn write_tile(storage: &FsTileStorage, hierarchy: &TileHierarchy, id: GraphId, bytes: &[u8]) {
    let path = storage.tile_path(id, hierarchy).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn setup() -> (TempDir, FsTileStorage, TileHierarchy, GraphId, GraphId) {
    let tmp = TempDir::new().unwrap();
    let storage = FsTileStorage::new(tmp.path());
    let hierarchy = TileHierarchy::default();

    let road = hierarchy.graph_id(-76.5, 40.5, 2);
    let transit = GraphId::new(hierarchy.graph_id(-76.5, 40.5, 0).tile_id(), 3, 0);
    write_tile(&storage, &hierarchy, road, &road_tile(road));
    write_tile(&storage, &hierarchy, transit, &transit_tile(transit));
    (tmp, storage, hierarchy, road, transit)
}

#[test]
fn test_road_tile_from_disk() {
    let (_tmp, storage, hierarchy, road, _) = setup();
    assert!(storage.tile_exists(road, &hierarchy));

    let tile = GraphTile::load(&storage, &hierarchy, road.with_id(1)).unwrap();
    assert_eq!(tile.id(), road);
    assert_eq!(tile.header().node_count, 2);

    let edge = tile.directed_edge(0).unwrap();
    assert_eq!(tile.names(&edge).unwrap(), vec!["Market Street"]);
    assert_eq!(tile.edge_info(&edge).unwrap().way_id(), 123_456);
    assert_eq!(tile.opposing_edge_id(&edge).unwrap(), road.with_id(1));

    let signs = tile.signs(1).unwrap();
    assert_eq!(signs.len(), 1);
    assert_eq!(signs[0].text, "Exit 12");
    assert!(tile.signs(0).unwrap().is_empty());

    assert_eq!(tile.access_restrictions(0, access::TRUCK).len(), 1);
    assert_eq!(tile.access_restrictions(0, access::TRUCK | access::BUS).len(), 2);
    assert!(tile.access_restrictions(0, access::AUTO).is_empty());

    let bbox = tile.bounding_box(&hierarchy).unwrap();
    assert_eq!((bbox.min().x, bbox.min().y), (-76.5, 40.5));
    assert!(tile.stop_one_stops().is_empty());
}

#[test]
fn test_transit_tile_from_disk() {
    let (_tmp, storage, hierarchy, _, transit) = setup();
    let tile = GraphTile::load(&storage, &hierarchy, transit).unwrap();

    assert_eq!(tile.stop_one_stops().len(), 2);
    assert_eq!(tile.stop_one_stops()["s-dr4e3-cityhall"].index, 1);
    assert_eq!(tile.route_one_stops()["r-dr4-l"].len(), 3);
    assert_eq!(tile.operator_one_stops()["o-dr4-septa"].len(), 3);
    assert!(tile.route_one_stops()["r-dr4-l"]
        .iter()
        .all(|p| p.tile_id == transit.tile_id() && p.index == 5));

    let created = tile.header().date_created;
    let weekday = ServiceDay::for_date(created, NaiveDate::from_ymd_opt(2016, 1, 6).unwrap());
    let saturday = ServiceDay::for_date(created, NaiveDate::from_ymd_opt(2016, 1, 9).unwrap());
    let next = |day: &ServiceDay, time| {
        tile.next_departure(5, time, day, DepartureFilter::default())
            .unwrap()
            .map(|d| d.trip_id)
    };
    assert_eq!(next(&weekday, 6 * 3600 + 1), Some(3));
    assert_eq!(next(&saturday, 6 * 3600 + 1), Some(2));
    assert_eq!(next(&weekday, 9 * 3600), None);

    assert_eq!(tile.transit_departure(5, 2).unwrap().departure_time, 7 * 3600);
    assert_eq!(tile.transit_departure(5, 9), None);
}

#[test]
fn test_missing_tile_is_empty() {
    let (_tmp, storage, hierarchy, road, _) = setup();
    let missing = GraphId::new(road.tile_id() + 1, 2, 0);
    assert!(!storage.tile_exists(missing, &hierarchy));
    let tile = GraphTile::load(&storage, &hierarchy, missing).unwrap();
    assert_eq!(tile.size(), 0);
    assert!(tile.node(0).is_err());
}

#[test]
fn test_find_tiles_from_config() {
    let (tmp, _, hierarchy, road, transit) = setup();
    let config_path = tmp.path().join("tessera.toml");
    std::fs::write(
        &config_path,
        format!("[tiles]\ntile_dir = {:?}\n", tmp.path().display().to_string()),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let tiles = config.storage().find_tiles(&hierarchy).unwrap();
    assert_eq!(tiles, vec![road, transit]);
}

#[test]
fn test_tile_shared_across_threads() {
    let (_tmp, storage, hierarchy, road, _) = setup();
    let tile = Arc::new(GraphTile::load(&storage, &hierarchy, road).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tile = Arc::clone(&tile);
            thread::spawn(move || {
                let edge = tile.directed_edge(0).unwrap();
                tile.names(&edge).unwrap().join(",")
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "Market Street");
    }
}

/// Pack every tile of the directory tree into one archive
fn write_archive(path: &Path, storage: &FsTileStorage, hierarchy: &TileHierarchy) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for id in storage.find_tiles(hierarchy).unwrap() {
        let name = file_suffix(id, hierarchy).unwrap();
        let bytes = storage.read_tile(id, hierarchy).unwrap();
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(&bytes).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_tiles_from_zip_archive() {
    let (tmp, fs_storage, hierarchy, road, transit) = setup();
    let archive = tmp.path().join("tiles.zip");
    write_archive(&archive, &fs_storage, &hierarchy);

    let storage = ZipTileStorage::new(&archive);
    assert_eq!(storage.find_tiles().unwrap(), vec![road, transit]);
    assert!(storage.tile_exists(road, &hierarchy));
    assert!(!storage.tile_exists(GraphId::new(road.tile_id() + 1, 2, 0), &hierarchy));

    let tile = GraphTile::load(&storage, &hierarchy, road).unwrap();
    let edge = tile.directed_edge(0).unwrap();
    assert_eq!(tile.names(&edge).unwrap(), vec!["Market Street"]);

    let transit_tile = GraphTile::load(&storage, &hierarchy, transit).unwrap();
    assert_eq!(transit_tile.stop_one_stops().len(), 2);
    assert_eq!(transit_tile.route_one_stops()["r-dr4-l"].len(), 3);

    let (ok, stdout) = inspect(&["find", "--archive", path_str(&archive)]);
    assert!(ok);
    assert_eq!(stdout.lines().count(), 2);
}

fn inspect(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_tessera-inspect"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run tessera-inspect");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_inspect_info_and_departure() {
    let (tmp, storage, hierarchy, road, transit) = setup();
    let road_path = storage.tile_path(road, &hierarchy).unwrap();
    let transit_path = storage.tile_path(transit, &hierarchy).unwrap();

    let (ok, stdout) = inspect(&["info", "--file", path_str(&road_path), "--json"]);
    assert!(ok);
    let info: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(info["nodes"], 2);
    assert_eq!(info["directed_edges"], 2);
    assert_eq!(info["id"]["tile_id"], road.tile_id());

    let (ok, stdout) = inspect(&[
        "departure",
        "--file",
        path_str(&transit_path),
        "--line",
        "5",
        "--time",
        "25000",
        "--date",
        "2016-01-06",
    ]);
    assert!(ok);
    let departure: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(departure["trip_id"], 3);

    let (ok, stdout) = inspect(&["find", "--tile-dir", path_str(tmp.path())]);
    assert!(ok);
    assert_eq!(stdout.lines().count(), 2);

    let (ok, _) = inspect(&["node", "--file", path_str(&road_path), "--index", "9"]);
    assert!(!ok);
}
