//! CLI commands for tessera-inspect

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use tessera_tile::formats::{access, TileHeader};
use tessera_tile::{
    Config, DepartureFilter, FsTileStorage, GraphId, GraphTile, ServiceDay, TileHierarchy,
    ZipTileStorage,
};

#[derive(Parser)]
#[command(name = "tessera-inspect")]
#[command(about = "Inspect routing graph tiles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print header counts, size and bounding box of a tile file
    Info {
        /// Tile file (.gph)
        #[arg(short, long)]
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print one node record
    Node {
        #[arg(short, long)]
        file: PathBuf,

        /// Node ordinal within the tile
        #[arg(short, long)]
        index: u32,
    },

    /// Print one directed edge with its names and shape
    Edge {
        #[arg(short, long)]
        file: PathBuf,

        /// Directed edge ordinal within the tile
        #[arg(short, long)]
        index: u32,
    },

    /// List the signs of a directed edge
    Signs {
        #[arg(short, long)]
        file: PathBuf,

        /// Directed edge ordinal
        #[arg(short, long)]
        edge: u32,
    },

    /// List the access restrictions of a directed edge
    Restrictions {
        #[arg(short, long)]
        file: PathBuf,

        /// Directed edge ordinal
        #[arg(short, long)]
        edge: u32,

        /// Access mode mask (auto=1, pedestrian=2, bicycle=4, truck=8, ...)
        #[arg(short, long, default_value_t = access::ALL)]
        modes: u16,
    },

    /// Find the next departure of a transit line
    Departure {
        #[arg(short, long)]
        file: PathBuf,

        /// Line id
        #[arg(short, long)]
        line: u32,

        /// Seconds from local midnight
        #[arg(short, long)]
        time: u32,

        /// Service date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Only wheelchair accessible departures
        #[arg(long)]
        wheelchair: bool,

        /// Only departures that carry bicycles
        #[arg(long)]
        bicycle: bool,
    },

    /// List the tiles found under a tile directory
    Find {
        /// TOML config with a [tiles] tile_dir entry
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tile directory, overrides the config file
        #[arg(long)]
        tile_dir: Option<PathBuf>,

        /// Zip archive of tiles, overrides both of the above
        #[arg(long)]
        archive: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TileSummary {
    id: GraphId,
    size: usize,
    date_created: u32,
    nodes: u32,
    directed_edges: u32,
    access_restrictions: u32,
    departures: u32,
    stops: u32,
    routes: u32,
    schedules: u32,
    signs: u32,
    admins: u32,
    edge_bins: u32,
    edge_info_bytes: usize,
    text_bytes: usize,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    bounding_box: Option<[f64; 4]>,
}

impl TileSummary {
    fn new(tile: &GraphTile, hierarchy: &TileHierarchy) -> Self {
        let h = tile.header();
        Self {
            id: tile.id(),
            size: tile.size(),
            date_created: h.date_created,
            nodes: h.node_count,
            directed_edges: h.directed_edge_count,
            access_restrictions: h.access_restriction_count,
            departures: h.departure_count,
            stops: h.stop_count,
            routes: h.route_count,
            schedules: h.schedule_count,
            signs: h.sign_count,
            admins: h.admin_count,
            edge_bins: h.edge_bin_count(),
            edge_info_bytes: tile.layout().edge_info.len(),
            text_bytes: tile.layout().text.len(),
            bounding_box: tile
                .bounding_box(hierarchy)
                .map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
        }
    }
}

/// Load a tile file on its own, taking its id from the header
fn open_tile(path: &Path) -> Result<GraphTile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    let id = TileHeader::decode(&bytes).map_or(GraphId::INVALID, |h| h.graph_id);
    GraphTile::from_bytes(id, bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let hierarchy = TileHierarchy::default();

        match self.command {
            Commands::Info { file, json } => {
                let tile = open_tile(&file)?;
                let summary = TileSummary::new(&tile, &hierarchy);
                if json {
                    return print_json(&summary);
                }
                println!("Tile {} ({} bytes)", summary.id, summary.size);
                println!("  nodes:               {}", summary.nodes);
                println!("  directed edges:      {}", summary.directed_edges);
                println!("  access restrictions: {}", summary.access_restrictions);
                println!("  signs:               {}", summary.signs);
                println!("  admins:              {}", summary.admins);
                println!("  edge bin entries:    {}", summary.edge_bins);
                println!(
                    "  transit:             {} departures, {} stops, {} routes, {} schedules",
                    summary.departures, summary.stops, summary.routes, summary.schedules
                );
                println!("  edge info:           {} bytes", summary.edge_info_bytes);
                println!("  text:                {} bytes", summary.text_bytes);
                if let Some([min_lon, min_lat, max_lon, max_lat]) = summary.bounding_box {
                    println!("  bbox:                {min_lon},{min_lat} -> {max_lon},{max_lat}");
                }
                Ok(())
            }

            Commands::Node { file, index } => {
                let tile = open_tile(&file)?;
                print_json(&tile.node(index)?)
            }

            Commands::Edge { file, index } => {
                #[derive(Serialize)]
                struct EdgeReport<'a> {
                    id: GraphId,
                    edge: tessera_tile::formats::DirectedEdge,
                    info: tessera_tile::formats::EdgeInfoSummary,
                    names: Vec<&'a str>,
                }

                let tile = open_tile(&file)?;
                let edge = tile.directed_edge(index)?;
                let info = tile.edge_info(&edge)?;
                print_json(&EdgeReport {
                    id: tile.id().with_id(index as u64),
                    edge,
                    info: info.summary()?,
                    names: info.names()?,
                })
            }

            Commands::Signs { file, edge } => {
                let tile = open_tile(&file)?;
                print_json(&tile.signs(edge)?)
            }

            Commands::Restrictions { file, edge, modes } => {
                let tile = open_tile(&file)?;
                print_json(&tile.access_restrictions(edge, modes))
            }

            Commands::Departure {
                file,
                line,
                time,
                date,
                wheelchair,
                bicycle,
            } => {
                let tile = open_tile(&file)?;
                let service_day = ServiceDay::for_date(tile.header().date_created, date);
                let filter = DepartureFilter { wheelchair, bicycle };
                match tile.next_departure(line, time, &service_day, filter)? {
                    Some(departure) => print_json(&departure),
                    None => {
                        println!("No departure for line {line} after {time}s on {date}");
                        Ok(())
                    }
                }
            }

            Commands::Find {
                config,
                tile_dir,
                archive,
            } => {
                if let Some(path) = archive {
                    let tiles = ZipTileStorage::new(&path)
                        .find_tiles()
                        .with_context(|| format!("Failed to scan {}", path.display()))?;
                    for id in &tiles {
                        println!("{id}");
                    }
                    tracing::info!(count = tiles.len(), archive = %path.display(), "found tiles");
                    return Ok(());
                }
                let storage = match (tile_dir, config) {
                    (Some(dir), _) => FsTileStorage::new(dir),
                    (None, Some(path)) => Config::from_file(&path)
                        .with_context(|| format!("Failed to load config {}", path.display()))?
                        .storage(),
                    (None, None) => bail!("one of --config, --tile-dir or --archive is required"),
                };
                let tiles = storage.find_tiles(&hierarchy).with_context(|| {
                    format!("Failed to scan {}", storage.tile_dir().display())
                })?;
                for id in &tiles {
                    println!("{id}");
                }
                tracing::info!(count = tiles.len(), dir = %storage.tile_dir().display(), "found tiles");
                Ok(())
            }
        }
    }
}
