//! CLI definition using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use countermax_types::OutputFormat;

#[derive(Parser)]
#[command(name = "countermax")]
#[command(author = "accuroad")]
#[command(version)]
#[command(about = "Traffic survey counter configuration")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data root override for this run
    #[arg(long, global = true)]
    pub data_root: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config(ConfigArgs),

    /// Vehicle-type catalogs and their shortcut sheets
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Survey tasks
    #[command(subcommand)]
    Survey(SurveyCommand),

    /// Time table of a survey
    #[command(subcommand)]
    Time(TimeCommand),

    /// Sites of a survey and their counter configuration
    #[command(subcommand)]
    Site(SiteCommand),

    /// Operator accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Task files (.dat)
    #[command(subcommand)]
    Dat(DatCommand),

    /// Write hotkeys_db.json now
    ExportHotkeys,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Set data root folder
    #[arg(long)]
    pub set_data_root: Option<PathBuf>,

    /// Set default output format
    #[arg(long)]
    pub set_output: Option<OutputFormat>,

    /// Set direction pool size for new sites
    #[arg(long)]
    pub set_direction_count: Option<u32>,

    /// Set default slot length in minutes
    #[arg(long)]
    pub set_step: Option<u32>,

    /// Set default first slot start (HH:MM)
    #[arg(long)]
    pub set_start: Option<String>,

    /// Set default last slot end (HH:MM)
    #[arg(long)]
    pub set_end: Option<String>,

    /// Set default operator id for task files
    #[arg(long)]
    pub set_operator: Option<String>,

    /// Enable/disable the hotkeys_db.json export on save
    #[arg(long)]
    pub set_export_hotkeys: Option<bool>,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List catalogs
    List,
    /// Add a catalog
    Add {
        name: String,
        /// Vehicle types, comma separated (e.g. "승용,버스,화물")
        #[arg(long, value_delimiter = ',')]
        vehicle_types: Vec<String>,
    },
    Rename {
        name: String,
        new_name: String,
    },
    /// Delete a catalog; sites linked to it lose that link
    Delete { name: String },
    /// Replace the vehicle-type list
    SetTypes {
        name: String,
        #[arg(value_delimiter = ',')]
        vehicle_types: Vec<String>,
    },
    /// List shortcut sheets, or one sheet's items
    Sheets {
        name: String,
        #[arg(long)]
        sheet: Option<String>,
    },
    AddSheet { name: String },
    RenameSheet {
        name: String,
        sheet: String,
        new_name: String,
    },
    /// Delete a sheet and renumber the numeric sheet names
    DeleteSheet { name: String, sheet: String },
    /// Set the shortcut key of one vehicle type on a sheet
    SetKey {
        name: String,
        sheet: String,
        vehicle_type: String,
        key: String,
    },
    /// Clear every shortcut of a sheet
    ResetKeys { name: String, sheet: String },
    /// Counter templates of a catalog
    #[command(subcommand)]
    Template(TemplateCommand),
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    List { name: String },
    Add { name: String, template: String },
    Rename {
        name: String,
        template: String,
        new_name: String,
    },
    Delete { name: String, template: String },
    /// Group template directions (e.g. "1,2")
    Group {
        name: String,
        template: String,
        directions: String,
        /// Direction pool size. Uses config value if not specified.
        #[arg(long)]
        total: Option<u32>,
    },
    Ungroup {
        name: String,
        template: String,
        group: String,
    },
    /// Append a counter row bound to direction 1
    AddCounter { name: String, template: String },
    /// Replace the counter rows ("1=좌회전" or "1=좌회전:좌")
    SetCounters {
        name: String,
        template: String,
        #[arg(required = true)]
        rows: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SurveyCommand {
    List,
    /// Create a survey with a fresh SN
    Add {
        #[arg(default_value = "")]
        name: String,
    },
    /// Copy a survey; copied sites get new work order ids
    Duplicate { sn: String },
    Delete { sn: String },
    /// Set the state (대기, 진행, 완료)
    State { sn: String, state: String },
    /// Fill the survey's vehicle rows from a catalog
    CopyVehicles { sn: String, catalog: String },
}

#[derive(Subcommand)]
pub enum TimeCommand {
    /// Add a range; a range already added is skipped
    AddRange {
        sn: String,
        start: String,
        end: String,
        #[arg(long)]
        step: Option<u32>,
    },
    /// Append slots for a range (defaults from config)
    Generate {
        sn: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        step: Option<u32>,
    },
    List { sn: String },
    /// Delete slots by number
    Delete {
        sn: String,
        #[arg(value_delimiter = ',', required = true)]
        rows: Vec<usize>,
    },
    /// Clear all slots
    Reset { sn: String },
}

#[derive(Subcommand)]
pub enum SiteCommand {
    List { sn: String },
    Add {
        sn: String,
        #[arg(long, default_value = "")]
        name: String,
        /// Direction pool size. Uses config value if not specified.
        #[arg(long)]
        directions: Option<u32>,
    },
    /// Delete sites by 순번
    Delete {
        sn: String,
        #[arg(value_delimiter = ',', required = true)]
        sites: Vec<usize>,
    },
    Move {
        sn: String,
        site: usize,
        #[arg(long, conflicts_with_all = ["down", "top"])]
        up: bool,
        #[arg(long, conflicts_with = "top")]
        down: bool,
        #[arg(long)]
        top: bool,
    },
    /// Set the direction pool size
    Directions { sn: String, site: usize, total: u32 },
    /// Group directions (e.g. "1,2")
    Group {
        sn: String,
        site: usize,
        directions: String,
    },
    Ungroup {
        sn: String,
        site: usize,
        group: String,
    },
    /// Append a counter row bound to direction 1
    AddCounter { sn: String, site: usize },
    /// Delete a counter row by number
    DeleteCounter { sn: String, site: usize, row: usize },
    ApplyTemplate {
        sn: String,
        site: usize,
        catalog: String,
        template: String,
    },
    /// Bind sheets to a group's directions ("1=좌회전")
    AssignSheets {
        sn: String,
        site: usize,
        group: String,
        #[arg(required = true)]
        assignments: Vec<String>,
        /// Catalog to take the sheets from. Uses the group's default if not specified.
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Show which sheet governs each direction
    Resolve {
        sn: String,
        site: usize,
        /// Record catalogs found by the global search
        #[arg(long)]
        persist: bool,
    },
    /// Show the zero-filled schedule sheets
    Preview {
        sn: String,
        site: usize,
        /// Also write them to a .xlsx or .csv file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
    Add {
        id: String,
        name: String,
        #[arg(long)]
        admin: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum DatCommand {
    /// Write an empty task file for a site
    Write {
        sn: String,
        site: usize,
        /// Operator id. Uses config value if not specified.
        #[arg(long)]
        user: Option<String>,
        /// Record date (YYYY-MM-DD), today if not specified
        #[arg(long)]
        date: Option<String>,
    },
    List { sn: String },
    Show { sn: String, doc_no: String },
}
