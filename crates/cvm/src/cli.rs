use clap::{Args, Parser, Subcommand, ValueEnum};
use cvm_spider::dfp::{Layout, INDEX_URL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,

    #[command(flatten)]
    pub dirs: Dirs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the yearly DFP archives not downloaded yet.
    Fetch {
        /// Page listing the archives.
        #[arg(long, env = "CVM_INDEX_URL", default_value = INDEX_URL)]
        index_url: String,
    },

    /// Extract the archives and keep the relevant files in the unified directory.
    Unify {
        /// Replace files already in the unified directory.
        #[arg(short, long)]
        overwrite: bool,
    },

    /// Aggregate the unified files into the three statement datasets.
    Build {
        /// Only keep the first `LIMIT` entity codes.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fetch, unify and build, in turn.
    Run {
        #[arg(long, env = "CVM_INDEX_URL", default_value = INDEX_URL)]
        index_url: String,

        #[arg(short, long)]
        overwrite: bool,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Upload the reviewed (`*_checked.csv`) datasets to PostgreSQL.
    Load,

    /// Print the fixed chart of accounts of some entities, a column per fiscal year, as JSON.
    Pivot {
        /// Entity codes (CD_CVM).
        #[arg(short, long, num_args = 1.., value_delimiter = ',', required = true)]
        codes: Vec<i32>,

        /// Table to read from.
        #[arg(long, default_value = "balance_sheets")]
        table: String,
    },

    /// List every entity code loaded.
    Codes,

    /// Print the company name of an entity code.
    Name {
        code: i32,
    },
}

/// Working directories of the pipeline.
#[derive(Args, Debug)]
pub struct Dirs {
    /// Downloaded archives; deleted once unified.
    #[arg(long, global = true, default_value = "cvm_zip_files")]
    pub zip_dir: PathBuf,

    /// Extraction scratch area; deleted once unified.
    #[arg(long, global = true, default_value = "temp_csv_files")]
    pub temp_dir: PathBuf,

    #[arg(long, global = true, default_value = "unified_cvm_data")]
    pub unified_dir: PathBuf,

    /// Where datasets are written, and reviewed datasets read from.
    #[arg(long, global = true, default_value = ".")]
    pub dataset_dir: PathBuf,
}

impl From<Dirs> for Layout {
    fn from(dirs: Dirs) -> Self {
        Layout {
            zip_dir: dirs.zip_dir,
            temp_dir: dirs.temp_dir,
            unified_dir: dirs.unified_dir,
            dataset_dir: dirs.dataset_dir,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
