pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use error::{PipelineError, PipelineResult};
pub use io::{RenderedTable, parse_records_file, parse_records_json, render_csv, render_json};
pub use models::{Address, Record, Table, TableRow, extract_address};
pub use pipeline::{PipelineConfig, PipelineOutput, PipelineStats, run_pipeline};
pub use stages::{
    FilterConfig, filter_records, flatten_companies, merge_rows, normalize_companies,
    repair_record_keys, sort_table,
};
