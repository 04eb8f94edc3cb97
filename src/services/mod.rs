pub mod catalog;
pub mod converter;
pub mod example;
pub mod export;
pub mod parameter_import;
pub mod query_tools;
pub mod tree;

pub use catalog::{
    ApiDetail, ApiExample, ApiSummary, CatalogService, ExportEntry, GroupApis, GroupOverview,
    GroupRef, GroupSummary, SearchHit, SearchResult, SEARCH_LIMIT,
};
pub use converter::{derive_parameters, ARRAY_ITEM_NAME};
pub use example::generate_example;
pub use export::{render_html, Locale};
pub use parameter_import::{ImportSummary, ParameterImporter};
pub use query_tools::{run_tool, QueryTool};
pub use tree::{build_tree, flatten};
