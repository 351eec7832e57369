mod merge;
mod schema;

pub use merge::{MergedData, merge_datasets};
pub use schema::{DataError, RawDataset, RawEdge, RawNode, parse_dataset, parse_dataset_batch};
