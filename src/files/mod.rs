pub mod report;
pub mod resources;
pub mod stream;
#[cfg(test)]
pub(crate) mod testing;

pub use report::export_report;
pub use resources::{FsResources, ResourceProvider};
pub use stream::{LineReader, LineWriter};
