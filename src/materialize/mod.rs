/// Row → column materialization
pub mod column_buffer;
mod convert;
pub mod materializer;

pub use column_buffer::ColumnBuffer;
pub use materializer::materialize;
