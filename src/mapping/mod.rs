/// Schema mapping: driver column metadata → Arrow schema
pub mod logical_type;
pub mod type_mapper;

pub use logical_type::{ColumnDescriptor, ColumnarSchema, LogicalType};
pub use type_mapper::TypeMapper;
