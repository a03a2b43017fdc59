mod aggregate_id;
mod entity_metadata;

pub(crate) use aggregate_id::uuid_id;
pub use aggregate_id::AggregateId;
pub use entity_metadata::EntityMetadata;
