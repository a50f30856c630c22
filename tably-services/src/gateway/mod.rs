mod metadata;

pub use metadata::MetadataGateway;
