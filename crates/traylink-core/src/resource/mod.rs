mod resource_id;
mod resource_kind;
mod resource_table;

pub use {
    resource_id::ResourceId, resource_kind::ResourceKind, resource_table::ResourceTable,
};
