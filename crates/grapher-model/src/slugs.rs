//! Well-known column slugs.

use crate::ColumnTypeName;

pub const ENTITY_NAME: &str = "entityName";
pub const ENTITY_ID: &str = "entityId";
pub const ENTITY_CODE: &str = "entityCode";
pub const YEAR: &str = "year";
pub const DAY: &str = "day";
pub const TIME: &str = "time";
pub const COLOR: &str = "color";

/// Time slugs in the order a table prefers them.
pub const TIME_SLUGS: [&str; 3] = [DAY, YEAR, TIME];

/// Suffix of the column that records where an interpolated value came from.
pub const ORIGINAL_TIME_SUFFIX: &str = "-originalTime";

/// Type assigned to a well-known slug without sampling its values.
pub fn type_for_known_slug(slug: &str) -> Option<ColumnTypeName> {
    match slug {
        ENTITY_NAME => Some(ColumnTypeName::EntityName),
        ENTITY_ID => Some(ColumnTypeName::EntityId),
        ENTITY_CODE => Some(ColumnTypeName::EntityCode),
        YEAR => Some(ColumnTypeName::Year),
        DAY => Some(ColumnTypeName::Day),
        TIME => Some(ColumnTypeName::Time),
        COLOR => Some(ColumnTypeName::Color),
        _ => None,
    }
}

pub fn original_time_slug(slug: &str) -> String {
    format!("{slug}{ORIGINAL_TIME_SUFFIX}")
}
