//! Domain services

pub mod catalog_ops;
pub mod direction_groups;
pub mod hotkey_registry;
pub mod identifiers;
pub mod schedule_builder;
pub mod sheet_resolver;
pub mod site_config;
pub mod time_segmenter;
pub mod users;

pub use direction_groups::DirectionGroupResolver;
pub use identifiers::IdGenerator;
pub use schedule_builder::{build_schedule, ColumnSource, DirectionPane, ScheduleRow};
pub use sheet_resolver::{
    persist_discovered_association, resolve, resolve_direction, DiscoveredAssociation,
    ResolutionStep, ResolveContext, SheetResolution,
};
pub use time_segmenter::{segment, RangeOutcome, TimeTable};
