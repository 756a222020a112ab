//! Domain model types

pub mod catalog;
pub mod config_tree;
pub mod group;
pub mod lenient;
pub mod site;
pub mod survey;
pub mod task_record;
pub mod template;
pub mod user;

pub use catalog::{Catalog, HotkeyItem, HotkeySheet, VehicleType};
pub use config_tree::ConfigTree;
pub use group::DirectionGroup;
pub use site::Site;
pub use survey::{Survey, SurveyInfo, SurveyState, SurveyVehicle, TimeRange, TimeSlot};
pub use task_record::{coerce_count, CountMatrix, TaskDocument, TaskRecord};
pub use template::{CounterRow, Template};
pub use user::{User, UserRole, UserStatus};
