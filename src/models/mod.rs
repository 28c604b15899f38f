//! Timetabling domain models.
//!
//! Input records arrive already parsed and typed; this module only
//! defines their shape. The search engine indexes them once in
//! [`crate::ga::TimetableProblem`].
//!
//! # Entities
//!
//! | Model | Role |
//! |-------|------|
//! | Course | Expands into `lectures_per_week` sessions |
//! | Teacher | Qualifications, availability, preferences |
//! | Group | Students that cannot be in two places at once |
//! | Room | Capacity-limited location |
//! | Timeslot | Opaque `<day>_<period>` identifier |
//! | Timetable | Output: one record per session |

mod course;
mod group;
mod room;
mod teacher;
mod timeslot;
mod timetable;

pub use course::Course;
pub use group::Group;
pub use room::Room;
pub use teacher::Teacher;
pub use timeslot::Timeslot;
pub use timetable::{ScheduledSession, Timetable};
