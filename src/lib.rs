//! Genetic-algorithm course timetabling.
//!
//! Assigns every weekly lecture of every course a timeslot, a room and a
//! teacher, avoiding double bookings, undersized rooms and unqualified
//! teachers, while honouring teacher availability and preferences.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Teacher`, `Group`, `Room`,
//!   `Timeslot`, and the output `Timetable`
//! - **`ga`**: Problem indexing, chromosome encoding, fitness, genetic
//!   operators, repair, and the generational `GaRunner`
//! - **`validation`**: Input integrity checks and post-hoc clash verification
//! - **`kpi`**: Workload, day-wise load and overlap metrics
//! - **`error`**: Configuration and run errors
//!
//! # Quick start
//!
//! ```
//! use u_timetable::ga::{GaConfig, GaRunner, TimetableProblem};
//! use u_timetable::models::{Course, Group, Room, Teacher, Timeslot};
//! use u_timetable::validation::verify_timetable;
//!
//! let courses = [
//!     Course::new("CS101", "G1").with_lectures(2).with_size(30),
//!     Course::new("MA201", "G1").with_lectures(1).with_size(30),
//! ];
//! let teachers = [
//!     Teacher::new("T1").with_qualifications(["CS101"]),
//!     Teacher::new("T2").with_qualifications(["MA201"]),
//! ];
//! let groups = [Group::new("G1", 30)];
//! let rooms = [Room::new("R1", 40)];
//! let timeslots = ["Mon_09:00", "Mon_10:00", "Tue_09:00"].map(Timeslot::new);
//!
//! let problem = TimetableProblem::new(&courses, &teachers, &groups, &rooms, &timeslots)?;
//! let config = GaConfig::default().with_seed(7).with_max_generations(100);
//! let result = GaRunner::run(&problem, &config)?;
//!
//! let timetable = result.timetable(&problem);
//! assert_eq!(timetable.session_count(), 3);
//! assert!(verify_timetable(&timetable).is_clash_free());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod error;
pub mod ga;
pub mod kpi;
pub mod models;
pub mod validation;
