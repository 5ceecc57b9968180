// Models module - contains users, diagrams, generation requests, and enums

pub mod diagram;
pub mod enums;
pub mod generation;
pub mod user;

pub use diagram::{Diagram, NewDiagram};
pub use enums::{ChartType, DiagramFamily};
pub use generation::{GenerationRequest, GenerationResult};
pub use user::{NewUser, User};
