pub mod clock;
pub mod play;
pub mod simulate;

pub use clock::SessionClock;
pub use play::PlayMode;
pub use simulate::{FoodSeeker, SimulateMode, SimulationSummary};
