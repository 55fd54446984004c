pub mod clock;
pub mod coordinator;
pub mod engine;
pub mod layout;

#[cfg(test)]
mod testing;

pub use clock::{ClockFace, ClockRefresh};
pub use coordinator::{Collaborators, DisplayCoordinator, DisplayState, WEATHER_LOCKSCREEN_UNIT};
pub use engine::{AmbientSong, EventPriorityEngine, QuickEvent, DEVICE_INTRO_COMPLETED};
pub use layout::{
    DoubleLine, Icon, LayoutContent, LayoutKind, LayoutRenderer, SingleLine, WeatherReadout,
};
