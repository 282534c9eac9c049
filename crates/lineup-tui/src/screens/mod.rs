//! Screen implementations. Each screen is a top-level Component.

pub mod lines;
pub mod queue;

use crate::component::Component;
use crate::screen::ScreenId;

/// Build every screen, keyed by its id.
pub fn create_screens(activation_distance: f64) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Lines, Box::new(lines::LinesScreen::new())),
        (
            ScreenId::Queue,
            Box::new(queue::QueueScreen::new(activation_distance)),
        ),
    ]
}
