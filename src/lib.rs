// Regium - RGB lighting control for Royal Kludge keyboards
// Keyboard profiles, device detection and udev rules

pub mod color;
pub mod devices;
pub mod profile;
pub mod udev;

pub use color::{parse_color, ColorParseError, NAMED_COLORS};
pub use devices::{detect_keyboards, open_keyboard, DetectedKeyboard};
pub use profile::{JsonProfile, LoadError, ProfileRegistry};
