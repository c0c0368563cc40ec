//! Site header: state machine, layout, and styles.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`state`] | Search/suggestion flags and the mount lifecycle |
//! | [`layout`] | Pure widget selection from device, session, and flags |
//! | [`color`] | RGBA colors with HSL lightness adjustments |
//! | [`styles`] | Header variables and CSS classes from design tokens |

pub mod color;
pub mod layout;
pub mod state;
pub mod styles;

pub use color::Color;
pub use layout::{layout, Device, HeaderLayout, HeaderProps, UserSession, Widget, GUEST_ID};
pub use state::{HeaderController, HeaderState, Pages, PreloadablePage, ScrollOffset, HEADER_HEIGHT};
pub use styles::{stylesheet, GlobalVariables, HeaderClasses, HeaderVariables};
