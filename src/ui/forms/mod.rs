//! Form rendering module
//!
//! - `field_renderer`: draws one rendered field per input kind
//! - `sector_form`: the sector survey form and its action panel

mod field_renderer;
mod sector_form;

pub use field_renderer::draw_field;
pub use sector_form::draw as draw_sector_form;
