pub use self::{geosniff::*, wtp::*};

mod geosniff;
mod play;
mod wtp;
