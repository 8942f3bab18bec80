// package together all of the following and re-export
// in a partially flattened structure :
// : solver status and sort rules
// : user settings and errors
// : the restarted Lanczos engine and its Ritz value hook
// : progress information and printing

pub mod traits;

mod error;
mod info;
mod info_print;
mod lanczos;
mod ritz;
mod rng;
mod settings;
mod status;
mod symeigs;

pub use error::*;
pub use info::*;
pub use ritz::{NoTransform, RitzValueTransform, ShiftInvertTransform};
pub use settings::*;
pub use status::*;
pub use symeigs::*;
