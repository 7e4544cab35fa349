mod impls;
mod track_acquisition;
mod traits;
mod types;


pub(crate) use track_acquisition::*;
pub(crate) use traits::*;
pub(crate) use types::*;
