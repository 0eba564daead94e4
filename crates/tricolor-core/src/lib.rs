pub mod align;
pub mod background;
pub mod channel;
pub mod compute;
pub mod consts;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scale;
