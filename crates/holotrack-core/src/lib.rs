pub mod background;
pub mod compute;
pub mod consts;
pub mod detection;
pub mod error;
pub mod filters;
pub mod focus;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod propagate;
pub mod track;
