mod common;
mod footprint;
mod scope3;
