mod bundle;
mod calculation;
mod common;
