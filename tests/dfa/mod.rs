mod api;
mod properties;
mod suite;
