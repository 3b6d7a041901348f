//! Reusable UI components

mod converted_list;
mod converter_view;
mod header;
mod status_bar;

pub use converter_view::ConverterView;
