//! Unicode display-width utilities.

mod width;

pub use width::{
    WidthMethod, char_width, column_span, column_to_index, display_width_char_with_method,
    location_to_index, str_column_span,
};
