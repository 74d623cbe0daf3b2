//! CSV reading utilities.

mod reader;

pub use reader::{
    MAX_SOURCE_FILE_SIZE, check_file_size, check_file_size_with_limit, decode_text,
    read_csv_rows, validate_encoding,
};
