pub mod gzip_utils;
