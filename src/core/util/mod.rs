pub mod format_util;
