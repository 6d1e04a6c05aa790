//! Parsing of raw `Cookie` request header strings pasted by users.

use super::NewCookie;

/// Parse `name1=value1; name2=value2` into cookies ready for storage.
///
/// Pairs without `=` are skipped. Values may themselves contain `=`; only the
/// first one splits.
pub fn parse_cookie_header(header: &str) -> Vec<NewCookie> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| NewCookie::new(name.trim(), value.trim()))
        .collect()
}
