//! `waymark map`: print the redirect map.

use std::io::{self, Write};

use anyhow::Result;
use serde_json::{Map, Value as JsonValue};

use super::common::Site;
use crate::config::SiteConfig;
use crate::redirect::quote_for_map;
use crate::utils::plural_count;
use crate::debug;

pub fn print_map(config: SiteConfig, json: bool) -> Result<()> {
    let site = Site::load(config)?;
    let entries = site.plugin.iter_redirect_map(&site.pad);
    debug!("map"; "{}", plural_count(entries.len(), "redirect"));

    let output = if json {
        let mut formatted = serde_json::to_string_pretty(&format_json(&entries))?;
        formatted.push('\n');
        formatted
    } else {
        format_nginx(&entries)
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// `[{"from": .., "to": ..}, ..]` in map order.
fn format_json(entries: &[(String, String)]) -> JsonValue {
    let items = entries
        .iter()
        .map(|(from, to)| {
            let mut obj = Map::new();
            obj.insert("from".to_string(), JsonValue::String(from.clone()));
            obj.insert("to".to_string(), JsonValue::String(to.clone()));
            JsonValue::Object(obj)
        })
        .collect();
    JsonValue::Array(items)
}

fn format_nginx(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(from, to)| format!("{} {};\n", quote_for_map(from), quote_for_map(to)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(String, String)> {
        vec![
            ("/details/".into(), "/about/more-detail/".into()),
            ("/old page/".into(), "/new/".into()),
        ]
    }

    #[test]
    fn test_format_nginx_quotes() {
        assert_eq!(
            format_nginx(&entries()),
            "/details/ /about/more-detail/;\n\"/old page/\" /new/;\n"
        );
    }

    #[test]
    fn test_format_json_keeps_order() {
        let json = format_json(&entries());
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            r#"[{"from":"/details/","to":"/about/more-detail/"},{"from":"/old page/","to":"/new/"}]"#
        );
    }
}
