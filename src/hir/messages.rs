//! Message catalog for diagnostics.
//!
//! Messages are `key=value` lines in a properties resource. Values may
//! contain positional placeholders `{0}`, `{1}`, ...

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

const BUNDLED: &str = include_str!("messages.properties");

static BUNDLED_CATALOG: Lazy<MessageCatalog> = Lazy::new(|| MessageCatalog::parse(BUNDLED));

/// Localized message texts keyed by message key.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: FxHashMap<SmolStr, String>,
}

impl MessageCatalog {
    /// The catalog shipped with the crate.
    pub fn bundled() -> &'static MessageCatalog {
        &BUNDLED_CATALOG
    }

    /// Parse a properties file. Blank lines and lines starting with `#` or
    /// `!` are ignored; the first `=` or `:` separates key and value.
    pub fn parse(source: &str) -> Self {
        let messages = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let split = line.find(['=', ':'])?;
                let key = line[..split].trim();
                let value = line[split + 1..].trim();
                Some((SmolStr::new(key), value.to_string()))
            })
            .collect();
        Self { messages }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Message for `key` with placeholders replaced by `args`.
    ///
    /// An unknown key renders as the key itself. Placeholders without a
    /// matching argument are left as written.
    pub fn format(&self, key: &str, args: &[String]) -> String {
        let Some(template) = self.get(key) else {
            return key.to_string();
        };
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let arg = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((args.get(index)?, close))
            });
            match arg {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
