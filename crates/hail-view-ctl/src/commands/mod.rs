//! Command handlers for `hail-view-ctl`.

pub(crate) mod extension;
pub(crate) mod pack;
pub(crate) mod render;
pub(crate) mod template;

pub(crate) use extension::handle_extension_command;
pub(crate) use pack::handle_pack_command;
pub(crate) use render::handle_render_command;
pub(crate) use template::handle_template_command;

use std::collections::HashMap;

/// Parse repeated `key=value` arguments. Later keys win.
pub(crate) fn parse_params(params: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("invalid parameter format: '{param}'. Expected key=value")
            })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
