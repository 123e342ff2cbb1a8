//! Plot script assembly

use crate::data::write_data_block;
use mosql_core::{PlotConfig, RowSet};
use std::path::Path;

/// Canvas and default settings written ahead of the user script
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub box_width: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self::from(&PlotConfig::default())
    }
}

impl From<&PlotConfig> for PlotSettings {
    fn from(config: &PlotConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            box_width: config.box_width,
        }
    }
}

/// Full script: data block, defaults, then the user script verbatim
///
/// The defaults come first so the user script can override them.
pub fn assemble_script(
    rows: &RowSet,
    svg_path: &Path,
    user_script: &str,
    settings: &PlotSettings,
) -> String {
    let mut script = String::new();
    write_data_block(rows, &mut script);

    script.push_str(&format!("set term svg size {},{}\n", settings.width, settings.height));
    script.push_str(&format!("set output '{}'\n", quote_path(svg_path)));
    script.push_str(&format!("set boxwidth {}\n", settings.box_width));
    script.push_str(user_script);

    script
}

/// Single quotes are doubled inside a single-quoted string
fn quote_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}
