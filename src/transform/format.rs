//! Whole-payload transform, applied once after fragment concatenation.

use super::strip_whitespace;
use crate::config::{AssetKind, CompilerConfig, SourceFormat};
use crate::env::CompilerEnv;
use crate::error::{CompilerError, TransformError};

/// Compile, strip or minify the combined payload.
///
/// The dev-mode flag is read fresh here on every compile: dev mode keeps
/// styles verbose and always short-circuits JS minification, regardless of
/// the config's minify flag.
pub fn format_content(
    content: &str,
    config: &CompilerConfig,
    env: &CompilerEnv,
) -> Result<String, CompilerError> {
    let dev_mode = env.dev_mode.is_dev_mode();

    match config.kind {
        AssetKind::Style => {
            let compiled = if config.format == SourceFormat::Less {
                let less = env.less.as_deref().ok_or_else(|| {
                    TransformError("no LESS compiler registered for a LESS config".to_string())
                })?;
                less.compile(content)?
            } else {
                content.to_string()
            };

            if dev_mode {
                Ok(compiled)
            } else {
                Ok(strip_whitespace(&compiled))
            }
        }
        AssetKind::Script => {
            if !dev_mode && config.minify_js {
                Ok(env.js_minifier.minify(content)?)
            } else {
                Ok(content.to_string())
            }
        }
    }
}
