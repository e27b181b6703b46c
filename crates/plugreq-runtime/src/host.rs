//! Replays plugins blocks against a fresh collector.

use std::sync::Arc;

use plugreq_core::{
    DependencySpec, Location, PluginDependenciesSpec, PluginId, PluginRequestCollector,
    PluginRequestError, PluginRequests, ScriptSource,
};
use tracing::{debug, info};

use crate::config::CollectorConfig;
use crate::error::{LocatedError, RuntimeResult};
use crate::manifest::{Declaration, PluginsBlock};

/// Evaluates [`PluginsBlock`]s with a fixed collector configuration.
#[derive(Debug, Clone, Default)]
pub struct BlockHost {
    config: CollectorConfig,
}

impl BlockHost {
    pub fn new(config: &CollectorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Runs every declaration of `block` and finalizes the collector.
    ///
    /// Declaration errors come back as [`LocatedError`]s at the failing
    /// declaration's line; duplicate ids come back from finalization.
    pub fn evaluate(&self, block: &PluginsBlock) -> RuntimeResult<PluginRequests> {
        let script: Arc<dyn ScriptSource> = Arc::new(block.script.clone());
        let mut collector =
            PluginRequestCollector::new(Arc::clone(&script), self.config.allow_apply_false);

        {
            let mut spec = collector.create_spec(block.block_line);
            for declaration in &block.declarations {
                let line = declaration.line.unwrap_or(block.block_line);
                self.declare(&mut spec, declaration, line).map_err(|source| {
                    debug!(
                        script = %script.display_name(),
                        line,
                        error = %source,
                        "Plugin declaration failed"
                    );
                    LocatedError::new(Location::new(script.display_name(), line), source)
                })?;
            }
        }

        let requests = collector.into_plugin_requests()?;
        info!(
            script = %script.display_name(),
            count = requests.len(),
            "Evaluated plugins block"
        );
        Ok(requests)
    }

    fn declare(
        &self,
        spec: &mut PluginDependenciesSpec<'_>,
        declaration: &Declaration,
        line: u32,
    ) -> Result<(), PluginRequestError> {
        let id = declaration.id.as_deref();
        if self.config.strict_ids
            && let Some(id) = id
        {
            PluginId::validate(id)?;
        }

        let handle = spec.id_at(id, line)?;
        let handle = match declaration.version.as_deref() {
            Some(version) => handle.version(version)?,
            None => handle,
        };
        if let Some(apply) = declaration.apply {
            handle.apply(apply)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use plugreq_core::{AllowApplyFalse, ErrorKind, NamedScriptSource};

    use super::*;
    use crate::error::RuntimeError;

    fn block(declarations: Vec<Declaration>) -> PluginsBlock {
        let mut block = PluginsBlock::new(NamedScriptSource::new("build file 'build.script'"), 1);
        block.declarations = declarations;
        block
    }

    #[test]
    fn test_evaluate_in_order() {
        let host = BlockHost::default();
        let requests = host
            .evaluate(&block(vec![
                Declaration::new("b").at_line(2),
                Declaration::new("a").version("1.0").apply(false).at_line(3),
            ]))
            .unwrap();

        let ids: Vec<_> = requests.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(requests.get(1).unwrap().version(), Some("1.0"));
        assert!(!requests.get(1).unwrap().apply());
        assert_eq!(requests.get(1).unwrap().line_number(), 3);
    }

    #[test]
    fn test_empty_block_shares_empty_sequence() {
        let requests = BlockHost::default().evaluate(&block(Vec::new())).unwrap();
        assert!(requests.ptr_eq(&PluginRequests::empty()));
    }

    #[test]
    fn test_missing_line_uses_block_line() {
        let mut block = block(vec![Declaration::new("a")]);
        block.block_line = 9;
        let requests = BlockHost::default().evaluate(&block).unwrap();
        assert_eq!(requests.get(0).unwrap().line_number(), 9);
    }

    #[test]
    fn test_declaration_error_is_located() {
        let err = BlockHost::default()
            .evaluate(&block(vec![
                Declaration::new("a").at_line(2),
                Declaration::new("b").version("").at_line(5),
            ]))
            .unwrap_err();

        let location = err.location().unwrap();
        assert_eq!(location.line_number, 5);
        assert_eq!(location.script_display_name, "build file 'build.script'");
        assert!(matches!(
            err.request_error(),
            Some(PluginRequestError::InvalidPluginVersion { .. })
        ));
        assert_eq!(
            err.to_string(),
            "build file 'build.script' line: 5: plugin version '' is invalid: cannot be null or empty"
        );
    }

    #[test]
    fn test_missing_id_is_invalid() {
        let err = BlockHost::default()
            .evaluate(&block(vec![Declaration {
                line: Some(4),
                ..Default::default()
            }]))
            .unwrap_err();
        assert!(matches!(
            err.request_error(),
            Some(PluginRequestError::InvalidPluginId { id: None, .. })
        ));
    }

    #[test]
    fn test_restricted_host_refuses_apply_false() {
        let host = BlockHost::new(&CollectorConfig {
            allow_apply_false: AllowApplyFalse::Forbidden,
            strict_ids: false,
        });

        assert!(
            host.evaluate(&block(vec![Declaration::new("a").apply(true)]))
                .is_ok()
        );

        let err = host
            .evaluate(&block(vec![Declaration::new("a").apply(false).at_line(3)]))
            .unwrap_err();
        assert_eq!(
            err.request_error().map(PluginRequestError::kind),
            Some(ErrorKind::PolicyViolation)
        );
        assert_eq!(err.location().unwrap().line_number, 3);
    }

    #[test]
    fn test_duplicate_reported_at_second_declaration() {
        let err = BlockHost::default()
            .evaluate(&block(vec![
                Declaration::new("a").at_line(1),
                Declaration::new("b").at_line(2),
                Declaration::new("b").at_line(3),
                Declaration::new("a").at_line(4),
            ]))
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Request(_)));
        assert_eq!(
            err.to_string(),
            "build file 'build.script' line: 3: plugin with id 'b' was already requested at line 2"
        );
    }

    #[test]
    fn test_strict_ids() {
        let lenient = BlockHost::default();
        assert!(
            lenient
                .evaluate(&block(vec![Declaration::new("not valid!")]))
                .is_ok()
        );

        let strict = BlockHost::new(&CollectorConfig {
            strict_ids: true,
            ..Default::default()
        });
        let err = strict
            .evaluate(&block(vec![Declaration::new("not valid!").at_line(7)]))
            .unwrap_err();
        assert_eq!(err.location().unwrap().line_number, 7);
        assert!(matches!(
            err.request_error(),
            Some(PluginRequestError::InvalidPluginId { .. })
        ));
    }
}
