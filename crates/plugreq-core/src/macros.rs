// ─── plugins! ─────────────────────────────────────────────────────────────────

/// Evaluates a plugins block against a collector.
///
/// Expands to a `Result<(), PluginRequestError>`.  The first failing
/// declaration aborts the rest of the block, exactly as a script would.
///
/// # Syntax
///
/// ```rust,ignore
/// use plugreq_core::plugins;
///
/// plugins!(collector => {
///     id("org.example.base");
///     id("org.example.greeting").version("1.2").apply(false);
///     id("org.example.pinned", 42).version("3.0");
/// })?;
/// ```
///
/// `id(name)` is recorded at the line of the `plugins!` invocation, which
/// plays the role of the block line.  `id(name, line)` records an explicit
/// line.  Chained calls are any [`DependencySpec`](crate::DependencySpec)
/// methods.
#[macro_export]
macro_rules! plugins {
    // End of block
    (@decl $spec:ident;) => {};

    // id(name, line).method(arg)...;
    (@decl $spec:ident;
        id ( $name:expr, $line:expr ) $( . $method:ident ( $arg:expr ) )* ;
        $($rest:tt)*
    ) => {
        let _ = $spec.id_at($name, $line)? $( .$method($arg)? )*;
        $crate::plugins!(@decl $spec; $($rest)*);
    };

    // id(name).method(arg)...;
    (@decl $spec:ident;
        id ( $name:expr ) $( . $method:ident ( $arg:expr ) )* ;
        $($rest:tt)*
    ) => {
        let _ = $spec.id($name)? $( .$method($arg)? )*;
        $crate::plugins!(@decl $spec; $($rest)*);
    };

    ($collector:expr => { $($body:tt)* }) => {
        (|| -> ::std::result::Result<(), $crate::PluginRequestError> {
            #[allow(unused_imports)]
            use $crate::DependencySpec as _;
            #[allow(unused_mut, unused_variables)]
            let mut spec = $collector.create_spec(::std::line!());
            $crate::plugins!(@decl spec; $($body)*);
            ::std::result::Result::Ok(())
        })()
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{AllowApplyFalse, NamedScriptSource, PluginRequestCollector, PluginRequestError};

    fn collector(allow_apply_false: AllowApplyFalse) -> PluginRequestCollector {
        PluginRequestCollector::new(Arc::new(NamedScriptSource::new("inline")), allow_apply_false)
    }

    #[test]
    fn test_block_collects_in_order() {
        let mut collector = collector(AllowApplyFalse::Allowed);
        let block_line = line!() + 1;
        let result = plugins!(collector => {
            id("a");
            id("b").version("2.0").apply(false);
            id("c", 99).version("3.0");
        });
        result.unwrap();

        let requests = collector.plugin_requests().unwrap();
        let rendered: Vec<_> = requests.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            ["[id: 'a']", "[id: 'b', version: '2.0', apply: false]", "[id: 'c', version: '3.0']"]
        );
        assert_eq!(requests.get(0).unwrap().line_number(), block_line);
        assert_eq!(requests.get(1).unwrap().line_number(), block_line);
        assert_eq!(requests.get(2).unwrap().line_number(), 99);
    }

    #[test]
    fn test_block_stops_at_first_failure() {
        let mut collector = collector(AllowApplyFalse::Forbidden);
        let result = plugins!(collector => {
            id("a").apply(false);
            id("b");
        });

        assert_eq!(result, Err(PluginRequestError::ApplyFalseForbidden));
        assert_eq!(collector.builders().len(), 1);
    }

    #[test]
    fn test_empty_block() {
        let mut collector = collector(AllowApplyFalse::Allowed);
        plugins!(collector => {}).unwrap();
        assert!(collector.plugin_requests().unwrap().is_empty());
    }
}
