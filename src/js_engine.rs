//! Isolated JavaScript context for rendered extraction (rquickjs).
//!
//! Some embed hosts only materialize the real media URL after client-side
//! script execution. [`JsEngine`] gives the rendered strategy a throwaway
//! `QuickJS` context per extraction attempt: fresh state, memory-capped,
//! execution-time-capped, no persisted storage, released on drop on all
//! exit paths, since the engine lives on the caller's stack.
//!
//! Every evaluation re-arms a deadline checked by the runtime's interrupt
//! handler, so a hostile `while (true) {}` in page script is cut off after
//! the budget instead of pinning a thread forever.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use rquickjs::{Context, Runtime};
use tracing::debug;

/// Marker global the player shim records discovered sources into.
const CAPTURE_GLOBAL: &str = "__captured_sources";

/// Default execution budget per evaluation. Embed page scripts do their
/// player setup in milliseconds; anything still running after this is a
/// runaway loop or obfuscation stall.
const DEFAULT_SCRIPT_BUDGET: Duration = Duration::from_secs(2);

/// One isolated script context. Create per extraction attempt; never reuse
/// across providers or requests.
pub struct JsEngine {
    // Held so the context outlives calls; dropped together.
    _runtime: Runtime,
    context: Context,
    started: Instant,
    budget: Duration,
    // Millis since `started` at which the interrupt handler fires.
    deadline_ms: Arc<AtomicU64>,
}

impl JsEngine {
    /// Create a fresh engine with conservative resource caps.
    pub fn new() -> Result<Self> {
        Self::with_budget(DEFAULT_SCRIPT_BUDGET)
    }

    /// Create a fresh engine with an explicit per-evaluation time budget.
    pub fn with_budget(budget: Duration) -> Result<Self> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;

        // Embed page scripts are small; 32MB is generous headroom.
        runtime.set_memory_limit(32 * 1024 * 1024);
        runtime.set_max_stack_size(1024 * 1024);

        let started = Instant::now();
        let deadline_ms = Arc::new(AtomicU64::new(millis(budget)));
        let flag = Arc::clone(&deadline_ms);
        runtime.set_interrupt_handler(Some(Box::new(move || {
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
                >= flag.load(Ordering::Relaxed)
        })));

        Ok(Self {
            _runtime: runtime,
            context,
            started,
            budget,
            deadline_ms,
        })
    }

    /// Push the interrupt deadline one budget ahead of now. Called before
    /// every evaluation so one runaway script does not starve the ones
    /// after it, or the capture readout.
    fn arm(&self) {
        let deadline = self.started.elapsed() + self.budget;
        self.deadline_ms
            .store(millis(deadline), Ordering::Relaxed);
    }

    /// Evaluate a script, returning its result as a string. Errors are the
    /// script's problem, not ours; callers treat them as "no signal".
    pub fn eval(&self, code: &str) -> Result<String> {
        self.arm();
        self.context.with(|ctx| {
            let result: String = ctx.eval(code)?;
            Ok(result)
        })
    }

    /// Install browser-ish globals plus shims for the player libraries
    /// embed hosts actually use. The shims do not play anything; they
    /// record every configured source into [`CAPTURE_GLOBAL`].
    pub fn install_embed_shim(&self, page_url: &str) -> Result<()> {
        // Redirects can land on URLs with quote characters; keep them from
        // breaking out of the string literal below.
        let page_url = page_url.replace('\\', "\\\\").replace('\'', "\\'");
        let shim = format!(
            r#"
            var {CAPTURE_GLOBAL} = [];
            var __deferred = [];

            function __record(cfg) {{
                if (!cfg) return;
                if (typeof cfg === 'string') {{ {CAPTURE_GLOBAL}.push(cfg); return; }}
                if (cfg.file) {CAPTURE_GLOBAL}.push(String(cfg.file));
                if (cfg.url) {CAPTURE_GLOBAL}.push(String(cfg.url));
                if (cfg.source) __record(cfg.source);
                if (cfg.sources && cfg.sources.length) {{
                    for (var i = 0; i < cfg.sources.length; i++) __record(cfg.sources[i]);
                }}
            }}

            // jwplayer("player").setup({{file: "..."}})
            function jwplayer(id) {{
                return {{
                    setup: function(cfg) {{ __record(cfg); return this; }},
                    on: function() {{ return this; }},
                    load: function(cfg) {{ __record(cfg); return this; }}
                }};
            }}

            // new Playerjs({{id: "player", file: "..."}})
            function Playerjs(cfg) {{ __record(cfg); }}

            // videojs("player", {{sources: [...]}})
            function videojs(id, cfg) {{
                __record(cfg);
                return {{ src: function(s) {{ __record(s); }}, ready: function() {{}} }};
            }}

            var document = {{
                getElementById: function() {{ return null; }},
                querySelector: function() {{ return null; }},
                querySelectorAll: function() {{ return []; }},
                createElement: function() {{ return {{ style: {{}}, setAttribute: function() {{}} }}; }},
                addEventListener: function() {{}},
                cookie: '',
                body: {{ appendChild: function() {{}} }}
            }};

            var window = {{
                document: document,
                location: {{ href: '{page_url}' }},
                addEventListener: function() {{}},
                atob: function(s) {{ return s; }},
                setTimeout: function(f) {{ if (typeof f === 'function') __deferred.push(f); return __deferred.length; }},
                setInterval: function() {{ return 0; }}
            }};
            var navigator = {{ userAgent: 'Mozilla/5.0' }};
            var location = window.location;
            var setTimeout = window.setTimeout;
            var setInterval = window.setInterval;

            if (typeof console === 'undefined') {{
                var console = {{ log: function() {{}}, error: function() {{}}, warn: function() {{}} }};
            }}
            "#
        );

        self.arm();
        self.context.with(|ctx| {
            ctx.eval::<(), _>(shim.as_str())?;
            Ok(())
        })
    }

    /// Run inline scripts from the page, isolating failures per script:
    /// an obfuscated blob that throws or loops forever must not mask a
    /// later player setup.
    pub fn run_scripts(&self, scripts: &[String]) {
        for (index, script) in scripts.iter().enumerate() {
            self.arm();
            let outcome: Result<()> = self.context.with(|ctx| {
                ctx.eval::<(), _>(script.as_str())?;
                Ok(())
            });
            if let Err(err) = outcome {
                debug!(index, %err, "inline script failed, continuing");
            }
        }
    }

    /// Run one round of callbacks queued via the shimmed `setTimeout`,
    /// the settle pass for players that defer their setup.
    pub fn run_deferred(&self) {
        self.arm();
        let outcome: Result<()> = self.context.with(|ctx| {
            ctx.eval::<(), _>(
                r"__deferred.splice(0).forEach(function(f) { try { f(); } catch (e) {} });",
            )?;
            Ok(())
        });
        if let Err(err) = outcome {
            debug!(%err, "deferred settle pass failed");
        }
    }

    /// Sources the player shim captured, in setup order.
    pub fn captured_sources(&self) -> Vec<String> {
        self.json_eval(&format!("JSON.stringify({CAPTURE_GLOBAL})"))
    }

    /// String-valued global bindings left behind by page scripts, bounded
    /// to plausible URL lengths. An explicit snapshot, not live reflection.
    pub fn string_globals(&self) -> Vec<String> {
        self.json_eval(
            r"JSON.stringify(
                Object.getOwnPropertyNames(globalThis)
                    .filter(function(n) {
                        return typeof globalThis[n] === 'string'
                            && globalThis[n].length >= 12
                            && globalThis[n].length <= 2048;
                    })
                    .map(function(n) { return globalThis[n]; })
            )",
        )
    }

    fn json_eval(&self, code: &str) -> Vec<String> {
        match self.eval(code) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_eval() {
        let engine = JsEngine::new().unwrap();
        assert_eq!(engine.eval("'a' + 'b'").unwrap(), "ab");
    }

    #[test]
    fn jwplayer_setup_is_captured() {
        let engine = JsEngine::new().unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            r#"jwplayer("player").setup({ file: "https://cdn.x/a.m3u8" });"#.to_string(),
        ]);
        assert_eq!(engine.captured_sources(), vec!["https://cdn.x/a.m3u8"]);
    }

    #[test]
    fn nested_sources_are_captured() {
        let engine = JsEngine::new().unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            r#"new Playerjs({ id: "p", sources: [{ file: "https://cdn.x/v.mp4" }] });"#
                .to_string(),
        ]);
        assert_eq!(engine.captured_sources(), vec!["https://cdn.x/v.mp4"]);
    }

    #[test]
    fn throwing_script_does_not_block_later_ones() {
        let engine = JsEngine::new().unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            "throw new Error('decoy');".to_string(),
            r#"jwplayer("p").setup({ file: "https://cdn.x/b.m3u8" });"#.to_string(),
        ]);
        assert_eq!(engine.captured_sources(), vec!["https://cdn.x/b.m3u8"]);
    }

    #[test]
    fn deferred_setup_runs_in_settle_pass() {
        let engine = JsEngine::new().unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            r#"setTimeout(function() { jwplayer("p").setup({ file: "https://cdn.x/late.m3u8" }); }, 500);"#
                .to_string(),
        ]);
        assert!(engine.captured_sources().is_empty());
        engine.run_deferred();
        assert_eq!(engine.captured_sources(), vec!["https://cdn.x/late.m3u8"]);
    }

    #[test]
    fn string_globals_are_snapshotted() {
        let engine = JsEngine::new().unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            r"var streamSrc = 'https://cdn.x/hidden/master.m3u8'; var tiny = 'x'; var num = 42;"
                .to_string(),
        ]);
        let globals = engine.string_globals();
        assert!(globals.contains(&"https://cdn.x/hidden/master.m3u8".to_string()));
        assert!(!globals.contains(&"x".to_string()));
    }

    #[test]
    fn runaway_script_is_interrupted() {
        let engine = JsEngine::with_budget(Duration::from_millis(50)).unwrap();
        engine.install_embed_shim("https://embed.example/").unwrap();
        engine.run_scripts(&[
            "while (true) {}".to_string(),
            r#"jwplayer("p").setup({ file: "https://cdn.x/after-loop.m3u8" });"#.to_string(),
        ]);
        // The loop is cut off at the budget; later scripts and the capture
        // readout get fresh budgets.
        assert_eq!(engine.captured_sources(), vec!["https://cdn.x/after-loop.m3u8"]);
    }

    #[test]
    fn shim_survives_quotes_in_page_url() {
        let engine = JsEngine::new().unwrap();
        engine
            .install_embed_shim("https://embed.example/movie/o'brien?t='x'")
            .unwrap();
        let href = engine.eval("location.href").unwrap();
        assert_eq!(href, "https://embed.example/movie/o'brien?t='x'");
    }

    #[test]
    fn contexts_are_isolated() {
        let first = JsEngine::new().unwrap();
        first.install_embed_shim("https://a/").unwrap();
        first.run_scripts(&[r#"jwplayer("p").setup({ file: "https://cdn.x/a.m3u8" });"#
            .to_string()]);

        let second = JsEngine::new().unwrap();
        second.install_embed_shim("https://b/").unwrap();
        assert!(second.captured_sources().is_empty());
    }
}
